//! Search and graph configuration
//!
//! Both configurations are plain serde structs with defaults, so they can be
//! built in code, deserialized from JSON, or assembled from the string
//! parameters exposed through [`crate::algorithm::traits::Algorithm`].

use serde::{Deserialize, Serialize};

/// Configuration parsing and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-query search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stop after this many queue pops and report `BudgetExceeded`.
    /// `None` runs to a terminal state.
    pub max_expansions: Option<usize>,

    /// Record an execution trace of pushes, pops and relaxations
    pub trace: bool,

    /// Initial open-set allocation; the queue grows past it as needed
    pub initial_queue_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: None,
            trace: false,
            initial_queue_capacity: 64,
        }
    }
}

impl SearchConfig {
    /// Parses and validates a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expansions == Some(0) {
            return Err(ConfigError::Invalid(
                "max_expansions must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

/// Graph store settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fixed node capacity; identifiers at or above it are rejected.
    /// `None` grows the store on demand.
    pub max_nodes: Option<usize>,
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.max_nodes == Some(0) {
            return Err(ConfigError::Invalid("max_nodes must be at least 1".into()));
        }
        Ok(config)
    }

    pub fn bounded(max_nodes: usize) -> Self {
        Self {
            max_nodes: Some(max_nodes),
        }
    }
}
