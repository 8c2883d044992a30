//! Core algorithm trait definitions for graphwalk
//!
//! This module establishes the shared vocabulary of every search strategy:
//! the node identifier newtype, the cost domain with its infinity sentinel,
//! the engine error taxonomy, result/metrics types and the traits that the
//! four strategies implement over the shared graph store.
//!
//! # Key Design Principles
//! - Identifiers and weights are newtypes, never bare integers
//! - Errors are explicit enum variants, never sentinel values
//! - "No path" is an outcome, not an error

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::data_structures::graph::{Graph, GraphError};
use crate::data_structures::priority_queue::PriorityQueueError;

/// Accumulated path cost.
///
/// 64 bits of headroom against 32-bit edge weights: a path would need more
/// than four billion maximum-weight edges before a finite sum could
/// approach [`INFINITE_COST`].
pub type Cost = u64;

/// Sentinel for "not reached yet". Strictly greater than any finite cost
/// the engine will ever store, since relaxation uses checked addition.
pub const INFINITE_COST: Cost = Cost::MAX;

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Node identifier ensuring type safety and preventing mixing with other numeric types
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub description: String,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Integer,
    Boolean,
    /// Integer or the literal `none`
    OptionalInteger,
}

/// Error types for search operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid node: {0} is outside the graph")]
    InvalidNode(NodeId),

    /// Path reconstruction hit a node without predecessor before reaching
    /// the start, or looped. Indicates a relaxation bug.
    #[error("Inconsistent predecessor chain from {goal}: broken at {broken_at}")]
    InconsistentPredecessorChain { goal: NodeId, broken_at: NodeId },

    #[error("Priority queue contract violated: {0}")]
    EmptyQueueAccess(#[from] PriorityQueueError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    /// Entries popped from the open set, stale ones included
    pub steps_executed: usize,
    /// Nodes whose cost was settled (expanded)
    pub nodes_explored: usize,
    /// Queue entries discarded by the lazy deletion check
    pub stale_skipped: usize,
    /// Successful edge relaxations
    pub relaxations: usize,
    /// Largest open-set size observed
    pub peak_queue_len: usize,
    pub execution_time: Duration,
    pub custom_metrics: HashMap<String, f64>,
}

/// Minimum-cost path from start to goal, both inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<NodeId>,
    pub cost: Cost,
    pub metrics: AlgorithmMetrics,
}

impl PathResult {
    pub fn start(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// Number of edges on the path
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Terminal outcome of a goal-directed search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathOutcome {
    Found(PathResult),
    /// The open set ran dry without reaching the goal
    NoPath { metrics: AlgorithmMetrics },
    /// A configured expansion budget ran out before a terminal state
    BudgetExceeded { metrics: AlgorithmMetrics },
}

impl PathOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }

    pub fn path(&self) -> Option<&[NodeId]> {
        match self {
            PathOutcome::Found(result) => Some(&result.path),
            _ => None,
        }
    }

    pub fn cost(&self) -> Option<Cost> {
        match self {
            PathOutcome::Found(result) => Some(result.cost),
            _ => None,
        }
    }

    pub fn metrics(&self) -> &AlgorithmMetrics {
        match self {
            PathOutcome::Found(result) => &result.metrics,
            PathOutcome::NoPath { metrics } | PathOutcome::BudgetExceeded { metrics } => metrics,
        }
    }

    pub fn into_result(self) -> Option<PathResult> {
        match self {
            PathOutcome::Found(result) => Some(result),
            _ => None,
        }
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: &'static str,
    pub space_complexity: &'static str,
}

/// Common surface of every search strategy
pub trait Algorithm: fmt::Debug + Send + Sync {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new(self.name())
    }

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (pathfinding or traversal)
    fn category(&self) -> &'static str;

    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with their current values
    fn parameters(&self) -> Vec<AlgorithmParameter> {
        Vec::new()
    }

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, _value: &str) -> Result<(), AlgorithmError> {
        Err(AlgorithmError::InvalidParameter {
            name: name.to_owned(),
            reason: format!("{} has no parameters", self.name()),
        })
    }

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.value)
    }
}

/// Pathfinding algorithm trait specialization
pub trait PathfindingAlgorithm: Algorithm {
    /// Finds a minimum-cost path between two nodes
    ///
    /// # Guarantees
    /// - Optimal for non-negative weights and an admissible heuristic
    /// - `PathOutcome::NoPath` when the goal is unreachable
    fn find_path(
        &self,
        graph: &Graph,
        start: NodeId,
        goal: NodeId,
    ) -> Result<PathOutcome, AlgorithmError>;

    /// Returns whether the algorithm guarantees optimal paths
    fn guarantees_optimal_path(&self) -> bool;

    /// Returns the heuristic in use, if any
    fn heuristic_description(&self) -> Option<String>;

    /// Search configuration currently applied
    fn config(&self) -> &SearchConfig;
}

/// Whole-graph visitation strategy (BFS, DFS)
pub trait TraversalAlgorithm: Algorithm {
    type Iter<'g>: Iterator<Item = NodeId> + 'g;

    /// Lazily visits every node reachable from `start`. The returned
    /// iterator is finite and consumed once.
    fn traverse<'g>(&self, graph: &'g Graph, start: NodeId) -> Self::Iter<'g>;
}

/// Wall-clock and counter bookkeeping for a single run
#[derive(Debug)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self {
            metrics: AlgorithmMetrics::default(),
            start_time: None,
        }
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_node_exploration(&mut self) {
        self.metrics.nodes_explored += 1;
    }

    pub fn record_stale_skip(&mut self) {
        self.metrics.stale_skipped += 1;
    }

    pub fn record_relaxation(&mut self) {
        self.metrics.relaxations += 1;
    }

    pub fn sample_queue_len(&mut self, len: usize) {
        self.metrics.peak_queue_len = self.metrics.peak_queue_len.max(len);
    }

    pub fn set_custom(&mut self, key: &str, value: f64) {
        self.metrics.custom_metrics.insert(key.to_owned(), value);
    }

    pub fn steps(&self) -> usize {
        self.metrics.steps_executed
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}

impl Default for AlgorithmProfiler {
    fn default() -> Self {
        Self::new()
    }
}
