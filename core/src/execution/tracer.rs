//! Execution tracing for priority-first searches
//!
//! When enabled through [`crate::config::SearchConfig::trace`], the engine
//! records every open-set operation and cost update as a [`TraceEvent`].
//! A trace makes the lazy deletion behaviour observable: stale pops show up
//! as [`TraceEvent::StaleSkip`] and every cost change as a
//! [`TraceEvent::Relax`] carrying the previous and the new value.

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Cost, NodeId, INFINITE_COST};

/// Single recorded step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    Push { node: NodeId, key: Cost },
    Pop { node: NodeId, key: Cost },
    /// Popped entry whose key no longer matches the node's best cost
    StaleSkip { node: NodeId, key: Cost, best: Cost },
    /// `old` is [`INFINITE_COST`] on first discovery
    Relax {
        node: NodeId,
        via: NodeId,
        old: Cost,
        new: Cost,
    },
    Finalize { node: NodeId, cost: Cost },
}

/// Append-only event log of one search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionTracer {
    enabled: bool,
    events: Vec<TraceEvent>,
}

impl ExecutionTracer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stale_skips(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::StaleSkip { .. }))
            .count()
    }

    /// Order in which nodes were settled
    pub fn finalized_order(&self) -> Vec<NodeId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Finalize { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// True when no relaxation ever raised a node's cost
    pub fn costs_monotone(&self) -> bool {
        self.events.iter().all(|e| match e {
            TraceEvent::Relax { old, new, .. } => new < old || *old == INFINITE_COST,
            _ => true,
        })
    }

    /// Dumps the trace as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }
}
