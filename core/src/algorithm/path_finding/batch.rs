//! Concurrent point-to-point queries over one immutable graph
//!
//! The graph is only ever borrowed immutably; every query builds its own
//! cost table, predecessor table and open set inside the rayon worker that
//! runs it, so queries share no mutable state.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithm::path_finding::dijkstra::Dijkstra;
use crate::algorithm::traits::{AlgorithmError, NodeId, PathOutcome, PathfindingAlgorithm};
use crate::config::SearchConfig;
use crate::data_structures::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathQuery {
    pub start: NodeId,
    pub goal: NodeId,
}

impl PathQuery {
    pub fn new(start: impl Into<NodeId>, goal: impl Into<NodeId>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
        }
    }
}

/// Per-query result; one failing query does not abort the batch
pub type QueryOutcome = Result<PathOutcome, AlgorithmError>;

/// Runs every query with Dijkstra in parallel; results keep query order
pub fn run_batch(graph: &Graph, queries: &[PathQuery], config: &SearchConfig) -> Vec<QueryOutcome> {
    debug!("running {} queries over {} nodes", queries.len(), graph.node_count());
    let dijkstra = Dijkstra::with_config(config.clone());

    queries
        .par_iter()
        .map(|query| dijkstra.find_path(graph, query.start, query.goal))
        .collect()
}
