//! Weighted directed graph store
//!
//! Adjacency-list graph over dense integer node identifiers. All edges live
//! in one contiguous vector owned by the [`Graph`]; every node keeps a list
//! of indices into that vector, so no edge is allocated or freed on its own
//! and neighbor iteration is a plain slice walk.
//!
//! The addressable node range is `0..node_count()` where `node_count()` is
//! one past the largest identifier inserted so far. Sparse identifier
//! spaces are not remapped: inserting node `4_000_000` sizes the store for
//! four million slots.
//!
//! A store created from a [`GraphConfig`] with `max_nodes` set is
//! fixed-capacity and rejects identifiers beyond it with
//! [`GraphError::NodeOutOfRange`] instead of growing.

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{Cost, NodeId};
use crate::config::GraphConfig;

/// Graph store and loader errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Node {node} out of range (capacity {capacity})")]
    NodeOutOfRange { node: NodeId, capacity: usize },

    #[error("Negative weight {weight} on edge {src} -> {dest}")]
    NegativeWeight { src: NodeId, dest: NodeId, weight: i64 },

    #[error("Weight {weight} on edge {src} -> {dest} exceeds u32")]
    WeightOverflow { src: NodeId, dest: NodeId, weight: i64 },

    #[error("Edge store full at {edges} edges")]
    EdgeCapacityExceeded { edges: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-negative edge weight
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EdgeWeight(pub u32);

impl EdgeWeight {
    #[inline]
    pub fn new(weight: u32) -> Self {
        Self(weight)
    }

    /// Checked conversion from a signed weight; negatives break Dijkstra's
    /// settled-node invariant and are refused here.
    pub fn from_signed(src: NodeId, dest: NodeId, weight: i64) -> Result<Self, GraphError> {
        if weight < 0 {
            return Err(GraphError::NegativeWeight { src, dest, weight });
        }
        u32::try_from(weight)
            .map(Self)
            .map_err(|_| GraphError::WeightOverflow { src, dest, weight })
    }

    #[inline]
    pub fn as_cost(self) -> Cost {
        Cost::from(self.0)
    }
}

impl fmt::Display for EdgeWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed weighted edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: EdgeWeight,
}

/// Adjacency-list graph with index-based edge ownership
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Every edge in insertion order
    edges: Vec<Edge>,

    /// Per-node outgoing edge indices into `edges`
    adjacency: Vec<Vec<u32>>,

    /// Fixed capacity, if bounded
    max_nodes: Option<usize>,
}

impl Graph {
    /// Creates an empty, growable graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph honoring `config.max_nodes`
    pub fn with_config(config: &GraphConfig) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: Vec::new(),
            max_nodes: config.max_nodes,
        }
    }

    /// Creates a growable graph with `node_count` slots already addressable.
    /// Used by the two-pass loader once the maximum identifier is known.
    pub fn with_node_count(node_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); node_count],
            max_nodes: None,
        }
    }

    /// Builds a growable graph from `(src, dest, weight)` triples
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, u32)>,
    {
        let mut graph = Self::new();
        for (src, dest, weight) in edges {
            graph.add_edge(NodeId(src), NodeId(dest), EdgeWeight(weight));
        }
        graph
    }

    /// Inserts a directed edge, growing the node range to cover both ends.
    ///
    /// Parallel edges are kept. In a bounded store an endpoint at or beyond
    /// the capacity yields [`GraphError::NodeOutOfRange`] and nothing is
    /// inserted.
    pub fn insert_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: EdgeWeight,
    ) -> Result<(), GraphError> {
        if let Some(capacity) = self.max_nodes {
            for node in [source, target] {
                if node.0 >= capacity {
                    return Err(GraphError::NodeOutOfRange { node, capacity });
                }
            }
        }

        let high = source.max(target);
        let required = high.0.checked_add(1).ok_or(GraphError::NodeOutOfRange {
            node: high,
            capacity: usize::MAX,
        })?;
        let index = edge_index(self.edges.len())?;

        if required > self.adjacency.len() {
            self.adjacency.resize_with(required, Vec::new);
        }
        self.edges.push(Edge { source, target, weight });
        self.adjacency[source.0].push(index);

        trace!("inserted edge {} -> {} ({})", source, target, weight);
        Ok(())
    }

    /// Inserts an edge with a signed weight, rejecting negatives
    pub fn insert_signed_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: i64,
    ) -> Result<(), GraphError> {
        let weight = EdgeWeight::from_signed(source, target, weight)?;
        self.insert_edge(source, target, weight)
    }

    /// Infallible insertion for growable stores.
    ///
    /// # Panics
    /// On a bounded store when an endpoint is out of range.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: EdgeWeight) {
        if let Err(err) = self.insert_edge(source, target, weight) {
            panic!("add_edge on bounded graph: {err}");
        }
    }

    /// Outgoing `(target, weight)` pairs of `node`.
    ///
    /// Calling it again restarts the sequence. Unknown nodes have no
    /// neighbors.
    pub fn neighbors(&self, node: NodeId) -> Neighbors<'_> {
        let indices = self
            .adjacency
            .get(node.0)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Neighbors {
            edges: &self.edges,
            indices: indices.iter(),
        }
    }

    /// Number of outgoing edges of `node`
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adjacency.get(node.0).map_or(0, Vec::len)
    }

    /// Number of addressable node slots (max identifier + 1)
    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Capacity limit of a bounded store
    pub fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter()
    }
}

/// Slot of the next edge; adjacency lists store `u32` indices
fn edge_index(len: usize) -> Result<u32, GraphError> {
    u32::try_from(len).map_err(|_| GraphError::EdgeCapacityExceeded { edges: len })
}

/// Iterator over a node's outgoing edges
#[derive(Debug, Clone)]
pub struct Neighbors<'g> {
    edges: &'g [Edge],
    indices: std::slice::Iter<'g, u32>,
}

impl<'g> Iterator for Neighbors<'g> {
    type Item = (NodeId, EdgeWeight);

    fn next(&mut self) -> Option<Self::Item> {
        let &index = self.indices.next()?;
        let edge = &self.edges[index as usize];
        Some((edge.target, edge.weight))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Neighbors<'_> {}
