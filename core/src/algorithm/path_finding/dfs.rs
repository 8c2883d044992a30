//! Depth-first traversal
//!
//! Explicit-stack DFS. Nodes are marked when popped, and neighbors are
//! pushed in reverse adjacency order so the first listed neighbor is
//! explored first, matching the recursive visitation order.

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, NodeId, TraversalAlgorithm};
use crate::data_structures::graph::Graph;

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstSearch;

impl DepthFirstSearch {
    pub fn new() -> Self {
        Self
    }
}

/// Lazy DFS visitation order
#[derive(Debug)]
pub struct DfsIter<'g> {
    graph: &'g Graph,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
    visited_count: usize,
}

impl<'g> DfsIter<'g> {
    fn new(graph: &'g Graph, start: NodeId) -> Self {
        let stack = if graph.contains(start) { vec![start] } else { Vec::new() };
        Self {
            graph,
            stack,
            visited: vec![false; graph.node_count()],
            visited_count: 0,
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }
}

impl Iterator for DfsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        while let Some(node) = self.stack.pop() {
            if self.visited[node.0] {
                continue;
            }
            self.visited[node.0] = true;

            let mark = self.stack.len();
            self.stack.extend(
                self.graph
                    .neighbors(node)
                    .map(|(neighbor, _)| neighbor)
                    .filter(|neighbor| !self.visited[neighbor.0]),
            );
            self.stack[mark..].reverse();

            self.visited_count += 1;
            return Some(node);
        }
        None
    }
}

impl Algorithm for DepthFirstSearch {
    fn name(&self) -> &'static str {
        "dfs"
    }

    fn category(&self) -> &'static str {
        "traversal"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V + E)",
            space_complexity: "O(E)",
        }
    }
}

impl TraversalAlgorithm for DepthFirstSearch {
    type Iter<'g> = DfsIter<'g>;

    fn traverse<'g>(&self, graph: &'g Graph, start: NodeId) -> DfsIter<'g> {
        DfsIter::new(graph, start)
    }
}
