//! Breadth-first traversal
//!
//! Visits every node reachable from the start in order of hop distance.
//! Nodes are marked on enqueue, so each is queued and yielded once.

use std::collections::VecDeque;

use crate::algorithm::traits::{Algorithm, AlgorithmComplexity, NodeId, TraversalAlgorithm};
use crate::data_structures::graph::Graph;

#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstSearch;

impl BreadthFirstSearch {
    pub fn new() -> Self {
        Self
    }
}

/// Lazy BFS visitation order
#[derive(Debug)]
pub struct BfsIter<'g> {
    graph: &'g Graph,
    queue: VecDeque<NodeId>,
    visited: Vec<bool>,
    visited_count: usize,
}

impl<'g> BfsIter<'g> {
    fn new(graph: &'g Graph, start: NodeId) -> Self {
        let mut visited = vec![false; graph.node_count()];
        let mut queue = VecDeque::new();
        if let Some(mark) = visited.get_mut(start.0) {
            *mark = true;
            queue.push_back(start);
        }
        Self {
            graph,
            queue,
            visited,
            visited_count: 0,
        }
    }

    /// Nodes yielded so far
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }
}

impl Iterator for BfsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.queue.pop_front()?;
        for (neighbor, _) in self.graph.neighbors(node) {
            if let Some(mark) = self.visited.get_mut(neighbor.0) {
                if !*mark {
                    *mark = true;
                    self.queue.push_back(neighbor);
                }
            }
        }
        self.visited_count += 1;
        Some(node)
    }
}

impl Algorithm for BreadthFirstSearch {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn category(&self) -> &'static str {
        "traversal"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V + E)",
            space_complexity: "O(V)",
        }
    }
}

impl TraversalAlgorithm for BreadthFirstSearch {
    type Iter<'g> = BfsIter<'g>;

    fn traverse<'g>(&self, graph: &'g Graph, start: NodeId) -> BfsIter<'g> {
        BfsIter::new(graph, start)
    }
}
