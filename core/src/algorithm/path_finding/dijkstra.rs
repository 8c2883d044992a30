//! Dijkstra's shortest-path algorithm
//!
//! Priority-first search with the zero heuristic. Besides point-to-point
//! queries it computes full single-source trees by running the engine with
//! no goal until the open set is exhausted.

use log::info;

use crate::algorithm::path_finding::astar::{run_traced, SearchEngine, ZeroHeuristic};
use crate::algorithm::path_finding::{apply_search_parameter, search_parameters};
use crate::algorithm::state::ShortestPathTree;
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter, NodeId, PathOutcome,
    PathfindingAlgorithm,
};
use crate::config::SearchConfig;
use crate::data_structures::graph::Graph;
use crate::execution::tracer::ExecutionTracer;

#[derive(Debug, Clone, Default)]
pub struct Dijkstra {
    config: SearchConfig,
}

impl Dijkstra {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Like [`PathfindingAlgorithm::find_path`], also returning the trace
    pub fn find_path_traced(
        &self,
        graph: &Graph,
        start: NodeId,
        goal: NodeId,
    ) -> Result<(PathOutcome, ExecutionTracer), AlgorithmError> {
        run_traced(graph, start, goal, &ZeroHeuristic, &self.config)
    }

    /// Minimum costs and predecessors from `start` to every reachable node.
    ///
    /// An expansion budget, if configured, truncates the tree: nodes not yet
    /// settled may carry non-final costs.
    pub fn shortest_path_tree(
        &self,
        graph: &Graph,
        start: NodeId,
    ) -> Result<ShortestPathTree, AlgorithmError> {
        let mut engine = SearchEngine::new(graph, start, None, &ZeroHeuristic, &self.config)?;
        let phase = engine.run()?;
        let metrics = engine.metrics();
        let (state, _) = engine.into_parts();

        let tree = state.into_tree();
        info!(
            "single-source tree from {}: {} reachable, {} pops ({} stale), ended {:?}",
            start,
            tree.reachable_count(),
            metrics.steps_executed,
            metrics.stale_skipped,
            phase
        );
        Ok(tree)
    }
}

impl Algorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn category(&self) -> &'static str {
        "pathfinding"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O((V + E) log V)",
            space_complexity: "O(V + E)",
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        search_parameters(&self.config)
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        apply_search_parameter(&mut self.config, name, value)
    }
}

impl PathfindingAlgorithm for Dijkstra {
    fn find_path(
        &self,
        graph: &Graph,
        start: NodeId,
        goal: NodeId,
    ) -> Result<PathOutcome, AlgorithmError> {
        let mut engine = SearchEngine::new(graph, start, Some(goal), &ZeroHeuristic, &self.config)?;
        engine.run()?;
        engine.outcome()
    }

    fn guarantees_optimal_path(&self) -> bool {
        true
    }

    fn heuristic_description(&self) -> Option<String> {
        None
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> Graph {
        Graph::from_edges([(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5)])
    }

    #[test]
    fn test_simple_path_finding() {
        let graph = create_test_graph();
        let outcome = Dijkstra::new().find_path(&graph, NodeId(0), NodeId(3)).unwrap();

        let result = outcome.into_result().unwrap();
        assert_eq!(result.cost, 4);
        assert_eq!(result.path, vec![NodeId(0), NodeId(2), NodeId(1), NodeId(3)]);
        assert!(result.metrics.nodes_explored >= 3);
    }

    #[test]
    fn test_trivial_case() {
        let graph = create_test_graph();
        let outcome = Dijkstra::new().find_path(&graph, NodeId(2), NodeId(2)).unwrap();
        assert_eq!(outcome.cost(), Some(0));
        assert_eq!(outcome.path().unwrap(), &[NodeId(2)]);
    }

    #[test]
    fn test_unreachable_goal() {
        // Node 4 exists but has no incoming edges
        let graph = Graph::from_edges([(0, 1, 1), (4, 0, 1)]);
        let outcome = Dijkstra::new().find_path(&graph, NodeId(0), NodeId(4)).unwrap();
        assert!(matches!(outcome, PathOutcome::NoPath { .. }));
        assert_eq!(outcome.cost(), None);
    }

    #[test]
    fn test_shortest_path_tree() {
        let graph = create_test_graph();
        let tree = Dijkstra::new().shortest_path_tree(&graph, NodeId(0)).unwrap();

        assert_eq!(tree.cost_to(NodeId(0)), Some(0));
        assert_eq!(tree.cost_to(NodeId(1)), Some(3));
        assert_eq!(tree.cost_to(NodeId(2)), Some(1));
        assert_eq!(tree.cost_to(NodeId(3)), Some(4));
        assert_eq!(tree.reachable_count(), 4);
        assert_eq!(
            tree.path_to(NodeId(1)).unwrap(),
            Some(vec![NodeId(0), NodeId(2), NodeId(1)])
        );
    }

    #[test]
    fn test_zero_weight_edges() {
        let graph = Graph::from_edges([(0, 1, 0), (1, 2, 0), (0, 2, 1)]);
        let outcome = Dijkstra::new().find_path(&graph, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(outcome.cost(), Some(0));
        assert_eq!(outcome.path().unwrap(), &[NodeId(0), NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_parallel_edges_use_cheapest() {
        let graph = Graph::from_edges([(0, 1, 9), (0, 1, 2), (0, 1, 5)]);
        let outcome = Dijkstra::new().find_path(&graph, NodeId(0), NodeId(1)).unwrap();
        assert_eq!(outcome.cost(), Some(2));
    }

    #[test]
    fn test_traced_run_is_monotone() {
        let graph = create_test_graph();
        let dijkstra = Dijkstra::with_config(SearchConfig::default().with_trace(true));
        let (outcome, tracer) = dijkstra.find_path_traced(&graph, NodeId(0), NodeId(3)).unwrap();

        assert_eq!(outcome.cost(), Some(4));
        assert!(!tracer.is_empty());
        assert!(tracer.costs_monotone());
        assert_eq!(tracer.finalized_order().first(), Some(&NodeId(0)));
    }

    #[test]
    fn test_traced_run_matches_zero_heuristic_astar() {
        let graph = create_test_graph();
        let config = SearchConfig::default().with_trace(true);
        let (dijkstra_outcome, dijkstra_trace) = Dijkstra::with_config(config.clone())
            .find_path_traced(&graph, NodeId(0), NodeId(3))
            .unwrap();
        let (astar_outcome, astar_trace) = crate::algorithm::path_finding::astar::AStar::new()
            .with_config(config)
            .find_path_traced(&graph, NodeId(0), NodeId(3))
            .unwrap();

        assert_eq!(dijkstra_outcome.path(), astar_outcome.path());
        assert_eq!(dijkstra_trace.events(), astar_trace.events());
    }

    #[test]
    fn test_algorithm_metadata() {
        let dijkstra = Dijkstra::new();
        assert_eq!(dijkstra.name(), "dijkstra");
        assert_eq!(dijkstra.id().as_str(), "dijkstra");
        assert_eq!(dijkstra.category(), "pathfinding");
        assert!(dijkstra.guarantees_optimal_path());
        assert!(dijkstra.heuristic_description().is_none());
        assert_eq!(dijkstra.parameters().len(), 3);
    }
}
