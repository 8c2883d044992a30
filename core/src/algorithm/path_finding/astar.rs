//! A* search and the shared priority-first search engine
//!
//! [`SearchEngine`] is the label-correcting loop behind both A* and
//! Dijkstra. Each step pops the open-set entry with the smallest
//! `g + h` key and either
//!
//! 1. discards it as stale when `key > best_cost[node] + h(node)`: a cheaper
//!    path to `node` was found after the entry was queued (lazy deletion),
//! 2. stops with [`SearchPhase::Found`] when the node is the goal, or
//! 3. settles the node and relaxes its outgoing edges, pushing a fresh entry
//!    for every neighbor whose cost improved.
//!
//! An empty open set ends the search in [`SearchPhase::Exhausted`]. With an
//! admissible heuristic and non-negative weights the path reported on
//! `Found` has minimum cost; with [`ZeroHeuristic`] the engine is exactly
//! Dijkstra's algorithm.

use std::fmt;

use log::{debug, trace};

use crate::algorithm::path_finding::{apply_search_parameter, search_parameters};
use crate::algorithm::state::{SearchPhase, SearchState};
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics, AlgorithmParameter,
    AlgorithmProfiler, Cost, NodeId, PathOutcome, PathResult, PathfindingAlgorithm,
};
use crate::config::SearchConfig;
use crate::data_structures::graph::Graph;
use crate::data_structures::priority_queue::MinPriorityQueue;
use crate::execution::tracer::{ExecutionTracer, TraceEvent};

/// Estimate of the remaining cost from `node` to `goal`.
///
/// Must never overestimate the true remaining cost (admissibility) for the
/// search to stay optimal.
pub trait Heuristic: Send + Sync {
    fn estimate(&self, node: NodeId, goal: NodeId) -> Cost;

    fn describe(&self) -> String {
        "custom heuristic".to_owned()
    }
}

/// `h ≡ 0`; turns A* into Dijkstra
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _node: NodeId, _goal: NodeId) -> Cost {
        0
    }

    fn describe(&self) -> String {
        "zero heuristic (Dijkstra)".to_owned()
    }
}

/// Adapter for closures `Fn(node, goal) -> Cost`
#[derive(Clone, Copy)]
pub struct FnHeuristic<F>(pub F);

impl<F> Heuristic for FnHeuristic<F>
where
    F: Fn(NodeId, NodeId) -> Cost + Send + Sync,
{
    #[inline]
    fn estimate(&self, node: NodeId, goal: NodeId) -> Cost {
        (self.0)(node, goal)
    }
}

impl<F> fmt::Debug for FnHeuristic<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHeuristic")
    }
}

/// Stepwise priority-first search over a borrowed graph
pub struct SearchEngine<'g, H: Heuristic + ?Sized> {
    graph: &'g Graph,
    heuristic: &'g H,
    config: &'g SearchConfig,
    state: SearchState,
    open_set: MinPriorityQueue<Cost>,
    profiler: AlgorithmProfiler,
    tracer: ExecutionTracer,
}

impl<'g, H: Heuristic + ?Sized> SearchEngine<'g, H> {
    /// Enters `Initialized`: start at cost 0, open set holding only
    /// `(start, h(start))`.
    ///
    /// `goal: None` computes the full single-source tree. A goal outside
    /// the graph can never be reached and is reported as no path.
    pub fn new(
        graph: &'g Graph,
        start: NodeId,
        goal: Option<NodeId>,
        heuristic: &'g H,
        config: &'g SearchConfig,
    ) -> Result<Self, AlgorithmError> {
        let state = SearchState::new(graph.node_count(), start, goal)?;

        let mut engine = Self {
            graph,
            heuristic,
            config,
            state,
            open_set: MinPriorityQueue::with_capacity(config.initial_queue_capacity),
            profiler: AlgorithmProfiler::new(),
            tracer: ExecutionTracer::new(config.trace),
        };

        let key = engine.h(start);
        engine.push(start, key);
        Ok(engine)
    }

    /// Heuristic against the goal; 0 without an addressable goal, so the
    /// heuristic is never asked about a node the graph does not have
    #[inline]
    fn h(&self, node: NodeId) -> Cost {
        match self.state.goal() {
            Some(goal) if self.graph.contains(goal) => self.heuristic.estimate(node, goal),
            _ => 0,
        }
    }

    fn push(&mut self, node: NodeId, key: Cost) {
        self.open_set.push(node, key);
        self.tracer.record(TraceEvent::Push { node, key });
    }

    pub fn phase(&self) -> SearchPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn open_set_len(&self) -> usize {
        self.open_set.len()
    }

    /// Performs one pop of the open set and returns the resulting phase.
    /// Terminal phases are sticky.
    pub fn step(&mut self) -> Result<SearchPhase, AlgorithmError> {
        if self.state.phase().is_terminal() {
            return Ok(self.state.phase());
        }
        if self.state.phase() == SearchPhase::Initialized {
            self.profiler.start();
            self.state.set_phase(SearchPhase::Running);

            if let Some(goal) = self.state.goal() {
                if !self.graph.contains(goal) {
                    debug!("goal {} outside graph of {} nodes", goal, self.graph.node_count());
                    return Ok(self.finish(SearchPhase::Exhausted));
                }
            }
        }

        if let Some(limit) = self.config.max_expansions {
            if self.profiler.steps() >= limit {
                return Ok(self.finish(SearchPhase::BudgetExceeded));
            }
        }

        if self.open_set.is_empty() {
            return Ok(self.finish(SearchPhase::Exhausted));
        }

        let (node, key) = self.open_set.pop_min()?;
        self.profiler.record_step();
        self.tracer.record(TraceEvent::Pop { node, key });

        let best = self.state.raw_cost(node);
        if key > best.saturating_add(self.h(node)) {
            trace!("stale entry for {} (key {}, best {})", node, key, best);
            self.profiler.record_stale_skip();
            self.tracer.record(TraceEvent::StaleSkip { node, key, best });
            return Ok(SearchPhase::Running);
        }

        self.state.finalize(node);
        self.profiler.record_node_exploration();
        self.tracer.record(TraceEvent::Finalize { node, cost: best });

        if self.state.goal() == Some(node) {
            return Ok(self.finish(SearchPhase::Found));
        }

        let graph = self.graph;
        for (neighbor, weight) in graph.neighbors(node) {
            if let Some((old, new)) = self.state.relax(node, neighbor, weight) {
                self.profiler.record_relaxation();
                self.tracer.record(TraceEvent::Relax {
                    node: neighbor,
                    via: node,
                    old,
                    new,
                });
                let key = new.saturating_add(self.h(neighbor));
                self.push(neighbor, key);
            }
        }
        self.profiler.sample_queue_len(self.open_set.len());

        Ok(SearchPhase::Running)
    }

    fn finish(&mut self, phase: SearchPhase) -> SearchPhase {
        self.profiler.stop();
        self.profiler
            .set_custom("open_set_remaining", self.open_set.len() as f64);
        self.state.set_phase(phase);
        debug!(
            "search from {} ended {:?} after {} pops",
            self.state.start(),
            phase,
            self.profiler.steps()
        );
        phase
    }

    /// Steps until a terminal phase
    pub fn run(&mut self) -> Result<SearchPhase, AlgorithmError> {
        debug!(
            "priority-first search {} -> {:?} over {} nodes",
            self.state.start(),
            self.state.goal(),
            self.graph.node_count()
        );
        loop {
            let phase = self.step()?;
            if phase.is_terminal() {
                return Ok(phase);
            }
        }
    }

    /// Turns a finished goal-directed run into its outcome
    pub fn outcome(&self) -> Result<PathOutcome, AlgorithmError> {
        let metrics = self.profiler.get_metrics();
        match (self.state.phase(), self.state.goal()) {
            (SearchPhase::Found, Some(goal)) => {
                let cost = self.state.cost(goal).ok_or(
                    AlgorithmError::InconsistentPredecessorChain {
                        goal,
                        broken_at: goal,
                    },
                )?;
                let path = self.state.reconstruct_path(goal)?;
                Ok(PathOutcome::Found(PathResult { path, cost, metrics }))
            }
            (SearchPhase::BudgetExceeded, _) => Ok(PathOutcome::BudgetExceeded { metrics }),
            _ => Ok(PathOutcome::NoPath { metrics }),
        }
    }

    pub fn metrics(&self) -> AlgorithmMetrics {
        self.profiler.get_metrics()
    }

    /// Releases the per-query tables and the trace
    pub fn into_parts(self) -> (SearchState, ExecutionTracer) {
        (self.state, self.tracer)
    }

    /// Queues an extra entry as if an earlier relaxation had pushed it
    #[cfg(test)]
    pub(crate) fn inject_entry(&mut self, node: NodeId, key: Cost) {
        self.push(node, key);
    }
}

/// A* pathfinding with a pluggable heuristic
#[derive(Debug, Clone, Default)]
pub struct AStar<H = ZeroHeuristic> {
    heuristic: H,
    config: SearchConfig,
}

impl AStar<ZeroHeuristic> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: Heuristic> AStar<H> {
    pub fn with_heuristic(heuristic: H) -> Self {
        Self {
            heuristic,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn heuristic(&self) -> &H {
        &self.heuristic
    }

    /// Runs a query and also returns the recorded trace (empty unless
    /// tracing is configured)
    pub fn find_path_traced(
        &self,
        graph: &Graph,
        start: NodeId,
        goal: NodeId,
    ) -> Result<(PathOutcome, ExecutionTracer), AlgorithmError> {
        run_traced(graph, start, goal, &self.heuristic, &self.config)
    }
}

/// Goal-directed run returning the outcome together with its trace
pub(crate) fn run_traced<H: Heuristic + ?Sized>(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    heuristic: &H,
    config: &SearchConfig,
) -> Result<(PathOutcome, ExecutionTracer), AlgorithmError> {
    let mut engine = SearchEngine::new(graph, start, Some(goal), heuristic, config)?;
    engine.run()?;
    let outcome = engine.outcome()?;
    let (_, tracer) = engine.into_parts();
    Ok((outcome, tracer))
}

impl<H: Heuristic + fmt::Debug> Algorithm for AStar<H> {
    fn name(&self) -> &'static str {
        "astar"
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

impl<H: Heuristic + fmt::Debug> PathfindingAlgorithm for AStar<H> {
    fn find_path(
        &self,
        graph: &Graph,
        start: NodeId,
        goal: NodeId,
    ) -> Result<PathOutcome, AlgorithmError> {
        let mut engine = SearchEngine::new(graph, start, Some(goal), &self.heuristic, &self.config)?;
        engine.run()?;
        engine.outcome()
    }

    fn guarantees_optimal_path(&self) -> bool {
        // Only under an admissible heuristic, which is the caller's contract
        true
    }

    fn heuristic_description(&self) -> Option<String> {
        Some(self.heuristic.describe())
    }

    fn config(&self) -> &SearchConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::EdgeWeight;

    fn create_test_graph() -> Graph {
        Graph::from_edges([(0, 1, 4), (0, 2, 1), (2, 1, 2), (1, 3, 1), (2, 3, 5)])
    }

    #[test]
    fn test_zero_heuristic_finds_optimal_path() {
        let graph = create_test_graph();
        let outcome = AStar::new().find_path(&graph, NodeId(0), NodeId(3)).unwrap();

        assert_eq!(outcome.cost(), Some(4));
        assert_eq!(
            outcome.path().unwrap(),
            &[NodeId(0), NodeId(2), NodeId(1), NodeId(3)]
        );
    }

    #[test]
    fn test_admissible_heuristic_keeps_optimality() {
        // Line graph where h(n) = remaining hop count is a lower bound
        let graph = Graph::from_edges([(0, 1, 2), (1, 2, 2), (2, 3, 2), (0, 3, 10)]);
        let astar = AStar::with_heuristic(FnHeuristic(|node: NodeId, goal: NodeId| {
            goal.0.saturating_sub(node.0) as Cost
        }));

        let outcome = astar.find_path(&graph, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(outcome.cost(), Some(6));
        assert_eq!(outcome.path().unwrap().len(), 4);
        assert_eq!(astar.heuristic_description().as_deref(), Some("custom heuristic"));
    }

    #[test]
    fn test_engine_phases() {
        let graph = create_test_graph();
        let config = SearchConfig::default();
        let mut engine =
            SearchEngine::new(&graph, NodeId(0), Some(NodeId(3)), &ZeroHeuristic, &config).unwrap();

        assert_eq!(engine.phase(), SearchPhase::Initialized);
        assert_eq!(engine.open_set_len(), 1);

        assert_eq!(engine.step().unwrap(), SearchPhase::Running);
        assert_eq!(engine.run().unwrap(), SearchPhase::Found);
        // Terminal phases are sticky
        assert_eq!(engine.step().unwrap(), SearchPhase::Found);
    }

    #[test]
    fn test_injected_stale_entry_is_skipped() {
        let graph = create_test_graph();
        let config = SearchConfig::default().with_trace(true);
        let mut engine =
            SearchEngine::new(&graph, NodeId(0), Some(NodeId(3)), &ZeroHeuristic, &config).unwrap();

        // Settle node 0, then queue a worse duplicate for it and for node 2
        engine.step().unwrap();
        engine.inject_entry(NodeId(0), 3);
        engine.inject_entry(NodeId(2), 2);

        engine.run().unwrap();
        let outcome = engine.outcome().unwrap();
        assert_eq!(outcome.cost(), Some(4));
        assert_eq!(
            outcome.path().unwrap(),
            &[NodeId(0), NodeId(2), NodeId(1), NodeId(3)]
        );
        assert!(outcome.metrics().stale_skipped >= 2);

        let (state, tracer) = engine.into_parts();
        assert_eq!(state.cost(NodeId(0)), Some(0));
        assert!(tracer.stale_skips() >= 2);
    }

    #[test]
    fn test_budget_exceeded() {
        let graph = create_test_graph();
        let astar = AStar::new().with_config(SearchConfig::default().with_max_expansions(1));

        let outcome = astar.find_path(&graph, NodeId(0), NodeId(3)).unwrap();
        assert!(matches!(outcome, PathOutcome::BudgetExceeded { .. }));
        assert_eq!(outcome.metrics().steps_executed, 1);
    }

    #[test]
    fn test_goal_outside_graph_is_no_path() {
        let graph = create_test_graph();
        let outcome = AStar::new().find_path(&graph, NodeId(0), NodeId(50)).unwrap();
        assert!(matches!(outcome, PathOutcome::NoPath { .. }));
    }

    #[test]
    fn test_table_heuristic_with_unknown_goal() {
        let graph = create_test_graph();
        let table: Vec<Cost> = vec![0; graph.node_count()];
        let astar = AStar::with_heuristic(FnHeuristic(move |node: NodeId, goal: NodeId| {
            table[node.0] + table[goal.0]
        }));

        let outcome = astar.find_path(&graph, NodeId(0), NodeId(50)).unwrap();
        assert!(matches!(outcome, PathOutcome::NoPath { .. }));
        assert_eq!(outcome.metrics().steps_executed, 0);
    }

    #[test]
    fn test_start_outside_graph_is_an_error() {
        let graph = create_test_graph();
        let err = AStar::new().find_path(&graph, NodeId(50), NodeId(0)).unwrap_err();
        assert!(matches!(err, AlgorithmError::InvalidNode(NodeId(50))));
    }

    #[test]
    fn test_overflowing_costs_do_not_wrap() {
        let mut graph = Graph::new();
        graph.add_edge(NodeId(0), NodeId(1), EdgeWeight(u32::MAX));
        graph.add_edge(NodeId(1), NodeId(2), EdgeWeight(u32::MAX));

        let outcome = AStar::new().find_path(&graph, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(outcome.cost(), Some(2 * u64::from(u32::MAX)));
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut astar = AStar::new();
        astar.set_parameter("max_expansions", "25").unwrap();
        astar.set_parameter("trace", "true").unwrap();

        assert_eq!(astar.get_parameter("max_expansions").as_deref(), Some("25"));
        assert_eq!(astar.config().max_expansions, Some(25));
        assert!(astar.config().trace);
        assert!(astar.set_parameter("bogus", "1").is_err());
        assert!(astar.set_parameter("trace", "maybe").is_err());
    }
}
