//! Per-query search state
//!
//! Everything a single priority-first search mutates lives here, separate
//! from the graph: the cost table, the predecessor table, the finalized
//! marks and the phase of the search state machine. A [`crate::Graph`] can
//! therefore serve any number of queries, each with its own
//! [`SearchState`].
//!
//! # Invariants
//! - `best_cost[v]` only ever decreases during a run
//! - `predecessor[v]` is set exactly when `best_cost[v]` is finite and
//!   `v != start`

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{AlgorithmError, Cost, NodeId, INFINITE_COST};
use crate::data_structures::graph::EdgeWeight;

/// Search state machine
///
/// `Initialized → Running → {Found, Exhausted}`; `BudgetExceeded` is only
/// reachable when an expansion budget is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchPhase {
    Initialized,
    Running,
    Found,
    Exhausted,
    BudgetExceeded,
}

impl SearchPhase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchPhase::Found | SearchPhase::Exhausted | SearchPhase::BudgetExceeded
        )
    }
}

/// Cost, predecessor and finalized tables of one query
#[derive(Debug, Clone)]
pub struct SearchState {
    start: NodeId,
    goal: Option<NodeId>,
    best_cost: Vec<Cost>,
    predecessor: Vec<Option<NodeId>>,
    finalized: Vec<bool>,
    phase: SearchPhase,
}

impl SearchState {
    /// Fresh state: `start` at cost 0, everything else unreached.
    ///
    /// Fails with [`AlgorithmError::InvalidNode`] when `start` is not
    /// addressable.
    pub fn new(node_count: usize, start: NodeId, goal: Option<NodeId>) -> Result<Self, AlgorithmError> {
        if start.0 >= node_count {
            return Err(AlgorithmError::InvalidNode(start));
        }

        let mut best_cost = vec![INFINITE_COST; node_count];
        best_cost[start.0] = 0;

        Ok(Self {
            start,
            goal,
            best_cost,
            predecessor: vec![None; node_count],
            finalized: vec![false; node_count],
            phase: SearchPhase::Initialized,
        })
    }

    #[inline]
    pub fn start(&self) -> NodeId {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    #[inline]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: SearchPhase) {
        self.phase = phase;
    }

    pub fn node_count(&self) -> usize {
        self.best_cost.len()
    }

    /// Best known cost, `None` while unreached or out of range
    #[inline]
    pub fn cost(&self, node: NodeId) -> Option<Cost> {
        match self.best_cost.get(node.0) {
            Some(&cost) if cost != INFINITE_COST => Some(cost),
            _ => None,
        }
    }

    /// Raw table value including the infinity sentinel
    #[inline]
    pub(crate) fn raw_cost(&self, node: NodeId) -> Cost {
        self.best_cost.get(node.0).copied().unwrap_or(INFINITE_COST)
    }

    #[inline]
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(node.0).copied().flatten()
    }

    #[inline]
    pub fn is_finalized(&self, node: NodeId) -> bool {
        self.finalized.get(node.0).copied().unwrap_or(false)
    }

    pub(crate) fn finalize(&mut self, node: NodeId) {
        if let Some(mark) = self.finalized.get_mut(node.0) {
            *mark = true;
        }
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized.iter().filter(|&&f| f).count()
    }

    /// Edge relaxation of `from → to`.
    ///
    /// Returns `(old, new)` when the path through `from` is strictly
    /// cheaper. A sum that would overflow the cost type is no improvement.
    pub(crate) fn relax(&mut self, from: NodeId, to: NodeId, weight: EdgeWeight) -> Option<(Cost, Cost)> {
        let base = self.raw_cost(from);
        if base == INFINITE_COST || to.0 >= self.best_cost.len() {
            return None;
        }

        let candidate = base.checked_add(weight.as_cost())?;
        let old = self.best_cost[to.0];
        if candidate >= old {
            return None;
        }

        self.best_cost[to.0] = candidate;
        self.predecessor[to.0] = Some(from);
        Some((old, candidate))
    }

    /// Start-to-`goal` node sequence, walking predecessors backwards
    pub fn reconstruct_path(&self, goal: NodeId) -> Result<Vec<NodeId>, AlgorithmError> {
        walk_predecessors(&self.predecessor, self.start, goal)
    }

    /// Freezes the tables into a queryable shortest-path tree
    pub fn into_tree(self) -> ShortestPathTree {
        ShortestPathTree {
            start: self.start,
            best_cost: self.best_cost,
            predecessor: self.predecessor,
        }
    }
}

/// Single-source result: cost and predecessor tables from one start node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathTree {
    start: NodeId,
    best_cost: Vec<Cost>,
    predecessor: Vec<Option<NodeId>>,
}

impl ShortestPathTree {
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Minimum cost from the start, `None` if unreachable
    pub fn cost_to(&self, node: NodeId) -> Option<Cost> {
        match self.best_cost.get(node.0) {
            Some(&cost) if cost != INFINITE_COST => Some(cost),
            _ => None,
        }
    }

    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.cost_to(node).is_some()
    }

    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessor.get(node.0).copied().flatten()
    }

    /// Minimum-cost path to `node`; `Ok(None)` when unreachable
    pub fn path_to(&self, node: NodeId) -> Result<Option<Vec<NodeId>>, AlgorithmError> {
        if !self.is_reachable(node) {
            return Ok(None);
        }
        walk_predecessors(&self.predecessor, self.start, node).map(Some)
    }

    /// Reachable nodes with their costs, in identifier order
    pub fn reachable(&self) -> impl Iterator<Item = (NodeId, Cost)> + '_ {
        self.best_cost
            .iter()
            .enumerate()
            .filter(|&(_, &cost)| cost != INFINITE_COST)
            .map(|(idx, &cost)| (NodeId(idx), cost))
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable().count()
    }
}

/// Follows predecessors from `goal` back to `start` and reverses.
///
/// A chain that runs out before `start`, or is longer than the table (a
/// cycle), means relaxation left the tables inconsistent.
fn walk_predecessors(
    predecessor: &[Option<NodeId>],
    start: NodeId,
    goal: NodeId,
) -> Result<Vec<NodeId>, AlgorithmError> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        if path.len() > predecessor.len() {
            return Err(AlgorithmError::InconsistentPredecessorChain {
                goal,
                broken_at: current,
            });
        }
        current = predecessor
            .get(current.0)
            .copied()
            .flatten()
            .ok_or(AlgorithmError::InconsistentPredecessorChain {
                goal,
                broken_at: current,
            })?;
        path.push(current);
    }

    path.reverse();
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SearchState::new(4, NodeId(1), Some(NodeId(3))).unwrap();
        assert_eq!(state.phase(), SearchPhase::Initialized);
        assert_eq!(state.cost(NodeId(1)), Some(0));
        assert_eq!(state.cost(NodeId(0)), None);
        assert_eq!(state.predecessor(NodeId(1)), None);
        assert!(!state.is_finalized(NodeId(1)));
        assert_eq!(state.goal(), Some(NodeId(3)));
    }

    #[test]
    fn test_start_out_of_range() {
        assert!(matches!(
            SearchState::new(2, NodeId(2), None),
            Err(AlgorithmError::InvalidNode(NodeId(2)))
        ));
    }

    #[test]
    fn test_relax_only_on_strict_improvement() {
        let mut state = SearchState::new(3, NodeId(0), None).unwrap();

        assert_eq!(state.relax(NodeId(0), NodeId(1), EdgeWeight(5)), Some((INFINITE_COST, 5)));
        assert_eq!(state.relax(NodeId(0), NodeId(1), EdgeWeight(5)), None);
        assert_eq!(state.relax(NodeId(0), NodeId(1), EdgeWeight(7)), None);
        assert_eq!(state.relax(NodeId(0), NodeId(1), EdgeWeight(2)), Some((5, 2)));
        assert_eq!(state.predecessor(NodeId(1)), Some(NodeId(0)));

        // Unreached source relaxes nothing
        assert_eq!(state.relax(NodeId(2), NodeId(1), EdgeWeight(0)), None);
    }

    #[test]
    fn test_relax_overflow_is_no_improvement() {
        let mut state = SearchState::new(2, NodeId(0), None).unwrap();
        state.best_cost[0] = INFINITE_COST - 1;
        assert_eq!(state.relax(NodeId(0), NodeId(1), EdgeWeight(u32::MAX)), None);
        assert_eq!(state.cost(NodeId(1)), None);
    }

    #[test]
    fn test_reconstruct_path() {
        let mut state = SearchState::new(4, NodeId(0), Some(NodeId(3))).unwrap();
        state.relax(NodeId(0), NodeId(2), EdgeWeight(1));
        state.relax(NodeId(2), NodeId(1), EdgeWeight(2));
        state.relax(NodeId(1), NodeId(3), EdgeWeight(1));

        assert_eq!(
            state.reconstruct_path(NodeId(3)).unwrap(),
            vec![NodeId(0), NodeId(2), NodeId(1), NodeId(3)]
        );
        assert_eq!(state.reconstruct_path(NodeId(0)).unwrap(), vec![NodeId(0)]);
    }

    #[test]
    fn test_broken_chain_is_reported() {
        let state = SearchState::new(3, NodeId(0), None).unwrap();
        let err = state.reconstruct_path(NodeId(2)).unwrap_err();
        assert!(matches!(
            err,
            AlgorithmError::InconsistentPredecessorChain {
                goal: NodeId(2),
                broken_at: NodeId(2)
            }
        ));
    }

    #[test]
    fn test_cyclic_chain_is_reported() {
        let mut predecessor = vec![None; 3];
        predecessor[1] = Some(NodeId(2));
        predecessor[2] = Some(NodeId(1));
        assert!(walk_predecessors(&predecessor, NodeId(0), NodeId(1)).is_err());
    }

    #[test]
    fn test_tree_queries() {
        let mut state = SearchState::new(4, NodeId(0), None).unwrap();
        state.relax(NodeId(0), NodeId(1), EdgeWeight(3));
        state.relax(NodeId(1), NodeId(2), EdgeWeight(4));
        let tree = state.into_tree();

        assert_eq!(tree.start(), NodeId(0));
        assert_eq!(tree.cost_to(NodeId(2)), Some(7));
        assert_eq!(tree.cost_to(NodeId(3)), None);
        assert_eq!(tree.path_to(NodeId(3)).unwrap(), None);
        assert_eq!(
            tree.path_to(NodeId(2)).unwrap(),
            Some(vec![NodeId(0), NodeId(1), NodeId(2)])
        );
        assert_eq!(tree.reachable_count(), 3);
        assert_eq!(tree.predecessor(NodeId(2)), Some(NodeId(1)));
    }

    #[test]
    fn test_phase_terminality() {
        assert!(!SearchPhase::Initialized.is_terminal());
        assert!(!SearchPhase::Running.is_terminal());
        assert!(SearchPhase::Found.is_terminal());
        assert!(SearchPhase::Exhausted.is_terminal());
        assert!(SearchPhase::BudgetExceeded.is_terminal());
    }
}
