//! graphwalk core
//!
//! Loads a weighted directed graph from a text edge list and answers
//! traversal and shortest-path queries over it.
//!
//! - [`data_structures::graph`]: index-based adjacency-list store
//! - [`data_structures::priority_queue`]: binary min-heap open set
//! - [`algorithm::path_finding`]: Dijkstra, A*, BFS, DFS and batch queries
//! - [`io`]: two-pass edge-list loader and the weighting tool
//!
//! ```
//! use graphwalk_core::{load_from_str, Dijkstra, NodeId, PathfindingAlgorithm};
//!
//! let loaded = load_from_str("0 1 4\n0 2 1\n2 1 2\n1 3 1\n2 3 5\n");
//! let outcome = Dijkstra::new()
//!     .find_path(&loaded.graph, NodeId(0), NodeId(3))
//!     .unwrap();
//!
//! assert_eq!(outcome.cost(), Some(4));
//! assert_eq!(outcome.path().unwrap(), &[NodeId(0), NodeId(2), NodeId(1), NodeId(3)]);
//! ```

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod execution;
pub mod io;
pub mod logging;

pub use algorithm::{
    run_batch, AStar, Algorithm, AlgorithmError, AlgorithmMetrics, BreadthFirstSearch, Cost,
    DepthFirstSearch, Dijkstra, FnHeuristic, Heuristic, NodeId, PathOutcome, PathQuery,
    PathResult, PathfindingAlgorithm, SearchEngine, SearchPhase, ShortestPathTree,
    TraversalAlgorithm, ZeroHeuristic, INFINITE_COST,
};
pub use config::{ConfigError, GraphConfig, SearchConfig};
pub use data_structures::{Edge, EdgeWeight, Graph, GraphError, MinPriorityQueue, PriorityQueueError};
pub use execution::{ExecutionTracer, TraceEvent};
pub use io::{load_from_path, load_from_str, EdgeListLoader, LoadStats, LoadedGraph};
