//! Graph store and open-set priority queue

pub mod graph;
pub mod priority_queue;

pub use self::graph::{Edge, EdgeWeight, Graph, GraphError, Neighbors};
pub use self::priority_queue::{MinPriorityQueue, PriorityQueueError, QueueStats};
