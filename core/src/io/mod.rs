//! Edge-list input and preprocessing

pub mod edge_list;
pub mod weighting;

pub use self::edge_list::{
    load_from_path, load_from_str, parse_edge_line, EdgeListLoader, LoadStats, LoadedGraph,
    ParsedEdge,
};
pub use self::weighting::{assign_random_weights, WeightingStats};
