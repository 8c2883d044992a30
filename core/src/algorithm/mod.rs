//! graphwalk algorithm framework
//!
//! Shared traits and per-query state, plus the four search strategies.

pub mod traits;
pub mod path_finding;
pub mod state;

pub use self::traits::*;
pub use self::path_finding::*;
pub use self::state::{SearchPhase, SearchState, ShortestPathTree};
