//! Pathfinding and traversal strategies over the shared graph store

pub mod astar;
pub mod batch;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;

pub use self::astar::{AStar, FnHeuristic, Heuristic, SearchEngine, ZeroHeuristic};
pub use self::batch::{run_batch, PathQuery, QueryOutcome};
pub use self::bfs::BreadthFirstSearch;
pub use self::dfs::DepthFirstSearch;
pub use self::dijkstra::Dijkstra;

use crate::algorithm::traits::{AlgorithmError, AlgorithmParameter, ParameterType};
use crate::config::SearchConfig;

/// String view of a [`SearchConfig`] for the parameter API
pub(crate) fn search_parameters(config: &SearchConfig) -> Vec<AlgorithmParameter> {
    vec![
        AlgorithmParameter {
            name: "max_expansions".to_owned(),
            value: config
                .max_expansions
                .map_or_else(|| "none".to_owned(), |n| n.to_string()),
            value_type: ParameterType::OptionalInteger,
            description: "Queue pops allowed before giving up".to_owned(),
        },
        AlgorithmParameter {
            name: "trace".to_owned(),
            value: config.trace.to_string(),
            value_type: ParameterType::Boolean,
            description: "Record an execution trace".to_owned(),
        },
        AlgorithmParameter {
            name: "initial_queue_capacity".to_owned(),
            value: config.initial_queue_capacity.to_string(),
            value_type: ParameterType::Integer,
            description: "Initial open-set allocation".to_owned(),
        },
    ]
}

/// Parses `value` into the named [`SearchConfig`] field
pub(crate) fn apply_search_parameter(
    config: &mut SearchConfig,
    name: &str,
    value: &str,
) -> Result<(), AlgorithmError> {
    let invalid = |reason: &str| AlgorithmError::InvalidParameter {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };

    match name {
        "max_expansions" => {
            config.max_expansions = match value {
                "none" => None,
                _ => match value.parse::<usize>() {
                    Ok(0) | Err(_) => return Err(invalid("expected a positive integer or `none`")),
                    Ok(n) => Some(n),
                },
            };
        }
        "trace" => {
            config.trace = value
                .parse::<bool>()
                .map_err(|_| invalid("expected `true` or `false`"))?;
        }
        "initial_queue_capacity" => {
            config.initial_queue_capacity = value
                .parse::<usize>()
                .map_err(|_| invalid("expected a non-negative integer"))?;
        }
        _ => return Err(invalid("unknown parameter")),
    }
    Ok(())
}
