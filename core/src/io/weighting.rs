//! Random weight assignment for unweighted edge lists
//!
//! Turns a `src dest` edge list (the SNAP-style format many public graph
//! dumps use) into the weighted `src\tdest\tweight` format the loader
//! reads. Comment and blank lines are copied through unchanged, lines that
//! are not exactly two tokens are dropped, and each edge gets a weight drawn
//! uniformly from `0..=MAX_RANDOM_WEIGHT`.

use std::io::{BufRead, Write};

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::io::edge_list::COMMENT_MARKER;

/// Inclusive upper bound of generated weights
pub const MAX_RANDOM_WEIGHT: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightingStats {
    pub edges_written: usize,
    pub lines_copied: usize,
    pub lines_dropped: usize,
}

/// Copies `input` to `output`, appending a random weight to every edge line.
///
/// Tokens are passed through verbatim; they are not validated as integers.
pub fn assign_random_weights<R, W, G>(
    input: R,
    mut output: W,
    rng: &mut G,
) -> std::io::Result<WeightingStats>
where
    R: BufRead,
    W: Write,
    G: Rng,
{
    let mut stats = WeightingStats::default();

    for line in input.lines() {
        let line = line?;
        if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
            writeln!(output, "{}", line)?;
            stats.lines_copied += 1;
            continue;
        }

        let mut tokens = line.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(src), Some(dest), None) => {
                let weight = rng.gen_range(0..=MAX_RANDOM_WEIGHT);
                writeln!(output, "{}\t{}\t{}", src, dest, weight)?;
                stats.edges_written += 1;
            }
            _ => stats.lines_dropped += 1,
        }
    }

    output.flush()?;
    info!(
        "weighted {} edges ({} lines copied, {} dropped)",
        stats.edges_written, stats.lines_copied, stats.lines_dropped
    );
    Ok(stats)
}
