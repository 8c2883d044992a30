//! Text edge-list loader
//!
//! One edge per line: `src dest weight`, whitespace separated integers.
//! Empty lines and lines starting with `#` are ignored. Any other line that
//! is not exactly three integers with non-negative node identifiers is
//! skipped without failing the load; skipped lines are only counted in
//! [`LoadStats`].
//!
//! Node identifiers are not known up front, so loading takes two passes:
//! the first finds the largest identifier, the second inserts every edge
//! into a store already sized for it.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;
use crate::config::GraphConfig;
use crate::data_structures::graph::{EdgeWeight, Graph, GraphError};

/// Comment marker at the start of a line
pub const COMMENT_MARKER: char = '#';

/// One well-formed edge line. The weight stays signed so negative weights
/// can be reported rather than mistaken for malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: i64,
}

/// Classification of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeLine {
    Ignored,
    Malformed,
    Edge(ParsedEdge),
}

fn classify_line(line: &str) -> EdgeLine {
    if line.starts_with(COMMENT_MARKER) || line.trim().is_empty() {
        return EdgeLine::Ignored;
    }

    let mut tokens = line.split_whitespace();
    let (Some(src), Some(dest), Some(weight), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return EdgeLine::Malformed;
    };

    match (src.parse::<usize>(), dest.parse::<usize>(), weight.parse::<i64>()) {
        (Ok(src), Ok(dest), Ok(weight)) => EdgeLine::Edge(ParsedEdge {
            source: NodeId(src),
            target: NodeId(dest),
            weight,
        }),
        _ => EdgeLine::Malformed,
    }
}

/// Parses a single `src dest weight` line; `None` for ignored or malformed
/// lines
pub fn parse_edge_line(line: &str) -> Option<ParsedEdge> {
    match classify_line(line) {
        EdgeLine::Edge(edge) => Some(edge),
        EdgeLine::Ignored | EdgeLine::Malformed => None,
    }
}

/// Line accounting of the insertion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub lines: usize,
    pub edges: usize,
    /// Blank and comment lines
    pub ignored: usize,
    /// Wrong token count or non-integer tokens
    pub malformed: usize,
    /// Negative weights or weights beyond `u32`
    pub rejected_weights: usize,
    /// Endpoints beyond a bounded store's capacity or the identifier range
    pub out_of_range: usize,
    pub max_node: Option<NodeId>,
}

/// Loaded graph together with its line accounting
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    pub graph: Graph,
    pub stats: LoadStats,
}

/// Pass 1: largest identifier over the lines that will be inserted
#[derive(Debug, Default)]
struct ScanPass {
    max_node: Option<usize>,
}

impl ScanPass {
    fn observe(&mut self, line: &str) {
        if let EdgeLine::Edge(edge) = classify_line(line) {
            if edge.weight < 0 || edge.weight > i64::from(u32::MAX) {
                return;
            }
            let high = edge.source.0.max(edge.target.0);
            // No slot count covers `usize::MAX`; the build pass rejects it
            if high.checked_add(1).is_none() {
                return;
            }
            self.max_node = Some(self.max_node.map_or(high, |m| m.max(high)));
        }
    }
}

/// Pass 2: inserts into a presized store
#[derive(Debug)]
struct BuildPass {
    graph: Graph,
    stats: LoadStats,
}

impl BuildPass {
    fn insert(&mut self, line: &str) {
        self.stats.lines += 1;

        let edge = match classify_line(line) {
            EdgeLine::Ignored => {
                self.stats.ignored += 1;
                return;
            }
            EdgeLine::Malformed => {
                self.stats.malformed += 1;
                return;
            }
            EdgeLine::Edge(edge) => edge,
        };

        let weight = match EdgeWeight::from_signed(edge.source, edge.target, edge.weight) {
            Ok(weight) => weight,
            Err(err) => {
                warn!("line {}: {}", self.stats.lines, err);
                self.stats.rejected_weights += 1;
                return;
            }
        };

        match self.graph.insert_edge(edge.source, edge.target, weight) {
            Ok(()) => self.stats.edges += 1,
            Err(err) => {
                warn!("line {}: {}", self.stats.lines, err);
                self.stats.out_of_range += 1;
            }
        }
    }

    fn finish(self) -> LoadedGraph {
        info!(
            "loaded {} edges over {} nodes ({} malformed, {} rejected weights, {} out of range)",
            self.stats.edges,
            self.graph.node_count(),
            self.stats.malformed,
            self.stats.rejected_weights,
            self.stats.out_of_range
        );
        LoadedGraph {
            graph: self.graph,
            stats: self.stats,
        }
    }
}

/// Two-pass edge-list loader
#[derive(Debug, Clone, Default)]
pub struct EdgeListLoader {
    config: GraphConfig,
}

impl EdgeListLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self { config }
    }

    fn build_pass(&self, scan: &ScanPass) -> BuildPass {
        let graph = match (self.config.max_nodes, scan.max_node) {
            (Some(_), _) => Graph::with_config(&self.config),
            (None, Some(max)) => Graph::with_node_count(max + 1),
            (None, None) => Graph::new(),
        };
        debug!("scan pass: max node id {:?}", scan.max_node);

        BuildPass {
            graph,
            stats: LoadStats {
                max_node: scan.max_node.map(NodeId),
                ..LoadStats::default()
            },
        }
    }

    pub fn load_str(&self, text: &str) -> LoadedGraph {
        let mut scan = ScanPass::default();
        text.lines().for_each(|line| scan.observe(line));

        let mut build = self.build_pass(&scan);
        text.lines().for_each(|line| build.insert(line));
        build.finish()
    }

    /// Reads `reader` twice, rewinding in between
    pub fn load_reader<R: BufRead + Seek>(&self, mut reader: R) -> Result<LoadedGraph, GraphError> {
        let mut scan = ScanPass::default();
        for_each_line(&mut reader, |line| scan.observe(line))?;

        reader.seek(SeekFrom::Start(0))?;

        let mut build = self.build_pass(&scan);
        for_each_line(&mut reader, |line| build.insert(line))?;
        Ok(build.finish())
    }

    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedGraph, GraphError> {
        let path = path.as_ref();
        info!("loading edge list {}", path.display());
        let file = File::open(path)?;
        self.load_reader(BufReader::new(file))
    }
}

fn for_each_line<R: BufRead>(reader: &mut R, mut f: impl FnMut(&str)) -> std::io::Result<()> {
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(());
        }
        f(buf.trim_end_matches(|c: char| c == '\n' || c == '\r'));
    }
}

/// Loads a growable graph from in-memory text
pub fn load_from_str(text: &str) -> LoadedGraph {
    EdgeListLoader::new().load_str(text)
}

/// Loads a growable graph from a file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadedGraph, GraphError> {
    EdgeListLoader::new().load_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# Directed graph
# FromNodeId\tToNodeId\tWeight
0\t1\t4
0 2 1

2 1 2
1 3 1
2\t3\t5
";

    #[test]
    fn test_parse_edge_line() {
        assert_eq!(
            parse_edge_line("3 4 10"),
            Some(ParsedEdge {
                source: NodeId(3),
                target: NodeId(4),
                weight: 10
            })
        );
        assert_eq!(parse_edge_line("  7\t8   9  ").map(|e| e.weight), Some(9));
        assert_eq!(parse_edge_line("5 6 -1").map(|e| e.weight), Some(-1));

        assert_eq!(parse_edge_line("# 1 2 3"), None);
        assert_eq!(parse_edge_line(""), None);
        assert_eq!(parse_edge_line("   "), None);
        assert_eq!(parse_edge_line("1 2"), None);
        assert_eq!(parse_edge_line("1 2 3 4"), None);
        assert_eq!(parse_edge_line("a b c"), None);
        assert_eq!(parse_edge_line("1 2 3.5"), None);
        assert_eq!(parse_edge_line("-1 2 3"), None);
    }

    #[test]
    fn test_load_sample() {
        let loaded = load_from_str(SAMPLE);
        assert_eq!(loaded.graph.node_count(), 4);
        assert_eq!(loaded.graph.edge_count(), 5);
        assert_eq!(loaded.stats.edges, 5);
        assert_eq!(loaded.stats.ignored, 3);
        assert_eq!(loaded.stats.malformed, 0);
        assert_eq!(loaded.stats.max_node, Some(NodeId(3)));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "0 1 1\nbroken line\n1 2\n1 x 3\n2 3 3 3\n1 2 2\n";
        let loaded = load_from_str(text);
        assert_eq!(loaded.graph.edge_count(), 2);
        assert_eq!(loaded.stats.malformed, 4);
        assert_eq!(loaded.graph.node_count(), 3);
    }

    #[test]
    fn test_negative_weights_are_rejected() {
        let loaded = load_from_str("0 1 3\n1 9 -4\n");
        assert_eq!(loaded.graph.edge_count(), 1);
        assert_eq!(loaded.stats.rejected_weights, 1);
        // Node 9 only appears on the rejected line
        assert_eq!(loaded.graph.node_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let loaded = load_from_str("# nothing here\n\n");
        assert!(loaded.graph.is_empty());
        assert_eq!(loaded.stats.max_node, None);
    }

    #[test]
    fn test_isolated_high_node_is_addressable() {
        let loaded = load_from_str("0 1 1\n7 7 0\n");
        assert_eq!(loaded.graph.node_count(), 8);
        assert_eq!(loaded.graph.neighbors(NodeId(4)).count(), 0);
    }

    #[test]
    fn test_reader_two_passes_match_str() {
        let from_reader = EdgeListLoader::new()
            .load_reader(Cursor::new(SAMPLE.as_bytes()))
            .unwrap();
        let from_str = load_from_str(SAMPLE);

        assert_eq!(from_reader.stats, from_str.stats);
        assert_eq!(from_reader.graph.node_count(), from_str.graph.node_count());
        assert!(from_reader.graph.edges().eq(from_str.graph.edges()));
    }

    #[test]
    fn test_crlf_line_endings() {
        let loaded = EdgeListLoader::new()
            .load_reader(Cursor::new("# header\r\n0 1 2\r\n\r\n1 2 3\r\n".as_bytes()))
            .unwrap();
        assert_eq!(loaded.graph.edge_count(), 2);
        assert_eq!(loaded.stats.ignored, 2);
    }

    #[test]
    fn test_bounded_loader_counts_out_of_range() {
        let loader = EdgeListLoader::with_config(GraphConfig::bounded(3));
        let loaded = loader.load_str("0 1 1\n1 2 1\n2 3 1\n");
        assert_eq!(loaded.graph.edge_count(), 2);
        assert_eq!(loaded.stats.out_of_range, 1);
        assert_eq!(loaded.graph.max_nodes(), Some(3));
    }

    #[test]
    fn test_identifier_at_usize_max_counts_as_out_of_range() {
        let text = format!("0 1 1\n{} 0 1\n", usize::MAX);
        let loaded = load_from_str(&text);

        assert_eq!(loaded.graph.edge_count(), 1);
        assert_eq!(loaded.graph.node_count(), 2);
        assert_eq!(loaded.stats.out_of_range, 1);
        assert_eq!(loaded.stats.max_node, Some(NodeId(1)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_from_path("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
