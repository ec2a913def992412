//! Serialization of a [`PathTable`] and the loader for the text form.
//!
//! The text form is line oriented and lossless:
//!
//! ```text
//! # paretopath export v1
//! criteria c1:min:add c2:min:add
//! nodes 3
//! pair 0 2
//! 4 1 | 0 2
//! 2 6 | 0 1 2
//!
//! ```
//!
//! Graphs with named nodes add `# node <id> <name>` lines after the `nodes`
//! line. Every `pair` block lists one path per line as `costs | node ids`,
//! sorted by cost and then by path, and ends with a blank line.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cost::CostVector;
use crate::criteria::{Criteria, Criterion};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use crate::table::{ParetoPath, PathTable, TableSnapshot};

const TEXT_HEADER: &str = "# paretopath export v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Text => f.write_str("text"),
            ExportFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::InvalidConfig {
                message: format!("unknown export format \"{other}\""),
            }),
        }
    }
}

/// Totals written by [`export`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub pairs: usize,
    pub labels: usize,
}

/// Write every non-empty pair of `table` to `sink`.
///
/// Output already written when the sink fails is not rolled back.
pub fn export<W: Write>(
    table: &PathTable,
    graph: &Graph,
    sink: W,
    format: ExportFormat,
) -> Result<ExportStats> {
    let stats = match format {
        ExportFormat::Text => write_text(table, graph, sink).map_err(Error::SinkWrite)?,
        ExportFormat::Json => write_json(table, graph, sink)?,
    };
    info!(pairs = stats.pairs, labels = stats.labels, %format, "exported path table");
    Ok(stats)
}

fn write_text<W: Write>(table: &PathTable, graph: &Graph, mut sink: W) -> io::Result<ExportStats> {
    writeln!(sink, "{TEXT_HEADER}")?;
    if graph.criteria().is_empty() {
        writeln!(sink, "criteria")?;
    } else {
        writeln!(sink, "criteria {}", graph.criteria())?;
    }
    writeln!(sink, "nodes {}", table.node_count())?;
    for node in graph.nodes() {
        if let Some(name) = graph.node_name(node) {
            writeln!(sink, "# node {node} {name}")?;
        }
    }

    let mut stats = ExportStats::default();
    for entry in table.all_pairs() {
        writeln!(sink, "pair {} {}", entry.source, entry.destination)?;
        for path in entry.front.paths() {
            let nodes = path
                .nodes
                .iter()
                .map(NodeId::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(sink, "{} | {}", path.cost, nodes)?;
            stats.labels += 1;
        }
        writeln!(sink)?;
        stats.pairs += 1;
    }
    sink.flush()?;
    Ok(stats)
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    criteria: &'a Criteria,
    node_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    node_names: Vec<Option<&'a str>>,
    pairs: Vec<JsonPair>,
}

#[derive(Debug, Serialize)]
struct JsonPair {
    source: NodeId,
    destination: NodeId,
    paths: Vec<ParetoPath>,
}

fn write_json<W: Write>(table: &PathTable, graph: &Graph, mut sink: W) -> Result<ExportStats> {
    let pairs: Vec<JsonPair> = table
        .all_pairs()
        .map(|entry| JsonPair {
            source: entry.source,
            destination: entry.destination,
            paths: entry.front.paths(),
        })
        .collect();
    let stats = ExportStats {
        pairs: pairs.len(),
        labels: pairs.iter().map(|pair| pair.paths.len()).sum(),
    };

    let node_names = if graph.has_named_nodes() {
        graph.nodes().map(|node| graph.node_name(node)).collect()
    } else {
        Vec::new()
    };
    let document = JsonDocument {
        criteria: graph.criteria(),
        node_count: table.node_count(),
        node_names,
        pairs,
    };

    serde_json::to_writer_pretty(&mut sink, &document).map_err(|err| {
        if err.is_io() {
            Error::SinkWrite(err.into())
        } else {
            Error::Json(err)
        }
    })?;
    writeln!(sink).map_err(Error::SinkWrite)?;
    sink.flush().map_err(Error::SinkWrite)?;
    Ok(stats)
}

/// Table contents read back from a text export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedTable {
    pub criteria: Criteria,
    pub node_count: usize,
    pub node_names: BTreeMap<NodeId, String>,
    pub pairs: BTreeMap<(NodeId, NodeId), Vec<ParetoPath>>,
}

impl ExportedTable {
    pub fn label_count(&self) -> usize {
        self.pairs.values().map(Vec::len).sum()
    }

    pub fn into_snapshot(self) -> TableSnapshot {
        TableSnapshot { pairs: self.pairs }
    }
}

fn malformed(line: usize, message: impl Into<String>) -> Error {
    Error::MalformedExport {
        line,
        message: message.into(),
    }
}

/// Parse the text export format produced by [`export`].
pub fn parse_export<R: BufRead>(reader: R) -> Result<ExportedTable> {
    let mut table = ExportedTable::default();
    let mut seen_header = false;
    let mut seen_criteria = false;
    let mut seen_nodes = false;
    let mut current: Option<((NodeId, NodeId), usize)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let text = line.trim();

        if !seen_header {
            if text != TEXT_HEADER {
                return Err(malformed(line_no, "missing export header"));
            }
            seen_header = true;
            continue;
        }

        if text.is_empty() {
            if let Some((pair, start)) = current.take() {
                if table.pairs.get(&pair).map_or(true, Vec::is_empty) {
                    return Err(malformed(start, "pair block has no paths"));
                }
            }
            continue;
        }

        if let Some(rest) = text.strip_prefix('#') {
            if let Some(named) = rest.trim().strip_prefix("node ") {
                let (id, name) = named
                    .trim()
                    .split_once(' ')
                    .ok_or_else(|| malformed(line_no, "expected \"# node <id> <name>\""))?;
                let id = parse_node(line_no, id, table.node_count)?;
                table.node_names.insert(id, name.trim().to_string());
            }
            continue;
        }

        let keyword = text.split_whitespace().next().unwrap_or_default();
        match keyword {
            "criteria" if !seen_criteria => {
                let criteria = text["criteria".len()..]
                    .split_whitespace()
                    .map(|token| {
                        token
                            .parse::<Criterion>()
                            .map_err(|message| malformed(line_no, message))
                    })
                    .collect::<Result<Vec<_>>>()?;
                table.criteria = Criteria::new(criteria);
                seen_criteria = true;
            }
            "nodes" if seen_criteria && !seen_nodes => {
                let value = text["nodes".len()..].trim();
                table.node_count = value
                    .parse()
                    .map_err(|_| malformed(line_no, format!("invalid node count \"{value}\"")))?;
                seen_nodes = true;
            }
            "pair" if seen_nodes => {
                if current.is_some() {
                    return Err(malformed(line_no, "pair block not terminated by a blank line"));
                }
                let fields: Vec<&str> = text.split_whitespace().collect();
                let [_, source, destination] = fields.as_slice() else {
                    return Err(malformed(line_no, "expected \"pair <source> <destination>\""));
                };
                let pair = (
                    parse_node(line_no, source, table.node_count)?,
                    parse_node(line_no, destination, table.node_count)?,
                );
                if table.pairs.insert(pair, Vec::new()).is_some() {
                    return Err(malformed(
                        line_no,
                        format!("pair {} {} appears twice", pair.0, pair.1),
                    ));
                }
                current = Some((pair, line_no));
            }
            _ => {
                let Some((pair, _)) = current else {
                    return Err(malformed(line_no, format!("unexpected record \"{text}\"")));
                };
                let path = parse_path_line(line_no, text, &table)?;
                if path.nodes.first() != Some(&pair.0) || path.nodes.last() != Some(&pair.1) {
                    return Err(malformed(line_no, "path does not connect the pair"));
                }
                if let Some(paths) = table.pairs.get_mut(&pair) {
                    paths.push(path);
                }
            }
        }
    }

    if !seen_nodes {
        return Err(malformed(0, "export is missing its criteria or nodes line"));
    }
    if let Some((pair, start)) = current {
        if table.pairs.get(&pair).map_or(true, Vec::is_empty) {
            return Err(malformed(start, "pair block has no paths"));
        }
    }
    Ok(table)
}

fn parse_node(line: usize, token: &str, node_count: usize) -> Result<NodeId> {
    token
        .parse::<NodeId>()
        .ok()
        .filter(|id| (*id as usize) < node_count)
        .ok_or_else(|| malformed(line, format!("invalid node id \"{token}\"")))
}

fn parse_path_line(line: usize, text: &str, table: &ExportedTable) -> Result<ParetoPath> {
    let (costs, nodes) = text
        .split_once('|')
        .ok_or_else(|| malformed(line, "expected \"<costs> | <nodes>\""))?;

    let cost = costs
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| malformed(line, format!("invalid cost value \"{token}\"")))
        })
        .collect::<Result<Vec<_>>>()?;
    if cost.len() != table.criteria.len() {
        return Err(malformed(
            line,
            format!(
                "expected {} cost values, found {}",
                table.criteria.len(),
                cost.len()
            ),
        ));
    }

    let nodes = nodes
        .split_whitespace()
        .map(|token| parse_node(line, token, table.node_count))
        .collect::<Result<Vec<_>>>()?;

    Ok(ParetoPath {
        cost: CostVector::new(cost),
        nodes,
    })
}
