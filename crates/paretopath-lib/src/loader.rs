//! Textual graph loaders.
//!
//! Two line-oriented formats are accepted. Blank lines and lines starting with
//! `#` are ignored in both.
//!
//! # Plain format
//!
//! ```text
//! 3
//! 0 1 1 5
//! 0 2 4 1
//! 1 2 1 1
//! ```
//!
//! The first record declares the node count; every following record is an
//! edge `from to cost_1 ... cost_K`. `K` is taken from the first edge and must
//! not change afterwards. All criteria are minimised and additive.
//!
//! # Sectioned format
//!
//! ```text
//! [metrics]
//! time|MIN|ADD
//! capacity|MAX|MIN
//! [nodes]
//! depot|Main depot
//! port|
//! [edges]
//! depot|port|time=4,capacity=20
//! ```
//!
//! Selected when the first record starts with `[`. Nodes receive ids in
//! declaration order and every edge must give a value for every metric.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use tracing::{debug, info};

use crate::cost::CostVector;
use crate::criteria::{Combination, Criteria, Criterion, Optimization};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};

/// Load a graph from a file on disk.
pub fn load_graph_file(path: &Path) -> Result<Graph> {
    debug!(path = %path.display(), "loading graph");
    let file = File::open(path)?;
    load_graph(BufReader::new(file))
}

/// Load a graph from an in-memory description.
pub fn load_graph_str(text: &str) -> Result<Graph> {
    load_graph(Cursor::new(text.as_bytes()))
}

/// Load a graph from any buffered byte stream, detecting the format from the
/// first significant record.
pub fn load_graph<R: BufRead>(reader: R) -> Result<Graph> {
    let records = read_records(reader)?;
    let sectioned = records
        .first()
        .is_some_and(|record| record.text.starts_with('['));

    let graph = if sectioned {
        parse_sectioned(&records)?
    } else {
        parse_plain(&records)?
    };

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        criteria = graph.criteria().len(),
        "graph loaded"
    );
    Ok(graph)
}

/// Significant line with its 1-based position in the source.
struct Record {
    line: usize,
    text: String,
}

fn read_records<R: BufRead>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        records.push(Record {
            line: index + 1,
            text: text.to_string(),
        });
    }
    Ok(records)
}

fn parse_plain(records: &[Record]) -> Result<Graph> {
    let Some((header, edges)) = records.split_first() else {
        return Err(Error::EmptyGraph);
    };

    let fields: Vec<&str> = header.text.split_whitespace().collect();
    if fields.len() != 1 {
        return Err(Error::parse(
            header.line,
            format!("expected a single node count, found {} fields", fields.len()),
        ));
    }
    let node_count: usize = fields[0].parse().map_err(|_| {
        Error::parse(header.line, format!("invalid node count \"{}\"", fields[0]))
    })?;
    if node_count == 0 {
        return Err(Error::EmptyGraph);
    }

    let criteria_count = match edges.first() {
        Some(first) => {
            let width = first.text.split_whitespace().count();
            if width < 3 {
                return Err(Error::parse(
                    first.line,
                    format!("expected from, to and at least one cost, found {width} fields"),
                ));
            }
            width - 2
        }
        None => 0,
    };

    let mut builder = Graph::builder(Criteria::minimizing(criteria_count), node_count);
    for record in edges {
        let fields: Vec<&str> = record.text.split_whitespace().collect();
        if fields.len() != criteria_count + 2 {
            return Err(Error::parse(
                record.line,
                format!(
                    "expected {} fields (from, to, {criteria_count} costs), found {}",
                    criteria_count + 2,
                    fields.len()
                ),
            ));
        }

        let from = parse_node_id(record.line, fields[0], node_count)?;
        let to = parse_node_id(record.line, fields[1], node_count)?;
        let cost = fields[2..]
            .iter()
            .map(|token| parse_cost(record.line, token))
            .collect::<Result<Vec<_>>>()?;

        builder.add_edge(from, to, cost)?;
    }

    builder.build()
}

fn parse_node_id(line: usize, token: &str, node_count: usize) -> Result<NodeId> {
    let id: NodeId = token
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid node id \"{token}\"")))?;
    if id as usize >= node_count {
        return Err(Error::parse(
            line,
            format!("node id {id} is out of range for {node_count} nodes"),
        ));
    }
    Ok(id)
}

fn parse_cost(line: usize, token: &str) -> Result<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::parse(line, format!("invalid cost value \"{token}\"")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metrics,
    Nodes,
    Edges,
}

impl Section {
    fn from_heading(line: usize, heading: &str) -> Result<Self> {
        match heading.to_ascii_lowercase().as_str() {
            "[metrics]" => Ok(Section::Metrics),
            "[nodes]" => Ok(Section::Nodes),
            "[edges]" => Ok(Section::Edges),
            _ => Err(Error::parse(line, format!("invalid section \"{heading}\""))),
        }
    }
}

struct RawEdge<'a> {
    line: usize,
    source: &'a str,
    target: &'a str,
    metrics: &'a str,
}

fn parse_sectioned(records: &[Record]) -> Result<Graph> {
    let mut section = None;
    let mut criteria: Vec<Criterion> = Vec::new();
    let mut nodes: Vec<(String, Option<String>)> = Vec::new();
    let mut node_ids: HashMap<String, NodeId> = HashMap::new();
    let mut raw_edges: Vec<RawEdge<'_>> = Vec::new();

    for record in records {
        if record.text.starts_with('[') {
            section = Some(Section::from_heading(record.line, &record.text)?);
            continue;
        }

        match section {
            None => {
                return Err(Error::parse(
                    record.line,
                    format!("record outside of a section \"{}\"", record.text),
                ))
            }
            Some(Section::Metrics) => {
                let criterion = parse_metric(record)?;
                if criteria.iter().any(|existing| existing.name == criterion.name) {
                    return Err(Error::parse(
                        record.line,
                        format!("metric \"{}\" is declared twice", criterion.name),
                    ));
                }
                criteria.push(criterion);
            }
            Some(Section::Nodes) => {
                let mut fields = record.text.split('|');
                let name = fields.next().unwrap_or_default().trim().to_string();
                let description = fields
                    .next()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_string);
                if fields.next().is_some() {
                    return Err(Error::parse(record.line, "expected name|description"));
                }
                if name.is_empty() {
                    return Err(Error::parse(record.line, "node name is empty"));
                }
                let id = nodes.len() as NodeId;
                if node_ids.insert(name.clone(), id).is_some() {
                    return Err(Error::parse(
                        record.line,
                        format!("node \"{name}\" is declared twice"),
                    ));
                }
                nodes.push((name, description));
            }
            Some(Section::Edges) => {
                let fields: Vec<&str> = record.text.split('|').map(str::trim).collect();
                let [source, target, metrics] = fields.as_slice() else {
                    return Err(Error::parse(
                        record.line,
                        format!("expected source|target|metrics, found {} fields", fields.len()),
                    ));
                };
                raw_edges.push(RawEdge {
                    line: record.line,
                    source: *source,
                    target: *target,
                    metrics: *metrics,
                });
            }
        }
    }

    if nodes.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let criteria = Criteria::new(criteria);
    let mut builder = Graph::builder(criteria.clone(), nodes.len());
    for (id, (name, description)) in nodes.into_iter().enumerate() {
        builder.describe_node(id as NodeId, name, description)?;
    }

    for edge in raw_edges {
        let lookup = |name: &str| {
            node_ids
                .get(name)
                .copied()
                .ok_or_else(|| Error::parse(edge.line, format!("unknown node \"{name}\"")))
        };
        let from = lookup(edge.source)?;
        let to = lookup(edge.target)?;
        let cost = parse_edge_metrics(edge.line, edge.metrics, &criteria)?;
        builder.add_edge(from, to, cost)?;
    }

    builder.build()
}

fn parse_metric(record: &Record) -> Result<Criterion> {
    let fields: Vec<&str> = record.text.split('|').map(str::trim).collect();
    let [name, optimization, combination] = fields.as_slice() else {
        return Err(Error::parse(
            record.line,
            format!("expected name|MIN/MAX|combination, found {} fields", fields.len()),
        ));
    };

    if !Criterion::is_valid_name(name) {
        return Err(Error::parse(
            record.line,
            format!("invalid metric name \"{name}\""),
        ));
    }

    let optimization = match optimization.to_ascii_uppercase().as_str() {
        "MIN" => Optimization::Minimize,
        "MAX" => Optimization::Maximize,
        _ => {
            return Err(Error::parse(
                record.line,
                format!("invalid optimization strategy \"{optimization}\""),
            ))
        }
    };
    let combination: Combination = combination
        .parse()
        .map_err(|message: String| Error::parse(record.line, message))?;

    Ok(Criterion {
        name: name.to_string(),
        optimization,
        combination,
    })
}

fn parse_edge_metrics(line: usize, text: &str, criteria: &Criteria) -> Result<CostVector> {
    let mut values: Vec<Option<f64>> = vec![None; criteria.len()];

    for assignment in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(Error::parse(
                line,
                format!("expected metric=value, found \"{assignment}\""),
            ));
        };
        let name = name.trim();
        let index = criteria
            .index_of(name)
            .ok_or_else(|| Error::parse(line, format!("undeclared metric \"{name}\"")))?;
        if values[index].replace(parse_cost(line, value)?).is_some() {
            return Err(Error::parse(
                line,
                format!("metric \"{name}\" is given twice"),
            ));
        }
    }

    values
        .into_iter()
        .zip(criteria.iter())
        .map(|(value, criterion)| {
            value.ok_or_else(|| {
                Error::parse(line, format!("missing value for metric \"{}\"", criterion.name))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(CostVector::new)
}
