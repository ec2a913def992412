use std::sync::Arc;

use crate::cost::CostVector;
use crate::criteria::Criteria;
use crate::error::{Error, Result};

/// Dense node identifier, `0 <= id < node_count`.
pub type NodeId = u32;

/// Directed edge carrying one value per criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub cost: CostVector,
}

/// Optional descriptive attributes attached to a node by the sectioned format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
struct GraphInner {
    criteria: Criteria,
    nodes: Vec<NodeInfo>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

/// Immutable multi-criteria directed graph.
///
/// Cloning is cheap; every clone shares the same adjacency so search workers
/// on different threads observe the same graph without locking.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: Arc<GraphInner>,
}

impl Graph {
    /// Start building a graph with `node_count` nodes and the given criteria.
    pub fn builder(criteria: Criteria, node_count: usize) -> GraphBuilder {
        GraphBuilder::new(criteria, node_count)
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count
    }

    pub fn criteria(&self) -> &Criteria {
        &self.inner.criteria
    }

    pub fn contains(&self, node: NodeId) -> bool {
        (node as usize) < self.node_count()
    }

    /// Outgoing edges of `node` in insertion order; empty for unknown nodes.
    pub fn edges_from(&self, node: NodeId) -> &[Edge] {
        self.inner
            .adjacency
            .get(node as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node_info(&self, node: NodeId) -> Option<&NodeInfo> {
        self.inner.nodes.get(node as usize)
    }

    pub fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node_info(node).and_then(|info| info.name.as_deref())
    }

    /// `true` when any node carries a name from the sectioned format.
    pub fn has_named_nodes(&self) -> bool {
        self.inner.nodes.iter().any(|info| info.name.is_some())
    }

    /// `true` when no edge carries a negative component.
    pub fn has_non_negative_costs(&self) -> bool {
        self.inner
            .adjacency
            .iter()
            .flatten()
            .all(|edge| edge.cost.iter().all(|value| *value >= 0.0))
    }

    /// `true` when no edge can improve any criterion of the path it extends.
    ///
    /// Evicting a dominated label before it is expanded is only exact under
    /// this condition; otherwise the search keeps every elementary path
    /// expandable.
    pub fn is_extension_monotone(&self) -> bool {
        let criteria = self.criteria();
        self.inner.adjacency.iter().flatten().all(|edge| {
            criteria
                .iter()
                .zip(edge.cost.iter())
                .all(|(criterion, &value)| criterion.never_improves_with(value))
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        0..self.node_count() as NodeId
    }
}

/// Accumulates nodes and edges before freezing them into a [`Graph`].
#[derive(Debug)]
pub struct GraphBuilder {
    criteria: Criteria,
    nodes: Vec<NodeInfo>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl GraphBuilder {
    pub fn new(criteria: Criteria, node_count: usize) -> Self {
        Self {
            criteria,
            nodes: vec![NodeInfo::default(); node_count],
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Attach a name and description to an existing node.
    pub fn describe_node(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<&mut Self> {
        let node_count = self.node_count();
        let info = self
            .nodes
            .get_mut(node as usize)
            .ok_or(Error::NodeOutOfRange { node, node_count })?;
        info.name = Some(name.into());
        info.description = description;
        Ok(self)
    }

    /// Append a directed edge. Parallel edges are kept as distinct edges.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        cost: impl Into<CostVector>,
    ) -> Result<&mut Self> {
        let node_count = self.node_count();
        for node in [from, to] {
            if node as usize >= node_count {
                return Err(Error::NodeOutOfRange { node, node_count });
            }
        }

        let cost = cost.into();
        if cost.len() != self.criteria.len() {
            return Err(Error::CostWidthMismatch {
                expected: self.criteria.len(),
                found: cost.len(),
            });
        }

        self.adjacency[from as usize].push(Edge { target: to, cost });
        self.edge_count += 1;
        Ok(self)
    }

    pub fn build(self) -> Result<Graph> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        Ok(Graph {
            inner: Arc::new(GraphInner {
                criteria: self.criteria,
                nodes: self.nodes,
                adjacency: self.adjacency,
                edge_count: self.edge_count,
            }),
        })
    }
}
