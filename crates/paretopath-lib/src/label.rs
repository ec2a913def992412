//! Arena of path labels linked through predecessor handles.
//!
//! Labels never own their prefix: each stores the [`LabelId`] of the label it
//! extends, so every label in a source's result shares the prefixes it has in
//! common with its siblings. Paths are recovered by walking the chain back to
//! the root label of the source.

use std::collections::HashMap;

use crate::cost::CostVector;
use crate::graph::NodeId;

/// Stable handle into a [`LabelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelId(u32);

impl LabelId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Candidate path ending at `node` with cumulative `cost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub node: NodeId,
    pub cost: CostVector,
    pub predecessor: Option<LabelId>,
    /// Number of edges between the source and `node`.
    pub hops: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelArena {
    labels: Vec<Label>,
}

impl LabelArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Handle the next pushed label will receive.
    pub fn next_id(&self) -> LabelId {
        LabelId(self.labels.len() as u32)
    }

    /// Root label of a search: no predecessor, zero hops.
    pub fn push_root(&mut self, node: NodeId, cost: CostVector) -> LabelId {
        self.push(Label {
            node,
            cost,
            predecessor: None,
            hops: 0,
        })
    }

    /// Label extending `predecessor` by one edge to `node`.
    pub fn push_extension(
        &mut self,
        predecessor: LabelId,
        node: NodeId,
        cost: CostVector,
    ) -> LabelId {
        let hops = self.get(predecessor).hops + 1;
        self.push(Label {
            node,
            cost,
            predecessor: Some(predecessor),
            hops,
        })
    }

    fn push(&mut self, label: Label) -> LabelId {
        let id = self.next_id();
        self.labels.push(label);
        id
    }

    /// Panics if `id` did not come from this arena.
    pub fn get(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }

    /// Walk the predecessor chain of `id`, starting with `id` itself.
    pub fn ancestry(&self, id: LabelId) -> Ancestry<'_> {
        Ancestry {
            arena: self,
            next: Some(id),
        }
    }

    /// Label on the path of `id` (including `id`) that sits at `node`.
    pub fn find_on_path(&self, id: LabelId, node: NodeId) -> Option<LabelId> {
        self.ancestry(id).find(|&ancestor| self.get(ancestor).node == node)
    }

    /// `true` when both labels trace the same node sequence.
    pub fn same_path(&self, a: LabelId, b: LabelId) -> bool {
        if self.get(a).hops != self.get(b).hops {
            return false;
        }
        self.ancestry(a)
            .zip(self.ancestry(b))
            .all(|(x, y)| x == y || self.get(x).node == self.get(y).node)
    }

    /// Node sequence from the source to the label's node.
    pub fn path(&self, id: LabelId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .ancestry(id)
            .map(|ancestor| self.get(ancestor).node)
            .collect();
        nodes.reverse();
        nodes
    }

    /// Copy only the labels reachable from `keep` into a fresh arena.
    ///
    /// Returns the new arena and a map from old handles to new ones. Relative
    /// order is preserved, so predecessors still precede their extensions.
    pub fn compact(
        &self,
        keep: impl IntoIterator<Item = LabelId>,
    ) -> (LabelArena, HashMap<LabelId, LabelId>) {
        let mut needed = vec![false; self.labels.len()];
        for id in keep {
            for ancestor in self.ancestry(id) {
                if std::mem::replace(&mut needed[ancestor.index()], true) {
                    break;
                }
            }
        }

        let mut compacted = LabelArena::new();
        let mut remap = HashMap::new();
        for (index, label) in self.labels.iter().enumerate() {
            if !needed[index] {
                continue;
            }
            let predecessor = label.predecessor.map(|old| remap[&old]);
            let new_id = compacted.push(Label {
                node: label.node,
                cost: label.cost.clone(),
                predecessor,
                hops: label.hops,
            });
            remap.insert(LabelId(index as u32), new_id);
        }

        (compacted, remap)
    }
}

/// Iterator over a label and its predecessors, newest first.
#[derive(Debug, Clone)]
pub struct Ancestry<'a> {
    arena: &'a LabelArena,
    next: Option<LabelId>,
}

impl Iterator for Ancestry<'_> {
    type Item = LabelId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.get(current).predecessor;
        Some(current)
    }
}
