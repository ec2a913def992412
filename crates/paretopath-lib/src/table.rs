//! Global all-pairs path table.
//!
//! The table holds one row per source node. A row is produced by a single
//! search and written exactly once; rows live in independent [`OnceCell`]s so
//! workers optimizing different sources never contend with each other.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::cost::{lexicographic_cmp, CostVector};
use crate::error::{Error, Result};
use crate::graph::NodeId;
use crate::label::{Label, LabelArena, LabelId};

/// One non-dominated path: its cumulative cost and the nodes it visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPath {
    pub cost: CostVector,
    pub nodes: Vec<NodeId>,
}

impl ParetoPath {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Export order: lexicographic by cost, then by node sequence.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.cost
            .lexicographic_cmp(&other.cost)
            .then_with(|| self.nodes.cmp(&other.nodes))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DestinationFront {
    destination: NodeId,
    labels: Vec<LabelId>,
}

/// Result of one single-source search.
///
/// Only the labels of the final fronts and their ancestors are retained.
/// Fronts are ordered by destination and their labels in export order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    source: NodeId,
    arena: LabelArena,
    fronts: Vec<DestinationFront>,
}

impl SourceRow {
    /// Compact `arena` down to the labels referenced by `fronts`.
    pub(crate) fn from_search(
        source: NodeId,
        arena: &LabelArena,
        fronts: Vec<(NodeId, Vec<LabelId>)>,
    ) -> Self {
        let (compacted, remap) =
            arena.compact(fronts.iter().flat_map(|(_, labels)| labels.iter().copied()));

        let mut fronts: Vec<DestinationFront> = fronts
            .into_iter()
            .map(|(destination, labels)| {
                let mut keyed: Vec<(LabelId, Vec<NodeId>)> = labels
                    .into_iter()
                    .map(|old| {
                        let id = remap[&old];
                        (id, compacted.path(id))
                    })
                    .collect();
                keyed.sort_by(|(a, path_a), (b, path_b)| {
                    lexicographic_cmp(&compacted.get(*a).cost, &compacted.get(*b).cost)
                        .then_with(|| path_a.cmp(path_b))
                });
                DestinationFront {
                    destination,
                    labels: keyed.into_iter().map(|(id, _)| id).collect(),
                }
            })
            .collect();
        fronts.sort_by_key(|front| front.destination);

        Self {
            source,
            arena: compacted,
            fronts,
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Number of reachable destinations, the source itself included.
    pub fn destination_count(&self) -> usize {
        self.fronts.len()
    }

    /// Total number of labels across every front of the row.
    pub fn label_count(&self) -> usize {
        self.fronts.iter().map(|front| front.labels.len()).sum()
    }

    pub fn arena(&self) -> &LabelArena {
        &self.arena
    }

    pub fn front(&self, destination: NodeId) -> Option<FrontView<'_>> {
        self.fronts
            .binary_search_by_key(&destination, |front| front.destination)
            .ok()
            .map(|index| self.view(index))
    }

    pub fn fronts(&self) -> impl Iterator<Item = FrontView<'_>> + '_ {
        (0..self.fronts.len()).map(move |index| self.view(index))
    }

    fn view(&self, index: usize) -> FrontView<'_> {
        let front = &self.fronts[index];
        FrontView {
            row: self,
            destination: front.destination,
            labels: &front.labels,
        }
    }
}

/// Borrowed view of the Pareto front for one `(source, destination)` pair.
#[derive(Debug, Clone, Copy)]
pub struct FrontView<'a> {
    row: &'a SourceRow,
    destination: NodeId,
    labels: &'a [LabelId],
}

impl<'a> FrontView<'a> {
    pub fn source(&self) -> NodeId {
        self.row.source
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in export order.
    pub fn labels(&self) -> impl Iterator<Item = &'a Label> + 'a {
        let row: &'a SourceRow = self.row;
        self.labels.iter().map(move |id| row.arena.get(*id))
    }

    /// Node sequence of the `index`-th label.
    pub fn path(&self, index: usize) -> Option<Vec<NodeId>> {
        self.labels
            .get(index)
            .map(|id| self.row.arena.path(*id))
    }

    /// Materialise every label into an owned [`ParetoPath`].
    pub fn paths(&self) -> Vec<ParetoPath> {
        self.labels
            .iter()
            .map(|id| ParetoPath {
                cost: self.row.arena.get(*id).cost.clone(),
                nodes: self.row.arena.path(*id),
            })
            .collect()
    }
}

/// Item yielded by [`PathTable::all_pairs`].
#[derive(Debug, Clone, Copy)]
pub struct PairEntry<'a> {
    pub source: NodeId,
    pub destination: NodeId,
    pub front: FrontView<'a>,
}

/// Row-major walk over every written, non-empty pair of a [`PathTable`].
///
/// A clone walks on independently from the same position; call
/// [`PathTable::all_pairs`] again for a fresh walk.
#[derive(Debug, Clone)]
pub struct PairIter<'a> {
    table: &'a PathTable,
    row: usize,
    front: usize,
}

impl<'a> Iterator for PairIter<'a> {
    type Item = PairEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        while self.row < table.rows.len() {
            if let Some(row) = table.rows[self.row].get() {
                if self.front < row.fronts.len() {
                    let front = row.view(self.front);
                    self.front += 1;
                    return Some(PairEntry {
                        source: row.source,
                        destination: front.destination,
                        front,
                    });
                }
            }
            self.row += 1;
            self.front = 0;
        }
        None
    }
}

/// Owned copy of a table's contents keyed by `(source, destination)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSnapshot {
    pub pairs: BTreeMap<(NodeId, NodeId), Vec<ParetoPath>>,
}

impl TableSnapshot {
    pub fn label_count(&self) -> usize {
        self.pairs.values().map(Vec::len).sum()
    }
}

/// All-pairs result store with one write-once row per source.
#[derive(Debug)]
pub struct PathTable {
    rows: Vec<OnceCell<SourceRow>>,
}

impl PathTable {
    pub fn new(node_count: usize) -> Self {
        Self {
            rows: (0..node_count).map(|_| OnceCell::new()).collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.rows.len()
    }

    /// Store the row for its source. Each source can be written once.
    pub fn write_row(&self, row: SourceRow) -> Result<()> {
        let source = row.source;
        let cell = self.rows.get(source as usize).ok_or(Error::NodeOutOfRange {
            node: source,
            node_count: self.rows.len(),
        })?;
        cell.set(row)
            .map_err(|_| Error::DuplicateWrite { origin: source })
    }

    /// `None` until the source has been optimized.
    pub fn row(&self, source: NodeId) -> Option<&SourceRow> {
        self.rows.get(source as usize).and_then(OnceCell::get)
    }

    pub fn is_written(&self, source: NodeId) -> bool {
        self.row(source).is_some()
    }

    pub fn written_rows(&self) -> usize {
        self.rows.iter().filter(|cell| cell.get().is_some()).count()
    }

    /// Non-dominated paths from `source` to `destination`.
    ///
    /// Empty when the destination is unreachable or the row is not written.
    pub fn read(&self, source: NodeId, destination: NodeId) -> Vec<ParetoPath> {
        self.row(source)
            .and_then(|row| row.front(destination))
            .map(|front| front.paths())
            .unwrap_or_default()
    }

    pub fn all_pairs(&self) -> PairIter<'_> {
        PairIter {
            table: self,
            row: 0,
            front: 0,
        }
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            pairs: self
                .all_pairs()
                .map(|entry| ((entry.source, entry.destination), entry.front.paths()))
                .collect(),
        }
    }

    /// Forget every row so sources can be optimized again.
    pub fn reset(&mut self) {
        for cell in &mut self.rows {
            cell.take();
        }
    }
}
