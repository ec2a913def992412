//! Pareto dominance and the non-dominated set used for pruning.

use serde::{Deserialize, Serialize};

use crate::cost::CostVector;
use crate::criteria::Criteria;

/// `true` when `a` dominates `b` with every criterion minimised: `a` is no
/// larger than `b` in every component and strictly smaller in at least one.
///
/// A vector never dominates an identical copy of itself.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    debug_assert_eq!(a.len(), b.len());
    let mut strictly_better = false;
    for (left, right) in a.iter().zip(b) {
        if left > right {
            return false;
        }
        if left < right {
            strictly_better = true;
        }
    }
    strictly_better
}

impl Criteria {
    /// Direction-aware dominance: `a` is no worse than `b` on every criterion
    /// and strictly better on at least one.
    pub fn dominates(&self, a: &[f64], b: &[f64]) -> bool {
        debug_assert_eq!(a.len(), self.len());
        debug_assert_eq!(b.len(), self.len());
        let mut strictly_better = false;
        for (criterion, (&left, &right)) in self.iter().zip(a.iter().zip(b)) {
            if criterion.optimization.prefers(right, left) {
                return false;
            }
            if criterion.optimization.prefers(left, right) {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

/// Anything that carries a cost vector and can live in a [`ParetoFront`].
pub trait Costed {
    fn cost(&self) -> &[f64];
}

impl Costed for CostVector {
    fn cost(&self) -> &[f64] {
        self.as_slice()
    }
}

/// What to do with a candidate whose cost equals a member's cost exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualCostPolicy {
    /// Keep only the first path found for a given cost vector.
    #[default]
    Reject,
    /// Keep every distinct path, even when costs tie.
    Keep,
}

/// Result of offering a candidate to a [`ParetoFront`].
#[derive(Debug, PartialEq)]
pub enum Insertion<T> {
    /// The candidate was dominated (or duplicated) and is handed back.
    Rejected(T),
    /// The candidate joined the front; `evicted` holds members it dominated.
    Inserted { evicted: Vec<T> },
}

impl<T> Insertion<T> {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insertion::Inserted { .. })
    }
}

/// Set of mutually non-dominated members for one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct ParetoFront<T> {
    members: Vec<T>,
}

impl<T> Default for ParetoFront<T> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

impl<T> ParetoFront<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.members
    }
}

impl<T: Costed> ParetoFront<T> {
    /// Insert `candidate` unless a member dominates or equals it, removing
    /// every member the candidate dominates. Returns whether the set changed.
    ///
    /// Offering a candidate that was already rejected, or an exact duplicate,
    /// never changes the set.
    pub fn insert_if_nondominated(&mut self, criteria: &Criteria, candidate: T) -> bool {
        self.insert_with_policy(criteria, candidate, EqualCostPolicy::Reject)
            .is_inserted()
    }

    /// Like [`insert_if_nondominated`](Self::insert_if_nondominated) but hands
    /// back the rejected candidate or the evicted members, and lets ties be
    /// kept.
    ///
    /// Members carry no identity beyond their cost here, so under
    /// [`EqualCostPolicy::Keep`] a tie is still an exact duplicate. Use
    /// [`insert_with_policy_by`](Self::insert_with_policy_by) when members
    /// describe distinct paths.
    pub fn insert_with_policy(
        &mut self,
        criteria: &Criteria,
        candidate: T,
        policy: EqualCostPolicy,
    ) -> Insertion<T> {
        self.insert_with_policy_by(criteria, candidate, policy, |_, _| true)
    }

    /// Insertion where `same_path(member, candidate)` decides whether a
    /// member with an identical cost is the very same path. Under
    /// [`EqualCostPolicy::Keep`] only such duplicates are rejected; under
    /// [`EqualCostPolicy::Reject`] every tie is.
    pub fn insert_with_policy_by<F>(
        &mut self,
        criteria: &Criteria,
        candidate: T,
        policy: EqualCostPolicy,
        same_path: F,
    ) -> Insertion<T>
    where
        F: Fn(&T, &T) -> bool,
    {
        let blocked = self.members.iter().any(|member| {
            criteria.dominates(member.cost(), candidate.cost())
                || (member.cost() == candidate.cost()
                    && (policy == EqualCostPolicy::Reject || same_path(member, &candidate)))
        });
        if blocked {
            return Insertion::Rejected(candidate);
        }

        let (evicted, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.members)
            .into_iter()
            .partition(|member| criteria.dominates(candidate.cost(), member.cost()));
        self.members = kept;
        self.members.push(candidate);
        Insertion::Inserted { evicted }
    }

    /// `true` when no member dominates another.
    pub fn is_mutually_nondominated(&self, criteria: &Criteria) -> bool {
        self.members.iter().enumerate().all(|(i, a)| {
            self.members
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !criteria.dominates(a.cost(), b.cost()))
        })
    }
}

impl<'a, T> IntoIterator for &'a ParetoFront<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
