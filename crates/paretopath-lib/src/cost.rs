use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Fixed-length vector of criterion values carried by edges and labels.
///
/// Every edge and label of a graph shares the same length `K`, the number of
/// criteria declared when the graph was loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostVector(Vec<f64>);

impl CostVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// All-zero vector of length `len`.
    pub fn zeros(len: usize) -> Self {
        Self(vec![0.0; len])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// `true` when no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|value| value.is_finite())
    }

    /// `true` when any component's magnitude is above `bound`.
    pub fn exceeds(&self, bound: f64) -> bool {
        self.0.iter().any(|value| value.abs() > bound)
    }

    /// Total lexicographic order over the raw component values.
    pub fn lexicographic_cmp(&self, other: &Self) -> Ordering {
        lexicographic_cmp(&self.0, &other.0)
    }
}

pub(crate) fn lexicographic_cmp(a: &[f64], b: &[f64]) -> Ordering {
    for (left, right) in a.iter().zip(b) {
        match left.total_cmp(right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

impl Deref for CostVector {
    type Target = [f64];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<f64>> for CostVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for CostVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl fmt::Display for CostVector {
    /// Space separated components using the shortest representation that
    /// parses back to the same `f64`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_through_parse() {
        let cost = CostVector::from([4.0, 0.1 + 0.2, 1e-300, f64::INFINITY]);
        let parsed: Vec<f64> = cost
            .to_string()
            .split_whitespace()
            .map(|token| token.parse().unwrap())
            .collect();
        assert_eq!(parsed, cost.as_slice());
    }

    #[test]
    fn lexicographic_order_breaks_ties_on_later_components() {
        let a = CostVector::from([1.0, 5.0]);
        let b = CostVector::from([1.0, 6.0]);
        let c = CostVector::from([0.5, 9.0]);
        assert_eq!(a.lexicographic_cmp(&b), Ordering::Less);
        assert_eq!(b.lexicographic_cmp(&c), Ordering::Greater);
        assert_eq!(a.lexicographic_cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn bound_and_finiteness_checks() {
        let cost = CostVector::from([3.0, -12.0]);
        assert!(cost.exceeds(10.0));
        assert!(!cost.exceeds(12.0));
        assert!(cost.is_finite());
        assert!(!CostVector::from([f64::NAN]).is_finite());
    }
}
