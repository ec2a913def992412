//! Criterion definitions shared by every edge and label of a graph.
//!
//! A criterion names one cost dimension, says whether smaller or larger
//! values are preferred, and says how two values combine when a path is
//! extended by an edge. Graphs loaded from the plain format use `K`
//! minimised, additive criteria named `c1..cK`; the sectioned format declares
//! each criterion explicitly (`name|MIN|ADD+0.5`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cost::CostVector;

/// Preferred direction for a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimization {
    Minimize,
    Maximize,
}

impl Optimization {
    /// `true` when `a` is strictly preferable to `b`.
    pub fn prefers(self, a: f64, b: f64) -> bool {
        match self {
            Optimization::Minimize => a < b,
            Optimization::Maximize => a > b,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Optimization::Minimize => "min",
            Optimization::Maximize => "max",
        }
    }
}

/// How a path value and an edge value combine into the extended path value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// Sum of both values plus a fixed per-hop offset.
    Add { offset: f64 },
    /// Smaller of both values (bottleneck).
    Min,
    /// Larger of both values.
    Max,
}

impl Combination {
    pub fn apply(self, path_value: f64, edge_value: f64) -> f64 {
        match self {
            Combination::Add { offset } => path_value + edge_value + offset,
            Combination::Min => path_value.min(edge_value),
            Combination::Max => path_value.max(edge_value),
        }
    }

    /// Value carried by the empty path so that `apply(identity, w) == w`
    /// (up to the ADD offset).
    pub fn identity(self) -> f64 {
        match self {
            Combination::Add { .. } => 0.0,
            Combination::Min => f64::INFINITY,
            Combination::Max => f64::NEG_INFINITY,
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Add { offset } if *offset == 0.0 => f.write_str("add"),
            Combination::Add { offset } => write!(f, "add+{offset}"),
            Combination::Min => f.write_str("min"),
            Combination::Max => f.write_str("max"),
        }
    }
}

impl FromStr for Combination {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_ascii_lowercase();
        match lower.as_str() {
            "add" => Ok(Combination::Add { offset: 0.0 }),
            "min" => Ok(Combination::Min),
            "max" => Ok(Combination::Max),
            other => match other.strip_prefix("add+") {
                Some(offset) => offset
                    .parse::<f64>()
                    .ok()
                    .filter(|offset| offset.is_finite())
                    .map(|offset| Combination::Add { offset })
                    .ok_or_else(|| format!("invalid ADD offset \"{offset}\"")),
                None => Err(format!("invalid combination method \"{value}\"")),
            },
        }
    }
}

/// A single named cost dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub optimization: Optimization,
    pub combination: Combination,
}

impl Criterion {
    /// Minimised additive criterion, the plain-format default.
    pub fn additive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optimization: Optimization::Minimize,
            combination: Combination::Add { offset: 0.0 },
        }
    }

    /// `true` when extending a path by an edge of value `edge` can never make
    /// this criterion better.
    pub fn never_improves_with(&self, edge: f64) -> bool {
        match (self.optimization, self.combination) {
            (Optimization::Minimize, Combination::Add { offset }) => edge + offset >= 0.0,
            (Optimization::Maximize, Combination::Add { offset }) => edge + offset <= 0.0,
            (Optimization::Minimize, Combination::Max)
            | (Optimization::Maximize, Combination::Min) => true,
            (Optimization::Minimize, Combination::Min)
            | (Optimization::Maximize, Combination::Max) => false,
        }
    }

    /// Names end up in whitespace and `:` separated headers.
    pub(crate) fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && !name
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ':' | '=' | ',' | '|'))
    }
}

impl fmt::Display for Criterion {
    /// `name:direction:combination`, e.g. `time:min:add+0.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.name,
            self.optimization.keyword(),
            self.combination
        )
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(':');
        let (Some(name), Some(direction), Some(combination), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected name:direction:combination, got \"{value}\""));
        };

        if !Criterion::is_valid_name(name) {
            return Err(format!("invalid criterion name \"{name}\""));
        }

        let optimization = match direction.to_ascii_lowercase().as_str() {
            "min" => Optimization::Minimize,
            "max" => Optimization::Maximize,
            _ => return Err(format!("invalid optimization strategy \"{direction}\"")),
        };

        Ok(Self {
            name: name.to_string(),
            optimization,
            combination: combination.parse()?,
        })
    }
}

/// Ordered set of criteria; index `i` matches component `i` of every
/// [`CostVector`] in the graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(Vec<Criterion>);

impl Criteria {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self(criteria)
    }

    /// `count` minimised additive criteria named `c1..c{count}`.
    pub fn minimizing(count: usize) -> Self {
        Self(
            (1..=count)
                .map(|index| Criterion::additive(format!("c{index}")))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|criterion| criterion.name == name)
    }

    /// Cost of the empty path that seeds every search.
    pub fn identity(&self) -> CostVector {
        CostVector::new(
            self.0
                .iter()
                .map(|criterion| criterion.combination.identity())
                .collect(),
        )
    }

    /// Extend a path cost by an edge cost, component by component.
    pub fn combine(&self, path: &[f64], edge: &[f64]) -> CostVector {
        CostVector::new(
            self.0
                .iter()
                .zip(path.iter().zip(edge))
                .map(|(criterion, (&p, &e))| criterion.combination.apply(p, e))
                .collect(),
        )
    }

    /// `true` when extending a path can never make any criterion better:
    /// every criterion is minimised and additive with a non-negative offset.
    /// Combined with non-negative edge costs this makes label-setting exact.
    pub fn is_monotone(&self) -> bool {
        self.0.iter().all(|criterion| {
            criterion.optimization == Optimization::Minimize
                && matches!(criterion.combination, Combination::Add { offset } if offset >= 0.0)
        })
    }

    /// `true` when extending two paths by the same edge keeps a strict
    /// preference between them strict. Bottleneck rules (`min`, `max`) can
    /// turn it into a tie.
    pub fn preserves_strict_preference(&self) -> bool {
        self.0
            .iter()
            .all(|criterion| matches!(criterion.combination, Combination::Add { .. }))
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, criterion) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{criterion}")?;
        }
        Ok(())
    }
}
