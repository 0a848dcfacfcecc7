//! Potential kinds and the comparator vocabulary.
//!
//! A term's behavior is its hyperplane plus one [`Potential`] variant. The
//! variant carries exactly the parameters its solve needs, so matching on it
//! is the whole dispatch story; there is no trait object and no downcast
//! anywhere in the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProxError;

/// Objective value reported for a violated hard constraint.
///
/// Matches the largest finite `f64` rather than infinity, so aggregate
/// objective sums built from many terms stay ordered under comparison.
pub const INFEASIBLE: f64 = f64::MAX;

/// Relation a linear constraint imposes between `c . x` and its constant.
///
/// The set is closed: tokens outside `leq` / `geq` / `eq` fail to parse
/// instead of mapping to some default relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// Satisfied when `c . x <= k`.
    LessOrEqual,
    /// Satisfied when `c . x >= k`.
    GreaterOrEqual,
    /// Satisfied when `c . x == k` exactly.
    Equal,
}

impl Comparator {
    /// Returns whether `total` stands in this relation to `constant`.
    ///
    /// [`Comparator::Equal`] compares exactly: any rounding drift counts as
    /// a violation, and the constraint's tolerance decides whether the
    /// drift is acceptable. NaN totals satisfy no comparator.
    #[must_use]
    pub fn is_satisfied(self, total: f64, constant: f64) -> bool {
        match self {
            Comparator::LessOrEqual => total <= constant,
            Comparator::GreaterOrEqual => total >= constant,
            #[allow(clippy::float_cmp)]
            Comparator::Equal => total == constant,
        }
    }

    /// Returns the parse token for this comparator.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Comparator::LessOrEqual => "leq",
            Comparator::GreaterOrEqual => "geq",
            Comparator::Equal => "eq",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Comparator {
    type Err = ProxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leq" => Ok(Comparator::LessOrEqual),
            "geq" => Ok(Comparator::GreaterOrEqual),
            "eq" => Ok(Comparator::Equal),
            other => Err(ProxError::UnknownComparator(other.to_owned())),
        }
    }
}

/// The loss or constraint a term contributes to the global objective.
///
/// Weighted variants carry their weight inline; constraint variants carry
/// none because their penalty is all-or-nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Potential {
    /// `w * max(0, c . x - k)`: linear penalty above the plane, free below.
    Hinge {
        /// Nonnegative loss weight `w`.
        weight: f64,
    },
    /// `w * max(0, c . x - k)^2`: smooth penalty above the plane.
    SquaredHinge {
        /// Nonnegative loss weight `w`.
        weight: f64,
    },
    /// `w * (c . x - k)^2`: two-sided penalty for any deviation.
    SquaredLinear {
        /// Nonnegative loss weight `w`.
        weight: f64,
    },
    /// Hard constraint `c . x {<=,>=,==} k` within `tolerance`.
    LinearConstraint {
        /// Relation between `c . x` and the constant.
        comparator: Comparator,
        /// Absolute slack granted when deciding satisfaction. A negative
        /// tolerance disables the satisfaction gate entirely.
        tolerance: f64,
    },
    /// Hard implication `x[head] <= max(0, c_body . x_body - k)` linking one
    /// head variable to the rest of the term.
    ImplicationHinge {
        /// Global consensus index of the head variable.
        head: usize,
    },
}

impl Potential {
    /// Returns the loss weight, or `None` for hard constraints.
    #[must_use]
    pub const fn weight(self) -> Option<f64> {
        match self {
            Potential::Hinge { weight }
            | Potential::SquaredHinge { weight }
            | Potential::SquaredLinear { weight } => Some(weight),
            Potential::LinearConstraint { .. } | Potential::ImplicationHinge { .. } => None,
        }
    }

    /// Returns whether this potential admits no violation at any price.
    #[must_use]
    pub const fn is_hard_constraint(self) -> bool {
        matches!(
            self,
            Potential::LinearConstraint { .. } | Potential::ImplicationHinge { .. }
        )
    }

    /// Returns a short kind name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Potential::Hinge { .. } => "hinge",
            Potential::SquaredHinge { .. } => "squared-hinge",
            Potential::SquaredLinear { .. } => "squared-linear",
            Potential::LinearConstraint { .. } => "linear-constraint",
            Potential::ImplicationHinge { .. } => "implication-hinge",
        }
    }
}
