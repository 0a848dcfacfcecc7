//! Hard linear constraint `c . x {<=,>=,==} k` within a tolerance.
//!
//! The potential is an indicator: zero on the feasible side, infeasible
//! otherwise. Minimizing keeps the proximal point whenever its violation
//! fits inside the tolerance and otherwise projects it onto the boundary
//! plane. Projection is the right fallback for all three comparators: the
//! nearest feasible point to an infeasible one always lies on the boundary.

use std::collections::HashMap;

use crate::consensus::ConsensusState;
use crate::term::potential::{Comparator, INFEASIBLE};
use crate::term::Term;

/// Violation magnitude of `total` against the comparator, zero when
/// satisfied.
fn violation(comparator: Comparator, total: f64, constant: f64) -> f64 {
    if comparator.is_satisfied(total, constant) {
        0.0
    } else {
        (total - constant).abs()
    }
}

pub(super) fn minimize(
    term: &mut Term,
    comparator: Comparator,
    tolerance: f64,
    state: &ConsensusState,
) {
    let total = term.load_proximal_point(state);
    let violation = violation(comparator, total, term.hyperplane.constant());

    // A negative tolerance never accepts, so even a satisfied point gets
    // pinned to the boundary.
    if tolerance >= 0.0 && violation <= tolerance {
        return;
    }
    term.hyperplane.project(&mut term.x);
}

pub(super) fn evaluate(
    term: &Term,
    comparator: Comparator,
    tolerance: f64,
    assignment: &HashMap<usize, f64>,
) -> f64 {
    let total = term.weighted_total(assignment);
    let violation = violation(comparator, total, term.hyperplane.constant());

    // Negative tolerance turns the indicator into a residual report.
    if tolerance < 0.0 {
        return violation;
    }
    if violation <= tolerance {
        0.0
    } else {
        INFEASIBLE
    }
}
