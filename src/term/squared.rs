//! Squared losses `w * max(0, c . x - k)^2` and `w * (c . x - k)^2`.
//!
//! Both reduce to the same closed-form quadratic solve from
//! [`crate::geometry::quadratic`]. The squared hinge gets a cheap exit
//! first: if the proximal point already sits below the plane the `max` has
//! zeroed the loss and nothing needs solving. The two-sided squared linear
//! loss penalizes every deviation, so it solves unconditionally.

use std::collections::HashMap;

use crate::consensus::ConsensusState;
use crate::term::Term;

pub(super) fn minimize_hinge(term: &mut Term, weight: f64, state: &ConsensusState) {
    let total = term.load_proximal_point(state);
    if total <= term.hyperplane.constant() {
        return;
    }
    term.solve_weighted_quadratic(weight, state);
}

pub(super) fn minimize_linear(term: &mut Term, weight: f64, state: &ConsensusState) {
    term.load_proximal_point(state);
    term.solve_weighted_quadratic(weight, state);
}

pub(super) fn evaluate_hinge(term: &Term, weight: f64, assignment: &HashMap<usize, f64>) -> f64 {
    let residual = term.weighted_total(assignment) - term.hyperplane.constant();
    if residual <= 0.0 {
        0.0
    } else {
        weight * residual * residual
    }
}

pub(super) fn evaluate_linear(term: &Term, weight: f64, assignment: &HashMap<usize, f64>) -> f64 {
    let residual = term.weighted_total(assignment) - term.hyperplane.constant();
    weight * residual * residual
}
