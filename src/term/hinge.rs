//! Piecewise-linear hinge loss `w * max(0, c . x - k)`.
//!
//! The loss has two linear pieces, so the minimizer is found by trying each
//! piece's closed form and falling back to the crease between them:
//!
//! 1. the proximal point itself, if the loss is flat there,
//! 2. the proximal point shifted down the gradient `w * c / rho`, if the
//!    loss is still rising there,
//! 3. otherwise the projection onto the crease `c . x = k`.
//!
//! The first guess can win even when the shift would not: landing below the
//! plane means the `max` already cut the loss to zero.

use std::collections::HashMap;

use crate::consensus::ConsensusState;
use crate::term::Term;

pub(super) fn minimize(term: &mut Term, weight: f64, state: &ConsensusState) {
    // Piece one: pretend the loss is flat and keep the proximal point if
    // that lands below the plane.
    let total = term.load_proximal_point(state);
    if total <= term.hyperplane.constant() {
        return;
    }

    // Piece two: pretend the loss is fully active. The penalty gradient is
    // constant, so the minimizer is the proximal point shifted by
    // w * c / rho. Valid only if the shifted point stays on or above the
    // plane.
    let rho = state.step_size();
    let mut total = 0.0;
    for i in 0..term.x.len() {
        term.x[i] -= weight * term.hyperplane.coeff(i) / rho;
        total += term.hyperplane.coeff(i) * term.x[i];
    }
    if total >= term.hyperplane.constant() {
        return;
    }

    // Both pieces overshoot, so the minimizer sits on the crease. Project
    // the fresh proximal point, not the shifted one.
    term.project_proximal_point(state);
}

pub(super) fn evaluate(term: &Term, weight: f64, assignment: &HashMap<usize, f64>) -> f64 {
    let total = term.weighted_total(assignment);
    if total <= term.hyperplane.constant() {
        0.0
    } else {
        weight * (total - term.hyperplane.constant())
    }
}
