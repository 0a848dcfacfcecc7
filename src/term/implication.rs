//! Hard implication `x[head] <= max(0, c_body . x_body - k)`.
//!
//! Links one head variable to the hinge of the remaining body variables:
//! the head may only be as large as the body's surplus over the constant,
//! and a body with no surplus forces the head to zero. The head enters the
//! test by plain value; its coefficient participates only when the
//! satisfaction test fails and the whole term falls back to projecting the
//! full hyperplane `c . x = k`.
//!
//! Head slots are matched by global index, so a head listed several times
//! has every occurrence read (last one wins) and clamped together.

use std::collections::HashMap;

use crate::consensus::ConsensusState;
use crate::term::potential::INFEASIBLE;
use crate::term::Term;

/// Slack allowed to the head before an assignment counts as infeasible.
const SATISFACTION_TOLERANCE: f64 = 0.01;

pub(super) fn minimize(term: &mut Term, head: usize, state: &ConsensusState) {
    term.load_proximal_point(state);

    // Body surplus over the constant, clamped at zero, and the head's own
    // proximal value.
    let mut head_value = 0.0;
    let mut surplus = -term.hyperplane.constant();
    for (i, idx) in term.indices.iter().enumerate() {
        if *idx == head {
            head_value = term.x[i];
        } else {
            surplus += term.hyperplane.coeff(i) * term.x[i];
        }
    }
    if surplus < 0.0 {
        surplus = 0.0;
    }

    if surplus >= head_value && head_value >= 0.0 {
        return;
    }

    if head_value < 0.0 && surplus <= 0.0 {
        // No surplus means the head must be zero, which is also where a
        // negative head wants to move. Clamp every head slot; the clamped
        // point satisfies the test with head = 0 and surplus clamped to 0.
        for (i, idx) in term.indices.iter().enumerate() {
            if *idx == head {
                term.x[i] = 0.0;
            }
        }
        return;
    }

    // Head above the surplus, or negative head with positive surplus. The
    // binding case is c . x = k; project the proximal point onto it.
    term.hyperplane.project(&mut term.x);
}

pub(super) fn evaluate(term: &Term, head: usize, assignment: &HashMap<usize, f64>) -> f64 {
    let mut head_value = 0.0;
    let mut surplus = -term.hyperplane.constant();
    for (i, idx) in term.indices.iter().enumerate() {
        let Some(value) = assignment.get(idx) else {
            continue;
        };
        if *idx == head {
            head_value = *value;
        } else {
            surplus += term.hyperplane.coeff(i) * value;
        }
    }
    if surplus < 0.0 {
        surplus = 0.0;
    }

    let overhang = if surplus < head_value {
        head_value - surplus
    } else {
        0.0
    };
    if overhang <= SATISFACTION_TOLERANCE {
        0.0
    } else {
        INFEASIBLE
    }
}
