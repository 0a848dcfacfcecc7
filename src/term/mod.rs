//! Objective terms and their proximal solves.
//!
//! A [`Term`] owns one local copy of its variables, the matching Lagrange
//! multipliers, a [`Hyperplane`](crate::geometry::Hyperplane), and a
//! [`Potential`] variant saying which loss or constraint the plane encodes.
//! The per-kind solvers live in the private submodules here; [`Term`]
//! dispatches to them by matching on its potential.
//!
//! Every solve runs the same two-move script. Move one computes the
//! unconstrained proximal point `p = z - y / rho` and accepts it when the
//! potential is inactive there. Move two resolves the active case in closed
//! form, either by a gradient shift, a weighted quadratic solve, or an
//! exact projection onto the plane. No solve iterates and none can fail.

mod constraint;
mod hinge;
mod implication;
pub mod potential;
mod squared;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consensus::ConsensusState;
use crate::error::{ProxError, Result};
use crate::geometry::{quadratic, Hyperplane};

pub use potential::{Comparator, Potential, INFEASIBLE};

/// One additive term of the global objective.
///
/// The term couples global consensus indices with private solver state: a
/// local copy `x` of the variables it touches and the scaled Lagrange
/// multipliers `y` that pull the local copy toward consensus over the
/// iterations. Terms never write to shared state, so a driver may hold many
/// terms and minimize them in any order, or in parallel, between consensus
/// updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    indices: Vec<usize>,
    x: Vec<f64>,
    y: Vec<f64>,
    hyperplane: Hyperplane,
    potential: Potential,
}

impl Term {
    /// Builds a hinge loss term `w * max(0, c . x - k)`.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, a zero
    /// coefficient, or a negative weight.
    pub fn hinge(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        weight: f64,
        state: &ConsensusState,
    ) -> Result<Self> {
        let weight = check_weight(weight)?;
        Self::build(indices, coeffs, constant, Potential::Hinge { weight }, state)
    }

    /// Builds a squared hinge loss term `w * max(0, c . x - k)^2`.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, a zero
    /// coefficient, or a negative weight.
    pub fn squared_hinge(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        weight: f64,
        state: &ConsensusState,
    ) -> Result<Self> {
        let weight = check_weight(weight)?;
        Self::build(
            indices,
            coeffs,
            constant,
            Potential::SquaredHinge { weight },
            state,
        )
    }

    /// Builds a squared linear loss term `w * (c . x - k)^2`.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, a zero
    /// coefficient, or a negative weight.
    pub fn squared_linear(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        weight: f64,
        state: &ConsensusState,
    ) -> Result<Self> {
        let weight = check_weight(weight)?;
        Self::build(
            indices,
            coeffs,
            constant,
            Potential::SquaredLinear { weight },
            state,
        )
    }

    /// Builds a hard linear constraint `c . x {<=,>=,==} k` with zero
    /// tolerance.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, or a
    /// zero coefficient.
    pub fn linear_constraint(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        comparator: Comparator,
        state: &ConsensusState,
    ) -> Result<Self> {
        Self::linear_constraint_with_tolerance(indices, coeffs, constant, comparator, 0.0, state)
    }

    /// Builds a hard linear constraint that accepts violations up to
    /// `tolerance`.
    ///
    /// A negative tolerance disables the acceptance gate: the solve then
    /// projects on every call and evaluation reports the raw violation
    /// magnitude instead of the infeasibility sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, or a
    /// zero coefficient.
    pub fn linear_constraint_with_tolerance(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        comparator: Comparator,
        tolerance: f64,
        state: &ConsensusState,
    ) -> Result<Self> {
        Self::build(
            indices,
            coeffs,
            constant,
            Potential::LinearConstraint {
                comparator,
                tolerance,
            },
            state,
        )
    }

    /// Builds a hard implication `x[head] <= max(0, c_body . x_body - k)`.
    ///
    /// `head` is a global consensus index and must appear in `indices`. The
    /// head variable participates in the satisfaction test by value; its
    /// coefficient only matters in the projection fallback, which uses the
    /// full hyperplane.
    ///
    /// # Errors
    ///
    /// Returns an error for mismatched slice lengths, an empty term, a zero
    /// coefficient, or a head index absent from `indices`.
    pub fn implication_hinge(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        head: usize,
        state: &ConsensusState,
    ) -> Result<Self> {
        if !indices.contains(&head) {
            return Err(ProxError::UnknownHead(head));
        }
        Self::build(
            indices,
            coeffs,
            constant,
            Potential::ImplicationHinge { head },
            state,
        )
    }

    fn build(
        indices: Vec<usize>,
        coeffs: Vec<f64>,
        constant: f64,
        potential: Potential,
        state: &ConsensusState,
    ) -> Result<Self> {
        if indices.len() != coeffs.len() {
            return Err(ProxError::LengthMismatch {
                indices: indices.len(),
                coeffs: coeffs.len(),
            });
        }
        let hyperplane = Hyperplane::new(coeffs, constant)?;

        // Seed local copies from the consensus so the first dual update
        // starts from zero disagreement on known variables.
        let x = indices.iter().map(|&i| state.value(i)).collect();
        let y = vec![0.0; indices.len()];

        Ok(Self {
            indices,
            x,
            y,
            hyperplane,
            potential,
        })
    }

    /// Updates the local copy to
    /// `argmin f(x) + (rho / 2) * ||x - z + y / rho||^2` for this term's
    /// `f`.
    ///
    /// Reads the consensus snapshot, never writes it. Infallible: every
    /// kind resolves in closed form.
    pub fn minimize(&mut self, state: &ConsensusState) {
        match self.potential {
            Potential::Hinge { weight } => hinge::minimize(self, weight, state),
            Potential::SquaredHinge { weight } => squared::minimize_hinge(self, weight, state),
            Potential::SquaredLinear { weight } => squared::minimize_linear(self, weight, state),
            Potential::LinearConstraint {
                comparator,
                tolerance,
            } => constraint::minimize(self, comparator, tolerance, state),
            Potential::ImplicationHinge { head } => implication::minimize(self, head, state),
        }
    }

    /// Accumulates the scaled dual update
    /// `y[i] += rho * (x[i] - z[indices[i]])` after a consensus averaging
    /// step.
    pub fn update_lagrange(&mut self, state: &ConsensusState) {
        let rho = state.step_size();
        for i in 0..self.y.len() {
            self.y[i] += rho * (self.x[i] - state.value(self.indices[i]));
        }
    }

    /// Evaluates this term's contribution to the objective under a global
    /// assignment.
    ///
    /// Indices absent from the assignment contribute nothing to the total.
    /// Hard constraint kinds report [`INFEASIBLE`] when violated beyond
    /// their tolerance.
    #[must_use]
    pub fn evaluate_at(&self, assignment: &HashMap<usize, f64>) -> f64 {
        match self.potential {
            Potential::Hinge { weight } => hinge::evaluate(self, weight, assignment),
            Potential::SquaredHinge { weight } => squared::evaluate_hinge(self, weight, assignment),
            Potential::SquaredLinear { weight } => {
                squared::evaluate_linear(self, weight, assignment)
            }
            Potential::LinearConstraint {
                comparator,
                tolerance,
            } => constraint::evaluate(self, comparator, tolerance, assignment),
            Potential::ImplicationHinge { head } => implication::evaluate(self, head, assignment),
        }
    }

    /// Replaces the loss weight, for reweighting schemes that anneal
    /// soft-constraint strength across outer iterations.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::NegativeWeight`] for a negative weight and
    /// [`ProxError::UnweightedTerm`] when called on a hard constraint.
    pub fn set_weight(&mut self, new_weight: f64) -> Result<()> {
        let new_weight = check_weight(new_weight)?;
        match &mut self.potential {
            Potential::Hinge { weight }
            | Potential::SquaredHinge { weight }
            | Potential::SquaredLinear { weight } => {
                *weight = new_weight;
                Ok(())
            }
            Potential::LinearConstraint { .. } | Potential::ImplicationHinge { .. } => {
                Err(ProxError::UnweightedTerm)
            }
        }
    }

    /// Returns the global consensus indices this term touches.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the local variable copies, slot for slot with `indices`.
    #[must_use]
    pub fn local_values(&self) -> &[f64] {
        &self.x
    }

    /// Returns the scaled Lagrange multipliers, slot for slot with
    /// `indices`.
    #[must_use]
    pub fn multipliers(&self) -> &[f64] {
        &self.y
    }

    /// Returns the hyperplane backing this term.
    #[must_use]
    pub fn hyperplane(&self) -> &Hyperplane {
        &self.hyperplane
    }

    /// Returns the potential kind and its parameters.
    #[must_use]
    pub fn potential(&self) -> Potential {
        self.potential
    }

    /// Returns the loss weight, or `None` for hard constraints.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        self.potential.weight()
    }

    /// Returns whether this term admits no violation at any price.
    #[must_use]
    pub fn is_hard_constraint(&self) -> bool {
        self.potential.is_hard_constraint()
    }

    /// Returns the number of local variables.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.indices.len()
    }

    /// Loads the proximal point `p = z - y / rho` into the local copy and
    /// returns `c . p`.
    ///
    /// Every solve starts here, and the projection fallbacks call it again
    /// to discard any interim shift before projecting.
    fn load_proximal_point(&mut self, state: &ConsensusState) -> f64 {
        let rho = state.step_size();
        let mut total = 0.0;
        for i in 0..self.x.len() {
            self.x[i] = state.value(self.indices[i]) - self.y[i] / rho;
            total += self.hyperplane.coeff(i) * self.x[i];
        }
        total
    }

    /// Sums `c[i] * assignment[indices[i]]` over the slots present in the
    /// assignment.
    fn weighted_total(&self, assignment: &HashMap<usize, f64>) -> f64 {
        let mut total = 0.0;
        for (i, idx) in self.indices.iter().enumerate() {
            if let Some(value) = assignment.get(idx) {
                total += self.hyperplane.coeff(i) * value;
            }
        }
        total
    }

    /// Solves the weighted squared distance to the plane from the fresh
    /// proximal point.
    fn solve_weighted_quadratic(&mut self, weight: f64, state: &ConsensusState) {
        quadratic::minimize_weighted(&self.hyperplane, weight, state.step_size(), &mut self.x);
    }

    /// Projects the fresh proximal point onto the plane.
    fn project_proximal_point(&mut self, state: &ConsensusState) {
        self.load_proximal_point(state);
        self.hyperplane.project(&mut self.x);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(x={:?}, y={:?}, coeffs={:?}, constant={}, indices={:?})",
            self.potential.name(),
            self.x,
            self.y,
            self.hyperplane.coeffs(),
            self.hyperplane.constant(),
            self.indices
        )
    }
}

fn check_weight(weight: f64) -> Result<f64> {
    if weight < 0.0 {
        Err(ProxError::NegativeWeight(weight))
    } else {
        Ok(weight)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn state_with(values: &[(usize, f64)]) -> ConsensusState {
        ConsensusState::with_values(1.0, values.iter().copied().collect()).unwrap()
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let z = state_with(&[]);
        assert!(matches!(
            Term::hinge(vec![0, 1], vec![1.0], 0.0, 1.0, &z),
            Err(ProxError::LengthMismatch {
                indices: 2,
                coeffs: 1
            })
        ));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let z = state_with(&[]);
        assert!(matches!(
            Term::squared_linear(vec![0], vec![1.0], 0.0, -0.5, &z),
            Err(ProxError::NegativeWeight(w)) if w == -0.5
        ));
    }

    #[test]
    fn test_rejects_unknown_head() {
        let z = state_with(&[]);
        assert!(matches!(
            Term::implication_hinge(vec![1, 2], vec![1.0, 1.0], 0.0, 7, &z),
            Err(ProxError::UnknownHead(7))
        ));
    }

    #[test]
    fn test_seeds_local_copies_from_consensus() {
        let z = state_with(&[(3, 0.6)]);
        let term = Term::hinge(vec![3, 9], vec![1.0, 1.0], 1.0, 1.0, &z).unwrap();
        assert_relative_eq!(term.local_values()[0], 0.6);
        // Index 9 is unknown to the consensus and seeds to zero.
        assert_relative_eq!(term.local_values()[1], 0.0);
        assert_eq!(term.multipliers(), &[0.0, 0.0]);
    }

    #[test]
    fn test_lagrange_update_accumulates_disagreement() {
        let z = state_with(&[(0, 1.0)]);
        let mut term = Term::squared_linear(vec![0], vec![1.0], 0.0, 1.0, &z).unwrap();

        // rho = 1, x = 1 (seeded), z = 1: no disagreement yet.
        term.update_lagrange(&z);
        assert_relative_eq!(term.multipliers()[0], 0.0);

        // Move the consensus away from the local copy and update twice.
        let z = state_with(&[(0, 3.0)]);
        term.update_lagrange(&z);
        assert_relative_eq!(term.multipliers()[0], -2.0);
        term.update_lagrange(&z);
        assert_relative_eq!(term.multipliers()[0], -4.0);
    }

    #[test]
    fn test_set_weight_on_weighted_kinds() {
        let z = state_with(&[]);
        let mut term = Term::hinge(vec![0], vec![1.0], 0.0, 1.0, &z).unwrap();
        term.set_weight(2.5).unwrap();
        assert_eq!(term.weight(), Some(2.5));
        assert!(matches!(
            term.set_weight(-1.0),
            Err(ProxError::NegativeWeight(_))
        ));
        assert_eq!(term.weight(), Some(2.5));
    }

    #[test]
    fn test_set_weight_on_constraints_fails() {
        let z = state_with(&[]);
        let mut term =
            Term::linear_constraint(vec![0], vec![1.0], 1.0, Comparator::LessOrEqual, &z).unwrap();
        assert!(matches!(
            term.set_weight(1.0),
            Err(ProxError::UnweightedTerm)
        ));
        assert_eq!(term.weight(), None);
        assert!(term.is_hard_constraint());
    }

    #[test]
    fn test_display_names_the_kind() {
        let z = state_with(&[]);
        let term = Term::squared_hinge(vec![2], vec![1.5], 0.5, 2.0, &z).unwrap();
        let printed = term.to_string();
        assert!(printed.starts_with("squared-hinge("));
        assert!(printed.contains("constant=0.5"));
        assert!(printed.contains("indices=[2]"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let z = state_with(&[(0, 0.4), (1, 0.2)]);
        let term = Term::implication_hinge(vec![0, 1], vec![1.0, 1.0], 0.0, 0, &z).unwrap();
        let json = serde_json::to_string(&term).unwrap();
        let back: Term = serde_json::from_str(&json).unwrap();
        assert_eq!(back.indices(), term.indices());
        assert_eq!(back.potential(), term.potential());
        assert_eq!(back.local_values(), term.local_values());
    }

    #[test]
    fn test_evaluate_excludes_the_proximal_penalty() {
        // evaluate_at measures the potential alone, so the value of a
        // freshly minimized point does not move when the step size does.
        let mut z = state_with(&[(0, 10.0)]);
        let mut term = Term::hinge(vec![0], vec![1.0], 5.0, 1.0, &z).unwrap();
        term.minimize(&z); // p = 10, the shift lands on 9 and is kept

        let assignment: HashMap<usize, f64> =
            [(0, term.local_values()[0])].into_iter().collect();
        let before = term.evaluate_at(&assignment);
        // The proximal penalty at x = 9 would add 0.5; the potential alone
        // is w * (9 - 5).
        assert_relative_eq!(before, 4.0);

        z.set_step_size(4.0).unwrap();
        let after = term.evaluate_at(&assignment);
        assert_eq!(after, before);
    }

    #[test]
    fn test_minimize_is_a_fixed_point_under_frozen_state() {
        // x is recomputed from (z, y, rho) alone, so a second call with
        // nothing changed reproduces the first result bit for bit.
        let z = state_with(&[(0, 0.7), (1, 0.4)]);
        let mut terms = vec![
            Term::hinge(vec![0, 1], vec![1.0, 2.0], 0.5, 1.0, &z).unwrap(),
            Term::squared_hinge(vec![0, 1], vec![1.0, 2.0], 0.5, 1.0, &z).unwrap(),
            Term::squared_linear(vec![0, 1], vec![1.0, 2.0], 0.5, 1.0, &z).unwrap(),
            Term::linear_constraint(vec![0, 1], vec![1.0, 2.0], 0.5, Comparator::Equal, &z)
                .unwrap(),
            Term::implication_hinge(vec![0, 1], vec![1.0, 1.0], 0.2, 0, &z).unwrap(),
        ];
        for term in &mut terms {
            term.minimize(&z);
            let first = term.local_values().to_vec();
            term.minimize(&z);
            assert_eq!(term.local_values(), first.as_slice());
        }
    }

    #[test]
    fn test_arity_matches_indices() {
        let z = state_with(&[]);
        let term = Term::hinge(vec![0, 4, 9], vec![1.0, -1.0, 2.0], 0.0, 1.0, &z).unwrap();
        assert_eq!(term.arity(), 3);
        assert_eq!(term.hyperplane().len(), 3);
    }
}
