//! Hyperplane geometry shared by every potential.
//!
//! Two solvers live here. [`Hyperplane::project`] is the exact Euclidean
//! projection used by hard constraints and by hinge potentials whose
//! minimizer lands on the active boundary. [`quadratic::minimize_weighted`]
//! is the closed-form solve for squared losses, which bends toward the same
//! plane without ever requiring feasibility.

pub mod hyperplane;
pub mod quadratic;

pub use hyperplane::Hyperplane;
