//! # admm-prox-rs
//!
//! Proximal operators and exact hyperplane projections for ADMM consensus
//! optimization.
//!
//! This crate implements the inner solves of consensus ADMM: each additive
//! term of a global objective minimizes itself locally against a frozen
//! consensus snapshot, in closed form, and the surrounding driver averages
//! the local copies back into consensus between rounds.
//!
//! ## Key Properties
//!
//! - **Closed-form**: every per-term solve is a case split ending in a
//!   gradient shift, a rank-one quadratic solve, or an exact projection.
//!   Nothing iterates below the outer ADMM loop.
//! - **Infallible iteration**: construction validates everything fallible;
//!   `minimize` and `update_lagrange` cannot fail and allocate nothing.
//! - **Snapshot discipline**: terms take the consensus by shared reference
//!   and never write it, so minimizing many terms in parallel is safe by
//!   construction.
//!
//! ## Quick Start
//!
//! Tie two variables with a hard equality and pull one of them toward a
//! target, then run the ADMM round trip until the consensus settles:
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use admm_prox_rs::{Comparator, ConsensusState, Term};
//!
//! let mut z = ConsensusState::new(1.0)?;
//! let mut terms = vec![
//!     // (x0 - 1)^2: pull x0 toward 1.
//!     Term::squared_linear(vec![0], vec![1.0], 1.0, 1.0, &z)?,
//!     // x0 + x1 = 1, hard.
//!     Term::linear_constraint(vec![0, 1], vec![1.0, 1.0], 1.0, Comparator::Equal, &z)?,
//! ];
//!
//! for _ in 0..200 {
//!     for term in &mut terms {
//!         term.minimize(&z);
//!     }
//!     // Average the local copies per consensus index.
//!     let mut sums: HashMap<usize, (f64, f64)> = HashMap::new();
//!     for term in &terms {
//!         for (idx, xi) in term.indices().iter().zip(term.local_values()) {
//!             let entry = sums.entry(*idx).or_insert((0.0, 0.0));
//!             entry.0 += xi;
//!             entry.1 += 1.0;
//!         }
//!     }
//!     for (idx, (sum, count)) in sums {
//!         z.set(idx, sum / count);
//!     }
//!     for term in &mut terms {
//!         term.update_lagrange(&z);
//!     }
//! }
//!
//! // The optimum is x0 = 1, x1 = 0.
//! assert!((z.value(0) - 1.0).abs() < 1e-4);
//! assert!(z.value(1).abs() < 1e-4);
//! # Ok::<(), admm_prox_rs::ProxError>(())
//! ```
//!
//! ## Modules
//!
//! - [`consensus`]: the shared step size and variable estimates terms read
//! - [`error`]: error types and result alias
//! - [`geometry`]: hyperplane projection and the weighted quadratic solve
//! - [`term`]: objective terms, potential kinds, and their proximal solves
//!
//! ## Potential Kinds
//!
//! Five potentials cover soft and hard linear structure over a hyperplane
//! `c . x = k`:
//!
//! ```text
//! hinge              w * max(0, c . x - k)
//! squared hinge      w * max(0, c . x - k)^2
//! squared linear     w * (c . x - k)^2
//! linear constraint  0 if c . x {<=,>=,==} k (within tolerance), else inf
//! implication hinge  0 if x[head] <= max(0, c_body . x_body - k), else inf
//! ```
//!
//! ## References
//!
//! - Boyd, S. et al. (2011). Distributed Optimization and Statistical
//!   Learning via the Alternating Direction Method of Multipliers
//! - Bach, S. et al. (2017). Hinge-Loss Markov Random Fields and
//!   Probabilistic Soft Logic

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod consensus;
pub mod error;
pub mod geometry;
pub mod term;

// Re-export main types at crate root for convenience
pub use consensus::ConsensusState;
pub use error::{ProxError, Result};
pub use geometry::Hyperplane;
pub use term::{Comparator, Potential, Term, INFEASIBLE};
