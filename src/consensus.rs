//! Consensus state shared across all terms of one ADMM iteration.
//!
//! ADMM consensus splitting alternates between two phases. First every term
//! minimizes its own objective against a frozen copy of the global variable
//! estimates. Then the driver gathers the terms' local copies, averages them
//! into new global estimates, and lets every term update its Lagrange
//! multipliers against the result. [`ConsensusState`] is that frozen copy:
//! terms only ever read it, and the driver mutates it strictly between
//! phases. Holding it behind a shared reference during the minimize phase
//! makes the no-write rule a borrow-checker fact rather than a convention.
//!
//! Variables are identified by global index. An index that has never been
//! written reads as `0.0`, which doubles as the seed value for local copies
//! of variables the consensus has not seen yet.
//!
//! # Example
//!
//! ```rust
//! use admm_prox_rs::ConsensusState;
//!
//! let mut z = ConsensusState::new(1.0).unwrap();
//! z.set(3, 0.25);
//! assert_eq!(z.value(3), 0.25);
//! assert_eq!(z.value(7), 0.0); // unseen variables read as zero
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProxError, Result};

/// Immutable-within-an-iteration snapshot of the consensus variables.
///
/// Couples the global variable estimates with the ADMM step size `rho`, the
/// one scalar every proximal solve and every dual update needs alongside the
/// estimates themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusState {
    step_size: f64,
    values: HashMap<usize, f64>,
}

impl ConsensusState {
    /// Creates an empty consensus state with the given step size.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::InvalidStepSize`] unless `step_size` is finite
    /// and strictly positive.
    pub fn new(step_size: f64) -> Result<Self> {
        Self::with_values(step_size, HashMap::new())
    }

    /// Creates a consensus state pre-populated with variable estimates.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::InvalidStepSize`] unless `step_size` is finite
    /// and strictly positive.
    pub fn with_values(step_size: f64, values: HashMap<usize, f64>) -> Result<Self> {
        check_step_size(step_size)?;
        Ok(Self { step_size, values })
    }

    /// Returns the ADMM step size `rho`.
    #[must_use]
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the estimate for `index`, or `0.0` if the consensus has
    /// never seen that variable.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.values.get(&index).copied().unwrap_or(0.0)
    }

    /// Returns the estimate for `index`, or `None` if the consensus has
    /// never seen that variable.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(&index).copied()
    }

    /// Returns the full estimate map.
    #[must_use]
    pub fn values(&self) -> &HashMap<usize, f64> {
        &self.values
    }

    /// Returns the number of variables the consensus has estimates for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the consensus holds no estimates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes a single variable estimate.
    ///
    /// Driver-side API for the averaging phase; never call this while terms
    /// hold a reference to the state.
    pub fn set(&mut self, index: usize, value: f64) {
        self.values.insert(index, value);
    }

    /// Replaces the whole estimate map in one step.
    ///
    /// Driver-side API for the averaging phase.
    pub fn replace(&mut self, values: HashMap<usize, f64>) {
        self.values = values;
    }

    /// Updates the step size between iterations.
    ///
    /// Supports adaptive-`rho` schemes where the driver rescales the penalty
    /// based on primal and dual residuals.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::InvalidStepSize`] unless `step_size` is finite
    /// and strictly positive.
    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        check_step_size(step_size)?;
        self.step_size = step_size;
        Ok(())
    }
}

fn check_step_size(step_size: f64) -> Result<()> {
    if step_size.is_finite() && step_size > 0.0 {
        Ok(())
    } else {
        Err(ProxError::InvalidStepSize(step_size))
    }
}
