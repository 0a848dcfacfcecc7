//! Error types for term and state construction.

use thiserror::Error;

/// Result type alias for proximal-term operations.
pub type Result<T> = std::result::Result<T, ProxError>;

/// Errors that can occur while building terms or consensus state.
///
/// Construction is the only fallible surface: once a term exists, every
/// iteration-time operation is total and returns plain values. Numerical
/// anomalies that arise after construction (NaN consensus values, infinite
/// weights) propagate through the arithmetic instead of being reported here.
#[derive(Debug, Error)]
pub enum ProxError {
    /// A term was given no variables at all.
    #[error("term has no variables")]
    EmptyTerm,

    /// A hyperplane coefficient is zero, which breaks every closed-form
    /// solve that divides by it.
    #[error("zero coefficient at position {0}")]
    ZeroCoefficient(usize),

    /// Index and coefficient slices disagree in length.
    #[error("length mismatch: {indices} indices, {coeffs} coefficients")]
    LengthMismatch {
        /// Number of consensus indices supplied.
        indices: usize,
        /// Number of hyperplane coefficients supplied.
        coeffs: usize,
    },

    /// A loss weight below zero would flip the objective's sign.
    #[error("negative weight: {0}")]
    NegativeWeight(f64),

    /// The ADMM step size must be strictly positive.
    #[error("invalid step size: {0}")]
    InvalidStepSize(f64),

    /// An implication head that does not appear among the term's variables.
    #[error("head index {0} is not among the term's variables")]
    UnknownHead(usize),

    /// A comparator token outside the closed `leq` / `geq` / `eq` set.
    #[error("unknown comparator: {0:?}")]
    UnknownComparator(String),

    /// Weight update requested on a hard constraint, which carries none.
    #[error("term has no weight to update")]
    UnweightedTerm,
}
