//! Exact Euclidean projection onto an affine hyperplane.
//!
//! A term's feasible or active boundary is always the hyperplane
//! `c . x = k` over the term's local variables. Projection onto it is the
//! innermost operation of every constraint and hinge solve, so each arity
//! gets its own closed form instead of a general least-squares pass:
//!
//! - one variable: the plane is the single point `k / c[0]`,
//! - two variables: eliminate `x[1]`, minimize over `x[0]`, substitute back,
//! - three or more: cache the unit normal once and subtract the signed
//!   distance along it.
//!
//! All three produce the nearest point of the plane in the Euclidean norm;
//! they differ only in how much work construction can pay for up front.

use serde::{Deserialize, Serialize};

use crate::error::{ProxError, Result};

/// Per-arity projection strategy, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Projection {
    /// One variable: the plane degenerates to a point.
    Scalar,
    /// Two variables: variable elimination and back-substitution.
    Planar,
    /// Three or more variables: cached unit normal and scaled constant.
    General { unit: Vec<f64>, offset: f64 },
}

/// An affine hyperplane `c . x = k` with a precomputed projection strategy.
///
/// Coefficients must all be nonzero: every closed form here divides by a
/// coefficient or by the norm, and a zero coefficient means the named
/// variable is not actually part of the plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperplane {
    coeffs: Vec<f64>,
    constant: f64,
    norm_sq: f64,
    projection: Projection,
}

impl Hyperplane {
    /// Builds the hyperplane `coeffs . x = constant`.
    ///
    /// For three or more variables this caches the unit normal
    /// `u = c / ||c||` and the scaled constant `k / ||c||` so that each
    /// projection costs two passes over the coefficients and no square
    /// roots.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::EmptyTerm`] if `coeffs` is empty and
    /// [`ProxError::ZeroCoefficient`] if any coefficient is zero.
    pub fn new(coeffs: Vec<f64>, constant: f64) -> Result<Self> {
        if coeffs.is_empty() {
            return Err(ProxError::EmptyTerm);
        }
        if let Some(position) = coeffs.iter().position(|&c| c == 0.0) {
            return Err(ProxError::ZeroCoefficient(position));
        }

        let norm_sq: f64 = coeffs.iter().map(|c| c * c).sum();
        let projection = match coeffs.len() {
            1 => Projection::Scalar,
            2 => Projection::Planar,
            _ => {
                let norm = norm_sq.sqrt();
                Projection::General {
                    unit: coeffs.iter().map(|c| c / norm).collect(),
                    offset: constant / norm,
                }
            }
        };

        Ok(Self {
            coeffs,
            constant,
            norm_sq,
            projection,
        })
    }

    /// Returns the number of variables on the plane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Returns whether the plane has no variables. Always false for a
    /// constructed plane; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns the coefficient vector `c`.
    #[must_use]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Returns the coefficient for local slot `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn coeff(&self, i: usize) -> f64 {
        self.coeffs[i]
    }

    /// Returns the constant `k`.
    #[must_use]
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Returns the squared coefficient norm `||c||^2`.
    #[must_use]
    pub fn norm_sq(&self) -> f64 {
        self.norm_sq
    }

    /// Computes the inner product `c . x`.
    ///
    /// # Panics
    ///
    /// Panics if `x` has a different length than the coefficient vector.
    #[must_use]
    pub fn dot(&self, x: &[f64]) -> f64 {
        assert_eq!(x.len(), self.coeffs.len(), "point and plane arity differ");
        self.coeffs.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }

    /// Replaces `x` with its nearest point on the plane.
    ///
    /// # Formula
    ///
    /// The general case subtracts the signed distance along the unit
    /// normal:
    ///
    /// ```text
    /// proj(x) = x - (u . x - k / ||c||) * u,    u = c / ||c||
    /// ```
    ///
    /// The one- and two-variable cases reach the same point through direct
    /// algebra. For one variable the plane is the point `k / c[0]`. For two
    /// variables, substituting `x[1] = (k - c[0] * x[0]) / c[1]` into the
    /// squared distance and minimizing over `x[0]` gives
    ///
    /// ```text
    /// x[0] = (p[0] - r * (p[1] - k / c[1])) / (1 + r^2),    r = c[0] / c[1]
    /// ```
    ///
    /// with `x[1]` recovered by back-substitution.
    ///
    /// # Panics
    ///
    /// Panics if `x` has a different length than the coefficient vector.
    pub fn project(&self, x: &mut [f64]) {
        assert_eq!(x.len(), self.coeffs.len(), "point and plane arity differ");
        match &self.projection {
            Projection::Scalar => {
                x[0] = self.constant / self.coeffs[0];
            }
            Projection::Planar => {
                let ratio = self.coeffs[0] / self.coeffs[1];
                let x0 = (x[0] - ratio * (x[1] - self.constant / self.coeffs[1]))
                    / (1.0 + ratio * ratio);
                x[0] = x0;
                x[1] = (self.constant - self.coeffs[0] * x0) / self.coeffs[1];
            }
            Projection::General { unit, offset } => {
                let distance: f64 =
                    unit.iter().zip(x.iter()).map(|(u, xi)| u * xi).sum::<f64>() - offset;
                for (xi, u) in x.iter_mut().zip(unit) {
                    *xi -= distance * u;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_rejects_empty_coefficients() {
        assert!(matches!(
            Hyperplane::new(vec![], 1.0),
            Err(ProxError::EmptyTerm)
        ));
    }

    #[test]
    fn test_rejects_zero_coefficient() {
        assert!(matches!(
            Hyperplane::new(vec![1.0, 0.0, 2.0], 1.0),
            Err(ProxError::ZeroCoefficient(1))
        ));
    }

    #[test]
    fn test_scalar_projection_ignores_input() {
        let plane = Hyperplane::new(vec![2.0], 6.0).unwrap();
        let mut x = [100.0];
        plane.project(&mut x);
        assert_relative_eq!(x[0], 3.0);
        x[0] = -7.5;
        plane.project(&mut x);
        assert_relative_eq!(x[0], 3.0);
    }

    #[test]
    fn test_planar_projection_symmetric() {
        let plane = Hyperplane::new(vec![1.0, 1.0], 10.0).unwrap();
        let mut x = [8.0, 8.0];
        plane.project(&mut x);
        assert_relative_eq!(x[0], 5.0);
        assert_relative_eq!(x[1], 5.0);
    }

    #[test]
    fn test_planar_projection_matches_normal_form() {
        // proj(p) = p - ((c.p - k) / ||c||^2) c, computed by hand:
        // c = (2, -1), k = 3, p = (1, 1) gives (1.8, 0.6).
        let plane = Hyperplane::new(vec![2.0, -1.0], 3.0).unwrap();
        let mut x = [1.0, 1.0];
        plane.project(&mut x);
        assert_relative_eq!(x[0], 1.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 0.6, epsilon = 1e-12);
        assert_relative_eq!(plane.dot(&x), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_general_projection_on_plane() {
        let plane = Hyperplane::new(vec![1.0, 1.0, 1.0], 1.0).unwrap();
        let mut x = [0.9, 0.8, 0.9];
        plane.project(&mut x);
        assert_relative_eq!(plane.dot(&x), 1.0, epsilon = 1e-12);
        // Uniform coefficients shift every slot by the same amount.
        assert_relative_eq!(x[0], x[2], epsilon = 1e-12);
        assert_relative_eq!(x[0] - x[1], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_projection_idempotent() {
        let plane = Hyperplane::new(vec![0.5, -2.0, 1.0, 3.0], 2.5).unwrap();
        let mut x = [1.0, -1.0, 2.0, 0.0];
        plane.project(&mut x);
        let first = x;
        plane.project(&mut x);
        for (a, b) in first.iter().zip(&x) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dot_product() {
        let plane = Hyperplane::new(vec![1.0, 2.0, 3.0], 0.0).unwrap();
        assert_relative_eq!(plane.dot(&[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_norm_sq() {
        let plane = Hyperplane::new(vec![3.0, 4.0], 0.0).unwrap();
        assert_relative_eq!(plane.norm_sq(), 25.0);
    }
}
