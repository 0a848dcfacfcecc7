//! Closed-form minimizer for weighted squared hyperplane losses.
//!
//! Squared potentials never need a feasibility fallback: the loss
//! `w * (c . x - k)^2` plus the proximal penalty is a strictly convex
//! quadratic with one stationary point, reachable as a rank-one shift of
//! the proximal point.

use crate::geometry::Hyperplane;

/// Replaces the proximal point in `x` with the minimizer of
/// `w * (c . x - k)^2 + (rho / 2) * ||x - p||^2`.
///
/// `x` must hold the proximal point `p` on entry.
///
/// # Algorithm
///
/// Setting the gradient to zero shows the minimizer lies on the line
/// through `p` along `c`:
///
/// ```text
/// 2w (c . x - k) c + rho (x - p) = 0
///   => x = p - beta c
///   => beta = w (c . p - k) / (w ||c||^2 + rho / 2)
/// ```
///
/// where `beta` follows from taking the inner product of the first line
/// with `c` and solving the resulting scalar equation. As `w` grows the
/// shift approaches `(c . p - k) / ||c||^2`, the exact projection onto the
/// plane, which is why hard constraints and infinite weights agree in the
/// limit.
///
/// # Panics
///
/// Panics if `x` has a different length than the plane's coefficient
/// vector.
pub fn minimize_weighted(plane: &Hyperplane, weight: f64, step_size: f64, x: &mut [f64]) {
    let beta = weight * (plane.dot(x) - plane.constant())
        / (weight * plane.norm_sq() + step_size / 2.0);
    for (xi, c) in x.iter_mut().zip(plane.coeffs()) {
        *xi -= beta * c;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_single_variable_solve() {
        // w = 1, c = [1], k = 0, rho = 2, p = 4:
        // beta = (4 - 0) / (1 + 1) = 2, so x = 2.
        let plane = Hyperplane::new(vec![1.0], 0.0).unwrap();
        let mut x = [4.0];
        minimize_weighted(&plane, 1.0, 2.0, &mut x);
        assert_relative_eq!(x[0], 2.0);
    }

    #[test]
    fn test_stationarity() {
        let plane = Hyperplane::new(vec![1.0, 2.0, -1.0], 1.0).unwrap();
        let weight = 0.7;
        let step_size = 0.9;
        let p = [0.3, -0.2, 0.5];
        let mut x = p;
        minimize_weighted(&plane, weight, step_size, &mut x);

        let residual = plane.dot(&x) - plane.constant();
        for i in 0..3 {
            let gradient = 2.0 * weight * residual * plane.coeff(i) + step_size * (x[i] - p[i]);
            assert_relative_eq!(gradient, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_weight_identity() {
        let plane = Hyperplane::new(vec![2.0, 3.0], 5.0).unwrap();
        let mut x = [1.0, -1.0];
        minimize_weighted(&plane, 0.0, 1.0, &mut x);
        assert_relative_eq!(x[0], 1.0);
        assert_relative_eq!(x[1], -1.0);
    }

    #[test]
    fn test_large_weight_approaches_projection() {
        let plane = Hyperplane::new(vec![1.0, -2.0, 4.0], 3.0).unwrap();
        let p = [0.5, 0.5, 0.5];

        let mut soft = p;
        minimize_weighted(&plane, 1e9, 1.0, &mut soft);

        let mut hard = p;
        plane.project(&mut hard);

        for (s, h) in soft.iter().zip(&hard) {
            assert_relative_eq!(s, h, epsilon = 1e-6);
        }
    }
}
