//! The box volume problem.
//!
//! An open box is cut from a unit sheet and is inscribed under the
//! constraint surface `x1 + x2 + x3 = 1`, where `x1`, `x2` and `x3` are
//! fractions of the box edges. Its volume is maximized by minimizing
//!
//! ```text
//! f(x1, x2) = -(x1 * x2 * (1 - x1 - x2)) / 8
//! ```
//!
//! over the open simplex. The analytic optimum is `x1 = x2 = 1/3`.

use nalgebra::{convert, Matrix2, RealField, Vector2};

use crate::core::{Domain, Function, Gradient, Hessian, Point, Problem};

/// Objective of the box volume problem together with its analytic
/// derivatives.
///
/// No bounds checking is performed on evaluation. Callers are responsible
/// for feasibility, see [`Domain`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxVolume;

impl BoxVolume {
    /// Creates the problem.
    pub fn new() -> Self {
        Self
    }
}

impl Problem for BoxVolume {
    type Field = f64;

    fn domain(&self) -> Domain<Self::Field> {
        Domain::simplex()
    }
}

impl Function for BoxVolume {
    fn apply(&self, x: &Point<f64>) -> f64 {
        let x3 = Domain::remainder(x);
        -(x.x * x.y * x3) / 8.0
    }
}

impl Gradient for BoxVolume {
    fn gradient(&self, x: &Point<f64>) -> Vector2<f64> {
        let (x1, x2) = (x.x, x.y);
        Vector2::new(
            -(x2 * (1.0 - 2.0 * x1 - x2)) / 8.0,
            -(x1 * (1.0 - x1 - 2.0 * x2)) / 8.0,
        )
    }
}

impl Hessian for BoxVolume {
    fn hessian(&self, x: &Point<f64>) -> Matrix2<f64> {
        let (x1, x2) = (x.x, x.y);
        let a = 0.25 * x2;
        let b = -0.125 * (1.0 - 2.0 * x1 - 2.0 * x2);
        let c = 0.25 * x1;
        Matrix2::new(a, b, b, c)
    }
}

/// Geometric volume of the box `sqrt(x1 * x2 * x3 / 8)`.
///
/// This is a quantity derived from the point, not the negated objective.
/// It is NaN for points with negative product, that is, outside the closed
/// simplex.
pub fn box_volume<T: RealField + Copy>(x: &Point<T>) -> T {
    let eight: T = convert(8.0);
    (x.x * x.y * (T::one() - x.x - x.y) / eight).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const THIRD: f64 = 1.0 / 3.0;

    #[test]
    fn value_at_optimum() {
        let f = BoxVolume::new();
        assert_relative_eq!(f.apply(&Point::new(THIRD, THIRD)), -1.0 / 216.0);
    }

    #[test]
    fn evaluation_is_pure() {
        let f = BoxVolume::new();
        let x = Point::new(0.123, 0.456);

        assert_eq!(f.apply(&x).to_bits(), f.apply(&x).to_bits());

        let g1 = f.gradient(&x);
        let g2 = f.gradient(&x);
        assert_eq!(g1.x.to_bits(), g2.x.to_bits());
        assert_eq!(g1.y.to_bits(), g2.y.to_bits());
    }

    #[test]
    fn gradient_vanishes_at_optimum_and_origin() {
        let f = BoxVolume::new();

        let grad = f.gradient(&Point::new(THIRD, THIRD));
        assert_abs_diff_eq!(grad.norm(), 0.0, epsilon = 1e-15);
        assert_eq!(f.gradient(&Point::new(0.0, 0.0)), Vector2::zeros());
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let f = BoxVolume::new();
        let h = 1e-6;

        for &(x1, x2) in &[(0.2, 0.3), (0.7, 0.7), (0.05, 0.9), (1.0, 1.0)] {
            let x = Point::new(x1, x2);
            let grad = f.gradient(&x);

            let d1 = (f.apply(&Point::new(x1 + h, x2)) - f.apply(&Point::new(x1 - h, x2)))
                / (2.0 * h);
            let d2 = (f.apply(&Point::new(x1, x2 + h)) - f.apply(&Point::new(x1, x2 - h)))
                / (2.0 * h);

            assert_abs_diff_eq!(grad.x, d1, epsilon = 1e-8);
            assert_abs_diff_eq!(grad.y, d2, epsilon = 1e-8);
        }
    }

    #[test]
    fn hessian_matches_finite_differences_of_gradient() {
        let f = BoxVolume::new();
        let h = 1e-6;
        let x = Point::new(0.2, 0.45);
        let hess = f.hessian(&x);

        let col1 = (f.gradient(&Point::new(x.x + h, x.y))
            - f.gradient(&Point::new(x.x - h, x.y)))
            / (2.0 * h);
        let col2 = (f.gradient(&Point::new(x.x, x.y + h))
            - f.gradient(&Point::new(x.x, x.y - h)))
            / (2.0 * h);

        assert_abs_diff_eq!(hess[(0, 0)], col1.x, epsilon = 1e-8);
        assert_abs_diff_eq!(hess[(1, 0)], col1.y, epsilon = 1e-8);
        assert_abs_diff_eq!(hess[(0, 1)], col2.x, epsilon = 1e-8);
        assert_abs_diff_eq!(hess[(1, 1)], col2.y, epsilon = 1e-8);
    }

    #[test]
    fn volume_is_not_negated_objective() {
        let x = Point::new(THIRD, THIRD);

        let expected = 1.0 / (6.0 * 6f64.sqrt());
        assert_relative_eq!(box_volume(&x), expected, max_relative = 1e-12);
        assert_relative_eq!(box_volume(&Point::new(0.0, 0.0)), 0.0);
        assert!(box_volume(&Point::new(0.7f64, 0.7)).is_nan());
    }
}
