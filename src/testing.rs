//! Testing functions and utilities useful for benchmarking, debugging and
//! smoke testing.
//!
//! [`Sphere`] is recommended for first tests. [`Plane`] has zero curvature
//! everywhere and can be used for checking degenerate conditions of
//! curvature-based methods.
//!
//! # References
//!
//! \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
//! Problems](https://arxiv.org/abs/1308.4008)

#![allow(unused)]

use nalgebra::{Matrix2, Vector2};

use crate::{
    core::{Domain, Function, Gradient, Hessian, Point, Problem},
    objective::BoxVolume,
};

/// Extension of the [`Function`] trait that provides additional information
/// that is useful for testing optimizers.
pub trait TestFunction: Function {
    /// Standard initial values for the problem. Using the same initial values
    /// is essential for fair comparison of methods.
    fn initials(&self) -> Vec<Point<Self::Field>>;

    /// A set of global optima (if known and finite). This is mostly just for
    /// information, for example to know how close an optimizer got even if it
    /// failed. For testing if a given point is global optimum,
    /// [`TestFunction::is_optimum`] should be used.
    fn optima(&self) -> Vec<Point<Self::Field>> {
        Vec::new()
    }

    /// Test if given point is a global optimum of the function, given the
    /// tolerance `eps`.
    fn is_optimum(&self, x: &Point<Self::Field>, eps: Self::Field) -> bool;
}

/// [Sphere
/// function](https://en.wikipedia.org/wiki/Test_functions_for_optimization)
/// \[1\] shifted to a given center.
///
/// This is a simple paraboloid which can be used in early development and
/// sanity checking as it can be considered a trivial problem.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point<f64>,
}

impl Sphere {
    /// Initializes the function centered at the origin.
    pub fn new() -> Self {
        Self::with_center(0.0, 0.0)
    }

    /// Initializes the function centered at `(x1, x2)`.
    pub fn with_center(x1: f64, x2: f64) -> Self {
        Self {
            center: Point::new(x1, x2),
        }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new()
    }
}

impl Problem for Sphere {
    type Field = f64;
}

impl Function for Sphere {
    fn apply(&self, x: &Point<f64>) -> f64 {
        (x - self.center).norm_squared()
    }
}

impl Gradient for Sphere {
    fn gradient(&self, x: &Point<f64>) -> Vector2<f64> {
        (x - self.center) * 2.0
    }
}

impl Hessian for Sphere {
    fn hessian(&self, _: &Point<f64>) -> Matrix2<f64> {
        Matrix2::identity() * 2.0
    }
}

impl TestFunction for Sphere {
    fn initials(&self) -> Vec<Point<f64>> {
        vec![Point::new(10.0, -10.0), Point::new(0.9, 0.1)]
    }

    fn optima(&self) -> Vec<Point<f64>> {
        vec![self.center]
    }

    fn is_optimum(&self, x: &Point<f64>, eps: f64) -> bool {
        (x - self.center).norm() <= eps
    }
}

/// Linear function `a1 * x1 + a2 * x2`.
///
/// It has no minimum and its Hessian is zero everywhere.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    slope: Vector2<f64>,
}

impl Plane {
    /// Initializes the function with given slopes.
    pub fn new(a1: f64, a2: f64) -> Self {
        Self {
            slope: Vector2::new(a1, a2),
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Problem for Plane {
    type Field = f64;
}

impl Function for Plane {
    fn apply(&self, x: &Point<f64>) -> f64 {
        self.slope.dot(x)
    }
}

impl Gradient for Plane {
    fn gradient(&self, _: &Point<f64>) -> Vector2<f64> {
        self.slope
    }
}

impl Hessian for Plane {
    fn hessian(&self, _: &Point<f64>) -> Matrix2<f64> {
        Matrix2::zeros()
    }
}

impl TestFunction for BoxVolume {
    fn initials(&self) -> Vec<Point<f64>> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.7, 0.7),
        ]
    }

    fn optima(&self) -> Vec<Point<f64>> {
        vec![Point::new(1.0 / 3.0, 1.0 / 3.0)]
    }

    fn is_optimum(&self, x: &Point<f64>, eps: f64) -> bool {
        self.optima().iter().any(|optimum| (x - optimum).norm() <= eps)
    }
}
