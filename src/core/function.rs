use getset::CopyGetters;
use nalgebra::{Matrix2, Vector2};

use super::base::{Point, Problem};

/// The trait for defining functions.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`] and [`Problem`] traits.
/// There is one required associated type (the scalar type) and one required
/// method: [`apply`](Function::apply).
///
/// ```rust
/// use boxopt::{Function, Point, Problem};
///
/// // A problem is represented by a type.
/// struct Paraboloid {
///     a: f64,
///     b: f64,
/// }
///
/// impl Problem for Paraboloid {
///     // The numeric type. Usually f64.
///     type Field = f64;
/// }
///
/// impl Function for Paraboloid {
///     // Apply trial values of variables to the function.
///     fn apply(&self, x: &Point<Self::Field>) -> Self::Field {
///         (x.x - self.a).powi(2) + (x.y - self.b).powi(2)
///     }
/// }
/// ```
pub trait Function: Problem {
    /// Calculate the function value given values of the variables.
    fn apply(&self, x: &Point<Self::Field>) -> Self::Field;
}

/// Functions with an analytic gradient.
pub trait Gradient: Function {
    /// Calculate the vector of partial derivatives `(df/dx1, df/dx2)`.
    fn gradient(&self, x: &Point<Self::Field>) -> Vector2<Self::Field>;
}

/// Functions with an analytic Hessian matrix.
///
/// The matrix is expected to be symmetric.
pub trait Hessian: Gradient {
    /// Calculate the matrix of second partial derivatives.
    fn hessian(&self, x: &Point<Self::Field>) -> Matrix2<Self::Field>;
}

/// Number of evaluations performed by a method, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Counters {
    /// Number of objective function evaluations.
    objective: usize,
    /// Number of gradient evaluations.
    gradient: usize,
}

impl Counters {
    /// Initializes the counters with zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of evaluations of any kind.
    pub fn total(&self) -> usize {
        self.objective + self.gradient
    }
}

/// Some extensions methods for the [`Function`] that may be found useful.
pub trait FunctionExt: Function {
    /// Calculate the function value and count the evaluation.
    fn apply_counted(&self, x: &Point<Self::Field>, counters: &mut Counters) -> Self::Field;
}

impl<F: Function> FunctionExt for F {
    fn apply_counted(&self, x: &Point<Self::Field>, counters: &mut Counters) -> Self::Field {
        counters.objective += 1;
        self.apply(x)
    }
}

/// Some extensions methods for the [`Gradient`] that may be found useful.
pub trait GradientExt: Gradient {
    /// Calculate the gradient and count the evaluation.
    fn gradient_counted(
        &self,
        x: &Point<Self::Field>,
        counters: &mut Counters,
    ) -> Vector2<Self::Field>;
}

impl<F: Gradient> GradientExt for F {
    fn gradient_counted(
        &self,
        x: &Point<Self::Field>,
        counters: &mut Counters,
    ) -> Vector2<Self::Field> {
        counters.gradient += 1;
        self.gradient(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::Sphere;

    #[test]
    fn evaluations_are_counted() {
        let f = Sphere::default();
        let x = Point::new(0.5, 0.5);
        let mut counters = Counters::new();

        f.apply_counted(&x, &mut counters);
        f.apply_counted(&x, &mut counters);
        f.gradient_counted(&x, &mut counters);

        assert_eq!(counters.objective(), 2);
        assert_eq!(counters.gradient(), 1);
        assert_eq!(counters.total(), 3);
    }
}
