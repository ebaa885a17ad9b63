use nalgebra::{RealField, Vector2};

use super::domain::Domain;

/// A point of the search space.
///
/// Only the two free variables are stored. The third one is implied by the
/// constraint `x1 + x2 + x3 = 1` and is always recomputed with
/// [`Domain::remainder`].
pub type Point<T> = Vector2<T>;

/// The base trait for [`Function`](super::function::Function) and its
/// derivative extensions.
pub trait Problem {
    /// Type of the scalar, usually f64.
    type Field: RealField + Copy;

    /// Get the domain (feasible region) of the problem. If not overridden,
    /// the problem is unconstrained.
    fn domain(&self) -> Domain<Self::Field> {
        Domain::unconstrained()
    }
}
