//! Step-size strategies for gradient-based methods.
//!
//! * [`LipschitzStep`] -- Closed-form step `1 / lambda` where `lambda` is the
//!   largest eigenvalue of the local Hessian. It is recomputed in every
//!   iteration and applied without any further evaluation.
//! * [`GoldenSection`] -- Exact line search along the negative gradient by
//!   [golden section search](crate::line_search).

use getset::{CopyGetters, Setters};
use log::trace;
use nalgebra::{convert, ComplexField, RealField, Vector2};
use num_traits::One;

use crate::{
    algo::descent::DescentError,
    core::{Counters, FunctionExt, Gradient, Hessian, Point},
    line_search::GoldenSection,
};

/// Strategy for choosing the length of a step along the negative gradient.
pub trait StepRule<F: Gradient> {
    /// Name of the method using this strategy.
    const NAME: &'static str;

    /// Computes the step length for the update `x - step * grad`.
    ///
    /// Every objective evaluation the strategy needs must be counted in
    /// `counters`.
    fn step(
        &mut self,
        f: &F,
        x: &Point<F::Field>,
        grad: &Vector2<F::Field>,
        counters: &mut Counters,
    ) -> Result<F::Field, DescentError>;
}

/// Options for [`LipschitzStep`].
#[derive(Debug, Clone, Copy, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct LipschitzOptions<T: RealField + Copy> {
    /// The curvature bound must be larger than this, otherwise the step is
    /// considered undefined. Default: `1e-12`.
    min_curvature: T,
}

impl<T: RealField + Copy> Default for LipschitzOptions<T> {
    fn default() -> Self {
        Self {
            min_curvature: convert(1e-12),
        }
    }
}

/// Curvature-adaptive fixed step. See [module](self) documentation for more
/// details.
#[derive(Debug, Clone)]
pub struct LipschitzStep<T: RealField + Copy> {
    options: LipschitzOptions<T>,
}

impl<T: RealField + Copy> LipschitzStep<T> {
    /// Initializes the strategy with default options.
    pub fn new() -> Self {
        Self::with_options(LipschitzOptions::default())
    }

    /// Initializes the strategy with given options.
    pub fn with_options(options: LipschitzOptions<T>) -> Self {
        Self { options }
    }

    /// Gets the options.
    pub fn options(&self) -> &LipschitzOptions<T> {
        &self.options
    }
}

impl<T: RealField + Copy> Default for LipschitzStep<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest eigenvalue of the symmetric matrix `[[a, b], [b, c]]`.
pub fn max_eigenvalue<T: RealField + Copy>(a: T, b: T, c: T) -> T {
    let two: T = convert(2.0);
    let four: T = convert(4.0);
    (a + c + ((a - c) * (a - c) + four * b * b).sqrt()) / two
}

impl<F: Hessian> StepRule<F> for LipschitzStep<F::Field> {
    const NAME: &'static str = "GradientLipschitz";

    fn step(
        &mut self,
        f: &F,
        x: &Point<F::Field>,
        _grad: &Vector2<F::Field>,
        _counters: &mut Counters,
    ) -> Result<F::Field, DescentError> {
        let hess = f.hessian(x);
        let lambda = max_eigenvalue(hess[(0, 0)], hess[(0, 1)], hess[(1, 1)]);

        if !lambda.is_finite() || lambda <= self.options.min_curvature {
            return Err(DescentError::DegenerateCurvature);
        }

        let gamma = F::Field::one() / lambda;
        trace!("lipschitz step: lambda = {}, gamma = {}", lambda, gamma);

        Ok(gamma)
    }
}

impl<F: Gradient> StepRule<F> for GoldenSection<F::Field> {
    const NAME: &'static str = "SteepestDescent";

    fn step(
        &mut self,
        f: &F,
        x: &Point<F::Field>,
        grad: &Vector2<F::Field>,
        counters: &mut Counters,
    ) -> Result<F::Field, DescentError> {
        let min = self.minimize(|alpha| f.apply_counted(&(x - grad * alpha), counters));
        Ok(min.alpha())
    }
}
