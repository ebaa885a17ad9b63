//! Gradient descent with a pluggable step-size strategy.
//!
//! Each iteration evaluates the gradient at the current point and stops when
//! its norm falls below the tolerance. Otherwise the point moves along the
//! negative gradient by a step chosen by a [`StepRule`]:
//!
//! * [`LipschitzDescent`] uses the curvature bound of the Hessian
//!   ([`LipschitzStep`]).
//! * [`SteepestDescent`] uses exact line search by golden section
//!   ([`GoldenSection`]).
//!
//! The update is never projected. A step that leaves the interior of the
//! domain is an error and the point stays at the last feasible iterate.

use std::marker::PhantomData;

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{convert, RealField};
use thiserror::Error;

use crate::{
    core::{Domain, Gradient, GradientExt, Hessian, Optimizer, Point, Problem, Progress, Recorder},
    line_search::GoldenSection,
    step::{LipschitzStep, StepRule},
};

/// Options for [`GradientDescent`].
#[derive(Debug, Clone, Copy, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct DescentOptions<T: RealField + Copy> {
    /// The method converges when the gradient norm is below this. Default:
    /// `1e-6`.
    gradient_tolerance: T,
}

impl<T: RealField + Copy> Default for DescentOptions<T> {
    fn default() -> Self {
        Self {
            gradient_tolerance: convert(1e-6),
        }
    }
}

/// Error returned from [`GradientDescent`].
#[derive(Debug, Error)]
pub enum DescentError {
    /// The curvature bound is zero, negative or not finite, so the step
    /// length is undefined.
    #[error("curvature bound is degenerate")]
    DegenerateCurvature,
    /// The step left the feasible region.
    #[error("step left the feasible region")]
    InfeasiblePoint,
}

/// Gradient descent. See [module](self) documentation for more details.
pub struct GradientDescent<F: Problem, S> {
    options: DescentOptions<F::Field>,
    rule: S,
    _phantom: PhantomData<F>,
}

/// Gradient descent with the curvature-adaptive fixed step.
pub type LipschitzDescent<F> = GradientDescent<F, LipschitzStep<<F as Problem>::Field>>;

/// Gradient descent with exact line search.
pub type SteepestDescent<F> = GradientDescent<F, GoldenSection<<F as Problem>::Field>>;

impl<F: Problem, S> GradientDescent<F, S> {
    /// Initializes the method with given step strategy and options.
    pub fn with_rule(rule: S, options: DescentOptions<F::Field>) -> Self {
        Self {
            options,
            rule,
            _phantom: PhantomData,
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &DescentOptions<F::Field> {
        &self.options
    }

    /// Gets the step strategy.
    pub fn rule(&self) -> &S {
        &self.rule
    }
}

impl<F: Hessian> GradientDescent<F, LipschitzStep<F::Field>> {
    /// Initializes Lipschitz descent with default options.
    pub fn new(f: &F, dom: &Domain<F::Field>) -> Self {
        Self::with_options(f, dom, DescentOptions::default())
    }

    /// Initializes Lipschitz descent with given options.
    pub fn with_options(_: &F, _: &Domain<F::Field>, options: DescentOptions<F::Field>) -> Self {
        Self::with_rule(LipschitzStep::new(), options)
    }
}

impl<F: Gradient> GradientDescent<F, GoldenSection<F::Field>> {
    /// Initializes steepest descent with default options.
    pub fn new(f: &F, dom: &Domain<F::Field>) -> Self {
        Self::with_options(f, dom, DescentOptions::default())
    }

    /// Initializes steepest descent with given options.
    pub fn with_options(_: &F, _: &Domain<F::Field>, options: DescentOptions<F::Field>) -> Self {
        Self::with_rule(GoldenSection::new(), options)
    }
}

impl<F: Gradient, S: StepRule<F>> Optimizer<F> for GradientDescent<F, S> {
    const NAME: &'static str = S::NAME;
    const DERIVATIVE_FREE: bool = false;

    type Error = DescentError;

    fn init(
        &mut self,
        f: &F,
        _dom: &Domain<F::Field>,
        x: &Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<(), Self::Error> {
        // Trajectory values are bookkeeping, not counted.
        rec.record(x, f.apply(x));
        Ok(())
    }

    fn opt_next(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<Progress, Self::Error> {
        let grad = f.gradient_counted(x, rec.counters_mut());
        let norm = grad.norm();

        if norm < self.options.gradient_tolerance {
            debug!("gradient norm {} below tolerance, converged", norm);
            return Ok(Progress::Converged);
        }

        let step = self.rule.step(f, x, &grad, rec.counters_mut())?;
        let next = *x - grad * step;

        if !dom.is_feasible(&next) {
            debug!(
                "step {} from ({}, {}) lands at infeasible ({}, {})",
                step, x.x, x.y, next.x, next.y
            );
            return Err(DescentError::InfeasiblePoint);
        }

        *x = next;
        let value = f.apply(x);
        rec.record(x, value);

        debug!(
            "step = {},\t|grad| = {},\tx = ({}, {}),\tfx = {}",
            step, norm, x.x, x.y, value
        );

        Ok(Progress::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::{driver::Status, objective::BoxVolume, testing::*, OptimizerDriver};

    const THIRD: f64 = 1.0 / 3.0;

    #[test]
    fn lipschitz_from_interior_point() {
        let f = BoxVolume::new();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([0.7, 0.7])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap();

        assert_eq!(solution.status(), Status::Converged);
        assert_abs_diff_eq!(solution.x().x, THIRD, epsilon = 1e-4);
        assert_abs_diff_eq!(solution.x().y, THIRD, epsilon = 1e-4);
        assert_eq!(solution.objective_calls(), 0);
        assert_eq!(solution.gradient_calls(), Some(solution.steps()));

        // Accepted points are never worse than the previous ones.
        let path = solution.trajectory();
        for pair in path[1..].windows(2) {
            assert!(pair[1].value() <= pair[0].value());
        }
    }

    #[test]
    fn lipschitz_first_step_from_interior_point() {
        let f = BoxVolume::new();
        let mut driver = OptimizerDriver::builder(&f)
            .with_initial([0.7, 0.7])
            .with_algo(LipschitzDescent::new)
            .build();

        assert_eq!(driver.next().unwrap(), Progress::Continue);
        assert_relative_eq!(driver.x().x, 0.459375, max_relative = 1e-12);
        assert_relative_eq!(driver.x().y, 0.459375, max_relative = 1e-12);
    }

    #[test]
    fn lipschitz_leaves_simplex_from_corner() {
        let f = BoxVolume::new();
        let failure = OptimizerDriver::builder(&f)
            .with_initial([1.0, 1.0])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap_err();

        assert!(matches!(failure.error(), DescentError::InfeasiblePoint));
        assert_eq!(failure.trajectory().len(), 1);
        assert_eq!(failure.trajectory()[0].point(), Point::new(1.0, 1.0));
    }

    #[test]
    fn lipschitz_near_boundary() {
        let f = BoxVolume::new();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([0.5, 0.5 - 1e-9])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap();

        assert_eq!(solution.status(), Status::Converged);
        assert_abs_diff_eq!(solution.x().x, THIRD, epsilon = 1e-4);
        assert_abs_diff_eq!(solution.x().y, THIRD, epsilon = 1e-4);
    }

    #[test]
    fn lipschitz_on_zero_curvature() {
        let f = Plane::default();
        let failure = OptimizerDriver::builder(&f)
            .with_initial([0.2, 0.2])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap_err();

        assert!(matches!(failure.error(), DescentError::DegenerateCurvature));
    }

    #[test]
    fn steepest_is_monotone() {
        let f = BoxVolume::new();

        for initial in [[0.1, 0.1], [0.05, 0.9], [0.8, 0.1]] {
            let solution = OptimizerDriver::builder(&f)
                .with_initial(initial)
                .with_algo(SteepestDescent::new)
                .build()
                .run()
                .unwrap();

            let path = solution.trajectory();
            for pair in path.windows(2) {
                assert!(
                    pair[1].value() <= pair[0].value(),
                    "value increased from {:?}: {} -> {}",
                    initial,
                    pair[0].value(),
                    pair[1].value()
                );
            }
        }
    }

    #[test]
    fn steepest_from_corner() {
        let f = BoxVolume::new();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([1.0, 1.0])
            .with_algo(SteepestDescent::new)
            .build()
            .run()
            .unwrap();

        assert_eq!(solution.status(), Status::Converged);
        assert_abs_diff_eq!(solution.x().x, THIRD, epsilon = 1e-4);
        assert_abs_diff_eq!(solution.x().y, THIRD, epsilon = 1e-4);
        assert_relative_eq!(solution.volume(), 1.0 / (6.0 * 6f64.sqrt()), max_relative = 1e-6);
    }

    #[test]
    fn steepest_counts_line_search_probes() {
        let f = BoxVolume::new();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([0.7, 0.7])
            .with_algo(SteepestDescent::new)
            .build()
            .run()
            .unwrap();

        // Every iteration but the converging one runs one line search on
        // the default bracket with the default tolerance. The number of
        // reductions depends only on the bracket width and the tolerance.
        let search = GoldenSection::<f64>::new();
        let probes = 2 + search.minimize(|alpha| alpha).iters();

        let searches = solution.trajectory().len() - 1;
        assert_eq!(solution.objective_calls(), searches * probes);
        assert_eq!(solution.gradient_calls(), Some(solution.steps()));
    }

    #[test]
    fn stationary_seed_converges_immediately() {
        let f = BoxVolume::new();

        for solution in [
            OptimizerDriver::builder(&f)
                .with_initial([0.0, 0.0])
                .with_algo(LipschitzDescent::new)
                .build()
                .run()
                .unwrap(),
            OptimizerDriver::builder(&f)
                .with_initial([0.0, 0.0])
                .with_algo(SteepestDescent::new)
                .build()
                .run()
                .unwrap(),
        ] {
            assert_eq!(solution.status(), Status::Converged);
            assert_eq!(solution.steps(), 1);
            assert_eq!(solution.gradient_calls(), Some(1));
            assert_eq!(solution.objective_calls(), 0);
            assert_eq!(solution.trajectory().len(), 1);
            assert_eq!(solution.x(), Point::new(0.0, 0.0));
        }
    }

    #[test]
    fn steepest_on_sphere() {
        let f = Sphere::default();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([0.9, 0.1])
            .with_algo(SteepestDescent::new)
            .build()
            .run()
            .unwrap();

        assert!(f.is_optimum(&solution.x(), 1e-6));
    }
}
