//! Batch runs of every method from every initial point.
//!
//! The [`Runner`] runs each (seed, method) pair independently with a fresh
//! optimizer and fresh counters. A failed run is logged and kept in the
//! results together with its partial trajectory, and the batch continues with
//! the next pair.
//!
//! ```rust
//! use boxopt::{objective::BoxVolume, runner::{standard_seeds, Runner}};
//!
//! let f = BoxVolume::new();
//! let runs = Runner::new(&f).run_all(&standard_seeds());
//!
//! assert_eq!(runs.len(), 9);
//! ```

use std::fmt;

use log::{info, warn};
use nalgebra::RealField;
use thiserror::Error;

use crate::{
    algo::{self, descent::DescentError, nelder_mead::NelderMeadError, NelderMead},
    core::{Domain, Hessian, Optimizer, Point, Trajectory},
    driver::{Failure, OptimizerDriver, Solution, DEFAULT_MAX_STEPS},
};

/// Available optimization methods, in the order they are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Gradient descent with the curvature-adaptive step, see
    /// [`LipschitzDescent`](algo::LipschitzDescent).
    GradientLipschitz,
    /// Gradient descent with exact line search, see
    /// [`SteepestDescent`](algo::SteepestDescent).
    SteepestDescent,
    /// Constrained simplex method, see [`NelderMead`].
    DeformedSimplex,
}

impl Method {
    /// All methods in the order they are run.
    pub const ALL: [Method; 3] = [
        Method::GradientLipschitz,
        Method::SteepestDescent,
        Method::DeformedSimplex,
    ];

    /// Name of the method as used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Method::GradientLipschitz => "GradientLipschitz",
            Method::SteepestDescent => "SteepestDescent",
            Method::DeformedSimplex => "DeformedSimplex",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named initial point.
#[derive(Debug, Clone, PartialEq)]
pub struct Seed<T: RealField + Copy> {
    name: String,
    x: Point<T>,
}

impl<T: RealField + Copy> Seed<T> {
    /// Creates the seed.
    pub fn new(name: impl Into<String>, x1: T, x2: T) -> Self {
        Self {
            name: name.into(),
            x: Point::new(x1, x2),
        }
    }

    /// Name of the seed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The initial point.
    pub fn x(&self) -> Point<T> {
        self.x
    }
}

/// The corner `X0 = (0, 0)`, the infeasible corner `X1 = (1, 1)` and the
/// infeasible interior-ish point `Xm = (0.7, 0.7)`.
pub fn standard_seeds() -> Vec<Seed<f64>> {
    vec![
        Seed::new("X0", 0.0, 0.0),
        Seed::new("X1", 1.0, 1.0),
        Seed::new("Xm", 0.7, 0.7),
    ]
}

/// Error of any of the methods.
#[derive(Debug, Error)]
pub enum RunError {
    /// Error of a gradient method.
    #[error(transparent)]
    Descent(#[from] DescentError),
    /// Error of the simplex method.
    #[error(transparent)]
    NelderMead(#[from] NelderMeadError),
}

/// Outcome of a single (seed, method) pair.
#[derive(Debug)]
pub struct Run<T: RealField + Copy> {
    method: Method,
    seed: Seed<T>,
    outcome: Result<Solution<T>, Failure<T, RunError>>,
}

impl<T: RealField + Copy> Run<T> {
    /// The method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The initial point.
    pub fn seed(&self) -> &Seed<T> {
        &self.seed
    }

    /// The solution, or the error with partial trajectory.
    pub fn outcome(&self) -> &Result<Solution<T>, Failure<T, RunError>> {
        &self.outcome
    }

    /// The solution if the run succeeded.
    pub fn solution(&self) -> Option<&Solution<T>> {
        self.outcome.as_ref().ok()
    }

    /// Recorded trajectory, complete or partial.
    pub fn trajectory(&self) -> &Trajectory<T> {
        match &self.outcome {
            Ok(solution) => solution.trajectory(),
            Err(failure) => failure.trajectory(),
        }
    }
}

/// Runs methods from initial points on a function.
pub struct Runner<'a, F> {
    f: &'a F,
    max_steps: usize,
}

impl<'a, F: Hessian> Runner<'a, F> {
    /// Initializes the runner with the default cap on the number of
    /// iterations.
    pub fn new(f: &'a F) -> Self {
        Self {
            f,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Sets the cap on the number of iterations of every run.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs single method from single initial point.
    pub fn run(&self, method: Method, seed: &Seed<F::Field>) -> Run<F::Field> {
        let outcome = match method {
            Method::GradientLipschitz => self.drive(algo::LipschitzDescent::new, seed),
            Method::SteepestDescent => self.drive(algo::SteepestDescent::new, seed),
            Method::DeformedSimplex => self.drive(NelderMead::new, seed),
        };

        match &outcome {
            Ok(solution) => info!(
                "{} from {}: x = ({}, {}), volume = {}, {:?} after {} steps",
                method,
                seed.name(),
                solution.x().x,
                solution.x().y,
                solution.volume(),
                solution.status(),
                solution.steps()
            ),
            Err(failure) => warn!(
                "{} from {} failed: {} ({} points recorded)",
                method,
                seed.name(),
                failure.error(),
                failure.trajectory().len()
            ),
        }

        Run {
            method,
            seed: seed.clone(),
            outcome,
        }
    }

    /// Runs all methods from all initial points. Initial points are iterated
    /// in the outer loop, methods in the inner loop.
    pub fn run_all(&self, seeds: &[Seed<F::Field>]) -> Vec<Run<F::Field>> {
        seeds
            .iter()
            .flat_map(|seed| Method::ALL.into_iter().map(move |method| (method, seed)))
            .map(|(method, seed)| self.run(method, seed))
            .collect()
    }

    fn drive<A, FA>(
        &self,
        factory: FA,
        seed: &Seed<F::Field>,
    ) -> Result<Solution<F::Field>, Failure<F::Field, RunError>>
    where
        A: Optimizer<F>,
        A::Error: Into<RunError>,
        FA: FnOnce(&F, &Domain<F::Field>) -> A,
    {
        let x = seed.x();

        OptimizerDriver::builder(self.f)
            .with_initial([x.x, x.y])
            .with_algo(factory)
            .with_max_steps(self.max_steps)
            .build()
            .run()
            .map_err(|failure| failure.map_error(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    use crate::{driver::Status, objective::BoxVolume};

    const THIRD: f64 = 1.0 / 3.0;

    #[test]
    fn method_names_match_optimizers() {
        let f = BoxVolume::new();

        let lipschitz = OptimizerDriver::builder(&f)
            .with_algo(algo::LipschitzDescent::new)
            .build();
        let steepest = OptimizerDriver::builder(&f)
            .with_algo(algo::SteepestDescent::new)
            .build();
        let simplex = OptimizerDriver::new(&f);

        assert_eq!(lipschitz.name(), Method::GradientLipschitz.name());
        assert_eq!(steepest.name(), Method::SteepestDescent.name());
        assert_eq!(simplex.name(), Method::DeformedSimplex.name());
    }

    #[test]
    fn all_pairs_in_order() {
        let f = BoxVolume::new();
        let runs = Runner::new(&f).run_all(&standard_seeds());

        let pairs = runs
            .iter()
            .map(|run| (run.seed().name().to_string(), run.method()))
            .collect::<Vec<_>>();

        let expected = ["X0", "X1", "Xm"]
            .iter()
            .flat_map(|name| Method::ALL.into_iter().map(move |m| (name.to_string(), m)))
            .collect::<Vec<_>>();

        assert_eq!(pairs, expected);
    }

    #[test]
    fn failure_does_not_abort_batch() {
        let f = BoxVolume::new();
        let runs = Runner::new(&f).run_all(&standard_seeds());

        let failed = runs
            .iter()
            .filter(|run| run.outcome().is_err())
            .collect::<Vec<_>>();

        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].method(), Method::GradientLipschitz);
        assert_eq!(failed[0].seed().name(), "X1");
        assert!(matches!(
            failed[0].outcome(),
            Err(failure) if matches!(failure.error(), RunError::Descent(DescentError::InfeasiblePoint))
        ));
        assert_eq!(failed[0].trajectory().len(), 1);
    }

    #[test]
    fn all_methods_from_interior_point() {
        let f = BoxVolume::new();
        let seed = Seed::new("Xm", 0.7, 0.7);
        let runner = Runner::new(&f);

        for method in Method::ALL {
            let run = runner.run(method, &seed);
            let solution = run.solution().unwrap();

            assert_eq!(solution.status(), Status::Converged, "{}", method);
            assert_abs_diff_eq!(solution.x().x, THIRD, epsilon = 1e-4);
            assert_abs_diff_eq!(solution.x().y, THIRD, epsilon = 1e-4);
            assert_abs_diff_eq!(solution.volume(), 0.068041, epsilon = 1e-5);
        }
    }

    #[test]
    fn runs_are_independent() {
        let f = BoxVolume::new();
        let seed = Seed::new("Xm", 0.7, 0.7);
        let runner = Runner::new(&f);

        let first = runner.run(Method::SteepestDescent, &seed);
        let second = runner.run(Method::SteepestDescent, &seed);

        let (first, second) = (first.solution().unwrap(), second.solution().unwrap());
        assert_eq!(first.objective_calls(), second.objective_calls());
        assert_eq!(first.gradient_calls(), second.gradient_calls());
        assert_eq!(first.trajectory(), second.trajectory());
    }

    #[test]
    fn near_boundary_seeds_terminate() {
        let f = BoxVolume::new();
        let runner = Runner::new(&f);
        let seeds = [
            Seed::new("corner", 1e-9, 1e-9),
            Seed::new("edge", 0.5, 0.5 - 1e-9),
        ];

        for run in runner.run_all(&seeds) {
            if let Some(solution) = run.solution() {
                assert!(solution.steps() <= DEFAULT_MAX_STEPS);
                assert!(solution.x().x.is_finite() && solution.x().y.is_finite());
            }
        }
    }

    #[test]
    fn step_cap_applies_to_every_run() {
        let f = BoxVolume::new();
        let runs = Runner::new(&f)
            .with_max_steps(2)
            .run_all(&[Seed::new("Xm", 0.7, 0.7)]);

        for run in runs {
            assert!(run.solution().unwrap().steps() <= 2);
        }
    }
}
