//! High-level API for optimization.
//!
//! This module contains the "driver" that encapsulates all internal state and
//! provides a simple API to run the iterative process of optimization.
//!
//! The simplest way of using the driver is to initialize it with the defaults:
//!
//! ```rust
//! use boxopt::{objective::BoxVolume, OptimizerDriver};
//!
//! let f = BoxVolume::new();
//!
//! let mut optimizer = OptimizerDriver::new(&f);
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use boxopt::{objective::BoxVolume, OptimizerDriver};
//!
//! let f = BoxVolume::new();
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial([0.7, 0.7])
//!     .with_algo(boxopt::algo::SteepestDescent::new)
//!     .with_max_steps(100)
//!     .build();
//! ```
//!
//! Once you have the optimizer, you can run it until its stopping criterion
//! is satisfied or the step cap is reached:
//!
//! ```rust
//! # use boxopt::{objective::BoxVolume, OptimizerDriver};
//! #
//! # let f = BoxVolume::new();
//! # let optimizer = OptimizerDriver::builder(&f).with_initial([0.7, 0.7]).build();
//! #
//! let solution = optimizer.run().expect("no optimizer error");
//! println!("volume = {} after {} steps", solution.volume(), solution.steps());
//! ```
//!
//! If you need more control over the iteration process, you can do the
//! iterations manually:
//!
//! ```rust
//! # use boxopt::{objective::BoxVolume, OptimizerDriver, Progress};
//! #
//! # let f = BoxVolume::new();
//! # let mut optimizer = OptimizerDriver::builder(&f).with_initial([0.7, 0.7]).build();
//! #
//! while optimizer.steps() < 10 {
//!     if optimizer.next().expect("no optimizer error") == Progress::Converged {
//!         break;
//!     }
//!     // ...
//! }
//! ```

use getset::{CopyGetters, Getters};
use log::debug;
use nalgebra::RealField;

use crate::{
    algo::NelderMead,
    core::{Domain, Function, Optimizer, Point, Problem, Progress, Recorder, Trajectory},
    objective::box_volume,
};

/// Default cap on the number of iterations.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Builder for the [`OptimizerDriver`].
pub struct OptimizerBuilder<'a, F: Problem, A> {
    f: &'a F,
    dom: Domain<F::Field>,
    algo: A,
    x0: Point<F::Field>,
    max_steps: usize,
}

impl<'a, F: Problem> OptimizerBuilder<'a, F, NelderMead<F>> {
    fn new(f: &'a F) -> Self {
        let dom = f.domain();
        let algo = NelderMead::new(f, &dom);

        Self {
            f,
            dom,
            algo,
            x0: Point::zeros(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl<'a, F: Problem, A> OptimizerBuilder<'a, F, A> {
    /// Sets the initial point from which the iterative process starts.
    ///
    /// The point is used as is, it is not projected into the domain.
    pub fn with_initial(mut self, x0: [F::Field; 2]) -> Self {
        self.x0 = Point::from(x0);
        self
    }

    /// Sets specific algorithm to be used.
    ///
    /// This builder method accepts a closure that takes the reference to the
    /// problem and its domain. For all algorithms in boxopt, you can simply
    /// pass the `new` constructor directly (e.g., `NelderMead::new`).
    pub fn with_algo<A2, FA>(self, factory: FA) -> OptimizerBuilder<'a, F, A2>
    where
        FA: FnOnce(&F, &Domain<F::Field>) -> A2,
    {
        let algo = factory(self.f, &self.dom);

        OptimizerBuilder {
            f: self.f,
            dom: self.dom,
            algo,
            x0: self.x0,
            max_steps: self.max_steps,
        }
    }

    /// Sets the cap on the number of iterations. Default:
    /// [`DEFAULT_MAX_STEPS`].
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Builds the [`OptimizerDriver`].
    pub fn build(self) -> OptimizerDriver<'a, F, A> {
        let Self {
            f,
            dom,
            algo,
            x0,
            max_steps,
        } = self;

        OptimizerDriver {
            f,
            dom,
            algo,
            x: x0,
            max_steps,
            steps: 0,
            initialized: false,
            recorder: Recorder::new(),
        }
    }
}

/// The driver for the process of optimization.
///
/// For default settings, use [`OptimizerDriver::new`]. For more flexibility,
/// use [`OptimizerDriver::builder`]. For the usage of the driver, see
/// [module](self) documentation.
pub struct OptimizerDriver<'a, F: Problem, A> {
    f: &'a F,
    dom: Domain<F::Field>,
    algo: A,
    x: Point<F::Field>,
    max_steps: usize,
    steps: usize,
    initialized: bool,
    recorder: Recorder<F::Field>,
}

impl<'a, F: Problem> OptimizerDriver<'a, F, NelderMead<F>> {
    /// Returns the builder for specifying additional settings.
    pub fn builder(f: &'a F) -> OptimizerBuilder<'a, F, NelderMead<F>> {
        OptimizerBuilder::new(f)
    }

    /// Initializes the driver with the default settings.
    pub fn new(f: &'a F) -> Self {
        OptimizerDriver::builder(f).build()
    }
}

impl<'a, F: Problem, A> OptimizerDriver<'a, F, A> {
    /// Returns the current point.
    pub fn x(&self) -> Point<F::Field> {
        self.x
    }

    /// Returns the number of iterations entered so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns the cap on the number of iterations.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the evaluation counters and the trajectory recorded so far.
    pub fn recorder(&self) -> &Recorder<F::Field> {
        &self.recorder
    }
}

impl<'a, F: Function, A: Optimizer<F>> OptimizerDriver<'a, F, A> {
    /// Does one iteration of the process. The optimizer is initialized on the
    /// first call.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Progress, A::Error> {
        self.init()?;
        self.steps += 1;
        self.algo
            .opt_next(self.f, &self.dom, &mut self.x, &mut self.recorder)
    }

    /// Runs the iterative process until the optimizer converges or the cap on
    /// the number of iterations is reached.
    ///
    /// In case of an error, the trajectory recorded until the error is
    /// returned together with it.
    pub fn run(mut self) -> Result<Solution<F::Field>, Failure<F::Field, A::Error>> {
        match self.iterate() {
            Ok(status) => {
                debug!("{} finished with {:?} after {} steps", A::NAME, status, self.steps);

                let (counters, trajectory) = self.recorder.into_parts();

                Ok(Solution {
                    x: self.x,
                    value: self.f.apply(&self.x),
                    volume: box_volume(&self.x),
                    steps: self.steps,
                    objective_calls: counters.objective(),
                    gradient_calls: (!A::DERIVATIVE_FREE).then(|| counters.gradient()),
                    status,
                    trajectory,
                })
            }
            Err(error) => {
                debug!("{} failed after {} steps", A::NAME, self.steps);

                let (counters, trajectory) = self.recorder.into_parts();

                Err(Failure {
                    error,
                    x: self.x,
                    volume: box_volume(&self.x),
                    steps: self.steps,
                    objective_calls: counters.objective(),
                    gradient_calls: (!A::DERIVATIVE_FREE).then(|| counters.gradient()),
                    trajectory,
                })
            }
        }
    }

    /// Returns the name of the used optimizer.
    pub fn name(&self) -> &str {
        A::NAME
    }

    fn init(&mut self) -> Result<(), A::Error> {
        if !self.initialized {
            self.algo
                .init(self.f, &self.dom, &self.x, &mut self.recorder)?;
            self.initialized = true;
        }

        Ok(())
    }

    fn iterate(&mut self) -> Result<Status, A::Error> {
        self.init()?;

        while self.steps < self.max_steps {
            if self.next()? == Progress::Converged {
                return Ok(Status::Converged);
            }
        }

        Ok(Status::Exhausted)
    }
}

/// How the process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The stopping criterion of the optimizer was satisfied.
    Converged,
    /// The cap on the number of iterations was reached.
    Exhausted,
}

/// Result of a successful run.
#[derive(Debug, Clone, CopyGetters, Getters)]
pub struct Solution<T: RealField + Copy> {
    /// Final point.
    #[getset(get_copy = "pub")]
    x: Point<T>,
    /// Function value at the final point.
    #[getset(get_copy = "pub")]
    value: T,
    /// Geometric volume of the box at the final point, see
    /// [`box_volume`](crate::objective::box_volume).
    #[getset(get_copy = "pub")]
    volume: T,
    /// Number of iterations entered.
    #[getset(get_copy = "pub")]
    steps: usize,
    /// Number of counted objective evaluations.
    #[getset(get_copy = "pub")]
    objective_calls: usize,
    /// Number of gradient evaluations, or `None` for derivative-free
    /// optimizers.
    #[getset(get_copy = "pub")]
    gradient_calls: Option<usize>,
    /// How the process terminated.
    #[getset(get_copy = "pub")]
    status: Status,
    /// Visited points in the order of visiting.
    #[getset(get = "pub")]
    trajectory: Trajectory<T>,
}

impl<T: RealField + Copy> Solution<T> {
    /// Total number of evaluations of any kind.
    pub fn total_calls(&self) -> usize {
        self.objective_calls + self.gradient_calls.unwrap_or(0)
    }

    /// Consumes the solution, returning the trajectory.
    pub fn into_trajectory(self) -> Trajectory<T> {
        self.trajectory
    }
}

/// Error of a run together with the state reached until the error.
///
/// The point is the last one accepted by the optimizer, and the counters
/// include the evaluations of the failed iteration.
#[derive(Debug, Clone, CopyGetters, Getters)]
pub struct Failure<T: RealField + Copy, E> {
    /// The error.
    #[getset(get = "pub")]
    error: E,
    /// Last accepted point.
    #[getset(get_copy = "pub")]
    x: Point<T>,
    /// Geometric volume of the box at the last accepted point. Not a number
    /// if the point lies outside the simplex.
    #[getset(get_copy = "pub")]
    volume: T,
    /// Number of iterations entered, including the failed one.
    #[getset(get_copy = "pub")]
    steps: usize,
    /// Number of counted objective evaluations.
    #[getset(get_copy = "pub")]
    objective_calls: usize,
    /// Number of gradient evaluations, or `None` for derivative-free
    /// optimizers.
    #[getset(get_copy = "pub")]
    gradient_calls: Option<usize>,
    /// Visited points until the error.
    #[getset(get = "pub")]
    trajectory: Trajectory<T>,
}

impl<T: RealField + Copy, E> Failure<T, E> {
    /// Total number of evaluations of any kind.
    pub fn total_calls(&self) -> usize {
        self.objective_calls + self.gradient_calls.unwrap_or(0)
    }

    /// Converts the error, keeping the rest of the state.
    pub fn map_error<E2, M>(self, map: M) -> Failure<T, E2>
    where
        M: FnOnce(E) -> E2,
    {
        Failure {
            error: map(self.error),
            x: self.x,
            volume: self.volume,
            steps: self.steps,
            objective_calls: self.objective_calls,
            gradient_calls: self.gradient_calls,
            trajectory: self.trajectory,
        }
    }

    /// Consumes the failure, returning the error and the trajectory.
    pub fn into_parts(self) -> (E, Trajectory<T>) {
        (self.error, self.trajectory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{algo::LipschitzDescent, objective::BoxVolume, testing::Sphere};

    #[test]
    fn defaults() {
        let f = BoxVolume::new();
        let optimizer = OptimizerDriver::new(&f);

        assert_eq!(optimizer.name(), "DeformedSimplex");
        assert_eq!(optimizer.max_steps(), DEFAULT_MAX_STEPS);
        assert_eq!(optimizer.x(), Point::new(0.0, 0.0));
    }

    #[test]
    fn initial_is_not_projected() {
        let f = BoxVolume::new();
        let optimizer = OptimizerDriver::builder(&f)
            .with_initial([1.0, 1.0])
            .build();

        assert_eq!(optimizer.x(), Point::new(1.0, 1.0));
    }

    #[test]
    fn step_cap() {
        let f = Sphere::default();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([10.0, -10.0])
            .with_max_steps(5)
            .build()
            .run()
            .unwrap();

        assert_eq!(solution.status(), Status::Exhausted);
        assert_eq!(solution.steps(), 5);
        assert_eq!(solution.objective_calls(), solution.trajectory().len());
        assert_eq!(solution.total_calls(), solution.objective_calls());
    }

    #[test]
    fn zero_step_cap_records_initial_point() {
        let f = BoxVolume::new();
        let solution = OptimizerDriver::builder(&f)
            .with_initial([0.2, 0.3])
            .with_algo(LipschitzDescent::new)
            .with_max_steps(0)
            .build()
            .run()
            .unwrap();

        assert_eq!(solution.status(), Status::Exhausted);
        assert_eq!(solution.steps(), 0);
        assert_eq!(solution.gradient_calls(), Some(0));
        assert_eq!(solution.trajectory().len(), 1);
        assert_eq!(solution.x(), Point::new(0.2, 0.3));
    }

    #[test]
    fn manual_iterations() {
        let f = BoxVolume::new();
        let mut optimizer = OptimizerDriver::builder(&f)
            .with_initial([0.7, 0.7])
            .with_algo(LipschitzDescent::new)
            .build();

        for _ in 0..3 {
            assert_eq!(optimizer.next().unwrap(), Progress::Continue);
        }

        assert_eq!(optimizer.steps(), 3);
        assert_eq!(optimizer.recorder().counters().gradient(), 3);
        assert_eq!(optimizer.recorder().trajectory().len(), 4);
    }

    #[test]
    fn failure_keeps_trajectory() {
        let f = BoxVolume::new();
        let failure = OptimizerDriver::builder(&f)
            .with_initial([1.0, 1.0])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap_err();

        let failure = failure.map_error(|error| error.to_string());
        assert_eq!(failure.error(), "step left the feasible region");

        let (_, trajectory) = failure.into_parts();
        assert_eq!(trajectory.len(), 1);
    }

    #[test]
    fn failure_keeps_counters_and_point() {
        let f = BoxVolume::new();
        let failure = OptimizerDriver::builder(&f)
            .with_initial([1.0, 1.0])
            .with_algo(LipschitzDescent::new)
            .build()
            .run()
            .unwrap_err();

        // The step from the seed is rejected, so the point stays at the seed.
        assert_eq!(failure.x(), Point::new(1.0, 1.0));
        assert!(failure.volume().is_nan());
        assert_eq!(failure.steps(), 1);
        assert_eq!(failure.gradient_calls(), Some(1));
        assert_eq!(failure.objective_calls(), 0);
        assert_eq!(failure.total_calls(), 1);

        let failure = failure.map_error(|error| error.to_string());
        assert_eq!(failure.steps(), 1);
        assert_eq!(failure.gradient_calls(), Some(1));
    }
}
