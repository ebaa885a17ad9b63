use super::{base::Point, domain::Domain, function::Function, trajectory::Recorder};

/// Outcome of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A step was taken and the process can continue.
    Continue,
    /// The stopping criterion of the method was satisfied. No step was taken
    /// in this iteration.
    Converged,
}

/// Common interface for all optimizers.
///
/// All optimizers implement a common interface defined by the [`Optimizer`]
/// trait. The essential method is [`opt_next`](Optimizer::opt_next) which
/// takes variables *x* and computes the next step. Thus it represents one
/// iteration in the process. Repeated call to this method should move *x*
/// towards the minimum in successful cases.
///
/// All evaluations are counted and all visited points are recorded through
/// the [`Recorder`] passed to each call.
///
/// ## Implementing an optimizer
///
/// Here is an implementation of an optimizer (if such a thing can be called
/// an optimizer) which probes a fixed direction with a fixed step and never
/// converges.
///
/// ```rust
/// use boxopt::{Domain, Function, FunctionExt, Optimizer, Point, Progress, Recorder};
///
/// struct Walk;
///
/// impl<F: Function<Field = f64>> Optimizer<F> for Walk {
///     const NAME: &'static str = "Walk";
///     const DERIVATIVE_FREE: bool = true;
///     type Error = std::convert::Infallible;
///
///     fn init(
///         &mut self,
///         f: &F,
///         _dom: &Domain<f64>,
///         x: &Point<f64>,
///         rec: &mut Recorder<f64>,
///     ) -> Result<(), Self::Error> {
///         let value = f.apply_counted(x, rec.counters_mut());
///         rec.record(x, value);
///         Ok(())
///     }
///
///     fn opt_next(
///         &mut self,
///         f: &F,
///         dom: &Domain<f64>,
///         x: &mut Point<f64>,
///         rec: &mut Recorder<f64>,
///     ) -> Result<Progress, Self::Error> {
///         x.x += 0.01;
///         dom.project(x);
///
///         // We must record the new point.
///         let value = f.apply_counted(x, rec.counters_mut());
///         rec.record(x, value);
///         Ok(Progress::Continue)
///     }
/// }
/// ```
pub trait Optimizer<F: Function> {
    /// Name of the optimizer.
    const NAME: &'static str;

    /// Whether the optimizer uses objective values only.
    const DERIVATIVE_FREE: bool;

    /// Error type of the iteration. Represents an invalid operation during
    /// computing the next step.
    type Error;

    /// Prepares the internal state for a run starting at `x`.
    ///
    /// Implementations record the initial point(s) into the trajectory here.
    fn init(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<(), Self::Error>;

    /// Computes the next step in the optimization process.
    ///
    /// The value of `x` is the current values of variables. After the method
    /// returns, `x` holds the current best estimate. If
    /// [`Progress::Converged`] is returned, `x` is final.
    ///
    /// The implementations *can* assume that subsequent calls to `opt_next`
    /// pass the value of `x` as was outputted in the previous iteration by the
    /// same method and that [`init`](Optimizer::init) was called before.
    fn opt_next(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<Progress, Self::Error>;
}
