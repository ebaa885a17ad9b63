//! Core abstractions and types for boxopt.
//!
//! *Users* are mainly interested in implementing the [`Function`] trait (and
//! [`Gradient`] or [`Hessian`] for derivative-based methods), optionally
//! specifying the [domain](Domain).
//!
//! Algorithms *developers* are interested in implementing the [`Optimizer`]
//! trait and using extension traits [`FunctionExt`] and [`GradientExt`]
//! together with the [`Recorder`] to keep the bookkeeping explicit.

mod base;
mod domain;
mod function;
mod optimizer;
mod trajectory;

pub use base::*;
pub use domain::*;
pub use function::*;
pub use optimizer::*;
pub use trajectory::*;
