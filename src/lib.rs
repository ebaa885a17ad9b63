#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]
#![warn(missing_docs)]

//! # Boxopt
//!
//! Optimization of the volume of a box inscribed under the constraint
//! `x1 + x2 + x3 = 1`, and a comparison of gradient-based and derivative-free
//! methods on it.
//!
//! The library provides three methods written entirely in Rust. All of them
//! implement the same interface which gives full control over the process,
//! counts every evaluation of the objective and its gradient, and records the
//! whole path taken through the search space.
//!
//! ## Algorithms
//!
//! * [Lipschitz descent](algo::descent) -- Gradient descent with a step given
//!   by the curvature bound of the Hessian. No objective evaluations are
//!   needed to choose the step.
//! * [Steepest descent](algo::descent) -- Gradient descent with exact [line
//!   search](line_search) by golden section.
//! * [Nelder-Mead](algo::nelder_mead) -- Derivative-free simplex method that
//!   keeps all its vertices inside the feasible region.
//!
//! ## Problem
//!
//! The box edges are fractions `x1`, `x2` and `x3` of the unit sheet and
//! only two of them are free. The volume is maximized by minimizing
//!
//! ```text
//! f(x1, x2) = -(x1 * x2 * (1 - x1 - x2)) / 8
//!
//! where x1 > 0, x2 > 0 and x1 + x2 < 1
//! ```
//!
//! See [`BoxVolume`]. Any other function of two variables can be optimized
//! as well, it is any type that implements the [`Function`] and [`Problem`]
//! traits, and [`Gradient`] and [`Hessian`] for the gradient methods.
//!
//! ```rust
//! use boxopt::{Domain, Function, Gradient, Point, Problem};
//! use boxopt::nalgebra::Vector2;
//!
//! // A problem is represented by a type.
//! struct Paraboloid;
//!
//! impl Problem for Paraboloid {
//!     // The numeric type. Usually f64.
//!     type Field = f64;
//!
//!     // The feasible region. Unconstrained if not overridden.
//!     fn domain(&self) -> Domain<Self::Field> {
//!         Domain::simplex()
//!     }
//! }
//!
//! impl Function for Paraboloid {
//!     fn apply(&self, x: &Point<Self::Field>) -> Self::Field {
//!         (x.x - 0.2).powi(2) + (x.y - 0.3).powi(2)
//!     }
//! }
//!
//! impl Gradient for Paraboloid {
//!     fn gradient(&self, x: &Point<Self::Field>) -> Vector2<Self::Field> {
//!         Vector2::new(2.0 * (x.x - 0.2), 2.0 * (x.y - 0.3))
//!     }
//! }
//! ```
//!
//! ## Optimizing
//!
//! When you have your function available, you can use the
//! [`OptimizerDriver`] to run the iteration process until the method
//! converges or the cap on the number of steps is reached.
//!
//! ```rust
//! use boxopt::{algo::SteepestDescent, objective::BoxVolume, OptimizerDriver};
//!
//! let f = BoxVolume::new();
//! let solution = OptimizerDriver::builder(&f)
//!     .with_initial([0.7, 0.7])
//!     .with_algo(SteepestDescent::new)
//!     .build()
//!     .run()
//!     .expect("optimizer encountered an error");
//!
//! println!(
//!     "x = {:?}, volume = {}, objective calls = {}",
//!     solution.x(),
//!     solution.volume(),
//!     solution.objective_calls()
//! );
//! ```
//!
//! To compare all methods from a set of initial points, use the
//! [`Runner`](runner::Runner) and print the [`Report`](report::Report).
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
mod core;
pub mod driver;
#[cfg(feature = "serde")]
pub mod export;
pub mod line_search;
pub mod objective;
pub mod report;
pub mod runner;
pub mod step;

pub use core::*;
pub use driver::OptimizerDriver;
pub use objective::BoxVolume;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
