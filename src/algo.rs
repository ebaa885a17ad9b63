//! The collection of implemented algorithms.

pub mod descent;
pub mod nelder_mead;

pub use descent::{GradientDescent, LipschitzDescent, SteepestDescent};
pub use nelder_mead::NelderMead;
