//! Nelder-mead (simplex) optimization method restricted to the plane.
//!
//! [Nelder-Mead](https://en.wikipedia.org/wiki/Nelder%E2%80%93Mead_method)
//! simplex-reflection method is a popular derivative-free optimization
//! algorithm. In two dimensions it keeps a triangle of three vertices and the
//! triangle is reflected, expanded, contracted or shrunk based on the
//! function values comparison.
//!
//! Every proposed vertex is [projected](crate::core::Domain::project) into
//! the domain before it is evaluated, so that in a constrained domain the
//! simplex deforms along the boundary instead of leaving it. Every evaluated
//! vertex is recorded into the trajectory.
//!
//! The method terminates when the longest edge adjacent to the best vertex is
//! shorter than the tolerance.
//!
//! # References
//!
//! \[1\] [Numerical
//! Optimization](https://link.springer.com/book/10.1007/978-0-387-40065-5)
//!
//! \[2\] [Convergence properties of the Nelder-Mead simplex method in low
//! dimensions](https://doi.org/10.1137/S1052623496303470)

use std::cmp::Ordering;

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{convert, ComplexField, RealField};
use thiserror::Error;

use crate::core::{Domain, Function, FunctionExt, Optimizer, Point, Problem, Progress, Recorder};

/// Options for [`NelderMead`] solver.
#[derive(Debug, Clone, Copy, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct NelderMeadOptions<T: RealField + Copy> {
    /// Offset of the two initial vertices from the initial point, one per
    /// coordinate. Default: `0.3`.
    initial_step: T,
    /// Coefficient for reflection operation. Default: `1`.
    reflection_coeff: T,
    /// Coefficient for expansion operation. Default: `2`.
    expansion_coeff: T,
    /// Coefficient for both outer and inner contraction. Default: `0.5`.
    contraction_coeff: T,
    /// Coefficient for shrinking operation. Default: `0.5`.
    shrink_coeff: T,
    /// The method converges when no edge adjacent to the best vertex is
    /// longer than this. Default: `1e-6`.
    edge_tolerance: T,
}

impl<T: RealField + Copy> Default for NelderMeadOptions<T> {
    fn default() -> Self {
        Self {
            initial_step: convert(0.3),
            reflection_coeff: convert(1.0),
            expansion_coeff: convert(2.0),
            contraction_coeff: convert(0.5),
            shrink_coeff: convert(0.5),
            edge_tolerance: convert(1e-6),
        }
    }
}

/// Vertex of the simplex.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Vertex<T: RealField + Copy> {
    /// Position.
    x: Point<T>,
    /// Function value at the position. Non-finite values are replaced by
    /// positive infinity.
    value: T,
}

impl<T: RealField + Copy> Vertex<T> {
    fn new(x: Point<T>, value: T) -> Self {
        Self { x, value }
    }
}

/// Nelder-Mead solver.
///
/// See [module](self) documentation for more details.
pub struct NelderMead<P: Problem> {
    options: NelderMeadOptions<P::Field>,
    simplex: Vec<Vertex<P::Field>>,
}

impl<P: Problem> NelderMead<P> {
    /// Initializes Nelder-Mead solver with default options.
    pub fn new(p: &P, dom: &Domain<P::Field>) -> Self {
        Self::with_options(p, dom, NelderMeadOptions::default())
    }

    /// Initializes Nelder-Mead solver with given options.
    pub fn with_options(_: &P, _: &Domain<P::Field>, options: NelderMeadOptions<P::Field>) -> Self {
        Self {
            options,
            simplex: Vec::with_capacity(3),
        }
    }

    /// Gets the options.
    pub fn options(&self) -> &NelderMeadOptions<P::Field> {
        &self.options
    }

    /// Gets the current vertices. The order is by value only right after
    /// convergence.
    pub fn simplex(&self) -> &[Vertex<P::Field>] {
        &self.simplex
    }

    /// Resets the internal state of the solver.
    pub fn reset(&mut self) {
        // Causes simplex to be initialized again.
        self.simplex.clear();
    }
}

/// Error returned from [`NelderMead`] solver.
#[derive(Debug, Error)]
pub enum NelderMeadError {
    /// Simplex contains too many invalid values (NaN, infinity).
    #[error("simplex contains too many invalid values")]
    SimplexInvalid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transformation {
    Reflection,
    Expansion,
    OuterContraction,
    InnerContraction,
    Shrinkage,
}

impl Transformation {
    fn as_str(&self) -> &str {
        match self {
            Transformation::Reflection => "reflection",
            Transformation::Expansion => "expansion",
            Transformation::OuterContraction => "outer contraction",
            Transformation::InnerContraction => "inner contraction",
            Transformation::Shrinkage => "shrinkage",
        }
    }
}

impl<F: Function> Optimizer<F> for NelderMead<F> {
    const NAME: &'static str = "DeformedSimplex";
    const DERIVATIVE_FREE: bool = true;

    type Error = NelderMeadError;

    fn init(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<(), Self::Error> {
        let Self { options, simplex } = self;

        simplex.clear();
        simplex.push(Vertex::new(*x, probe(f, x, rec)));

        for i in 0..2 {
            let mut xi = *x;
            xi[i] += options.initial_step;
            dom.project_in(&mut xi, i);

            let value = probe(f, &xi, rec);
            simplex.push(Vertex::new(xi, value));
        }

        let invalid_count = simplex.iter().filter(|v| !v.value.is_finite()).count();

        if 2 * invalid_count >= simplex.len() {
            // The simplex is too degenerate.
            debug!(
                "{} out of {} points in simplex have invalid value, returning error",
                invalid_count,
                simplex.len()
            );
            simplex.clear();
            return Err(NelderMeadError::SimplexInvalid);
        }

        Ok(())
    }

    fn opt_next(
        &mut self,
        f: &F,
        dom: &Domain<F::Field>,
        x: &mut Point<F::Field>,
        rec: &mut Recorder<F::Field>,
    ) -> Result<Progress, Self::Error> {
        if self.simplex.is_empty() {
            let start = *x;
            self.init(f, dom, &start, rec)?;
        }

        let NelderMeadOptions {
            reflection_coeff,
            expansion_coeff,
            contraction_coeff,
            shrink_coeff,
            edge_tolerance,
            ..
        } = self.options;

        let simplex = &mut self.simplex;

        // Establish the ordering of simplex points.
        sort_simplex(simplex);

        let best = simplex[0];
        let worst = simplex[2];

        let edge = (simplex[1].x - best.x).norm().max((worst.x - best.x).norm());

        if edge < edge_tolerance {
            debug!("longest edge {} below tolerance, converged", edge);
            *x = best.x;
            return Ok(Progress::Converged);
        }

        let centroid = (best.x + simplex[1].x) / convert::<f64, F::Field>(2.0);

        debug!("centroid of simplex: ({}, {})", centroid.x, centroid.y);

        // Perform one of possible simplex transformations.
        let mut reflection = on_line(&centroid, &worst.x, -reflection_coeff);
        let reflection_not_feasible = dom.project(&mut reflection);
        let reflection_value = probe(f, &reflection, rec);

        let (transformation, not_feasible) = if reflection_value < best.value {
            // Reflected point is better than the current best. Try to go
            // farther along this direction.
            let mut expansion = on_line(&centroid, &reflection, expansion_coeff);
            let expansion_not_feasible = dom.project(&mut expansion);
            let expansion_value = probe(f, &expansion, rec);

            if expansion_value < reflection_value {
                simplex[2] = Vertex::new(expansion, expansion_value);
                (Transformation::Expansion, expansion_not_feasible)
            } else {
                simplex[2] = Vertex::new(reflection, reflection_value);
                (Transformation::Reflection, reflection_not_feasible)
            }
        } else if reflection_value < simplex[1].value {
            // Reflected point is neither best nor worst in the new simplex.
            // Just replace the worst point.
            simplex[2] = Vertex::new(reflection, reflection_value);
            (Transformation::Reflection, reflection_not_feasible)
        } else {
            let contracted = if reflection_value < worst.value {
                // Try to perform outer contraction.
                let mut contraction = on_line(&centroid, &reflection, contraction_coeff);
                let contraction_not_feasible = dom.project(&mut contraction);
                let contraction_value = probe(f, &contraction, rec);

                (contraction_value <= reflection_value).then(|| {
                    (
                        Transformation::OuterContraction,
                        Vertex::new(contraction, contraction_value),
                        contraction_not_feasible,
                    )
                })
            } else {
                // Try to perform inner contraction, pulling back from the
                // worst point.
                let mut contraction = on_line(&centroid, &worst.x, contraction_coeff);
                let contraction_not_feasible = dom.project(&mut contraction);
                let contraction_value = probe(f, &contraction, rec);

                (contraction_value < worst.value).then(|| {
                    (
                        Transformation::InnerContraction,
                        Vertex::new(contraction, contraction_value),
                        contraction_not_feasible,
                    )
                })
            };

            match contracted {
                Some((transformation, vertex, not_feasible)) => {
                    simplex[2] = vertex;
                    (transformation, not_feasible)
                }
                None => {
                    // Neither outside nor inside contraction was acceptable.
                    // Shrink the simplex towards the best point.
                    let mut not_feasible = false;

                    for vertex in simplex[1..].iter_mut() {
                        let mut xi = on_line(&best.x, &vertex.x, shrink_coeff);
                        not_feasible |= dom.project(&mut xi);
                        let value = probe(f, &xi, rec);
                        *vertex = Vertex::new(xi, value);
                    }

                    (Transformation::Shrinkage, not_feasible)
                }
            }
        };

        debug!(
            "performed {}{},\tfx = {} - {}",
            transformation.as_str(),
            if not_feasible { " with projection" } else { "" },
            best.value,
            simplex[2].value
        );

        // Keep the order between iterations so that the current point is the
        // best vertex found so far.
        sort_simplex(simplex);
        *x = simplex[0].x;

        Ok(Progress::Continue)
    }
}

/// Evaluates the point, counts and records the evaluation and returns the
/// value suitable for comparisons.
fn probe<F: Function>(f: &F, x: &Point<F::Field>, rec: &mut Recorder<F::Field>) -> F::Field {
    let value = f.apply_counted(x, rec.counters_mut());
    rec.record(x, value);
    value.nan_to_inf()
}

fn sort_simplex<T: RealField + Copy>(simplex: &mut [Vertex<T>]) {
    simplex.sort_by(|a, b| a.value.partial_cmp(&b.value).unwrap_or(Ordering::Equal));
}

/// Computes `from + t * (to - from)`.
fn on_line<T: RealField + Copy>(from: &Point<T>, to: &Point<T>, t: T) -> Point<T> {
    from + (to - from) * t
}

trait RealFieldNelderMeadExt {
    fn nan_to_inf(self) -> Self;
}

impl<T: RealField> RealFieldNelderMeadExt for T {
    fn nan_to_inf(self) -> Self {
        if self.is_finite() {
            self
        } else {
            // Not finite also covers NaN and negative infinity.
            T::from_subset(&f64::INFINITY)
        }
    }
}
