//! Golden section search for single-variable minimization.
//!
//! Golden section search finds the minimum of a unimodal function on a
//! bounded interval. It maintains two interior points positioned by the
//! golden ratio, compares their values, and shrinks the bracket toward the
//! better point. After shrinking, one of the old interior points becomes an
//! interior point of the new bracket, so each iteration needs exactly one new
//! evaluation.
//!
//! # References
//!
//! \[1\] [Wikipedia](https://en.wikipedia.org/wiki/Golden-section_search)

use getset::{CopyGetters, Setters};
use log::trace;
use nalgebra::{convert, RealField};

/// Options for [`GoldenSection`] search.
#[derive(Debug, Clone, Copy, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct GoldenSectionOptions<T: RealField + Copy> {
    /// Lower end of the bracket. Default: `0`.
    lower: T,
    /// Upper end of the bracket. Default: `4.5`.
    upper: T,
    /// The search stops when the bracket is not wider than this. Default:
    /// `1e-6`.
    tolerance: T,
    /// Upper bound on the number of bracket reductions, for tolerances that
    /// are below the floating point resolution of the bracket. Default:
    /// `200`.
    max_iters: usize,
}

impl<T: RealField + Copy> Default for GoldenSectionOptions<T> {
    fn default() -> Self {
        Self {
            lower: convert(0.0),
            upper: convert(4.5),
            tolerance: convert(1e-6),
            max_iters: 200,
        }
    }
}

/// Result of the search.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Minimum<T: RealField + Copy> {
    /// Midpoint of the final bracket.
    alpha: T,
    /// Number of bracket reductions performed.
    iters: usize,
}

/// Golden section search. See [module](self) documentation for more details.
#[derive(Debug, Clone)]
pub struct GoldenSection<T: RealField + Copy> {
    options: GoldenSectionOptions<T>,
}

impl<T: RealField + Copy> GoldenSection<T> {
    /// Initializes the search with default options.
    pub fn new() -> Self {
        Self::with_options(GoldenSectionOptions::default())
    }

    /// Initializes the search with given options.
    pub fn with_options(options: GoldenSectionOptions<T>) -> Self {
        Self { options }
    }

    /// Gets the options.
    pub fn options(&self) -> &GoldenSectionOptions<T> {
        &self.options
    }

    /// Finds the minimum of `phi` on the bracket.
    ///
    /// The function is evaluated exactly `2 + iters` times.
    pub fn minimize<P>(&self, mut phi: P) -> Minimum<T>
    where
        P: FnMut(T) -> T,
    {
        let GoldenSectionOptions {
            lower,
            upper,
            tolerance,
            max_iters,
        } = self.options;

        let mut bracket = Bracket::new(lower, upper);
        let mut f1 = phi(bracket.alpha1);
        let mut f2 = phi(bracket.alpha2);
        let mut iters = 0;

        while bracket.width() > tolerance && iters < max_iters {
            iters += 1;

            if f1 < f2 {
                bracket.shrink_right();
                f2 = f1;
                f1 = phi(bracket.alpha1);
            } else {
                bracket.shrink_left();
                f1 = f2;
                f2 = phi(bracket.alpha2);
            }
        }

        let alpha = bracket.midpoint();
        trace!("golden section: alpha = {} after {} reductions", alpha, iters);

        Minimum { alpha, iters }
    }
}

impl<T: RealField + Copy> Default for GoldenSection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bracket `[a, b]` with two interior probes `alpha1 < alpha2`.
#[derive(Debug, Clone, Copy)]
struct Bracket<T> {
    a: T,
    b: T,
    alpha1: T,
    alpha2: T,
    ratio: T,
}

impl<T: RealField + Copy> Bracket<T> {
    fn new(a: T, b: T) -> Self {
        // The inverse golden ratio (sqrt(5) - 1) / 2.
        let five: T = convert(5.0);
        let two: T = convert(2.0);
        let ratio = (five.sqrt() - T::one()) / two;

        Self {
            a,
            b,
            alpha1: b - ratio * (b - a),
            alpha2: a + ratio * (b - a),
            ratio,
        }
    }

    fn width(&self) -> T {
        (self.b - self.a).abs()
    }

    fn midpoint(&self) -> T {
        let two: T = convert(2.0);
        (self.a + self.b) / two
    }

    /// Moves the right end to `alpha2`. The old `alpha1` becomes the new
    /// `alpha2`.
    fn shrink_right(&mut self) {
        self.b = self.alpha2;
        self.alpha2 = self.alpha1;
        self.alpha1 = self.b - self.ratio * (self.b - self.a);
    }

    /// Moves the left end to `alpha1`. The old `alpha2` becomes the new
    /// `alpha1`.
    fn shrink_left(&mut self) {
        self.a = self.alpha1;
        self.alpha1 = self.alpha2;
        self.alpha2 = self.a + self.ratio * (self.b - self.a);
    }
}
