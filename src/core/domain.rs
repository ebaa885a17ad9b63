//! Problem domain definition, that is, the feasible region of the variables.

use nalgebra::{convert, RealField};
use rand::Rng;

use super::base::Point;

/// Default distance kept from the boundary of the simplex when projecting.
pub const DEFAULT_MARGIN: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Unconstrained,
    Simplex,
}

/// Domain for a problem.
///
/// The constrained domain is the open interior of the standard simplex:
/// `x1 > 0`, `x2 > 0` and `x3 = 1 - x1 - x2 > 0`. Projection never puts a
/// point onto the boundary but keeps it at least `margin` away from it.
#[derive(Debug, Clone, Copy)]
pub struct Domain<T: RealField + Copy> {
    region: Region,
    margin: T,
}

impl<T: RealField + Copy> Domain<T> {
    /// Creates unconstrained domain.
    pub fn unconstrained() -> Self {
        Self {
            region: Region::Unconstrained,
            margin: T::zero(),
        }
    }

    /// Creates the open simplex domain with the default margin.
    pub fn simplex() -> Self {
        Self {
            region: Region::Simplex,
            margin: convert(DEFAULT_MARGIN),
        }
    }

    /// Sets a custom margin kept from the boundary by projections.
    pub fn with_margin(mut self, margin: T) -> Self {
        assert!(margin >= T::zero(), "margin must be non-negative");
        self.margin = margin;
        self
    }

    /// Gets the margin.
    pub fn margin(&self) -> T {
        self.margin
    }

    /// Returns `true` if the domain imposes no constraints.
    pub fn is_unconstrained(&self) -> bool {
        self.region == Region::Unconstrained
    }

    /// Computes the implied third variable `x3 = 1 - x1 - x2`.
    pub fn remainder(x: &Point<T>) -> T {
        T::one() - x.x - x.y
    }

    /// Tests whether the point lies strictly inside the domain.
    ///
    /// Non-finite points are never feasible, even in the unconstrained
    /// domain.
    pub fn is_feasible(&self, x: &Point<T>) -> bool {
        if !x.x.is_finite() || !x.y.is_finite() {
            return false;
        }

        match self.region {
            Region::Unconstrained => true,
            Region::Simplex => {
                x.x > T::zero() && x.y > T::zero() && Self::remainder(x) > T::zero()
            }
        }
    }

    /// Projects given point into the domain. Returns `true` if the point was
    /// modified.
    ///
    /// `x1` is clamped to `[margin, 1 - 2 * margin]` first, then `x2` is
    /// clamped to `[margin, 1 - x1 - margin]` so that `x3` stays positive.
    /// This is tighter than clamping `x1` to `1 - margin` alone, which would
    /// leave `x3 = -margin` when both coordinates hit their upper bounds.
    pub fn project(&self, x: &mut Point<T>) -> bool {
        if self.region == Region::Unconstrained {
            return false;
        }

        let one = T::one();
        let m = self.margin;
        let (x1, x2) = (x.x, x.y);

        // The upper bound of x1 leaves room for both x2 and x3.
        x.x = m.max(x1.min(one - m - m));
        x.y = m.max(x2.min(one - x.x - m));

        x.x != x1 || x.y != x2
    }

    /// Projects given point in given dimension against the other variable
    /// only. That is, `x[i]` is bounded from above so that `x3` stays
    /// positive, the other coordinate is left untouched. Returns `true` if the
    /// point was modified.
    pub fn project_in(&self, x: &mut Point<T>, i: usize) -> bool {
        assert!(i < 2, "index out of bounds");

        if self.region == Region::Unconstrained {
            return false;
        }

        let upper = T::one() - x[1 - i] - self.margin;

        if x[i] > upper {
            x[i] = upper;
            true
        } else {
            false
        }
    }

    /// Samples a point in the domain.
    ///
    /// For the simplex, the point is uniformly distributed in its interior
    /// shrunk by the margin. For the unconstrained domain, both coordinates
    /// are sampled from the unit interval.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point<T> {
        match self.region {
            Region::Unconstrained => Point::new(
                convert::<f64, T>(rng.gen()),
                convert::<f64, T>(rng.gen()),
            ),
            Region::Simplex => {
                let (mut u, mut v): (f64, f64) = (rng.gen(), rng.gen());

                // Fold the unit square onto the lower triangle.
                if u + v > 1.0 {
                    u = 1.0 - u;
                    v = 1.0 - v;
                }

                let three: T = convert(3.0);
                let scale = T::one() - three * self.margin;
                let u: T = convert(u);
                let v: T = convert(v);
                let mut x = Point::new(self.margin + scale * u, self.margin + scale * v);
                self.project(&mut x);
                x
            }
        }
    }
}
