//! Recording of the search path taken by an optimizer.

use std::ops::Deref;

use getset::{CopyGetters, Getters};
use nalgebra::RealField;
#[cfg(feature = "serde")]
use serde::Serialize;

use super::{base::Point, domain::Domain, function::Counters};

/// Snapshot of a single iterate: both free variables and the function value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(rename_all = "PascalCase"))]
pub struct TrajectoryPoint<T> {
    x1: T,
    x2: T,
    value: T,
}

impl<T: RealField + Copy> TrajectoryPoint<T> {
    /// Creates the snapshot of given point.
    pub fn new(x: &Point<T>, value: T) -> Self {
        Self {
            x1: x.x,
            x2: x.y,
            value,
        }
    }

    /// First variable.
    pub fn x1(&self) -> T {
        self.x1
    }

    /// Second variable.
    pub fn x2(&self) -> T {
        self.x2
    }

    /// Function value at `(x1, x2)`.
    pub fn value(&self) -> T {
        self.value
    }

    /// Returns the point.
    pub fn point(&self) -> Point<T> {
        Point::new(self.x1, self.x2)
    }

    /// Computes the implied third variable.
    pub fn x3(&self) -> T {
        Domain::remainder(&self.point())
    }
}

/// Ordered, append-only sequence of iterates.
///
/// The order of insertion is the optimization path. Points can be read
/// through the slice API, but never modified or removed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Trajectory<T> {
    points: Vec<TrajectoryPoint<T>>,
}

impl<T> Trajectory<T> {
    /// Creates an empty trajectory.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: RealField + Copy> Trajectory<T> {
    /// Appends a new iterate.
    pub fn push(&mut self, x: &Point<T>, value: T) {
        self.points.push(TrajectoryPoint::new(x, value));
    }
}

impl<T> Default for Trajectory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Trajectory<T> {
    type Target = [TrajectoryPoint<T>];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl<'a, T> IntoIterator for &'a Trajectory<T> {
    type Item = &'a TrajectoryPoint<T>;
    type IntoIter = std::slice::Iter<'a, TrajectoryPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Accumulator threaded through every step of an optimizer run.
///
/// It owns the evaluation counters and the trajectory of a single run, so
/// that all bookkeeping is explicit at each call site.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Recorder<T> {
    /// Evaluation counters.
    #[getset(get_copy = "pub")]
    counters: Counters,
    /// Recorded trajectory.
    #[getset(get = "pub")]
    trajectory: Trajectory<T>,
}

impl<T> Recorder<T> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            counters: Counters::new(),
            trajectory: Trajectory::new(),
        }
    }

    /// Mutable access to the counters, for counted evaluations.
    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    /// Consumes the recorder, returning the counters and the trajectory.
    pub fn into_parts(self) -> (Counters, Trajectory<T>) {
        (self.counters, self.trajectory)
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField + Copy> Recorder<T> {
    /// Appends a new iterate to the trajectory.
    pub fn record(&mut self, x: &Point<T>, value: T) {
        self.trajectory.push(x, value);
    }
}
