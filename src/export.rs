//! JSON export of the trajectories of batch runs.
//!
//! The output is an array of records, one per run:
//!
//! ```text
//! [
//!   {
//!     "Method": "GradientLipschitz",
//!     "StartPoint": "Xm",
//!     "Path": [{ "X1": 0.7, "X2": 0.7, "Value": 0.0245 }, ...]
//!   },
//!   ...
//! ]
//! ```
//!
//! Failed runs are exported with their partial trajectory.

use std::io;

use nalgebra::RealField;
use serde::Serialize;
use thiserror::Error;

use crate::{core::Trajectory, runner::Run};

/// Error returned from the export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing the output failed.
    #[error("writing output failed: {0}")]
    Io(#[from] io::Error),
}

/// Serializable view of a single run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunRecord<'a, T> {
    method: &'static str,
    start_point: &'a str,
    path: &'a Trajectory<T>,
}

impl<'a, T: RealField + Copy> From<&'a Run<T>> for RunRecord<'a, T> {
    fn from(run: &'a Run<T>) -> Self {
        Self {
            method: run.method().name(),
            start_point: run.seed().name(),
            path: run.trajectory(),
        }
    }
}

fn records<T: RealField + Copy>(runs: &[Run<T>]) -> Vec<RunRecord<'_, T>> {
    runs.iter().map(RunRecord::from).collect()
}

/// Writes pretty-printed JSON of the runs into the writer.
pub fn to_writer<T, W>(runs: &[Run<T>], writer: W) -> Result<(), ExportError>
where
    T: RealField + Copy + Serialize,
    W: io::Write,
{
    serde_json::to_writer_pretty(writer, &records(runs))?;
    Ok(())
}

/// Returns pretty-printed JSON of the runs.
pub fn to_string<T>(runs: &[Run<T>]) -> Result<String, ExportError>
where
    T: RealField + Copy + Serialize,
{
    Ok(serde_json::to_string_pretty(&records(runs))?)
}
