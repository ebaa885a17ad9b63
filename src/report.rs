//! Tabular summary of batch runs.
//!
//! The table has one row per run and a separator after each group of runs
//! from the same initial point. Gradient calls of derivative-free methods are
//! printed as `-`. Failed runs show the last accepted point and the
//! evaluations spent until the error, and their errors are listed below the
//! table.

use std::fmt;

use nalgebra::RealField;

use crate::runner::Run;

const HEADER: &str = "| Method            | Start Point | X1        | X2        | Volume    | Steps | GradCalls | ObjCalls | Total Calls |";
const SEPARATOR: &str = "|-------------------|-------------|-----------|-----------|-----------|-------|-----------|----------|-------------|";

/// Displays runs as a Markdown-style table.
pub struct Report<'a, T: RealField + Copy> {
    runs: &'a [Run<T>],
}

impl<'a, T: RealField + Copy> Report<'a, T> {
    /// Creates the report of given runs.
    pub fn new(runs: &'a [Run<T>]) -> Self {
        Self { runs }
    }
}

impl<'a, T: RealField + Copy> fmt::Display for Report<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", HEADER)?;
        writeln!(f, "{}", SEPARATOR)?;

        for (i, run) in self.runs.iter().enumerate() {
            write!(f, "| {:<17} | {:<11} ", run.method().name(), run.seed().name())?;

            let (x, volume, steps, gradient_calls, objective_calls, total_calls) =
                match run.outcome() {
                    Ok(solution) => (
                        solution.x(),
                        solution.volume(),
                        solution.steps(),
                        solution.gradient_calls(),
                        solution.objective_calls(),
                        solution.total_calls(),
                    ),
                    Err(failure) => (
                        failure.x(),
                        failure.volume(),
                        failure.steps(),
                        failure.gradient_calls(),
                        failure.objective_calls(),
                        failure.total_calls(),
                    ),
                };

            let gradient_calls = gradient_calls
                .map(|calls| calls.to_string())
                .unwrap_or_else(|| String::from("-"));

            writeln!(
                f,
                "| {:>9.6} | {:>9.6} | {:>9.6} | {:>5} | {:>9} | {:>8} | {:>11} |",
                x.x, x.y, volume, steps, gradient_calls, objective_calls, total_calls
            )?;

            let group_ends = self
                .runs
                .get(i + 1)
                .map(|next| next.seed().name() != run.seed().name())
                .unwrap_or(true);

            if group_ends {
                writeln!(f, "{}", SEPARATOR)?;
            }
        }

        for run in self.runs {
            if let Err(failure) = run.outcome() {
                writeln!(
                    f,
                    "{} from {} failed: {}",
                    run.method(),
                    run.seed().name(),
                    failure.error()
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        objective::BoxVolume,
        runner::{standard_seeds, Method, Runner, Seed},
    };

    #[test]
    fn one_row_per_run() {
        let f = BoxVolume::new();
        let runs = Runner::new(&f).run_all(&standard_seeds());
        let table = Report::new(&runs).to_string();
        let lines = table.lines().collect::<Vec<_>>();

        assert_eq!(lines[0], HEADER);
        // Header, separator, 3 groups of 3 rows and a separator, 1 failure.
        assert_eq!(lines.len(), 2 + 3 * 4 + 1);
        assert_eq!(lines.iter().filter(|line| **line == SEPARATOR).count(), 4);
        assert_eq!(
            lines.last(),
            Some(&"GradientLipschitz from X1 failed: step left the feasible region")
        );
    }

    #[test]
    fn derivative_free_row() {
        let f = BoxVolume::new();
        let run = Runner::new(&f).run(Method::DeformedSimplex, &Seed::new("Xm", 0.7, 0.7));
        let runs = [run];
        let table = Report::new(&runs).to_string();
        let row = table.lines().nth(2).unwrap();
        let cells = row.split('|').map(str::trim).collect::<Vec<_>>();

        // Leading and trailing empty cells come from the borders.
        assert_eq!(cells[1], "DeformedSimplex");
        assert_eq!(cells[2], "Xm");
        assert_eq!(cells[7], "-");
        assert_eq!(cells[8], cells[9]);
        assert_eq!(row.len(), HEADER.len());
    }

    #[test]
    fn gradient_row() {
        let f = BoxVolume::new();
        let run = Runner::new(&f).run(Method::GradientLipschitz, &Seed::new("Xm", 0.7, 0.7));
        let solution = run.solution().unwrap();
        let steps = solution.steps();
        let runs = [run];
        let table = Report::new(&runs).to_string();
        let row = table.lines().nth(2).unwrap();
        let cells = row.split('|').map(str::trim).collect::<Vec<_>>();

        assert!((cells[3].parse::<f64>().unwrap() - 1.0 / 3.0).abs() < 1e-4);
        assert!((cells[4].parse::<f64>().unwrap() - 1.0 / 3.0).abs() < 1e-4);
        assert_eq!(cells[5], "0.068041");
        assert_eq!(cells[6], steps.to_string());
        assert_eq!(cells[7], steps.to_string());
        assert_eq!(cells[8], "0");
    }

    #[test]
    fn failed_row_keeps_counters() {
        let f = BoxVolume::new();
        let run = Runner::new(&f).run(Method::GradientLipschitz, &Seed::new("X1", 1.0, 1.0));
        let runs = [run];
        let table = Report::new(&runs).to_string();
        let row = table.lines().nth(2).unwrap();
        let cells = row.split('|').map(str::trim).collect::<Vec<_>>();

        assert_eq!(cells[1], "GradientLipschitz");
        assert_eq!(cells[2], "X1");
        assert_eq!(cells[3], "1.000000");
        assert_eq!(cells[4], "1.000000");
        assert_eq!(cells[6], "1");
        assert_eq!(cells[7], "1");
        assert_eq!(cells[8], "0");
        assert_eq!(cells[9], "1");
        assert_eq!(
            table.lines().last(),
            Some("GradientLipschitz from X1 failed: step left the feasible region")
        );
    }
}
