use std::{env, fs::File, io::BufWriter};

use boxopt::{
    export::{self, ExportError},
    report::Report,
    runner::{standard_seeds, Runner},
    BoxVolume,
};
use log::info;

const DEFAULT_OUTPUT: &str = "optimizationPaths.json";

fn main() -> Result<(), ExportError> {
    env_logger::init();

    let output = env::args().nth(1).unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let f = BoxVolume::new();
    let runs = Runner::new(&f).run_all(&standard_seeds());

    print!("{}", Report::new(&runs));

    let writer = BufWriter::new(File::create(&output)?);
    export::to_writer(&runs, writer)?;

    info!("wrote {} trajectories to {}", runs.len(), output);
    println!("Optimization paths have been written to '{}'.", output);

    Ok(())
}
