//! # stacurve CLI
//!
//! Command-line front end for STA curve analysis: evaluate the tasks of a
//! TOML analysis config against measurement CSVs, inspect single files, or
//! generate demo data.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a synthetic run and config
//! stacurve demo workdir
//!
//! # Extract onsets, peaks and deltas; render the chart
//! stacurve analyze workdir/analysis.toml --png chart.png
//!
//! # Inspect one export
//! stacurve info workdir/sample.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
