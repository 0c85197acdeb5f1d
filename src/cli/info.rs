use anyhow::{Context, Result};
use std::path::PathBuf;

use stacurve::loader;

/// Range of one column, skipping non-finite samples
fn range(values: &[f64]) -> (f64, f64) {
    values.iter().filter(|v| v.is_finite()).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), v| (lo.min(*v), hi.max(*v)),
    )
}

/// Display information about one measurement CSV
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let series = loader::load_csv_file(&file, None).context("Failed to load measurement table")?;

    println!("STA Measurement File");
    println!("====================");
    println!("File:    {}", file.display());
    println!("Label:   {}", series.label);
    println!("Samples: {}", series.len());
    println!();

    if series.is_empty() {
        println!("(table holds no samples)");
        return Ok(());
    }

    let (t_lo, t_hi) = range(&series.temperature);
    let (w_lo, w_hi) = range(&series.weight);
    let (h_lo, h_hi) = range(&series.heat_flow);

    println!("Columns:");
    println!("  Temperature: {:.2} - {:.2} °C", t_lo, t_hi);
    println!(
        "  Weight:      {:.4} - {:.4} mg (initial {:.4} mg)",
        w_lo, w_hi, series.weight[0]
    );
    println!("  Heat flow:   {:.4} - {:.4} mW", h_lo, h_hi);

    Ok(())
}
