use anyhow::{Context, Result};
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Sample count of the generated run
const SAMPLES: usize = 600;
/// Temperature ramp of the generated run in °C
const T_START: f64 = 25.0;
const T_END: f64 = 625.0;
/// Center of the synthetic decomposition step in °C
const STEP_CENTER: f64 = 400.0;

/// Generate a synthetic STA run plus a matching analysis config
pub fn run(dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let sample_path = dir.join("sample.csv");
    let baseline_path = dir.join("baseline.csv");
    let config_path = dir.join("analysis.toml");

    write_csv(&sample_path, generate_sample()).context("Failed to write sample run")?;
    write_csv(&baseline_path, generate_baseline()).context("Failed to write baseline run")?;
    std::fs::write(&config_path, demo_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!("demo data written to {}", dir.display());
    info!("  sample run:   {}", sample_path.display());
    info!("  baseline run: {}", baseline_path.display());
    info!("  config:       {}", config_path.display());

    println!("Demo files written to {}. Try:", dir.display());
    println!("  stacurve analyze {}", config_path.display());

    Ok(())
}

/// A decomposition-like run: sigmoid mass-loss step around
/// [`STEP_CENTER`] and a Gaussian DSC peak slightly above it.
fn generate_sample() -> Vec<(f64, f64, f64)> {
    (0..SAMPLES)
        .map(|i| {
            let t = T_START + (T_END - T_START) * i as f64 / (SAMPLES - 1) as f64;
            // 12 mg initial mass, 4 mg lost across the step.
            let weight = 12.0 - 4.0 / (1.0 + (-(t - STEP_CENTER) / 12.0).exp());
            // Endothermic peak at 410 °C on a shallow drifting baseline.
            let heat_flow = 0.05 + t * 0.0004 + 3.2 * (-0.5 * ((t - 410.0) / 14.0).powi(2)).exp();
            (t, weight, heat_flow)
        })
        .collect()
}

/// Blank run on the same temperature program: no mass signal, only drift
fn generate_baseline() -> Vec<(f64, f64, f64)> {
    (0..SAMPLES)
        .map(|i| {
            let t = T_START + (T_END - T_START) * i as f64 / (SAMPLES - 1) as f64;
            (t, 0.02, 0.05 + t * 0.0004)
        })
        .collect()
}

fn write_csv(path: &Path, rows: Vec<(f64, f64, f64)>) -> Result<()> {
    let mut out = String::with_capacity(rows.len() * 32);
    out.push_str("Program Temperature,Unsubtracted Weight,Unsubtracted Heat Flow\n");
    for (t, w, h) in rows {
        // Infallible for String targets.
        let _ = writeln!(out, "{:.2},{:.5},{:.5}", t, w, h);
    }
    std::fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn demo_config() -> &'static str {
    r#"[display]
weight = "mg"
show_tg = true
show_dsc = true

[[source]]
path = "sample.csv"
label = "Demo sample"
baseline = "baseline.csv"

# Onset of the mass-loss step via dual tangents on the TG curve.
[[task]]
kind = "onset"
signal = "tg"
tangent1 = [100.0, 340.0]
tangent2 = [380.0, 420.0]

# DSC peak of the decomposition.
[[task]]
kind = "peak"
window = [350.0, 470.0]

# Total mass lost across the step.
[[task]]
kind = "delta"
window = [100.0, 600.0]
"#
}
