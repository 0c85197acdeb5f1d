use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use stacurve::loader;
use stacurve::session::{AnalysisSession, SessionReport};

use super::config::AnalysisConfig;

/// Evaluate the tasks of an analysis config against its measurement files
pub fn run(
    config_path: PathBuf,
    json: Option<PathBuf>,
    #[cfg(feature = "plot")] png: Option<PathBuf>,
) -> Result<()> {
    let config = AnalysisConfig::from_file(&config_path)?;
    if config.sources.is_empty() {
        anyhow::bail!("config {} names no [[source]] entries", config_path.display());
    }

    let mut session = AnalysisSession::new();
    session.weight_mode = config.weight_mode();

    // A file that fails to load is reported and skipped; the rest of the
    // analysis continues.
    let config_dir = config_path.parent().map(PathBuf::from).unwrap_or_default();
    for source in &config.sources {
        let path = config_dir.join(&source.path);
        let raw = match loader::load_csv_file(&path, source.label.as_deref()) {
            Ok(series) => series,
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                continue;
            }
        };

        let baseline = match &source.baseline {
            Some(baseline_path) => {
                let path = config_dir.join(baseline_path);
                match loader::load_csv_file(&path, None) {
                    Ok(series) => {
                        info!("baseline {} applied to '{}'", path.display(), raw.label);
                        Some(series)
                    }
                    Err(err) => {
                        warn!(
                            "baseline {} not usable for '{}': {}; analyzing uncorrected",
                            path.display(),
                            raw.label,
                            err
                        );
                        None
                    }
                }
            }
            None => None,
        };

        session.add_source(raw, baseline);
    }

    for task in config.to_tasks() {
        session.add_task(task);
    }

    let report = session.evaluate();
    print_report(&report);

    if let Some(json_path) = json {
        let rendered = serde_json::to_string_pretty(&report.records)
            .context("Failed to serialize result records")?;
        if json_path.as_os_str() == "-" {
            println!("{}", rendered);
        } else {
            std::fs::write(&json_path, rendered)
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
            info!("results written to {}", json_path.display());
        }
    }

    #[cfg(feature = "plot")]
    if let Some(png_path) = png {
        stacurve::plot::render_png(
            &png_path,
            &report.series,
            &report.overlays,
            &config.plot_config(),
        )
        .context("Failed to render chart")?;
        info!("chart written to {}", png_path.display());
    }

    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("Analysis Results");
    println!("================");

    if report.records.is_empty() {
        println!("(no task produced a result)");
    } else {
        println!("{:<24} {:<12} {:>12}  Unit", "Source", "Signal", "Value");
        println!("{}", "-".repeat(56));
        for record in &report.records {
            println!(
                "{:<24} {:<12} {:>12.3}  {}",
                record.source_label, record.signal, record.value, record.unit
            );
        }
    }

    for skip in &report.skipped {
        warn!("{} on '{}': {}", skip.task, skip.source_label, skip.reason);
    }
    for failure in &report.failures {
        warn!("run '{}' not analyzed: {}", failure.source_label, failure.reason);
    }
}
