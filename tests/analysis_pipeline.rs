//! End-to-end pipeline tests: CSV on disk -> loader -> session -> results.

use std::fs;

use tempfile::tempdir;

use stacurve::extractor::{Task, TemperatureWindow};
use stacurve::loader;
use stacurve::series::{Signal, WeightDisplayMode};
use stacurve::session::AnalysisSession;

const SAMPLE_CSV: &str = "\
Program Temperature,Unsubtracted Weight,Unsubtracted Heat Flow
0.0,10.10,0.00
50.0,10.10,0.10
100.0,10.10,0.80
125.0,7.60,2.50
150.0,5.10,0.90
200.0,5.10,0.20
";

const BASELINE_CSV: &str = "\
Program Temperature,Unsubtracted Weight,Unsubtracted Heat Flow
0.0,0.10,0.00
50.0,0.10,0.10
100.0,0.10,0.10
125.0,0.10,0.10
150.0,0.10,0.10
200.0,0.10,0.10
";

#[test]
fn csv_to_results_with_baseline() {
    let dir = tempdir().unwrap();
    let sample_path = dir.path().join("sample.csv");
    let baseline_path = dir.path().join("baseline.csv");
    fs::write(&sample_path, SAMPLE_CSV).unwrap();
    fs::write(&baseline_path, BASELINE_CSV).unwrap();

    let raw = loader::load_csv_file(&sample_path, Some("Sample A")).unwrap();
    let baseline = loader::load_csv_file(&baseline_path, None).unwrap();

    let mut session = AnalysisSession::new();
    session.add_source(raw, Some(baseline));
    session.add_task(Task::Delta {
        window: TemperatureWindow::new(0.0, 200.0),
    });
    session.add_task(Task::Peak {
        window: TemperatureWindow::new(50.0, 200.0),
    });

    let report = session.evaluate();
    assert!(report.failures.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(report.records.len(), 2);

    // Baseline-corrected weights run from 10.0 to 5.0 mg.
    let delta = &report.records[0];
    assert_eq!(delta.source_label, "Sample A");
    assert!((delta.value - 5.0).abs() < 1e-9);
    assert_eq!(delta.unit, "mg");

    // Corrected heat flow still peaks at 125 °C.
    let peak = &report.records[1];
    assert_eq!(peak.value, 125.0);
    assert_eq!(peak.unit, "°C");
}

#[test]
fn percent_mode_pipeline() {
    let dir = tempdir().unwrap();
    let sample_path = dir.path().join("sample.csv");
    fs::write(&sample_path, SAMPLE_CSV).unwrap();

    let raw = loader::load_csv_file(&sample_path, None).unwrap();

    let mut session = AnalysisSession::new();
    session.weight_mode = WeightDisplayMode::PercentOfInitial;
    session.add_source(raw, None);
    session.add_task(Task::Delta {
        window: TemperatureWindow::new(0.0, 200.0),
    });

    let report = session.evaluate();
    // Label defaults to the file stem.
    assert_eq!(report.records[0].source_label, "sample");
    assert_eq!(report.records[0].unit, "%");
    assert_eq!(report.series[0].weight[0], 100.0);
}

#[test]
fn mismatched_baseline_fails_one_file_only() {
    let dir = tempdir().unwrap();
    let sample_path = dir.path().join("sample.csv");
    let short_path = dir.path().join("short.csv");
    fs::write(&sample_path, SAMPLE_CSV).unwrap();
    fs::write(
        &short_path,
        "Program Temperature,Unsubtracted Weight,Unsubtracted Heat Flow\n0.0,0.1,0.0\n",
    )
    .unwrap();

    let broken = loader::load_csv_file(&sample_path, Some("broken")).unwrap();
    let short_baseline = loader::load_csv_file(&short_path, None).unwrap();
    let good = loader::load_csv_file(&sample_path, Some("good")).unwrap();

    let mut session = AnalysisSession::new();
    session.add_source(broken, Some(short_baseline));
    session.add_source(good, None);
    session.add_task(Task::Peak {
        window: TemperatureWindow::new(0.0, 200.0),
    });

    let report = session.evaluate();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source_label, "broken");
    assert!(report.failures[0].reason.contains("mismatch"));
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].source_label, "good");
}

#[test]
fn onset_task_round_trips_to_json() {
    let dir = tempdir().unwrap();
    let sample_path = dir.path().join("sample.csv");
    fs::write(&sample_path, SAMPLE_CSV).unwrap();

    let raw = loader::load_csv_file(&sample_path, Some("Sample A")).unwrap();

    let mut session = AnalysisSession::new();
    session.add_source(raw, None);
    session.add_task(Task::Onset {
        signal: Signal::Tg,
        tangent1: TemperatureWindow::new(0.0, 100.0),
        tangent2: TemperatureWindow::new(100.0, 150.0),
    });

    let report = session.evaluate();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].signal, "Onset TG");
    assert_eq!(report.overlays.len(), 1);

    let json = serde_json::to_string(&report.records).unwrap();
    let parsed: Vec<stacurve::extractor::ResultRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report.records);
}
