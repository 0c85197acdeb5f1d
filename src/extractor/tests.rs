use proptest::prelude::*;

use super::*;
use crate::series::{MeasurementSeries, Signal, WeightDisplayMode};

fn flat_series(label: &str, temperature: Vec<f64>, weight: Vec<f64>, heat_flow: Vec<f64>) -> MeasurementSeries {
    MeasurementSeries::new(label, temperature, weight, heat_flow).unwrap()
}

/// The worked onset example: tangent1 over (0,0),(10,0) gives y = 0,
/// tangent2 over (20,20),(30,30) gives y = x, intersection at t = 0.
#[test]
fn test_onset_two_line_example() {
    let series = flat_series(
        "run",
        vec![0.0, 10.0, 20.0, 30.0],
        vec![0.0, 0.0, 0.0, 0.0],
        vec![0.0, 0.0, 20.0, 30.0],
    );
    let task = Task::Onset {
        signal: Signal::Dsc,
        tangent1: TemperatureWindow::new(0.0, 10.0),
        tangent2: TemperatureWindow::new(20.0, 30.0),
    };

    let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
    assert!((evaluation.record.value - 0.0).abs() < 1e-9);
    assert_eq!(evaluation.record.signal, "Onset DSC");
    assert_eq!(evaluation.record.unit, "°C");

    let onset = evaluation.onset.unwrap();
    assert!((onset.fit.slope1 - 0.0).abs() < 1e-9);
    assert!((onset.fit.slope2 - 1.0).abs() < 1e-9);
    assert!((onset.onset_value - 0.0).abs() < 1e-9);
}

#[test]
fn test_onset_intersection_satisfies_both_lines() {
    // TG step: flat at 10 mg until 300 °C, then a linear drop.
    let temperature: Vec<f64> = (0..=50).map(|i| i as f64 * 10.0).collect();
    let weight: Vec<f64> = temperature
        .iter()
        .map(|&t| if t < 300.0 { 10.0 } else { 10.0 - (t - 300.0) * 0.02 })
        .collect();
    let heat_flow = vec![0.0; temperature.len()];
    let series = flat_series("run", temperature, weight, heat_flow);

    let task = Task::Onset {
        signal: Signal::Tg,
        tangent1: TemperatureWindow::new(0.0, 250.0),
        tangent2: TemperatureWindow::new(350.0, 500.0),
    };
    let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
    let onset = evaluation.onset.unwrap();

    let t = evaluation.record.value;
    assert!((onset.fit.line1_at(t) - onset.fit.line2_at(t)).abs() < 1e-9);
    // The break sits exactly at 300 °C.
    assert!((t - 300.0).abs() < 1e-6);
    assert!(!onset.extrapolated);
}

#[test]
fn test_onset_insufficient_points() {
    let series = flat_series(
        "run",
        vec![0.0, 10.0, 20.0, 30.0],
        vec![0.0; 4],
        vec![0.0, 0.0, 20.0, 30.0],
    );
    // tangent1 window catches a single sample
    let task = Task::Onset {
        signal: Signal::Dsc,
        tangent1: TemperatureWindow::new(0.0, 5.0),
        tangent2: TemperatureWindow::new(20.0, 30.0),
    };
    let result = evaluate(&series, WeightDisplayMode::Absolute, &task);
    assert!(matches!(
        result,
        Err(ExtractError::InsufficientPoints { found: 1, .. })
    ));
}

#[test]
fn test_onset_parallel_tangents() {
    let series = flat_series(
        "run",
        vec![0.0, 10.0, 20.0, 30.0],
        vec![0.0; 4],
        vec![5.0, 5.0, 7.0, 7.0],
    );
    let task = Task::Onset {
        signal: Signal::Dsc,
        tangent1: TemperatureWindow::new(0.0, 10.0),
        tangent2: TemperatureWindow::new(20.0, 30.0),
    };
    let result = evaluate(&series, WeightDisplayMode::Absolute, &task);
    assert!(matches!(result, Err(ExtractError::ParallelTangents { .. })));
}

#[test]
fn test_onset_singular_fit() {
    // Two samples at the same temperature inside tangent1.
    let series = flat_series(
        "run",
        vec![5.0, 5.0, 20.0, 30.0],
        vec![0.0; 4],
        vec![1.0, 2.0, 20.0, 30.0],
    );
    let task = Task::Onset {
        signal: Signal::Dsc,
        tangent1: TemperatureWindow::new(0.0, 10.0),
        tangent2: TemperatureWindow::new(20.0, 30.0),
    };
    let result = evaluate(&series, WeightDisplayMode::Absolute, &task);
    assert!(matches!(result, Err(ExtractError::SingularFit { .. })));
}

#[test]
fn test_peak_first_occurrence_on_ties() {
    let series = flat_series(
        "run",
        vec![100.0, 110.0, 120.0, 130.0],
        vec![0.0; 4],
        vec![1.0, 4.0, 4.0, 2.0],
    );
    let task = Task::Peak {
        window: TemperatureWindow::new(100.0, 130.0),
    };
    let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
    assert_eq!(evaluation.record.value, 110.0);
    assert_eq!(evaluation.record.signal, "Peak DSC");
}

#[test]
fn test_peak_empty_window() {
    let series = flat_series("run", vec![100.0, 110.0], vec![0.0; 2], vec![1.0, 2.0]);
    let task = Task::Peak {
        window: TemperatureWindow::new(500.0, 600.0),
    };
    let result = evaluate(&series, WeightDisplayMode::Absolute, &task);
    assert!(matches!(result, Err(ExtractError::EmptyWindow { .. })));
}

/// The worked delta example from the requirements: weight 10 mg at 50 °C,
/// 5 mg at 200 °C, delta = first - last = 5 mg.
#[test]
fn test_delta_example() {
    let series = flat_series(
        "run",
        vec![0.0, 50.0, 100.0, 150.0, 200.0],
        vec![10.0, 10.0, 10.0, 5.0, 5.0],
        vec![0.0; 5],
    );
    let task = Task::Delta {
        window: TemperatureWindow::new(50.0, 200.0),
    };
    let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
    assert_eq!(evaluation.record.value, 5.0);
    assert_eq!(evaluation.record.signal, "ΔTG");
    assert_eq!(evaluation.record.unit, "mg");
    assert!(evaluation.onset.is_none());
}

#[test]
fn test_delta_unit_follows_display_mode() {
    let series = flat_series(
        "run",
        vec![0.0, 100.0],
        vec![100.0, 80.0],
        vec![0.0, 0.0],
    );
    let task = Task::Delta {
        window: TemperatureWindow::new(0.0, 100.0),
    };
    let evaluation = evaluate(&series, WeightDisplayMode::PercentOfInitial, &task).unwrap();
    assert_eq!(evaluation.record.unit, "%");
}

#[test]
fn test_delta_single_sample_is_insufficient() {
    let series = flat_series("run", vec![0.0, 100.0], vec![10.0, 9.0], vec![0.0; 2]);
    let task = Task::Delta {
        window: TemperatureWindow::new(90.0, 110.0),
    };
    let result = evaluate(&series, WeightDisplayMode::Absolute, &task);
    assert!(matches!(
        result,
        Err(ExtractError::InsufficientPoints { found: 1, .. })
    ));
}

#[test]
fn test_delta_reversed_samples_negate() {
    let temperature = vec![0.0, 50.0, 100.0, 150.0, 200.0];
    let weight = vec![10.0, 10.0, 10.0, 5.0, 5.0];
    let forward = flat_series("fwd", temperature.clone(), weight.clone(), vec![0.0; 5]);
    let reversed = flat_series(
        "rev",
        temperature.into_iter().rev().collect(),
        weight.into_iter().rev().collect(),
        vec![0.0; 5],
    );

    let task = Task::Delta {
        window: TemperatureWindow::new(0.0, 200.0),
    };
    let fwd = evaluate(&forward, WeightDisplayMode::Absolute, &task).unwrap();
    let rev = evaluate(&reversed, WeightDisplayMode::Absolute, &task).unwrap();
    assert_eq!(fwd.record.value, -rev.record.value);
}

#[test]
fn test_onset_extrapolated_flag() {
    // Flat line y = 10 against y = x: they cross at t = 10, far left of
    // the sampled span.
    let series = flat_series(
        "run",
        vec![100.0, 110.0, 200.0, 210.0],
        vec![0.0; 4],
        vec![10.0, 10.0, 200.0, 210.0],
    );
    let task = Task::Onset {
        signal: Signal::Dsc,
        tangent1: TemperatureWindow::new(100.0, 110.0),
        tangent2: TemperatureWindow::new(200.0, 210.0),
    };
    let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
    let onset = evaluation.onset.unwrap();
    assert!((onset.onset_temperature - 10.0).abs() < 1e-9);
    assert!(onset.extrapolated);
    // Nearest-edge extrapolation from the flat first segment.
    assert!((onset.onset_value - 10.0).abs() < 1e-9);
}

proptest! {
    /// Peak extraction always matches a brute-force scan over the window.
    #[test]
    fn prop_peak_matches_brute_force(
        flows in proptest::collection::vec(-100.0_f64..100.0, 3..60),
        lo in 0usize..20,
        hi in 20usize..60,
    ) {
        let n = flows.len();
        let temperature: Vec<f64> = (0..n).map(|i| i as f64 * 5.0).collect();
        let series = MeasurementSeries::new(
            "prop",
            temperature.clone(),
            vec![0.0; n],
            flows.clone(),
        ).unwrap();

        let window = TemperatureWindow::new(lo as f64 * 5.0, hi as f64 * 5.0);
        let task = Task::Peak { window };

        let expected = temperature
            .iter()
            .zip(&flows)
            .filter(|(t, _)| window.contains(**t))
            .fold(None::<(f64, f64)>, |best, (t, f)| match best {
                Some((_, bf)) if bf >= *f => best,
                _ => Some((*t, *f)),
            });

        match (evaluate(&series, WeightDisplayMode::Absolute, &task), expected) {
            (Ok(evaluation), Some((t, _))) => prop_assert_eq!(evaluation.record.value, t),
            (Err(ExtractError::EmptyWindow { .. }), None) => {}
            (got, want) => prop_assert!(false, "mismatch: got {:?}, want {:?}", got, want),
        }
    }

    /// For distinct tangent slopes the intersection satisfies both line
    /// equations within floating-point tolerance.
    #[test]
    fn prop_onset_is_intersection(
        slope1 in -5.0_f64..5.0,
        slope2 in -5.0_f64..5.0,
        intercept1 in -50.0_f64..50.0,
        intercept2 in -50.0_f64..50.0,
    ) {
        prop_assume!((slope1 - slope2).abs() > 1e-3);

        // Sample both lines exactly over disjoint windows.
        let t1: Vec<f64> = (0..5).map(|i| i as f64 * 2.0).collect();
        let t2: Vec<f64> = (0..5).map(|i| 100.0 + i as f64 * 2.0).collect();
        let temperature: Vec<f64> = t1.iter().chain(t2.iter()).copied().collect();
        let heat_flow: Vec<f64> = t1
            .iter()
            .map(|t| slope1 * t + intercept1)
            .chain(t2.iter().map(|t| slope2 * t + intercept2))
            .collect();
        let series = MeasurementSeries::new(
            "prop",
            temperature,
            vec![0.0; 10],
            heat_flow,
        ).unwrap();

        let task = Task::Onset {
            signal: Signal::Dsc,
            tangent1: TemperatureWindow::new(0.0, 8.0),
            tangent2: TemperatureWindow::new(100.0, 108.0),
        };
        let evaluation = evaluate(&series, WeightDisplayMode::Absolute, &task).unwrap();
        let t = evaluation.record.value;

        let y1 = slope1 * t + intercept1;
        let y2 = slope2 * t + intercept2;
        prop_assert!((y1 - y2).abs() < 1e-6 * (1.0 + y1.abs()));
    }
}
