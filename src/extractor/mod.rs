//! # Feature Extractor Module
//!
//! Evaluates one analysis task against one normalized measurement series,
//! producing a single characteristic value (onset temperature, peak
//! temperature or weight-loss delta) plus any auxiliary fit data needed for
//! overlay rendering.
//!
//! The onset algorithm fits first-degree least-squares tangents to two
//! user-chosen temperature windows and intersects them; the peak algorithm
//! locates the maximum heat flow inside a window; the delta algorithm takes
//! the weight difference across a window (first minus last, so mass loss is
//! positive).
//!
//! Every evaluation is a pure function of `(series, mode, task)`: no state
//! survives between invocations and re-running is always safe. Degenerate
//! inputs (empty windows, singular fits, parallel tangents) are reported as
//! [`ExtractError`] values for the caller to skip, never panics.

use serde::{Deserialize, Serialize};

use crate::series::{MeasurementSeries, Signal, WeightDisplayMode};

mod error;
mod fit;

pub use error::ExtractError;

#[cfg(test)]
mod tests;

/// A closed temperature interval in degrees Celsius.
///
/// `start <= end` is expected but not validated; a reversed or out-of-domain
/// window simply selects no samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureWindow {
    /// Lower bound in °C
    pub start: f64,
    /// Upper bound in °C
    pub end: f64,
}

impl TemperatureWindow {
    /// Build a window from its bounds
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether `t` lies in the closed interval
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
}

/// One user-defined analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Task {
    /// Onset temperature via dual-tangent intersection, on TG or DSC
    Onset {
        /// Which channel the tangents are fitted to
        signal: Signal,
        /// Window for the pre-transition tangent
        tangent1: TemperatureWindow,
        /// Window for the post-transition tangent
        tangent2: TemperatureWindow,
    },
    /// Peak temperature: the maximum heat flow within a window (DSC only)
    Peak {
        /// Search window
        window: TemperatureWindow,
    },
    /// Weight delta across a window (TG only), first minus last sample
    Delta {
        /// Selection window
        window: TemperatureWindow,
    },
}

/// One extracted feature, ready for the result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Legend label of the run the value was extracted from
    pub source_label: String,
    /// What was extracted, e.g. `"Onset DSC"` or `"ΔTG"`
    pub signal: String,
    /// The extracted value
    pub value: f64,
    /// Unit of the value: `"°C"`, `"mg"` or `"%"`
    pub unit: String,
}

/// Parameters of the two fitted tangent lines, `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TangentFit {
    /// Slope of the first tangent
    pub slope1: f64,
    /// Intercept of the first tangent
    pub intercept1: f64,
    /// Slope of the second tangent
    pub slope2: f64,
    /// Intercept of the second tangent
    pub intercept2: f64,
}

impl TangentFit {
    /// First tangent evaluated at temperature `t`
    pub fn line1_at(&self, t: f64) -> f64 {
        self.slope1 * t + self.intercept1
    }

    /// Second tangent evaluated at temperature `t`
    pub fn line2_at(&self, t: f64) -> f64 {
        self.slope2 * t + self.intercept2
    }
}

/// Side artifacts of an onset extraction, consumed by overlay rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsetArtifacts {
    /// Channel the tangents were fitted to
    pub signal: Signal,
    /// The two fitted tangent lines
    pub fit: TangentFit,
    /// Outer window the overlay is drawn across, `[tangent1.start, tangent2.end]`
    pub window: TemperatureWindow,
    /// Intersection temperature of the two tangents
    pub onset_temperature: f64,
    /// Signal value interpolated from the curve at the onset temperature
    pub onset_value: f64,
    /// True when the onset lies outside the outer window's sampled
    /// temperature span and the value was obtained by extrapolation
    pub extrapolated: bool,
}

/// Outcome of a successful task evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The extracted feature
    pub record: ResultRecord,
    /// Tangent overlay data, present for onset tasks only
    pub onset: Option<OnsetArtifacts>,
}

/// Select the `(temperature, signal)` samples whose temperature lies in `window`
fn windowed(
    series: &MeasurementSeries,
    signal: Signal,
    window: TemperatureWindow,
) -> (Vec<f64>, Vec<f64>) {
    let values = series.signal_values(signal);
    series
        .temperature
        .iter()
        .zip(values)
        .filter(|(t, _)| window.contains(**t))
        .map(|(t, v)| (*t, *v))
        .unzip()
}

/// Evaluate one task against one normalized series.
///
/// The series is expected to already be baseline-corrected and
/// display-converted; `mode` is consulted only for the unit label of delta
/// results. Returns [`ExtractError`] for degenerate inputs, which callers
/// treat as "no result for this task" rather than a fatal condition.
pub fn evaluate(
    series: &MeasurementSeries,
    mode: WeightDisplayMode,
    task: &Task,
) -> Result<Evaluation, ExtractError> {
    match task {
        Task::Onset {
            signal,
            tangent1,
            tangent2,
        } => evaluate_onset(series, *signal, *tangent1, *tangent2),
        Task::Peak { window } => evaluate_peak(series, *window),
        Task::Delta { window } => evaluate_delta(series, mode, *window),
    }
}

fn evaluate_onset(
    series: &MeasurementSeries,
    signal: Signal,
    tangent1: TemperatureWindow,
    tangent2: TemperatureWindow,
) -> Result<Evaluation, ExtractError> {
    let (x1, y1) = windowed(series, signal, tangent1);
    let (x2, y2) = windowed(series, signal, tangent2);

    let line1 = fit::fit_line(&x1, &y1, tangent1)?;
    let line2 = fit::fit_line(&x2, &y2, tangent2)?;

    let denominator = line1.slope - line2.slope;
    let onset_temperature = (line2.intercept - line1.intercept) / denominator;
    if denominator == 0.0 || !onset_temperature.is_finite() {
        return Err(ExtractError::ParallelTangents { slope: line1.slope });
    }

    // The displayed overlay spans both tangent windows.
    let outer = TemperatureWindow::new(tangent1.start, tangent2.end);
    let (ox, oy) = windowed(series, signal, outer);
    if ox.len() < 2 {
        return Err(ExtractError::InsufficientPoints {
            start: outer.start,
            end: outer.end,
            needed: 2,
            found: ox.len(),
        });
    }

    // Unclamped interpolation: an onset outside the sampled span is
    // extrapolated from the nearest edge segment and flagged as such.
    let onset_value = fit::interpolate(&ox, &oy, onset_temperature).unwrap_or(line1.at(onset_temperature));
    let sampled_min = ox[0];
    let sampled_max = ox[ox.len() - 1];
    let extrapolated = onset_temperature < sampled_min || onset_temperature > sampled_max;

    Ok(Evaluation {
        record: ResultRecord {
            source_label: series.label.clone(),
            signal: format!("Onset {}", signal),
            value: onset_temperature,
            unit: "°C".to_string(),
        },
        onset: Some(OnsetArtifacts {
            signal,
            fit: TangentFit {
                slope1: line1.slope,
                intercept1: line1.intercept,
                slope2: line2.slope,
                intercept2: line2.intercept,
            },
            window: outer,
            onset_temperature,
            onset_value,
            extrapolated,
        }),
    })
}

fn evaluate_peak(
    series: &MeasurementSeries,
    window: TemperatureWindow,
) -> Result<Evaluation, ExtractError> {
    let (temps, flows) = windowed(series, Signal::Dsc, window);
    if temps.is_empty() {
        return Err(ExtractError::EmptyWindow {
            start: window.start,
            end: window.end,
        });
    }

    // Strict comparison keeps the first occurrence on ties.
    let mut peak_idx = 0;
    for (i, flow) in flows.iter().enumerate() {
        if *flow > flows[peak_idx] {
            peak_idx = i;
        }
    }

    Ok(Evaluation {
        record: ResultRecord {
            source_label: series.label.clone(),
            signal: "Peak DSC".to_string(),
            value: temps[peak_idx],
            unit: "°C".to_string(),
        },
        onset: None,
    })
}

fn evaluate_delta(
    series: &MeasurementSeries,
    mode: WeightDisplayMode,
    window: TemperatureWindow,
) -> Result<Evaluation, ExtractError> {
    let (temps, weights) = windowed(series, Signal::Tg, window);
    if temps.is_empty() {
        return Err(ExtractError::EmptyWindow {
            start: window.start,
            end: window.end,
        });
    }
    if temps.len() < 2 {
        return Err(ExtractError::InsufficientPoints {
            start: window.start,
            end: window.end,
            needed: 2,
            found: temps.len(),
        });
    }

    // First minus last: a positive delta is mass lost across the window.
    let delta = weights[0] - weights[weights.len() - 1];

    Ok(Evaluation {
        record: ResultRecord {
            source_label: series.label.clone(),
            signal: "ΔTG".to_string(),
            value: delta,
            unit: mode.weight_unit().to_string(),
        },
        onset: None,
    })
}
