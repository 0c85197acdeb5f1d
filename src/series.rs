//! # Measurement Series Module
//!
//! Core data model for one STA run: an ordered sequence of
//! `(temperature, weight, heat_flow)` samples, plus the preprocessing
//! operations that turn a raw table into a plot-ready series
//! (baseline subtraction and weight-unit conversion).
//!
//! A series is never mutated after normalization; every transform
//! produces a new `MeasurementSeries`.

use serde::{Deserialize, Serialize};

/// Temperature grids are considered positionally aligned when no pair of
/// samples diverges by more than this many degrees Celsius.
const BASELINE_GRID_TOLERANCE: f64 = 1.0;

/// Errors that can occur while constructing or normalizing a series
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Raw and baseline runs have different sample counts
    #[error("baseline length mismatch: raw run has {raw_len} samples, baseline has {baseline_len}")]
    DimensionMismatch {
        /// Sample count of the raw run
        raw_len: usize,
        /// Sample count of the baseline run
        baseline_len: usize,
    },

    /// The decoded columns of one table have different lengths
    #[error("column length mismatch: temperature {temperature}, weight {weight}, heat flow {heat_flow}")]
    ColumnMismatch {
        /// Length of the temperature column
        temperature: usize,
        /// Length of the weight column
        weight: usize,
        /// Length of the heat-flow column
        heat_flow: usize,
    },

    /// The series holds no samples, so there is no initial weight to scale by
    #[error("series '{0}' is empty")]
    Empty(String),

    /// Percent conversion would divide by a zero initial weight
    #[error("series '{0}' has zero initial weight, cannot convert to percent")]
    ZeroInitialWeight(String),
}

/// Which measured channel a task operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    /// Thermogravimetric signal: sample mass over temperature
    Tg,
    /// Differential scanning calorimetry signal: heat flow over temperature
    Dsc,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Tg => write!(f, "TG"),
            Signal::Dsc => write!(f, "DSC"),
        }
    }
}

/// How TG weights are presented: raw milligrams or percent of the
/// first sample's weight after baseline correction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightDisplayMode {
    /// Weights stay in milligrams
    #[default]
    Absolute,
    /// Weights rescaled by `100 / weight[0]`
    PercentOfInitial,
}

impl WeightDisplayMode {
    /// Unit label for TG values under this mode
    pub fn weight_unit(&self) -> &'static str {
        match self {
            WeightDisplayMode::Absolute => "mg",
            WeightDisplayMode::PercentOfInitial => "%",
        }
    }
}

/// One STA run: temperature-ordered weight and heat-flow samples
///
/// Temperatures are assumed monotonically non-decreasing in acquisition
/// order; this is not enforced. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementSeries {
    /// Legend label shown for this run (defaults to the file stem)
    pub label: String,
    /// Sample temperatures in degrees Celsius
    pub temperature: Vec<f64>,
    /// Sample weights in milligrams (or percent after conversion)
    pub weight: Vec<f64>,
    /// Heat flow in milliwatts
    pub heat_flow: Vec<f64>,
}

impl MeasurementSeries {
    /// Build a series from decoded columns, rejecting ragged input
    pub fn new(
        label: impl Into<String>,
        temperature: Vec<f64>,
        weight: Vec<f64>,
        heat_flow: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if temperature.len() != weight.len() || temperature.len() != heat_flow.len() {
            return Err(SeriesError::ColumnMismatch {
                temperature: temperature.len(),
                weight: weight.len(),
                heat_flow: heat_flow.len(),
            });
        }
        Ok(Self {
            label: label.into(),
            temperature,
            weight,
            heat_flow,
        })
    }

    /// Number of samples in the series
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    /// The channel values for the given signal
    pub fn signal_values(&self, signal: Signal) -> &[f64] {
        match signal {
            Signal::Tg => &self.weight,
            Signal::Dsc => &self.heat_flow,
        }
    }

    /// Subtract a blank run pointwise from this run's weight and heat flow.
    ///
    /// Alignment is positional, not temperature-interpolated: sample `i` of
    /// the baseline is subtracted from sample `i` of the raw run, so both
    /// runs must have the same sample count. A mismatch is reported as
    /// [`SeriesError::DimensionMismatch`] rather than silently truncated.
    pub fn apply_baseline(&self, baseline: &MeasurementSeries) -> Result<Self, SeriesError> {
        if self.len() != baseline.len() {
            return Err(SeriesError::DimensionMismatch {
                raw_len: self.len(),
                baseline_len: baseline.len(),
            });
        }

        // Positional alignment silently produces wrong numbers when the two
        // runs were sampled on different temperature programs; surface that.
        let max_divergence = self
            .temperature
            .iter()
            .zip(&baseline.temperature)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        if max_divergence > BASELINE_GRID_TOLERANCE {
            log::warn!(
                "baseline for '{}' diverges from the sample temperature grid by up to {:.1} °C; \
                 subtraction is positional, results may be skewed",
                self.label,
                max_divergence
            );
        }

        let weight = self
            .weight
            .iter()
            .zip(&baseline.weight)
            .map(|(w, b)| w - b)
            .collect();
        let heat_flow = self
            .heat_flow
            .iter()
            .zip(&baseline.heat_flow)
            .map(|(h, b)| h - b)
            .collect();

        Ok(Self {
            label: self.label.clone(),
            temperature: self.temperature.clone(),
            weight,
            heat_flow,
        })
    }

    /// Convert weights for display: identity for [`WeightDisplayMode::Absolute`],
    /// `weight[i] * 100 / weight[0]` for [`WeightDisplayMode::PercentOfInitial`].
    ///
    /// Pure transform; temperature and heat flow pass through untouched.
    pub fn to_display_weight(&self, mode: WeightDisplayMode) -> Result<Self, SeriesError> {
        match mode {
            WeightDisplayMode::Absolute => Ok(self.clone()),
            WeightDisplayMode::PercentOfInitial => {
                let initial = *self
                    .weight
                    .first()
                    .ok_or_else(|| SeriesError::Empty(self.label.clone()))?;
                if initial == 0.0 {
                    return Err(SeriesError::ZeroInitialWeight(self.label.clone()));
                }
                let weight = self.weight.iter().map(|w| w * 100.0 / initial).collect();
                Ok(Self {
                    label: self.label.clone(),
                    temperature: self.temperature.clone(),
                    weight,
                    heat_flow: self.heat_flow.clone(),
                })
            }
        }
    }
}
