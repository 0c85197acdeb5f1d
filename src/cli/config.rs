//! TOML analysis config files.
//!
//! One config names the measurement files, their optional baselines and
//! legend labels, the task list, and the display settings:
//!
//! ```toml
//! # analysis.toml
//! [display]
//! weight = "percent"   # or "mg"
//! show_tg = true
//! show_dsc = true
//!
//! [axes.temperature]
//! min = 0.0
//! max = 1000.0
//!
//! [[source]]
//! path = "sample_a.csv"
//! label = "Sample A"
//! baseline = "blank.csv"
//!
//! [[task]]
//! kind = "onset"
//! signal = "dsc"
//! tangent1 = [240.0, 280.0]
//! tangent2 = [300.0, 340.0]
//!
//! [[task]]
//! kind = "peak"
//! window = [280.0, 360.0]
//!
//! [[task]]
//! kind = "delta"
//! window = [100.0, 500.0]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use stacurve::extractor::{Task, TemperatureWindow};
use stacurve::series::{Signal, WeightDisplayMode};

/// Root structure of an analysis config file.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Axis limit settings.
    #[serde(default)]
    pub axes: AxesConfig,

    /// Measurement files to analyze.
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,

    /// Analysis tasks to evaluate against every file.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,
}

/// Signal visibility and weight unit.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// TG weight unit: `"mg"` or `"percent"`.
    pub weight: WeightUnitArg,

    /// Draw/analyze the TG curves.
    pub show_tg: bool,

    /// Draw/analyze the DSC curves.
    pub show_dsc: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight: WeightUnitArg::Mg,
            show_tg: true,
            show_dsc: true,
        }
    }
}

/// TG weight unit choice in the config file.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnitArg {
    /// Absolute milligrams.
    #[default]
    Mg,
    /// Percent of the initial weight.
    Percent,
}

impl From<WeightUnitArg> for WeightDisplayMode {
    fn from(arg: WeightUnitArg) -> Self {
        match arg {
            WeightUnitArg::Mg => WeightDisplayMode::Absolute,
            WeightUnitArg::Percent => WeightDisplayMode::PercentOfInitial,
        }
    }
}

/// Explicit axis limits; every axis left out is scaled automatically.
#[derive(Debug, Default, Deserialize)]
pub struct AxesConfig {
    /// Temperature (x) axis limits.
    pub temperature: Option<AxisRange>,

    /// TG (left) axis limits.
    pub tg: Option<AxisRange>,

    /// DSC (right) axis limits.
    pub dsc: Option<AxisRange>,
}

/// Fixed numeric limits for one axis.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AxisRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// One measurement file entry.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Path of the measurement CSV.
    pub path: PathBuf,

    /// Legend label (defaults to the file stem).
    pub label: Option<String>,

    /// Optional baseline CSV subtracted positionally.
    pub baseline: Option<PathBuf>,
}

/// One task entry, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum TaskConfig {
    /// Dual-tangent onset extraction.
    Onset {
        /// Channel the tangents are fitted to.
        signal: SignalArg,
        /// `[start, end]` of the first tangent window in °C.
        tangent1: [f64; 2],
        /// `[start, end]` of the second tangent window in °C.
        tangent2: [f64; 2],
    },
    /// DSC peak temperature.
    Peak {
        /// `[start, end]` search window in °C.
        window: [f64; 2],
    },
    /// TG weight delta.
    Delta {
        /// `[start, end]` selection window in °C.
        window: [f64; 2],
    },
}

/// Channel choice in the config file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalArg {
    /// Thermogravimetric channel.
    Tg,
    /// Heat-flow channel.
    Dsc,
}

impl From<SignalArg> for Signal {
    fn from(arg: SignalArg) -> Self {
        match arg {
            SignalArg::Tg => Signal::Tg,
            SignalArg::Dsc => Signal::Dsc,
        }
    }
}

impl From<&TaskConfig> for Task {
    fn from(config: &TaskConfig) -> Self {
        match config {
            TaskConfig::Onset {
                signal,
                tangent1,
                tangent2,
            } => Task::Onset {
                signal: (*signal).into(),
                tangent1: TemperatureWindow::new(tangent1[0], tangent1[1]),
                tangent2: TemperatureWindow::new(tangent2[0], tangent2[1]),
            },
            TaskConfig::Peak { window } => Task::Peak {
                window: TemperatureWindow::new(window[0], window[1]),
            },
            TaskConfig::Delta { window } => Task::Delta {
                window: TemperatureWindow::new(window[0], window[1]),
            },
        }
    }
}

impl AnalysisConfig {
    /// Load an analysis config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse an analysis config from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML analysis config")
    }

    /// The weight display mode chosen in `[display]`.
    pub fn weight_mode(&self) -> WeightDisplayMode {
        self.display.weight.into()
    }

    /// The configured tasks as extractor values, in file order.
    pub fn to_tasks(&self) -> Vec<Task> {
        self.tasks.iter().map(Task::from).collect()
    }

    /// Chart settings derived from `[display]` and `[axes]`.
    #[cfg(feature = "plot")]
    pub fn plot_config(&self) -> stacurve::plot::PlotConfig {
        use stacurve::plot::{AxisBounds, PlotConfig};

        let bounds = |range: &Option<AxisRange>| match range {
            Some(AxisRange { min, max }) => AxisBounds::Manual {
                min: *min,
                max: *max,
            },
            None => AxisBounds::Auto,
        };

        PlotConfig {
            show_tg: self.display.show_tg,
            show_dsc: self.display.show_dsc,
            temperature: bounds(&self.axes.temperature),
            tg: bounds(&self.axes.tg),
            dsc: bounds(&self.axes.dsc),
            weight_mode: self.weight_mode(),
            ..PlotConfig::default()
        }
    }
}
