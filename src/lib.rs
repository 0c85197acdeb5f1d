//! # stacurve - STA Curve Analysis
//!
//! `stacurve` loads simultaneous thermal analysis (STA) measurement files,
//! subtracts baseline runs, and extracts characteristic points from the TG
//! (weight) and DSC (heat flow) curves: onset temperatures via dual-tangent
//! intersection, peak temperatures, and weight-loss deltas over
//! user-specified temperature windows.
//!
//! ## Key Features
//!
//! - **CSV ingestion**: Decodes instrument CSV exports by header name, with
//!   alias and case tolerance (`Program Temperature`, `Unsubtracted Weight`,
//!   `Unsubtracted Heat Flow`).
//!
//! - **Baseline correction**: Positional subtraction of a blank run, with an
//!   explicit error on sample-count mismatch instead of silent truncation.
//!
//! - **Dual-tangent onsets**: First-degree least-squares tangents over two
//!   user windows, intersected analytically; the fitted lines are returned
//!   for overlay rendering.
//!
//! - **Graceful degradation**: Degenerate windows (too few points, singular
//!   fits, parallel tangents) suppress that one result and never abort the
//!   remaining tasks or files.
//!
//! - **Chart export** (feature `plot`): Dual-axis TG/DSC chart with tangent
//!   overlays, rendered to PNG.
//!
//! ## Quick Start
//!
//! ```rust
//! use stacurve::extractor::{Task, TemperatureWindow};
//! use stacurve::series::{MeasurementSeries, Signal, WeightDisplayMode};
//! use stacurve::session::AnalysisSession;
//!
//! let run = MeasurementSeries::new(
//!     "sample A",
//!     vec![0.0, 50.0, 100.0, 150.0, 200.0],
//!     vec![10.0, 10.0, 10.0, 5.0, 5.0],
//!     vec![0.0, 0.1, 0.9, 0.4, 0.1],
//! )?;
//!
//! let mut session = AnalysisSession::new();
//! session.add_source(run, None);
//! session.add_task(Task::Delta {
//!     window: TemperatureWindow::new(50.0, 200.0),
//! });
//!
//! let report = session.evaluate();
//! assert_eq!(report.records[0].value, 5.0); // 5 mg lost across the window
//! # Ok::<(), stacurve::series::SeriesError>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`series`]: Measurement data model and curve preprocessing (baseline
//!   subtraction, weight-unit conversion)
//! - [`loader`]: CSV table decoding
//! - [`extractor`]: Onset/peak/delta feature extraction
//! - [`session`]: User-owned analysis state and the per-interaction
//!   evaluation pipeline
//! - [`plot`]: Dual-axis chart rendering and PNG export (feature `plot`)
//!
//! The pipeline is pure and synchronous: `normalize -> evaluate -> report`,
//! with no internal mutable state, so a reactive front end can simply re-run
//! it on every input change.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod extractor;
pub mod loader;
#[cfg(feature = "plot")]
pub mod plot;
pub mod series;
pub mod session;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::extractor::{
        evaluate, Evaluation, ExtractError, OnsetArtifacts, ResultRecord, TangentFit, Task,
        TemperatureWindow,
    };
    pub use crate::loader::{load_csv, load_csv_file, LoaderError};
    #[cfg(feature = "plot")]
    pub use crate::plot::{render_png, AxisBounds, PlotConfig, PlotError};
    pub use crate::series::{MeasurementSeries, SeriesError, Signal, WeightDisplayMode};
    pub use crate::session::{
        AnalysisSession, OverlayEntry, SessionReport, SkipNotice, SourceEntry, SourceFailure,
        TaskId,
    };
}
