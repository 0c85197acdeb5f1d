//! # Analysis Session Module
//!
//! Owns the user-editable state of one analysis: the loaded runs (each with
//! an optional baseline and legend label), the weight display mode, and the
//! task list. Tasks are keyed by stable [`TaskId`] handles so removal never
//! shifts the identity of the remaining tasks.
//!
//! [`AnalysisSession::evaluate`] is the full per-interaction pipeline:
//! normalize every run, evaluate every task against it, and collect the
//! results. The pass is deterministic and side-effect-free, so a caller can
//! simply re-run it on every input change. Per-task failures suppress one
//! result; per-file failures skip one file; neither stops the pass.

use log::{debug, warn};
use serde::Serialize;

use crate::extractor::{self, OnsetArtifacts, ResultRecord, Task};
use crate::series::{MeasurementSeries, WeightDisplayMode};

/// Stable handle for one task in the session's task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaskId(u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "task #{}", self.0)
    }
}

/// One loaded run and its optional blank run
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// The measured run, as loaded
    pub raw: MeasurementSeries,
    /// Blank run to subtract positionally, if any
    pub baseline: Option<MeasurementSeries>,
}

/// A task that produced no result for one run, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkipNotice {
    /// The task that was skipped
    pub task: TaskId,
    /// Legend label of the run it was evaluated against
    pub source_label: String,
    /// Human-readable reason
    pub reason: String,
}

/// A run that could not be normalized at all
#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    /// Legend label of the failed run
    pub source_label: String,
    /// Human-readable reason
    pub reason: String,
}

/// Tangent overlay produced by one onset task against one run
#[derive(Debug, Clone)]
pub struct OverlayEntry {
    /// The onset task that produced the overlay
    pub task: TaskId,
    /// Legend label of the run the tangents were fitted to
    pub source_label: String,
    /// Fit parameters and onset point for rendering
    pub artifacts: OnsetArtifacts,
}

/// Everything one evaluation pass produced, ready for display
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    /// Normalized, display-converted series in source order
    pub series: Vec<MeasurementSeries>,
    /// Extracted features in task-list order per run
    pub records: Vec<ResultRecord>,
    /// Tangent overlays for onset tasks
    pub overlays: Vec<OverlayEntry>,
    /// Tasks that produced no result, with reasons
    pub skipped: Vec<SkipNotice>,
    /// Runs that failed to normalize
    pub failures: Vec<SourceFailure>,
}

/// User-owned analysis state: runs, display mode and task list
#[derive(Debug, Default)]
pub struct AnalysisSession {
    sources: Vec<SourceEntry>,
    tasks: Vec<(TaskId, Task)>,
    next_task_id: u64,
    /// How TG weights are presented and labeled
    pub weight_mode: WeightDisplayMode,
}

impl AnalysisSession {
    /// Create an empty session with absolute weight display
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run, with an optional baseline to subtract during evaluation
    pub fn add_source(&mut self, raw: MeasurementSeries, baseline: Option<MeasurementSeries>) {
        self.sources.push(SourceEntry { raw, baseline });
    }

    /// Loaded runs in insertion order
    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    /// Append a task and return its stable handle
    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        self.tasks.push((id, task));
        id
    }

    /// Remove a task by handle; returns false when the handle is unknown
    pub fn remove_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|(tid, _)| *tid != id);
        self.tasks.len() != before
    }

    /// Tasks in insertion order
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().map(|(id, task)| (*id, task))
    }

    /// Normalize one run: baseline subtraction, then display conversion
    fn normalize(&self, entry: &SourceEntry) -> Result<MeasurementSeries, crate::series::SeriesError> {
        let corrected = match &entry.baseline {
            Some(baseline) => entry.raw.apply_baseline(baseline)?,
            None => entry.raw.clone(),
        };
        corrected.to_display_weight(self.weight_mode)
    }

    /// Run the full pipeline: normalize every run and evaluate every task.
    ///
    /// Failures never abort the pass. A run that cannot be normalized is
    /// recorded in [`SessionReport::failures`] and skipped; a task that
    /// produces no result for a run is recorded in
    /// [`SessionReport::skipped`].
    pub fn evaluate(&self) -> SessionReport {
        let mut report = SessionReport::default();

        for entry in &self.sources {
            let series = match self.normalize(entry) {
                Ok(series) => series,
                Err(err) => {
                    warn!("skipping run '{}': {}", entry.raw.label, err);
                    report.failures.push(SourceFailure {
                        source_label: entry.raw.label.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            for (id, task) in &self.tasks {
                match extractor::evaluate(&series, self.weight_mode, task) {
                    Ok(evaluation) => {
                        if let Some(artifacts) = evaluation.onset {
                            report.overlays.push(OverlayEntry {
                                task: *id,
                                source_label: series.label.clone(),
                                artifacts,
                            });
                        }
                        report.records.push(evaluation.record);
                    }
                    Err(err) => {
                        debug!("{} on '{}' produced no result: {}", id, series.label, err);
                        report.skipped.push(SkipNotice {
                            task: *id,
                            source_label: series.label.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }

            report.series.push(series);
        }

        report
    }
}
