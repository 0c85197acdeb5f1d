/// Errors that can occur while evaluating a single analysis task
///
/// Every variant is local to the task that produced it: the surrounding
/// evaluation loop suppresses that task's result and carries on with the
/// remaining tasks and files.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// A fit window selected fewer samples than a line fit needs
    #[error("window [{start}, {end}] °C holds {found} samples, need at least {needed}")]
    InsufficientPoints {
        /// Window start temperature
        start: f64,
        /// Window end temperature
        end: f64,
        /// Minimum sample count for the operation
        needed: usize,
        /// Samples actually selected
        found: usize,
    },

    /// All samples in a tangent window share one temperature, the fit is degenerate
    #[error("tangent window [{start}, {end}] °C has zero temperature variance")]
    SingularFit {
        /// Window start temperature
        start: f64,
        /// Window end temperature
        end: f64,
    },

    /// The two fitted tangents have equal slope, no intersection exists
    #[error("tangents are parallel (slope {slope:.6}), no onset intersection")]
    ParallelTangents {
        /// The shared slope of both tangents
        slope: f64,
    },

    /// A peak or delta window selected no samples at all
    #[error("window [{start}, {end}] °C selects no samples")]
    EmptyWindow {
        /// Window start temperature
        start: f64,
        /// Window end temperature
        end: f64,
    },
}
