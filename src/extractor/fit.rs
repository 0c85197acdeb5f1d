//! Least-squares line fitting and piecewise-linear interpolation helpers.

use super::{ExtractError, TemperatureWindow};

/// A first-degree least-squares fit, `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Evaluate the line at `x`
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a line to `(xs, ys)` by ordinary least squares.
///
/// Needs at least two points and non-zero variance in `xs`; the window is
/// carried along only for error reporting.
pub(super) fn fit_line(
    xs: &[f64],
    ys: &[f64],
    window: TemperatureWindow,
) -> Result<Line, ExtractError> {
    if xs.len() < 2 {
        return Err(ExtractError::InsufficientPoints {
            start: window.start,
            end: window.end,
            needed: 2,
            found: xs.len(),
        });
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x) * (x - mean_x)).sum();
    if sxx == 0.0 {
        return Err(ExtractError::SingularFit {
            start: window.start,
            end: window.end,
        });
    }

    let sxy: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    Ok(Line {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Piecewise-linear interpolation of `ys` over `xs` at `x`, unclamped.
///
/// Outside the sampled range the nearest edge segment is extended, matching
/// the unclamped interpolation the onset overlay is defined against. A
/// zero-width edge segment falls back to its left sample value.
pub(super) fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    if xs.len() < 2 {
        return xs.first().map(|_| ys[0]);
    }

    let seg = xs
        .windows(2)
        .position(|w| w[0] <= x && x <= w[1])
        .unwrap_or(if x < xs[0] { 0 } else { xs.len() - 2 });

    let (x0, x1) = (xs[seg], xs[seg + 1]);
    let (y0, y1) = (ys[seg], ys[seg + 1]);
    if x0 == x1 {
        return Some(y0);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}
