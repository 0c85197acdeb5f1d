//! # Plot Module
//!
//! Renders normalized series and onset overlays as a dual-axis PNG chart:
//! TG on the left axis with solid lines, DSC on the right axis with dashed
//! lines, one color per run, tangent overlays across their outer onset
//! window and a legend beneath the plot area.
//!
//! Axis bounds can be fixed per axis or derived from the data. Only enabled
//! with the `plot` feature.

use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::extractor::TangentFit;
use crate::series::{MeasurementSeries, Signal, WeightDisplayMode};
use crate::session::OverlayEntry;

/// Per-run line colors, matching the matplotlib `tab10` cycle the charts
/// were originally styled after.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Color for tangent overlay lines and onset markers
const OVERLAY_COLOR: RGBColor = RGBColor(60, 60, 60);

/// Errors that can occur while rendering a chart
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// No series to draw, or every signal axis is disabled
    #[error("nothing to plot: {0}")]
    NoData(String),

    /// Error reported by the drawing backend
    #[error("render error: {0}")]
    Render(String),
}

fn render_error(err: impl std::fmt::Display) -> PlotError {
    PlotError::Render(err.to_string())
}

/// Axis limits: explicit numeric bounds or automatic scaling from the data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AxisBounds {
    /// Derive the range from the plotted data, with a small margin
    #[default]
    Auto,
    /// Fixed numeric bounds
    Manual {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
}

impl AxisBounds {
    /// Resolve to a concrete range, padding automatic ranges by 5 %
    fn resolve(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        match *self {
            AxisBounds::Manual { min, max } => (min, max),
            AxisBounds::Auto => {
                if !data_min.is_finite() || !data_max.is_finite() {
                    return (0.0, 1.0);
                }
                let span = data_max - data_min;
                if span <= 0.0 {
                    return (data_min - 1.0, data_max + 1.0);
                }
                (data_min - span * 0.05, data_max + span * 0.05)
            }
        }
    }
}

/// Chart configuration: visibility toggles, axis bounds and output size
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Draw the TG curves and left axis
    pub show_tg: bool,
    /// Draw the DSC curves and right axis
    pub show_dsc: bool,
    /// Bounds of the shared temperature axis
    pub temperature: AxisBounds,
    /// Bounds of the TG (left) axis
    pub tg: AxisBounds,
    /// Bounds of the DSC (right) axis
    pub dsc: AxisBounds,
    /// Weight mode, for the left axis label
    pub weight_mode: WeightDisplayMode,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            show_tg: true,
            show_dsc: true,
            temperature: AxisBounds::Auto,
            tg: AxisBounds::Auto,
            dsc: AxisBounds::Auto,
            weight_mode: WeightDisplayMode::Absolute,
            width: 1280,
            height: 800,
        }
    }
}

/// Min and max over a slice, ignoring non-finite values
fn data_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.filter(|v| v.is_finite()).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), v| (lo.min(v), hi.max(v)),
    )
}

/// Render the chart to a PNG file.
///
/// `series` are the normalized runs from an evaluation pass, `overlays` the
/// onset tangents to draw on top. Fails with [`PlotError::NoData`] when
/// there are no series or both signals are disabled.
pub fn render_png<P: AsRef<Path>>(
    path: P,
    series: &[MeasurementSeries],
    overlays: &[OverlayEntry],
    config: &PlotConfig,
) -> Result<(), PlotError> {
    if series.is_empty() {
        return Err(PlotError::NoData("no series loaded".to_string()));
    }
    if !config.show_tg && !config.show_dsc {
        return Err(PlotError::NoData("both signals disabled".to_string()));
    }

    let (t_lo, t_hi) = data_range(series.iter().flat_map(|s| s.temperature.iter().copied()));
    let (x_min, x_max) = config.temperature.resolve(t_lo, t_hi);

    let (w_lo, w_hi) = data_range(series.iter().flat_map(|s| s.weight.iter().copied()));
    let (y1_min, y1_max) = config.tg.resolve(w_lo, w_hi);

    let (h_lo, h_hi) = data_range(series.iter().flat_map(|s| s.heat_flow.iter().copied()));
    let (y2_min, y2_max) = config.dsc.resolve(h_lo, h_hi);

    let root = BitMapBackend::new(path.as_ref(), (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(x_min..x_max, y1_min..y1_max)
        .map_err(render_error)?
        .set_secondary_coord(x_min..x_max, y2_min..y2_max);

    let weight_label = match config.weight_mode {
        WeightDisplayMode::Absolute => "Gewicht [mg]",
        WeightDisplayMode::PercentOfInitial => "Gewicht [%]",
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Temperatur [°C]");
    if config.show_tg {
        mesh.y_desc(weight_label);
    }
    mesh.light_line_style(WHITE.mix(0.7)).draw().map_err(render_error)?;

    if config.show_dsc {
        chart
            .configure_secondary_axes()
            .y_desc("Heat Flow [mW], exo = down")
            .draw()
            .map_err(render_error)?;
    }

    for (idx, run) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];

        if config.show_tg {
            chart
                .draw_series(LineSeries::new(
                    run.temperature.iter().copied().zip(run.weight.iter().copied()),
                    color.stroke_width(2),
                ))
                .map_err(render_error)?
                .label(format!("TG - {}", run.label))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        if config.show_dsc {
            chart
                .draw_secondary_series(DashedLineSeries::new(
                    run.temperature
                        .iter()
                        .copied()
                        .zip(run.heat_flow.iter().copied()),
                    6,
                    4,
                    color.stroke_width(1),
                ))
                .map_err(render_error)?
                .label(format!("DSC - {}", run.label))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
                });
        }
    }

    for overlay in overlays {
        let fit = overlay.artifacts.fit;
        let window = overlay.artifacts.window;
        match overlay.artifacts.signal {
            Signal::Tg if config.show_tg => {
                draw_tangents(&mut chart, fit, window.start, window.end, false)?;
                chart
                    .draw_series(std::iter::once(Circle::new(
                        (
                            overlay.artifacts.onset_temperature,
                            overlay.artifacts.onset_value,
                        ),
                        4,
                        OVERLAY_COLOR.filled(),
                    )))
                    .map_err(render_error)?;
            }
            Signal::Dsc if config.show_dsc => {
                draw_tangents(&mut chart, fit, window.start, window.end, true)?;
                chart
                    .draw_secondary_series(std::iter::once(Circle::new(
                        (
                            overlay.artifacts.onset_temperature,
                            overlay.artifacts.onset_value,
                        ),
                        4,
                        OVERLAY_COLOR.filled(),
                    )))
                    .map_err(render_error)?;
            }
            _ => {}
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerMiddle)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK.mix(0.4))
        .draw()
        .map_err(render_error)?;

    root.present().map_err(render_error)?;
    Ok(())
}

/// Both fitted tangents across `[start, end]`, on the primary or secondary axis
fn draw_tangents(
    chart: &mut plotters::chart::DualCoordChartContext<
        '_,
        BitMapBackend<'_>,
        Cartesian2d<
            plotters::coord::types::RangedCoordf64,
            plotters::coord::types::RangedCoordf64,
        >,
        Cartesian2d<
            plotters::coord::types::RangedCoordf64,
            plotters::coord::types::RangedCoordf64,
        >,
    >,
    fit: TangentFit,
    start: f64,
    end: f64,
    secondary: bool,
) -> Result<(), PlotError> {
    let line1 = vec![(start, fit.line1_at(start)), (end, fit.line1_at(end))];
    let line2 = vec![(start, fit.line2_at(start)), (end, fit.line2_at(end))];
    let style = OVERLAY_COLOR.stroke_width(1);

    if secondary {
        chart
            .draw_secondary_series(LineSeries::new(line1, style))
            .map_err(render_error)?;
        chart
            .draw_secondary_series(LineSeries::new(line2, style))
            .map_err(render_error)?;
    } else {
        chart
            .draw_series(LineSeries::new(line1, style))
            .map_err(render_error)?;
        chart
            .draw_series(LineSeries::new(line2, style))
            .map_err(render_error)?;
    }
    Ok(())
}
