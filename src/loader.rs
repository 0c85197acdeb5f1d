//! # Table Loader Module
//!
//! Decodes STA instrument CSV exports into a [`MeasurementSeries`].
//!
//! The exports this was written against carry the columns
//! `Program Temperature`, `Unsubtracted Weight` and `Unsubtracted Heat Flow`;
//! the shorter aliases `Temperature`, `Weight` and `Heat Flow` are accepted
//! as well. Header matching is case-insensitive and ignores surrounding
//! whitespace. A missing required column is a structural failure for that
//! file and is reported instead of guessed around.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::series::{MeasurementSeries, SeriesError};

/// Accepted header spellings for the temperature column
const TEMPERATURE_COLUMNS: &[&str] = &["program temperature", "temperature"];
/// Accepted header spellings for the weight column
const WEIGHT_COLUMNS: &[&str] = &["unsubtracted weight", "weight"];
/// Accepted header spellings for the heat-flow column
const HEAT_FLOW_COLUMNS: &[&str] = &["unsubtracted heat flow", "heat flow"];

/// Errors that can occur while decoding a measurement table
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// I/O error opening or reading the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV structure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("required column '{0}' not found in table header")]
    MissingColumn(String),

    /// A cell that should hold a number does not parse as one
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        /// 1-based data row (excluding the header)
        row: usize,
        /// Header name of the offending column
        column: String,
        /// The raw cell content
        value: String,
    },

    /// The decoded columns are inconsistent
    #[error("series error: {0}")]
    Series(#[from] SeriesError),
}

/// Find the index of the first header matching any of the accepted spellings
fn find_column(headers: &[String], accepted: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| accepted.iter().any(|a| h == a))
}

/// Load a measurement table from a CSV file, labeling the series with the
/// file stem unless `label` overrides it.
pub fn load_csv_file<P: AsRef<Path>>(
    path: P,
    label: Option<&str>,
) -> Result<MeasurementSeries, LoaderError> {
    let path = path.as_ref();
    let label = label
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });

    let file = File::open(path)?;
    let series = load_csv(BufReader::new(file), &label)?;
    debug!(
        "loaded '{}' from {}: {} samples",
        series.label,
        path.display(),
        series.len()
    );
    Ok(series)
}

/// Load a measurement table from any reader.
pub fn load_csv<R: Read>(reader: R, label: &str) -> Result<MeasurementSeries, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let temperature_idx = find_column(&headers, TEMPERATURE_COLUMNS)
        .ok_or_else(|| LoaderError::MissingColumn("Program Temperature".to_string()))?;
    let weight_idx = find_column(&headers, WEIGHT_COLUMNS)
        .ok_or_else(|| LoaderError::MissingColumn("Unsubtracted Weight".to_string()))?;
    let heat_flow_idx = find_column(&headers, HEAT_FLOW_COLUMNS)
        .ok_or_else(|| LoaderError::MissingColumn("Unsubtracted Heat Flow".to_string()))?;

    let mut temperature = Vec::new();
    let mut weight = Vec::new();
    let mut heat_flow = Vec::new();

    for (row_idx, record) in csv_reader.records().enumerate() {
        let record = record?;

        let cell = |idx: usize| -> Result<f64, LoaderError> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| LoaderError::InvalidNumber {
                row: row_idx + 1,
                column: headers[idx].clone(),
                value: raw.to_string(),
            })
        };

        temperature.push(cell(temperature_idx)?);
        weight.push(cell(weight_idx)?);
        heat_flow.push(cell(heat_flow_idx)?);
    }

    Ok(MeasurementSeries::new(
        label,
        temperature,
        weight,
        heat_flow,
    )?)
}
