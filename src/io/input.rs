//! Parsing of price lists and PV forecast files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Series, SimError};

/// Parses comma-separated prices such as `"15.78, 63.3,\n 80"`.
///
/// Whitespace around values is ignored, as are empty entries after trailing
/// commas. Length is not checked here.
///
/// # Errors
///
/// Returns `SimError::MalformedValue` for the first entry that is not a finite
/// number.
pub fn parse_prices(text: &str) -> Result<Vec<f64>, SimError> {
    let mut entries: Vec<&str> = text.split(',').map(str::trim).collect();
    while entries.last().is_some_and(|e| e.is_empty()) {
        entries.pop();
    }
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_value(Series::HourlyPrices, index, entry))
        .collect()
}

/// Reads a comma-separated price list from a file.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be read, otherwise as [`parse_prices`].
pub fn read_prices(path: &Path) -> Result<Vec<f64>, SimError> {
    parse_prices(&std::fs::read_to_string(path)?)
}

/// Reads PV forecast values from the first column of a header-less CSV.
///
/// # Errors
///
/// Returns `SimError::Csv` for unreadable CSV and `SimError::MalformedValue`
/// for a non-numeric first column.
pub fn read_pv_csv(reader: impl Read) -> Result<Vec<f64>, SimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut values = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = record.get(0).unwrap_or_default();
        values.push(parse_value(Series::PvForecast, index, cell)?);
    }
    Ok(values)
}

/// Opens `path` and reads it with [`read_pv_csv`].
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be opened.
pub fn read_pv_file(path: &Path) -> Result<Vec<f64>, SimError> {
    read_pv_csv(File::open(path)?)
}

fn parse_value(series: Series, index: usize, entry: &str) -> Result<f64, SimError> {
    match entry.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SimError::MalformedValue {
            series,
            index,
            value: entry.to_string(),
        }),
    }
}
