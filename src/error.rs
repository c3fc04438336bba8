//! Errors raised while loading inputs or before a simulation run starts.

use thiserror::Error;

/// Input series that the simulator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    HourlyPrices,
    PvForecast,
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourlyPrices => f.write_str("hourly prices"),
            Self::PvForecast => f.write_str("PV forecast"),
        }
    }
}

/// Reasons a simulation cannot start.
///
/// None of these are recoverable inside the simulator: the caller decides what
/// to show to the user and no partial schedule is ever produced.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("{series} must contain exactly {expected} values, got {actual}")]
    InvalidInputShape {
        series: Series,
        expected: usize,
        actual: usize,
    },

    #[error("{series} value #{index} is not a finite number: {value:?}")]
    MalformedValue {
        series: Series,
        index: usize,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl SimError {
    /// Returns an error if `values` does not hold exactly `expected` entries.
    pub fn check_shape(series: Series, values: &[f64], expected: usize) -> Result<(), Self> {
        if values.len() == expected {
            Ok(())
        } else {
            Err(Self::InvalidInputShape {
                series,
                expected,
                actual: values.len(),
            })
        }
    }

    /// Returns an error for the first NaN or infinite entry.
    pub fn check_finite(series: Series, values: &[f64]) -> Result<(), Self> {
        match values.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(Self::MalformedValue {
                series,
                index,
                value: values[index].to_string(),
            }),
            None => Ok(()),
        }
    }
}
