//! Source and augmented record types.
//!
//! A [`Record`] is one observation: a ticker, a date, and the five OHLCV
//! measurements. Measurements are `Option<f64>` so that a missing or
//! malformed source cell stays distinguishable from a real zero all the way
//! through the pipeline; the lag builder drops rows with unresolvable
//! values rather than imputing.

use crate::schema::Measurement;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single per-ticker, per-day observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Entity identifier (partition key).
    pub ticker: String,

    /// Observation date (order key).
    pub date: NaiveDate,

    /// Opening price, if present in the source.
    pub open: Option<f64>,

    /// High price, if present in the source.
    pub high: Option<f64>,

    /// Low price, if present in the source.
    pub low: Option<f64>,

    /// Closing price, if present in the source.
    pub close: Option<f64>,

    /// Traded volume, if present in the source.
    pub volume: Option<f64>,
}

impl Record {
    /// Create a record with all measurements present.
    pub fn new(
        ticker: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Value of one measurement, `None` when missing in the source.
    pub fn measurement(&self, m: Measurement) -> Option<f64> {
        match m {
            Measurement::Open => self.open,
            Measurement::High => self.high,
            Measurement::Low => self.low,
            Measurement::Close => self.close,
            Measurement::Volume => self.volume,
        }
    }

    /// Whether every measurement is present.
    pub fn is_complete(&self) -> bool {
        Measurement::all().iter().all(|m| self.measurement(*m).is_some())
    }
}

/// A record extended with resolved lag values.
///
/// `values` is dense and aligned with the augmented [`ColumnSchema`]: the
/// five current measurements first, then one value per lag specification
/// entry. Rows that could not be fully resolved never become
/// `AugmentedRecord`s.
///
/// [`ColumnSchema`]: crate::schema::ColumnSchema
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedRecord {
    /// Entity identifier of the source record.
    pub ticker: String,

    /// Observation date of the source record.
    pub date: NaiveDate,

    /// Column values in schema order.
    pub values: Vec<f64>,
}
