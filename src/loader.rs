//! CSV ingestion of source records.
//!
//! The loader is the input collaborator realized as a serde-deserializing
//! CSV reader. Key-column problems are fatal: a row without a usable ticker
//! or date cannot be grouped or ordered, so the error surfaces immediately
//! with the row number. Measurement cells are forgiving: an empty,
//! malformed, or non-finite cell becomes a missing value (warned, never
//! imputed) and flows through the drop policy downstream.
//!
//! # Example
//!
//! ```ignore
//! use lag_feature_builder::loader::CsvLoader;
//!
//! let records = CsvLoader::load_records("data/wiki_prices.csv")?;
//! ```

use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::{DATE_COLUMN, TICKER_COLUMN};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Raw CSV row before key validation and numeric parsing.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "Ticker")]
    ticker: Option<String>,

    #[serde(alias = "Date")]
    date: Option<String>,

    #[serde(default, alias = "Open")]
    open: Option<String>,

    #[serde(default, alias = "High")]
    high: Option<String>,

    #[serde(default, alias = "Low")]
    low: Option<String>,

    #[serde(default, alias = "Close")]
    close: Option<String>,

    #[serde(default, alias = "Volume")]
    volume: Option<String>,
}

/// CSV reader and writer for source records.
pub struct CsvLoader;

impl CsvLoader {
    /// Load all records from a CSV file.
    ///
    /// Expects a header row with `ticker`, `date`, `open`, `high`, `low`,
    /// `close`, `volume` columns (capitalized variants accepted).
    pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
        let file = File::open(path.as_ref())?;
        Self::read_records(file)
    }

    /// Load records from any reader producing CSV with the expected header.
    pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<Record>> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (idx, result) in csv_reader.deserialize::<RawRow>().enumerate() {
            let row_number = idx + 1;
            let raw = result?;
            records.push(Self::parse_row(raw, row_number)?);
        }

        log::info!("loaded {} records", records.len());
        Ok(records)
    }

    /// Write records to a CSV file (lowercase header, empty cells for
    /// missing measurements).
    pub fn save_records<P: AsRef<Path>>(records: &[Record], path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = csv::Writer::from_writer(file);

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Validate keys and parse measurements for one raw row.
    fn parse_row(raw: RawRow, row_number: usize) -> Result<Record> {
        let ticker = match raw.ticker {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => {
                return Err(Error::MissingPartitionKey {
                    row: row_number,
                    column: TICKER_COLUMN,
                })
            }
        };

        let date_text = raw.date.unwrap_or_default();
        let date: NaiveDate = date_text.trim().parse().map_err(|_| {
            if date_text.trim().is_empty() {
                Error::MissingPartitionKey {
                    row: row_number,
                    column: DATE_COLUMN,
                }
            } else {
                Error::InvalidOrderKey {
                    row: row_number,
                    value: date_text.trim().to_string(),
                }
            }
        })?;

        Ok(Record {
            ticker,
            date,
            open: parse_measurement(raw.open.as_deref(), "open", row_number),
            high: parse_measurement(raw.high.as_deref(), "high", row_number),
            low: parse_measurement(raw.low.as_deref(), "low", row_number),
            close: parse_measurement(raw.close.as_deref(), "close", row_number),
            volume: parse_measurement(raw.volume.as_deref(), "volume", row_number),
        })
    }
}

/// Parse one measurement cell; anything unusable becomes a missing value.
fn parse_measurement(cell: Option<&str>, column: &str, row_number: usize) -> Option<f64> {
    let text = cell?.trim();
    if text.is_empty() {
        return None;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) => {
            log::warn!("row {row_number}: non-finite {column} value `{text}` treated as missing");
            None
        }
        Err(_) => {
            log::warn!("row {row_number}: malformed {column} value `{text}` treated as missing");
            None
        }
    }
}
