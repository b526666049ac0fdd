//! Static column schema for source and augmented datasets.
//!
//! The original workflow selected predictors by reflecting over column names
//! at runtime. Here the schema is an explicit, static enumeration: the five
//! source measurements are a closed enum, derived lag columns are named
//! deterministically from the lag specification, and predictor selection is
//! plain set subtraction over declared names.
//!
//! # Example
//!
//! ```
//! use lag_feature_builder::schema::{ColumnSchema, Measurement, select_predictors};
//!
//! let schema = ColumnSchema::new(vec![
//!     "Volume".to_string(),
//!     "Volume_lag1".to_string(),
//!     "Volume_lag2".to_string(),
//! ]);
//!
//! let selection = select_predictors(
//!     &schema,
//!     &["Volume".to_string()],
//!     Measurement::Volume.name(),
//! ).unwrap();
//!
//! assert_eq!(selection.predictors, vec!["Volume_lag1", "Volume_lag2"]);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column name of the partition key in source data.
pub const TICKER_COLUMN: &str = "ticker";

/// Column name of the order key in source data.
pub const DATE_COLUMN: &str = "date";

/// The fixed set of numeric measurements carried by every source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measurement {
    /// Opening price of the period.
    Open,

    /// Highest price of the period.
    High,

    /// Lowest price of the period.
    Low,

    /// Closing price of the period.
    Close,

    /// Traded volume of the period.
    Volume,
}

impl Measurement {
    /// All measurements in schema order.
    pub fn all() -> &'static [Measurement] {
        &[
            Measurement::Open,
            Measurement::High,
            Measurement::Low,
            Measurement::Close,
            Measurement::Volume,
        ]
    }

    /// Column name of the measurement.
    pub fn name(&self) -> &'static str {
        match self {
            Measurement::Open => "Open",
            Measurement::High => "High",
            Measurement::Low => "Low",
            Measurement::Close => "Close",
            Measurement::Volume => "Volume",
        }
    }

    /// Look a measurement up by its column name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Measurement> {
        Measurement::all()
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Name of the derived column holding this measurement `offset` periods back.
    pub fn lag_column(&self, offset: usize) -> String {
        format!("{}_lag{}", self.name(), offset)
    }
}

/// Ordered column layout of an augmented dataset.
///
/// Holds the column names in matrix order together with a name-to-index
/// lookup, so downstream consumers (trainer handoff, export) can address
/// columns unambiguously by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    names: Vec<String>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ColumnSchema {
    /// Build a schema from column names in matrix order.
    pub fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Column names in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Matrix index of a column, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether the schema contains a column.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Rebuild the name lookup (call after deserialization).
    pub fn rebuild_index(&mut self) {
        self.index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
    }
}

/// Predictor and response columns resolved against a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorSelection {
    /// Predictor column names, in schema order.
    pub predictors: Vec<String>,

    /// Response column name.
    pub response: String,
}

/// Default denylist of leakage-prone columns: every current-period
/// measurement. A predictor observed at the same time step as the response
/// would encode information unavailable at prediction time.
pub fn default_denylist() -> Vec<String> {
    Measurement::all().iter().map(|m| m.name().to_string()).collect()
}

/// Select predictors by exclusion: every schema column except the denylist
/// and the response itself.
///
/// Fails if the response or any denylist entry names a column the schema
/// does not have, so typos surface at configuration time rather than as a
/// silently narrower predictor set.
pub fn select_predictors(
    schema: &ColumnSchema,
    denylist: &[String],
    response: &str,
) -> Result<PredictorSelection> {
    if !schema.contains(response) {
        return Err(Error::UnknownColumn(response.to_string()));
    }
    for name in denylist {
        if !schema.contains(name) {
            return Err(Error::UnknownColumn(name.clone()));
        }
    }

    let predictors: Vec<String> = schema
        .names()
        .iter()
        .filter(|n| n.as_str() != response && !denylist.iter().any(|d| d == *n))
        .cloned()
        .collect();

    Ok(PredictorSelection {
        predictors,
        response: response.to_string(),
    })
}
