//! Lag-feature construction.
//!
//! [`LagBuilder::build`] turns a partitioned, time-ordered [`Dataset`] into
//! an [`AugmentedDataset`] where each surviving row carries the values of
//! earlier rows from the same partition, per a [`LagSpec`].
//!
//! The computation is an explicit grouped-and-sorted iteration with index
//! arithmetic: within a partition sorted by date, the lag of offset `k` at
//! position `i` is the source value at position `i - k`. No window-function
//! machinery is involved, so the semantics are exactly what the index math
//! says.
//!
//! # Drop policy
//!
//! A row is dropped whole — never imputed — when any of its columns cannot
//! be resolved:
//!
//! - positions `i < max_offset` lack history for at least one lag entry
//!   (`DropStats::insufficient_history`);
//! - the row itself, or a lag source it references, has a missing
//!   measurement (`DropStats::missing_value`).
//!
//! With complete source data every partition therefore contributes exactly
//! `max(0, len - max_offset)` rows.
//!
//! # Example
//!
//! ```
//! use lag_feature_builder::lag::{LagBuilder, LagSpec};
//! use lag_feature_builder::schema::Measurement;
//! use lag_feature_builder::dataset::Dataset;
//! use lag_feature_builder::record::Record;
//! use lag_feature_builder::session::Session;
//!
//! let records: Vec<Record> = (1..=5)
//!     .map(|i| Record::new(
//!         "AAPL",
//!         format!("2017-01-0{i}").parse().unwrap(),
//!         1.0, 2.0, 0.5, 1.5,
//!         (i * 100) as f64,
//!     ))
//!     .collect();
//!
//! let spec = LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]);
//! let builder = LagBuilder::new(spec).unwrap();
//! let session = Session::new().unwrap();
//!
//! let augmented = builder.build(&Dataset::from_records(records), &session).unwrap();
//! assert_eq!(augmented.len(), 2); // positions 3 and 4 survive
//! ```

use crate::dataset::{AugmentedDataset, Dataset, DropStats, Partition};
use crate::error::Result;
use crate::record::AugmentedRecord;
use crate::schema::{ColumnSchema, Measurement};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// One derived column: a measurement observed `offset` periods earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LagEntry {
    /// Source measurement.
    pub measurement: Measurement,

    /// Number of periods to look back; must be >= 1.
    pub offset: usize,
}

impl LagEntry {
    /// Name of the derived column, e.g. `Volume_lag1`.
    pub fn column_name(&self) -> String {
        self.measurement.lag_column(self.offset)
    }
}

/// Ordered list of lag columns to derive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LagSpec {
    entries: Vec<LagEntry>,
}

impl LagSpec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single lag column.
    pub fn with_lag(mut self, measurement: Measurement, offset: usize) -> Self {
        self.entries.push(LagEntry { measurement, offset });
        self
    }

    /// Add one lag column per offset, in the given order.
    pub fn with_lags(mut self, measurement: Measurement, offsets: &[usize]) -> Self {
        for &offset in offsets {
            self.entries.push(LagEntry { measurement, offset });
        }
        self
    }

    /// The derived columns in declaration order.
    pub fn entries(&self) -> &[LagEntry] {
        &self.entries
    }

    /// Number of derived columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lag columns are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest offset across all entries; rows with fewer predecessors than
    /// this are dropped.
    pub fn max_offset(&self) -> usize {
        self.entries.iter().map(|e| e.offset).max().unwrap_or(0)
    }

    /// Derived column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.column_name()).collect()
    }

    /// Validate the specification.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.entries.is_empty() {
            return Err("lag specification must declare at least one column".to_string());
        }
        for entry in &self.entries {
            if entry.offset == 0 {
                return Err(format!(
                    "lag offset for {} must be >= 1",
                    entry.measurement.name()
                ));
            }
        }
        let mut names = self.column_names();
        names.sort();
        names.dedup();
        if names.len() != self.entries.len() {
            return Err("lag specification declares duplicate columns".to_string());
        }
        Ok(())
    }
}

/// Builds augmented datasets from a validated [`LagSpec`].
///
/// The builder is pure: the same dataset always yields the same augmented
/// output, with no state carried between calls.
#[derive(Debug, Clone)]
pub struct LagBuilder {
    spec: LagSpec,
    schema: ColumnSchema,
}

impl LagBuilder {
    /// Create a builder, validating the specification.
    pub fn new(spec: LagSpec) -> Result<Self> {
        spec.validate()?;

        let mut names: Vec<String> = Measurement::all()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        names.extend(spec.column_names());
        let schema = ColumnSchema::new(names);

        Ok(Self { spec, schema })
    }

    /// The lag specification.
    pub fn spec(&self) -> &LagSpec {
        &self.spec
    }

    /// Column layout of the augmented output: current measurements first,
    /// then derived lag columns in declaration order.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Build the augmented dataset.
    ///
    /// Partitions are processed in parallel on the session's pool; output
    /// rows are concatenated in partition order (tickers ascending),
    /// chronological within each partition, so results are deterministic
    /// regardless of scheduling.
    pub fn build(&self, dataset: &Dataset, session: &Session) -> Result<AugmentedDataset> {
        let per_partition: Vec<(Vec<AugmentedRecord>, DropStats)> = session.install(|| {
            dataset
                .partitions()
                .par_iter()
                .map(|p| self.build_partition(p))
                .collect()
        });

        let mut rows = Vec::new();
        let mut stats = DropStats::default();
        for (partition_rows, partition_stats) in per_partition {
            rows.extend(partition_rows);
            stats.insufficient_history += partition_stats.insufficient_history;
            stats.missing_value += partition_stats.missing_value;
        }

        if stats.total() > 0 {
            log::info!(
                "lag build dropped {} rows ({} insufficient history, {} missing values)",
                stats.total(),
                stats.insufficient_history,
                stats.missing_value
            );
        }

        Ok(AugmentedDataset::new(self.schema.clone(), rows, stats))
    }

    /// Compute lag columns for one partition.
    fn build_partition(&self, partition: &Partition) -> (Vec<AugmentedRecord>, DropStats) {
        let max_offset = self.spec.max_offset();
        let records = &partition.records;
        let n_columns = self.schema.len();

        let mut rows = Vec::with_capacity(records.len().saturating_sub(max_offset));
        let mut stats = DropStats::default();

        for i in 0..records.len() {
            if i < max_offset {
                stats.insufficient_history += 1;
                continue;
            }

            let record = &records[i];
            let mut values = Vec::with_capacity(n_columns);
            let mut resolved = true;

            for m in Measurement::all() {
                match record.measurement(*m) {
                    Some(v) => values.push(v),
                    None => {
                        resolved = false;
                        break;
                    }
                }
            }

            if resolved {
                for entry in self.spec.entries() {
                    match records[i - entry.offset].measurement(entry.measurement) {
                        Some(v) => values.push(v),
                        None => {
                            resolved = false;
                            break;
                        }
                    }
                }
            }

            if !resolved {
                stats.missing_value += 1;
                continue;
            }

            rows.push(AugmentedRecord {
                ticker: record.ticker.clone(),
                date: record.date,
                values,
            });
        }

        log::debug!(
            "partition {}: {} of {} rows survived lag construction",
            partition.ticker,
            rows.len(),
            records.len()
        );

        (rows, stats)
    }
}
