//! Partitioned dataset arena and the augmented frame it produces.
//!
//! A [`Dataset`] groups records by ticker and keeps each partition sorted
//! by date ascending. The sort is stable and keyed on the date alone, so
//! records sharing a date keep their source order — the deterministic
//! tie-break this crate commits to. Partitions are fully independent after
//! grouping; nothing downstream ever reads across them.
//!
//! An [`AugmentedDataset`] is the dense output of lag construction: rows
//! that survived the drop policy, a [`ColumnSchema`] naming the columns,
//! and [`DropStats`] accounting for every row that did not survive.

use crate::error::{Error, Result};
use crate::record::{AugmentedRecord, Record};
use crate::schema::ColumnSchema;
use ahash::AHashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// All records of one ticker, sorted by date ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Entity identifier shared by every record in the partition.
    pub ticker: String,

    /// Records in chronological order (stable under date ties).
    pub records: Vec<Record>,
}

impl Partition {
    /// Number of records in the partition.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the partition holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A collection of records grouped by ticker and time-ordered within each
/// group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    partitions: Vec<Partition>,
    total_records: usize,
}

impl Dataset {
    /// Group records by ticker and sort each partition by date.
    ///
    /// Grouping preserves source order within each ticker, and the
    /// per-partition sort is stable, so two records with the same date end
    /// up in source order. Partitions themselves are ordered by ticker for
    /// deterministic iteration.
    pub fn from_records(records: Vec<Record>) -> Self {
        let total_records = records.len();

        let mut groups: AHashMap<String, Vec<Record>> = AHashMap::new();
        for record in records {
            groups.entry(record.ticker.clone()).or_default().push(record);
        }

        let mut partitions: Vec<Partition> = groups
            .into_iter()
            .map(|(ticker, mut records)| {
                records.sort_by_key(|r| r.date);
                Partition { ticker, records }
            })
            .collect();
        partitions.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        Self {
            partitions,
            total_records,
        }
    }

    /// All partitions, ordered by ticker.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Partition for one ticker, if present.
    pub fn partition(&self, ticker: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.ticker == ticker)
    }

    /// Number of partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Total number of records across all partitions.
    pub fn len(&self) -> usize {
        self.total_records
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}

/// Counts of rows removed by the drop policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropStats {
    /// Rows at the start of a partition with fewer than `max_offset`
    /// predecessors.
    pub insufficient_history: usize,

    /// Rows dropped because the row itself or a referenced lag source had a
    /// missing measurement.
    pub missing_value: usize,
}

impl DropStats {
    /// Total rows dropped.
    pub fn total(&self) -> usize {
        self.insufficient_history + self.missing_value
    }
}

/// Dense frame of augmented rows with schema and drop accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedDataset {
    schema: ColumnSchema,
    rows: Vec<AugmentedRecord>,

    /// Rows removed while building this frame. Zero for frames derived by
    /// splitting (the split never drops).
    pub stats: DropStats,
}

impl AugmentedDataset {
    /// Create a frame from already-resolved rows.
    pub fn new(schema: ColumnSchema, rows: Vec<AugmentedRecord>, stats: DropStats) -> Self {
        Self { schema, rows, stats }
    }

    /// Create an empty frame with the given schema.
    pub fn empty(schema: ColumnSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            stats: DropStats::default(),
        }
    }

    /// Column layout of the frame.
    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    /// Rows in partition order, chronological within each partition.
    pub fn rows(&self) -> &[AugmentedRecord] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .schema
            .index_of(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// The frame as a `[n_rows, n_columns]` matrix in schema order.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        let n_rows = self.rows.len();
        let n_cols = self.schema.len();
        let flat: Vec<f64> = self
            .rows
            .iter()
            .flat_map(|r| r.values.iter().copied())
            .collect();
        Array2::from_shape_vec((n_rows, n_cols), flat)
            .map_err(|e| Error::generic(format!("failed to shape matrix: {e}")))
    }

    /// A `[n_rows, columns.len()]` matrix of the named columns only.
    pub fn select_matrix(&self, columns: &[String]) -> Result<Array2<f64>> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|name| {
                self.schema
                    .index_of(name)
                    .ok_or_else(|| Error::UnknownColumn(name.clone()))
            })
            .collect::<Result<_>>()?;

        let n_rows = self.rows.len();
        let flat: Vec<f64> = self
            .rows
            .iter()
            .flat_map(|r| indices.iter().map(|&i| r.values[i]))
            .collect();
        Array2::from_shape_vec((n_rows, indices.len()), flat)
            .map_err(|e| Error::generic(format!("failed to shape matrix: {e}")))
    }
}
