//! Time-boundary splitting of augmented datasets.
//!
//! The split is a pure partition of rows by a predicate over the order key:
//! rows matching the boundary go to evaluation, the rest to training. Row
//! order is preserved, nothing is deduplicated, and the two outputs are
//! disjoint with union equal to the input. An empty evaluation set is a
//! valid outcome, not an error; whether it is acceptable is the training
//! collaborator's call.

use crate::dataset::{AugmentedDataset, DropStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Predicate selecting evaluation rows by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeBoundary {
    /// Evaluation holds exactly the rows with this date.
    OnDate(NaiveDate),

    /// Evaluation holds the rows on or after this date.
    FromDate(NaiveDate),
}

impl TimeBoundary {
    /// Whether a row with this order key belongs to evaluation.
    pub fn is_evaluation(&self, date: NaiveDate) -> bool {
        match self {
            TimeBoundary::OnDate(d) => date == *d,
            TimeBoundary::FromDate(d) => date >= *d,
        }
    }
}

impl std::fmt::Display for TimeBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeBoundary::OnDate(d) => write!(f, "date == {d}"),
            TimeBoundary::FromDate(d) => write!(f, "date >= {d}"),
        }
    }
}

/// Disjoint training/evaluation pair produced by a split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutput {
    /// Rows the boundary predicate rejected.
    pub training: AugmentedDataset,

    /// Rows the boundary predicate selected.
    pub evaluation: AugmentedDataset,
}

/// Split by a [`TimeBoundary`].
pub fn split_by_time_boundary(dataset: &AugmentedDataset, boundary: TimeBoundary) -> SplitOutput {
    split_with(dataset, |date| boundary.is_evaluation(date))
}

/// Split by an arbitrary pure predicate over the order key (true means
/// evaluation).
pub fn split_with<F>(dataset: &AugmentedDataset, predicate: F) -> SplitOutput
where
    F: Fn(NaiveDate) -> bool,
{
    let mut training = Vec::new();
    let mut evaluation = Vec::new();

    for row in dataset.rows() {
        if predicate(row.date) {
            evaluation.push(row.clone());
        } else {
            training.push(row.clone());
        }
    }

    if evaluation.is_empty() {
        log::warn!("boundary predicate selected zero evaluation rows");
    }

    SplitOutput {
        training: AugmentedDataset::new(
            dataset.schema().clone(),
            training,
            DropStats::default(),
        ),
        evaluation: AugmentedDataset::new(
            dataset.schema().clone(),
            evaluation,
            DropStats::default(),
        ),
    }
}
