//! Dataset validation.
//!
//! Pre-flight checks over a constructed [`Dataset`] before lag building:
//!
//! 1. **Order-key ties**: duplicate dates within a partition make lag
//!    semantics depend on source row order. The builder resolves ties
//!    deterministically (stable input order), but they usually indicate a
//!    dirty source, so they are reported as warnings.
//! 2. **Missing measurements**: counted per partition; these rows will be
//!    dropped by the lag builder, so a high count is worth knowing early.
//! 3. **Partition size**: partitions shorter than the largest lag offset
//!    contribute zero rows.
//!
//! # Usage
//!
//! ```ignore
//! use lag_feature_builder::validation::validate_dataset;
//!
//! let result = validate_dataset(&dataset, max_offset);
//! if result.has_warnings() {
//!     for warning in result.warnings() {
//!         log::warn!("{warning}");
//!     }
//! }
//! ```

use crate::dataset::Dataset;
use chrono::NaiveDate;
use std::fmt;

/// Outcome of a single validation check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data passed the check.
    Valid,

    /// Data is usable but suspicious.
    Warning(String),

    /// Data is unusable for the check's concern.
    Error(String),
}

impl ValidationLevel {
    /// Whether this outcome is a clean pass.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    /// Whether this outcome is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    /// Whether this outcome is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated outcomes of all checks run over a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one check outcome.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Whether every check passed cleanly.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    /// Whether any check errored.
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    /// Whether any check warned.
    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// All warning messages, prefixed with their check name.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Warning(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// All error messages, prefixed with their check name.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Error(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// Every recorded outcome.
    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    /// Number of checks run.
    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    /// Number of clean passes.
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Run all dataset checks.
///
/// `max_offset` is the largest lag offset that will be applied, used for
/// the partition-size check; pass 0 to skip it.
pub fn validate_dataset(dataset: &Dataset, max_offset: usize) -> ValidationResult {
    let mut result = ValidationResult::new();

    if dataset.is_empty() {
        result.add(
            "dataset",
            ValidationLevel::Error("dataset holds no records".to_string()),
        );
        return result;
    }

    for partition in dataset.partitions() {
        let check = format!("partition_{}", partition.ticker);

        let dates: Vec<NaiveDate> = partition.records.iter().map(|r| r.date).collect();
        let ties = count_ties(&dates);
        if ties > 0 {
            result.add(
                &check,
                ValidationLevel::Warning(format!(
                    "{ties} duplicate order-key value(s); tie order follows source row order"
                )),
            );
        }

        let missing = partition
            .records
            .iter()
            .filter(|r| !r.is_complete())
            .count();
        if missing > 0 {
            result.add(
                &check,
                ValidationLevel::Warning(format!(
                    "{missing} record(s) with missing measurements will be dropped"
                )),
            );
        }

        if max_offset > 0 && partition.len() <= max_offset {
            result.add(
                &check,
                ValidationLevel::Warning(format!(
                    "partition has {} record(s), fewer than required history ({}); it contributes no rows",
                    partition.len(),
                    max_offset + 1
                )),
            );
        }

        if ties == 0 && missing == 0 && (max_offset == 0 || partition.len() > max_offset) {
            result.add(&check, ValidationLevel::Valid);
        }
    }

    result
}

/// Check a date sequence for ascending order and ties.
///
/// Out-of-order dates are errors (the caller failed to sort), ties are
/// warnings.
pub fn validate_dates(dates: &[NaiveDate]) -> ValidationResult {
    let mut result = ValidationResult::new();

    if dates.is_empty() {
        result.add(
            "dates",
            ValidationLevel::Warning("no dates to validate".to_string()),
        );
        return result;
    }

    for i in 1..dates.len() {
        if dates[i] < dates[i - 1] {
            result.add(
                "date_ordering",
                ValidationLevel::Error(format!(
                    "non-ascending date at index {}: {} < {}",
                    i,
                    dates[i],
                    dates[i - 1]
                )),
            );
            return result;
        }
    }
    result.add("date_ordering", ValidationLevel::Valid);

    let ties = count_ties(dates);
    if ties > 0 {
        result.add(
            "date_ties",
            ValidationLevel::Warning(format!("{ties} duplicate date value(s)")),
        );
    } else {
        result.add("date_ties", ValidationLevel::Valid);
    }

    result
}

/// Number of positions whose date equals the previous one (assumes sorted
/// input).
fn count_ties(dates: &[NaiveDate]) -> usize {
    dates.windows(2).filter(|w| w[0] == w[1]).count()
}
