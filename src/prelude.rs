//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types for ergonomic usage of the
//! library.
//!
//! # Usage
//!
//! ```ignore
//! use lag_feature_builder::prelude::*;
//!
//! let config = PipelineConfig::new(
//!     LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]),
//!     TimeBoundary::OnDate("2017-12-29".parse()?),
//! );
//! let pipeline = Pipeline::from_config(config)?;
//! let output = pipeline.process("data/wiki_prices.csv")?;
//! ```

// ============================================================================
// Core Pipeline
// ============================================================================

pub use crate::config::{ExperimentMetadata, PipelineConfig, PredictorConfig};
pub use crate::pipeline::{Pipeline, PipelineOutput};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::dataset::{AugmentedDataset, Dataset, DropStats, Partition};
pub use crate::record::{AugmentedRecord, Record};

// ============================================================================
// Lag Construction & Splitting
// ============================================================================

pub use crate::lag::{LagBuilder, LagEntry, LagSpec};
pub use crate::split::{split_by_time_boundary, split_with, SplitOutput, TimeBoundary};

// ============================================================================
// Schema & Predictor Selection
// ============================================================================

pub use crate::schema::{
    default_denylist, select_predictors, ColumnSchema, Measurement, PredictorSelection,
};

// ============================================================================
// Session, Loading, Validation
// ============================================================================

pub use crate::loader::CsvLoader;
pub use crate::session::{Session, SessionConfig};
pub use crate::validation::{validate_dataset, ValidationLevel, ValidationResult};

// ============================================================================
// Handoff & Export
// ============================================================================

pub use crate::export::{export_csv, ExportMetadata, NumpyExporter};
pub use crate::handoff::{
    AlgorithmFamily, AutoSearchConfig, ModelSearch, ModelTrainer, SearchBudget, TrainingFrame,
    TrainingRequest,
};

// ============================================================================
// Error Handling
// ============================================================================

pub use crate::error::{Error, Result};
