//! Lag-Feature Builder
//!
//! Lag-feature construction and time-boundary splitting for per-ticker
//! OHLCV time series.
//!
//! # Overview
//!
//! This library takes a time-ordered dataset partitioned by entity (ticker),
//! derives lag columns — values observed N periods earlier within the same
//! partition — and splits the result into training and evaluation subsets
//! at a fixed time boundary. The output is a pair of dense, named-column
//! frames ready for an external model trainer or automated model search;
//! no model is trained here.
//!
//! Two rules shape everything downstream:
//!
//! - **Drop, don't impute**: a row whose lag references reach before the
//!   start of its partition, or hit a missing source value, is removed
//!   whole. No imputation ever happens.
//! - **Partition isolation**: lag values for one ticker never reference
//!   another ticker's rows, by construction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Lag-Feature Builder                        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  loader       - CSV ingestion with key validation              │
//! │  dataset      - Partition arena (grouped, date-sorted)         │
//! │  lag          - Lag construction with the drop policy          │
//! │  split        - Time-boundary train/eval partitioning          │
//! │  schema       - Static columns, predictor selection            │
//! │  handoff      - Trainer and model-search seams                 │
//! │  export       - NumPy/CSV materialization                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lag_feature_builder::prelude::*;
//!
//! let config = PipelineConfig::new(
//!     LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]),
//!     TimeBoundary::OnDate("2017-12-29".parse()?),
//! );
//!
//! let pipeline = Pipeline::from_config(config)?;
//! let output = pipeline.process("data/wiki_prices.csv")?;
//!
//! // Hand the frames to the external trainer.
//! let request = output.training_request()?;
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod handoff;
pub mod lag;
pub mod loader;
pub mod pipeline;
pub mod prelude;
pub mod record;
pub mod schema;
pub mod session;
pub mod split;
pub mod validation;

// Re-exports - Error handling
pub use error::{Error, Result};

// Re-exports - Config
pub use config::{ExperimentMetadata, PipelineConfig, PredictorConfig};

// Re-exports - Data model
pub use dataset::{AugmentedDataset, Dataset, DropStats, Partition};
pub use record::{AugmentedRecord, Record};

// Re-exports - Lag construction
pub use lag::{LagBuilder, LagEntry, LagSpec};

// Re-exports - Splitting
pub use split::{split_by_time_boundary, split_with, SplitOutput, TimeBoundary};

// Re-exports - Schema
pub use schema::{default_denylist, select_predictors, ColumnSchema, Measurement, PredictorSelection};

// Re-exports - Session
pub use session::{Session, SessionConfig};

// Re-exports - Loading
pub use loader::CsvLoader;

// Re-exports - Handoff
pub use handoff::{
    AlgorithmFamily, AutoSearchConfig, ModelSearch, ModelTrainer, SearchBudget, TrainingFrame,
    TrainingRequest,
};

// Re-exports - Export
pub use export::{export_csv, ExportMetadata, NumpyExporter};

// Re-exports - Validation
pub use validation::{validate_dataset, validate_dates, ValidationLevel, ValidationResult};

// Re-exports - Pipeline
pub use pipeline::{Pipeline, PipelineOutput};
