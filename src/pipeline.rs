//! End-to-end pipeline for lag construction and splitting.
//!
//! Connects the stages in order:
//!
//! ```text
//! CSV source → CsvLoader → Dataset (grouped, sorted)
//!                              ↓ validate (ties, missing values)
//!                          LagBuilder → AugmentedDataset
//!                              ↓ split_by_time_boundary
//!                     (Training, Evaluation) + PredictorSelection
//!                              ↓
//!                  TrainingRequest → external trainer / search
//! ```
//!
//! Every stage is a pure transformation; the only state the pipeline holds
//! is its configuration and the [`Session`] it computes on. Running the
//! same input twice yields identical output.
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
//! let request = output.training_request()?;
//! ```

use crate::config::PipelineConfig;
use crate::dataset::{AugmentedDataset, Dataset, DropStats};
use crate::error::{Error, Result};
use crate::handoff::TrainingRequest;
use crate::lag::LagBuilder;
use crate::loader::CsvLoader;
use crate::record::Record;
use crate::schema::{self, PredictorSelection};
use crate::session::Session;
use crate::split::{split_by_time_boundary, SplitOutput};
use crate::validation::{validate_dataset, ValidationResult};
use std::path::Path;

/// Output from a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Rows the boundary rejected (for training).
    pub training: AugmentedDataset,

    /// Rows the boundary selected (for evaluation).
    pub evaluation: AugmentedDataset,

    /// Predictor/response columns resolved against the augmented schema.
    pub selection: PredictorSelection,

    /// Records read from the source.
    pub records_loaded: usize,

    /// Partitions (tickers) in the source.
    pub partition_count: usize,

    /// Augmented rows surviving the drop policy, before splitting.
    pub rows_augmented: usize,

    /// Drop accounting from lag construction.
    pub stats: DropStats,

    /// Validation findings on the grouped dataset.
    pub validation: ValidationResult,
}

impl PipelineOutput {
    /// Build the frames handed to external collaborators.
    pub fn training_request(&self) -> Result<TrainingRequest> {
        let split = SplitOutput {
            training: self.training.clone(),
            evaluation: self.evaluation.clone(),
        };
        TrainingRequest::from_split(&split, &self.selection)
    }
}

/// Config-driven pipeline over an explicit session.
pub struct Pipeline {
    config: PipelineConfig,
    session: Session,
    builder: LagBuilder,
}

impl Pipeline {
    /// Create a pipeline from configuration, validating it and creating
    /// the session.
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate().map_err(Error::Config)?;

        let session = Session::from_config(config.session.clone())?;
        let builder = LagBuilder::new(config.lags.clone())?;

        Ok(Self {
            config,
            session,
            builder,
        })
    }

    /// Create a pipeline reusing an existing session.
    pub fn with_session(config: PipelineConfig, session: Session) -> Result<Self> {
        config.validate().map_err(Error::Config)?;
        let builder = LagBuilder::new(config.lags.clone())?;
        Ok(Self {
            config,
            session,
            builder,
        })
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The session the pipeline computes on.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the pipeline over a CSV file.
    pub fn process<P: AsRef<Path>>(&self, input_path: P) -> Result<PipelineOutput> {
        let records = CsvLoader::load_records(input_path)?;
        self.process_records(records)
    }

    /// Run the pipeline over already-loaded records.
    pub fn process_records(&self, records: Vec<Record>) -> Result<PipelineOutput> {
        let records_loaded = records.len();
        let dataset = Dataset::from_records(records);
        let partition_count = dataset.partition_count();

        let validation = validate_dataset(&dataset, self.config.lags.max_offset());
        for warning in validation.warnings() {
            log::warn!("{warning}");
        }

        let augmented = self.builder.build(&dataset, &self.session)?;
        let rows_augmented = augmented.len();
        let stats = augmented.stats;

        let split = split_by_time_boundary(&augmented, self.config.split);
        log::info!(
            "split at {}: {} training rows, {} evaluation rows",
            self.config.split,
            split.training.len(),
            split.evaluation.len()
        );

        let selection = schema::select_predictors(
            augmented.schema(),
            &self.config.predictors.denylist,
            &self.config.predictors.response,
        )?;

        Ok(PipelineOutput {
            training: split.training,
            evaluation: split.evaluation,
            selection,
            records_loaded,
            partition_count,
            rows_augmented,
            stats,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lag::LagSpec;
    use crate::schema::Measurement;
    use crate::split::TimeBoundary;

    fn records() -> Vec<Record> {
        let volumes = [100.0, 200.0, 300.0, 400.0, 500.0];
        volumes
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                Record::new(
                    "AAPL",
                    chrono::NaiveDate::parse_from_str("2017-12-22", "%Y-%m-%d").unwrap()
                        + chrono::Duration::days(i as i64),
                    1.0,
                    2.0,
                    0.5,
                    1.5,
                    v,
                )
            })
            .collect()
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]),
            TimeBoundary::OnDate("2017-12-26".parse().unwrap()),
        )
    }

    #[test]
    fn test_pipeline_creation() {
        assert!(Pipeline::from_config(config()).is_ok());
    }

    #[test]
    fn test_pipeline_rejects_invalid_config() {
        let bad = config().with_response("Turnover");
        assert!(Pipeline::from_config(bad).is_err());
    }

    #[test]
    fn test_process_records_end_to_end() {
        let pipeline = Pipeline::from_config(config()).unwrap();
        let output = pipeline.process_records(records()).unwrap();

        assert_eq!(output.records_loaded, 5);
        assert_eq!(output.partition_count, 1);
        assert_eq!(output.rows_augmented, 2);
        assert_eq!(output.stats.insufficient_history, 3);

        // 2017-12-26 is the 5th row (position 4): evaluation gets it.
        assert_eq!(output.evaluation.len(), 1);
        assert_eq!(output.training.len(), 1);
    }

    #[test]
    fn test_training_request_from_output() {
        let pipeline = Pipeline::from_config(config()).unwrap();
        let output = pipeline.process_records(records()).unwrap();

        let request = output.training_request().unwrap();
        assert_eq!(
            request.train.predictors,
            vec!["Volume_lag1", "Volume_lag2", "Volume_lag3"]
        );
        assert_eq!(request.train.n_rows(), 1);
        assert_eq!(request.evaluation.n_rows(), 1);
        // Evaluation row is position 4: lags are 400, 300, 200.
        assert_eq!(request.evaluation.features[[0, 0]], 400.0);
        assert_eq!(request.evaluation.features[[0, 2]], 200.0);
        assert_eq!(request.evaluation.response[0], 500.0);
    }

    #[test]
    fn test_pipeline_is_repeatable() {
        let pipeline = Pipeline::from_config(config()).unwrap();
        let first = pipeline.process_records(records()).unwrap();
        let second = pipeline.process_records(records()).unwrap();

        assert_eq!(first.training, second.training);
        assert_eq!(first.evaluation, second.evaluation);
    }
}
