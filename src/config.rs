//! Pipeline configuration management.
//!
//! A [`PipelineConfig`] combines every stage of a run — lag specification,
//! split boundary, predictor selection, session sizing — in one struct
//! with serialization support, so an experiment is reproducible from a
//! single TOML or JSON file.
//!
//! # Example
//!
//! ```ignore
//! use lag_feature_builder::config::PipelineConfig;
//! use lag_feature_builder::lag::LagSpec;
//! use lag_feature_builder::schema::Measurement;
//! use lag_feature_builder::split::TimeBoundary;
//!
//! let config = PipelineConfig::new(
//!     LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]),
//!     TimeBoundary::OnDate("2017-12-29".parse()?),
//! );
//!
//! config.save_toml("experiment.toml")?;
//! let loaded = PipelineConfig::load_toml("experiment.toml")?;
//! ```

use crate::error::{Error, Result};
use crate::lag::LagSpec;
use crate::schema::{self, ColumnSchema, Measurement};
use crate::session::SessionConfig;
use crate::split::TimeBoundary;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Unified configuration for a complete pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lag columns to derive.
    pub lags: LagSpec,

    /// Boundary separating training from evaluation rows.
    pub split: TimeBoundary,

    /// Predictor selection settings.
    pub predictors: PredictorConfig,

    /// Worker pool settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Experiment metadata (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExperimentMetadata>,
}

/// Predictor selection settings.
///
/// Predictors are chosen by exclusion: every augmented column except the
/// denylist and the response. The default denylist is the full set of
/// current-period measurements, which would leak same-period information
/// into the predictors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Response column name.
    pub response: String,

    /// Columns excluded from the predictor set.
    pub denylist: Vec<String>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            response: Measurement::Volume.name().to_string(),
            denylist: schema::default_denylist(),
        }
    }
}

/// Experiment metadata for tracking and reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetadata {
    /// Experiment name.
    pub name: String,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Version or git commit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Custom tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl PipelineConfig {
    /// Create a configuration with the required stages and default
    /// predictor/session settings.
    pub fn new(lags: LagSpec, split: TimeBoundary) -> Self {
        Self {
            lags,
            split,
            predictors: PredictorConfig::default(),
            session: SessionConfig::default(),
            metadata: None,
        }
    }

    /// Set the response column.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.predictors.response = response.into();
        self
    }

    /// Set the predictor denylist.
    pub fn with_denylist(mut self, denylist: Vec<String>) -> Self {
        self.predictors.denylist = denylist;
        self
    }

    /// Set the session configuration.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Set experiment metadata.
    pub fn with_metadata(mut self, metadata: ExperimentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The augmented column layout this configuration produces.
    pub fn augmented_schema(&self) -> ColumnSchema {
        let mut names: Vec<String> = Measurement::all()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        names.extend(self.lags.column_names());
        ColumnSchema::new(names)
    }

    /// Validate the configuration.
    ///
    /// Returns Ok(()) if valid, Err(msg) otherwise.
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.lags.validate()?;

        if self.predictors.response.trim().is_empty() {
            return Err("response column must not be empty".to_string());
        }

        // Resolve the selection against the schema the lags will produce,
        // so typos fail here instead of mid-run.
        let augmented = self.augmented_schema();
        let selection = schema::select_predictors(
            &augmented,
            &self.predictors.denylist,
            &self.predictors.response,
        )
        .map_err(|e| e.to_string())?;
        if selection.predictors.is_empty() {
            return Err("denylist excludes every predictor column".to_string());
        }

        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("TOML serialization failed: {e}")))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("TOML parse failed: {e}")))?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Config(format!("JSON serialization failed: {e}")))?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("JSON parse failed: {e}")))?;
        config.validate().map_err(Error::Config)?;
        Ok(config)
    }
}
