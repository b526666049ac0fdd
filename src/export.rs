//! Export of split frames for the external trainer.
//!
//! Writes the training/evaluation pair as `.npy` matrices with a JSON
//! metadata sidecar, so a consumer on the other side of the seam can
//! recover column names, row counts, the boundary that produced the split,
//! and the drop accounting without parsing anything else. Augmented rows
//! can also be written back out as CSV.
//!
//! # Files produced
//!
//! - `train_features.npy` — `[n_train, n_predictors]`
//! - `train_response.npy` — `[n_train]`
//! - `eval_features.npy` — `[n_eval, n_predictors]`
//! - `eval_response.npy` — `[n_eval]`
//! - `metadata.json` — [`ExportMetadata`]

use crate::dataset::{AugmentedDataset, DropStats};
use crate::error::{Error, Result};
use crate::handoff::{TrainingFrame, TrainingRequest};
use crate::schema::PredictorSelection;
use crate::split::{SplitOutput, TimeBoundary};
use ndarray_npy::WriteNpyExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Metadata sidecar describing an exported split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Rows in the training frame.
    pub n_train_rows: usize,

    /// Rows in the evaluation frame.
    pub n_eval_rows: usize,

    /// Predictor column names, in matrix column order.
    pub predictor_columns: Vec<String>,

    /// Response column name.
    pub response_column: String,

    /// Human-readable boundary that produced the split.
    pub boundary: String,

    /// Rows dropped while building the augmented dataset.
    pub dropped: DropStats,

    /// Export timestamp (RFC 3339).
    pub export_timestamp: String,
}

/// Writes split frames as NumPy arrays plus metadata.
pub struct NumpyExporter {
    output_dir: PathBuf,
}

impl NumpyExporter {
    /// Create an exporter targeting a directory (created on export).
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Export a split.
    ///
    /// `dropped` is the drop accounting of the augmented dataset the split
    /// came from; it is recorded in the metadata so consumers can see how
    /// much history the lag construction consumed.
    pub fn export(
        &self,
        split: &SplitOutput,
        selection: &PredictorSelection,
        boundary: TimeBoundary,
        dropped: DropStats,
    ) -> Result<ExportMetadata> {
        fs::create_dir_all(&self.output_dir)?;

        let request = TrainingRequest::from_split(split, selection)?;

        self.write_frame(&request.train, "train")?;
        self.write_frame(&request.evaluation, "eval")?;

        let metadata = ExportMetadata {
            n_train_rows: request.train.n_rows(),
            n_eval_rows: request.evaluation.n_rows(),
            predictor_columns: selection.predictors.clone(),
            response_column: selection.response.clone(),
            boundary: boundary.to_string(),
            dropped,
            export_timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let metadata_path = self.output_dir.join("metadata.json");
        let file = File::create(&metadata_path)?;
        serde_json::to_writer_pretty(file, &metadata)
            .map_err(|e| Error::generic(format!("failed to write metadata: {e}")))?;

        log::info!(
            "exported split to {}: {} train rows, {} eval rows, {} predictors",
            self.output_dir.display(),
            metadata.n_train_rows,
            metadata.n_eval_rows,
            metadata.predictor_columns.len()
        );

        Ok(metadata)
    }

    /// Write one frame's feature matrix and response vector.
    fn write_frame(&self, frame: &TrainingFrame, prefix: &str) -> Result<()> {
        let features_path = self.output_dir.join(format!("{prefix}_features.npy"));
        let mut file = File::create(&features_path)?;
        frame
            .features
            .write_npy(&mut file)
            .map_err(|e| Error::generic(format!("failed to write {prefix} features: {e}")))?;

        let response_path = self.output_dir.join(format!("{prefix}_response.npy"));
        let mut file = File::create(&response_path)?;
        frame
            .response
            .write_npy(&mut file)
            .map_err(|e| Error::generic(format!("failed to write {prefix} response: {e}")))?;

        Ok(())
    }
}

/// Write an augmented dataset as CSV: `ticker`, `date`, then the schema
/// columns.
pub fn export_csv<P: AsRef<Path>>(dataset: &AugmentedDataset, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec!["ticker".to_string(), "date".to_string()];
    header.extend(dataset.schema().names().iter().cloned());
    writer.write_record(&header)?;

    for row in dataset.rows() {
        let mut record = vec![row.ticker.clone(), row.date.to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AugmentedRecord;
    use crate::schema::{select_predictors, ColumnSchema};
    use crate::split::split_by_time_boundary;
    use ndarray::{Array1, Array2};
    use tempfile::TempDir;

    fn frame() -> AugmentedDataset {
        let schema = ColumnSchema::new(vec!["Volume".to_string(), "Volume_lag1".to_string()]);
        let rows = vec![
            AugmentedRecord {
                ticker: "AAPL".to_string(),
                date: "2017-12-28".parse().unwrap(),
                values: vec![200.0, 100.0],
            },
            AugmentedRecord {
                ticker: "AAPL".to_string(),
                date: "2017-12-29".parse().unwrap(),
                values: vec![300.0, 200.0],
            },
        ];
        AugmentedDataset::new(
            schema,
            rows,
            DropStats {
                insufficient_history: 1,
                missing_value: 0,
            },
        )
    }

    #[test]
    fn test_export_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let dataset = frame();
        let boundary = TimeBoundary::OnDate("2017-12-29".parse().unwrap());
        let split = split_by_time_boundary(&dataset, boundary);
        let selection =
            select_predictors(dataset.schema(), &["Volume".to_string()], "Volume").unwrap();

        let exporter = NumpyExporter::new(dir.path());
        let metadata = exporter
            .export(&split, &selection, boundary, dataset.stats)
            .unwrap();

        assert_eq!(metadata.n_train_rows, 1);
        assert_eq!(metadata.n_eval_rows, 1);
        assert_eq!(metadata.predictor_columns, vec!["Volume_lag1"]);
        assert_eq!(metadata.dropped.insufficient_history, 1);

        for name in [
            "train_features.npy",
            "train_response.npy",
            "eval_features.npy",
            "eval_response.npy",
            "metadata.json",
        ] {
            assert!(dir.path().join(name).exists(), "{name} should exist");
        }
    }

    #[test]
    fn test_exported_arrays_read_back() {
        let dir = TempDir::new().unwrap();
        let dataset = frame();
        let boundary = TimeBoundary::OnDate("2017-12-29".parse().unwrap());
        let split = split_by_time_boundary(&dataset, boundary);
        let selection =
            select_predictors(dataset.schema(), &["Volume".to_string()], "Volume").unwrap();

        NumpyExporter::new(dir.path())
            .export(&split, &selection, boundary, dataset.stats)
            .unwrap();

        let file = File::open(dir.path().join("train_features.npy")).unwrap();
        let features: Array2<f64> = ndarray_npy::ReadNpyExt::read_npy(file).unwrap();
        assert_eq!(features.shape(), &[1, 1]);
        assert_eq!(features[[0, 0]], 100.0);

        let file = File::open(dir.path().join("eval_response.npy")).unwrap();
        let response: Array1<f64> = ndarray_npy::ReadNpyExt::read_npy(file).unwrap();
        assert_eq!(response.to_vec(), vec![300.0]);
    }

    #[test]
    fn test_metadata_round_trip() {
        let dir = TempDir::new().unwrap();
        let dataset = frame();
        let boundary = TimeBoundary::FromDate("2017-12-29".parse().unwrap());
        let split = split_by_time_boundary(&dataset, boundary);
        let selection =
            select_predictors(dataset.schema(), &["Volume".to_string()], "Volume").unwrap();

        NumpyExporter::new(dir.path())
            .export(&split, &selection, boundary, dataset.stats)
            .unwrap();

        let text = fs::read_to_string(dir.path().join("metadata.json")).unwrap();
        let metadata: ExportMetadata = serde_json::from_str(&text).unwrap();
        assert_eq!(metadata.response_column, "Volume");
        assert!(metadata.boundary.contains("2017-12-29"));
    }

    #[test]
    fn test_csv_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("augmented.csv");
        let dataset = frame();

        export_csv(&dataset, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "ticker,date,Volume,Volume_lag1");
        assert_eq!(lines.next().unwrap(), "AAPL,2017-12-28,200,100");
    }
}
