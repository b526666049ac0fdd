//! Handoff seam to the external training and model-search collaborators.
//!
//! This crate does not train models. It prepares [`TrainingFrame`]s —
//! dense matrices with unambiguous column names — and defines the traits
//! the external collaborators implement:
//!
//! - [`ModelTrainer`]: consumes a training/evaluation pair plus predictor
//!   and response names.
//! - [`ModelSearch`]: accepts the same pair together with a time/model
//!   budget and a list of excluded algorithm families, fire-and-forget;
//!   progress is observed elsewhere.
//!
//! Predictors are selected by exclusion over the augmented schema (see
//! [`select_predictors`]), so the current-period measurements stay out of
//! the predictor set by default.
//!
//! [`select_predictors`]: crate::schema::select_predictors

use crate::dataset::AugmentedDataset;
use crate::error::Result;
use crate::schema::PredictorSelection;
use crate::split::SplitOutput;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A dense frame ready for an external trainer.
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    /// Predictor column names, in matrix column order.
    pub predictors: Vec<String>,

    /// `[n_rows, predictors.len()]` predictor matrix.
    pub features: Array2<f64>,

    /// Response column name.
    pub response_name: String,

    /// `[n_rows]` response vector.
    pub response: Array1<f64>,
}

impl TrainingFrame {
    /// Extract a frame from an augmented dataset using a resolved
    /// predictor selection.
    pub fn from_dataset(
        dataset: &AugmentedDataset,
        selection: &PredictorSelection,
    ) -> Result<Self> {
        let features = dataset.select_matrix(&selection.predictors)?;
        let response = Array1::from_vec(dataset.column(&selection.response)?);

        Ok(Self {
            predictors: selection.predictors.clone(),
            features,
            response_name: selection.response.clone(),
            response,
        })
    }

    /// Number of rows in the frame.
    pub fn n_rows(&self) -> usize {
        self.response.len()
    }

    /// Number of predictor columns.
    pub fn n_predictors(&self) -> usize {
        self.predictors.len()
    }
}

/// Training and evaluation frames handed to a collaborator together.
#[derive(Debug, Clone)]
pub struct TrainingRequest {
    /// Frame built from the training split.
    pub train: TrainingFrame,

    /// Frame built from the evaluation split; may have zero rows.
    pub evaluation: TrainingFrame,
}

impl TrainingRequest {
    /// Build both frames from a split with one predictor selection.
    pub fn from_split(split: &SplitOutput, selection: &PredictorSelection) -> Result<Self> {
        Ok(Self {
            train: TrainingFrame::from_dataset(&split.training, selection)?,
            evaluation: TrainingFrame::from_dataset(&split.evaluation, selection)?,
        })
    }
}

/// External model-training collaborator.
pub trait ModelTrainer {
    /// Train on the request's frames. Convergence, metrics, and model
    /// inspection all live behind this seam.
    fn train(&mut self, request: &TrainingRequest) -> Result<()>;
}

/// Algorithm families an automated search can be told to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmFamily {
    /// Deep neural networks.
    DeepLearning,

    /// Gradient boosting machines.
    GradientBoosting,

    /// Generalized linear models.
    LinearModel,

    /// Random forests and extremely randomized trees.
    RandomForest,

    /// Stacked ensembles built over other families.
    StackedEnsemble,
}

/// Time and model budget for an automated search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Wall-clock budget in seconds.
    pub max_runtime_secs: u64,

    /// Cap on the number of models tried, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_models: Option<usize>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_runtime_secs: 600,
            max_models: None,
        }
    }
}

/// Everything an automated search run needs besides the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoSearchConfig {
    /// Time/model budget.
    pub budget: SearchBudget,

    /// Algorithm families to skip.
    pub excluded: Vec<AlgorithmFamily>,
}

/// External automated model-search collaborator.
///
/// Submission is fire-and-forget: `submit` returns once the run is
/// accepted, and progress is observed through the collaborator's own
/// operational interface.
pub trait ModelSearch {
    /// Submit a search run over the request's frames.
    fn submit(&mut self, request: &TrainingRequest, config: &AutoSearchConfig) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DropStats;
    use crate::record::AugmentedRecord;
    use crate::schema::{select_predictors, ColumnSchema};

    fn frame() -> AugmentedDataset {
        let schema = ColumnSchema::new(vec![
            "Volume".to_string(),
            "Volume_lag1".to_string(),
            "Volume_lag2".to_string(),
        ]);
        let rows = vec![
            AugmentedRecord {
                ticker: "AAPL".to_string(),
                date: "2017-01-05".parse().unwrap(),
                values: vec![300.0, 200.0, 100.0],
            },
            AugmentedRecord {
                ticker: "AAPL".to_string(),
                date: "2017-01-06".parse().unwrap(),
                values: vec![400.0, 300.0, 200.0],
            },
        ];
        AugmentedDataset::new(schema, rows, DropStats::default())
    }

    #[test]
    fn test_training_frame_extraction() {
        let dataset = frame();
        let selection = select_predictors(
            dataset.schema(),
            &["Volume".to_string()],
            "Volume",
        )
        .unwrap();

        let tf = TrainingFrame::from_dataset(&dataset, &selection).unwrap();
        assert_eq!(tf.n_rows(), 2);
        assert_eq!(tf.n_predictors(), 2);
        assert_eq!(tf.predictors, vec!["Volume_lag1", "Volume_lag2"]);
        assert_eq!(tf.features[[0, 0]], 200.0);
        assert_eq!(tf.response[1], 400.0);
        assert_eq!(tf.response_name, "Volume");
    }

    #[test]
    fn test_frame_from_empty_dataset() {
        let schema = ColumnSchema::new(vec!["Volume".to_string(), "Volume_lag1".to_string()]);
        let dataset = AugmentedDataset::empty(schema);
        let selection = select_predictors(
            dataset.schema(),
            &["Volume".to_string()],
            "Volume",
        )
        .unwrap();

        let tf = TrainingFrame::from_dataset(&dataset, &selection).unwrap();
        assert_eq!(tf.n_rows(), 0);
        assert_eq!(tf.features.shape(), &[0, 1]);
    }

    #[test]
    fn test_search_budget_defaults() {
        let budget = SearchBudget::default();
        assert_eq!(budget.max_runtime_secs, 600);
        assert!(budget.max_models.is_none());
    }

    #[test]
    fn test_mock_trainer_receives_frames() {
        struct Recorder {
            seen_predictors: Vec<String>,
        }

        impl ModelTrainer for Recorder {
            fn train(&mut self, request: &TrainingRequest) -> Result<()> {
                self.seen_predictors = request.train.predictors.clone();
                Ok(())
            }
        }

        let dataset = frame();
        let selection =
            select_predictors(dataset.schema(), &["Volume".to_string()], "Volume").unwrap();
        let split = crate::split::split_by_time_boundary(
            &dataset,
            crate::split::TimeBoundary::OnDate("2017-01-06".parse().unwrap()),
        );
        let request = TrainingRequest::from_split(&split, &selection).unwrap();

        let mut trainer = Recorder {
            seen_predictors: Vec::new(),
        };
        trainer.train(&request).unwrap();
        assert_eq!(trainer.seen_predictors, vec!["Volume_lag1", "Volume_lag2"]);
        assert_eq!(request.train.n_rows(), 1);
        assert_eq!(request.evaluation.n_rows(), 1);
    }
}
