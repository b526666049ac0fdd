//! End-to-end workflow demo.
//!
//! Generates a small two-ticker OHLCV CSV, runs the full pipeline (load →
//! validate → lag construction → time-boundary split), exports the frames,
//! and submits them to a logging stand-in for the automated model search.
//!
//! Run with: `cargo run --example full_workflow`

use chrono::{Duration, NaiveDate};
use lag_feature_builder::prelude::*;
use std::fs::File;
use std::io::Write as _;

/// Stand-in for the external search service: logs the submission and
/// returns. A real implementation would enqueue the run and expose
/// progress through its own dashboard.
struct LoggingSearch;

impl ModelSearch for LoggingSearch {
    fn submit(&mut self, request: &TrainingRequest, config: &AutoSearchConfig) -> Result<()> {
        println!(
            "submitted search: {} train rows, {} eval rows, {} predictors, {}s budget, {} excluded families",
            request.train.n_rows(),
            request.evaluation.n_rows(),
            request.train.n_predictors(),
            config.budget.max_runtime_secs,
            config.excluded.len()
        );
        Ok(())
    }
}

fn write_demo_csv(path: &std::path::Path) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "ticker,date,open,high,low,close,volume")?;

    let start: NaiveDate = "2017-11-01".parse().unwrap();
    for (ticker, base) in [("AAPL", 25_000_000.0), ("MSFT", 18_000_000.0)] {
        for i in 0..40 {
            let d = start + Duration::days(i);
            let drift = i as f64 * 0.2;
            writeln!(
                file,
                "{},{},{:.2},{:.2},{:.2},{:.2},{:.0}",
                ticker,
                d,
                170.0 + drift,
                171.5 + drift,
                169.0 + drift,
                170.8 + drift,
                base + (i * i % 17) as f64 * 100_000.0
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let work_dir = std::env::temp_dir().join("lag_feature_builder_demo");
    std::fs::create_dir_all(&work_dir)?;
    let csv_path = work_dir.join("prices.csv");
    write_demo_csv(&csv_path)?;

    // Three days of volume history as predictors, last day held out.
    let config = PipelineConfig::new(
        LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3]),
        TimeBoundary::OnDate("2017-12-10".parse().unwrap()),
    )
    .with_session(SessionConfig::new().with_threads(2));
    let boundary = config.split;

    let pipeline = Pipeline::from_config(config)?;
    let output = pipeline.process(&csv_path)?;

    println!("records loaded:    {}", output.records_loaded);
    println!("partitions:        {}", output.partition_count);
    println!(
        "augmented rows:    {} ({} dropped: {} history, {} missing)",
        output.rows_augmented,
        output.stats.total(),
        output.stats.insufficient_history,
        output.stats.missing_value
    );
    println!("training rows:     {}", output.training.len());
    println!("evaluation rows:   {}", output.evaluation.len());
    println!("predictors:        {:?}", output.selection.predictors);
    println!("response:          {}", output.selection.response);

    // Materialize the frames for the external trainer.
    let split = SplitOutput {
        training: output.training.clone(),
        evaluation: output.evaluation.clone(),
    };
    let export_dir = work_dir.join("export");
    let metadata = NumpyExporter::new(&export_dir).export(
        &split,
        &output.selection,
        boundary,
        output.stats,
    )?;
    println!(
        "exported {} train / {} eval rows to {}",
        metadata.n_train_rows,
        metadata.n_eval_rows,
        export_dir.display()
    );

    // Fire-and-forget search submission, skipping the slow families.
    let request = output.training_request()?;
    let search_config = AutoSearchConfig {
        budget: SearchBudget {
            max_runtime_secs: 600,
            max_models: None,
        },
        excluded: vec![
            AlgorithmFamily::DeepLearning,
            AlgorithmFamily::StackedEnsemble,
        ],
    };
    LoggingSearch.submit(&request, &search_config)?;

    Ok(())
}
