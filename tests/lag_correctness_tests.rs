//! Lag construction correctness tests.
//!
//! Verifies the index arithmetic, the drop policy, and determinism against
//! hand-computed expectations.

use chrono::{Duration, NaiveDate};
use lag_feature_builder::{
    Dataset, LagBuilder, LagSpec, Measurement, Record, Session, SessionConfig,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Sequential daily records for one ticker with the given volumes.
fn volume_series(ticker: &str, start: &str, volumes: &[f64]) -> Vec<Record> {
    volumes
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            Record::new(
                ticker,
                date(start) + Duration::days(i as i64),
                10.0 + i as f64,
                11.0 + i as f64,
                9.0 + i as f64,
                10.5 + i as f64,
                v,
            )
        })
        .collect()
}

fn session() -> Session {
    Session::from_config(SessionConfig::new().with_threads(2)).unwrap()
}

#[test]
fn test_five_row_partition_with_three_lags() {
    // Five chronologically ordered rows with volumes [100..500] and lag
    // offsets {1,2,3} must yield exactly the last two rows.
    let records = volume_series("AAPL", "2017-01-02", &[100.0, 200.0, 300.0, 400.0, 500.0]);
    let builder =
        LagBuilder::new(LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3])).unwrap();

    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    assert_eq!(out.len(), 2);

    let schema = out.schema();
    let lag1 = schema.index_of("Volume_lag1").unwrap();
    let lag2 = schema.index_of("Volume_lag2").unwrap();
    let lag3 = schema.index_of("Volume_lag3").unwrap();

    // Position 3 (zero-indexed): lags are 300, 200, 100.
    let row = &out.rows()[0];
    assert_eq!(row.values[lag1], 300.0);
    assert_eq!(row.values[lag2], 200.0);
    assert_eq!(row.values[lag3], 100.0);

    // Position 4: lags are 400, 300, 200.
    let row = &out.rows()[1];
    assert_eq!(row.values[lag1], 400.0);
    assert_eq!(row.values[lag2], 300.0);
    assert_eq!(row.values[lag3], 200.0);
}

#[test]
fn test_lag_matches_source_at_offset_position() {
    // For every surviving position i and offset k, the derived value must
    // equal the source volume at i - k.
    let volumes: Vec<f64> = (0..30).map(|i| (i * 7 % 13) as f64 * 10.0).collect();
    let records = volume_series("AAPL", "2016-06-01", &volumes);
    let offsets = [1usize, 4, 9];
    let builder =
        LagBuilder::new(LagSpec::new().with_lags(Measurement::Volume, &offsets)).unwrap();

    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    let max_offset = *offsets.iter().max().unwrap();
    assert_eq!(out.len(), volumes.len() - max_offset);

    for (row_idx, row) in out.rows().iter().enumerate() {
        let source_position = row_idx + max_offset;
        for &k in &offsets {
            let column = out.schema().index_of(&format!("Volume_lag{k}")).unwrap();
            assert_eq!(
                row.values[column],
                volumes[source_position - k],
                "offset {k} at position {source_position}"
            );
        }
    }
}

#[test]
fn test_drop_consistency_across_partitions() {
    // Per partition, surviving rows = max(0, len - max_offset).
    let mut records = volume_series("AAPL", "2017-01-02", &[1.0, 2.0, 3.0, 4.0, 5.0]);
    records.extend(volume_series("MSFT", "2017-01-02", &[1.0, 2.0, 3.0]));
    records.extend(volume_series("ORCL", "2017-01-02", &[1.0, 2.0]));

    let builder =
        LagBuilder::new(LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3])).unwrap();
    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    // AAPL: 2, MSFT: 0, ORCL: 0.
    assert_eq!(out.len(), 2);
    assert!(out.rows().iter().all(|r| r.ticker == "AAPL"));
    assert_eq!(out.stats.insufficient_history, 3 + 3 + 2);
    assert_eq!(out.stats.missing_value, 0);
}

#[test]
fn test_short_partition_yields_zero_rows_without_error() {
    let records = volume_series("AAPL", "2017-01-02", &[100.0]);
    let builder =
        LagBuilder::new(LagSpec::new().with_lags(Measurement::Volume, &[1, 2, 3])).unwrap();

    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(out.stats.insufficient_history, 1);
}

#[test]
fn test_missing_source_measurement_drops_whole_row() {
    let mut records = volume_series("AAPL", "2017-01-02", &[100.0, 200.0, 300.0, 400.0]);
    records[1].volume = None;

    let builder = LagBuilder::new(LagSpec::new().with_lag(Measurement::Volume, 1)).unwrap();
    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    // Position 0: no history. Position 1: own volume missing. Position 2:
    // lag source (position 1) missing. Position 3 survives.
    assert_eq!(out.len(), 1);
    assert_eq!(out.rows()[0].date, date("2017-01-05"));
    assert_eq!(out.stats.insufficient_history, 1);
    assert_eq!(out.stats.missing_value, 2);
}

#[test]
fn test_unordered_input_is_sorted_before_lagging() {
    // Records arrive shuffled; lags must follow chronological order, not
    // arrival order.
    let mut records = volume_series("AAPL", "2017-01-02", &[100.0, 200.0, 300.0]);
    records.reverse();

    let builder = LagBuilder::new(LagSpec::new().with_lag(Measurement::Volume, 1)).unwrap();
    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    let lag1 = out.schema().index_of("Volume_lag1").unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out.rows()[0].values[lag1], 100.0);
    assert_eq!(out.rows()[1].values[lag1], 200.0);
}

#[test]
fn test_tied_dates_resolve_by_source_order() {
    // Two records share a date; the stable sort keeps source order, so the
    // lag result is deterministic across runs.
    let mut records = volume_series("AAPL", "2017-01-02", &[100.0]);
    let tie_a = Record::new("AAPL", date("2017-01-03"), 1.0, 2.0, 0.5, 1.5, 200.0);
    let tie_b = Record::new("AAPL", date("2017-01-03"), 1.0, 2.0, 0.5, 1.5, 250.0);
    records.push(tie_a);
    records.push(tie_b);

    let builder = LagBuilder::new(LagSpec::new().with_lag(Measurement::Volume, 1)).unwrap();
    let s = session();

    let dataset = Dataset::from_records(records);
    let first = builder.build(&dataset, &s).unwrap();
    let second = builder.build(&dataset, &s).unwrap();

    assert_eq!(first, second);

    // The first record is dropped (no history); tie_a precedes tie_b in
    // the source, so tie_b's lag1 is tie_a's volume.
    assert_eq!(first.len(), 2);
    let lag1 = first.schema().index_of("Volume_lag1").unwrap();
    assert_eq!(first.rows()[0].values[lag1], 100.0);
    assert_eq!(first.rows()[1].values[lag1], 200.0);
}

#[test]
fn test_build_twice_yields_identical_output() {
    let volumes: Vec<f64> = (0..50).map(|i| i as f64).collect();
    let mut records = volume_series("AAPL", "2016-01-04", &volumes);
    records.extend(volume_series("MSFT", "2016-01-04", &volumes));

    let builder =
        LagBuilder::new(LagSpec::new().with_lags(Measurement::Volume, &[1, 5, 10])).unwrap();
    let dataset = Dataset::from_records(records);
    let s = session();

    let first = builder.build(&dataset, &s).unwrap();
    let second = builder.build(&dataset, &s).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_lags_over_multiple_measurements() {
    let records = volume_series("AAPL", "2017-01-02", &[100.0, 200.0, 300.0]);
    let builder = LagBuilder::new(
        LagSpec::new()
            .with_lag(Measurement::Close, 1)
            .with_lag(Measurement::Open, 2)
            .with_lag(Measurement::Volume, 1),
    )
    .unwrap();

    let out = builder
        .build(&Dataset::from_records(records), &session())
        .unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out.column("Close_lag1").unwrap(), vec![11.5]); // close at position 1
    assert_eq!(out.column("Open_lag2").unwrap(), vec![10.0]); // open at position 0
    assert_eq!(out.column("Volume_lag1").unwrap(), vec![200.0]);
}
