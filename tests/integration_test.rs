use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use std::io::Write;
use stock_forecast::data::SeriesLoader;
use stock_forecast::models::TreeEnsembleParams;
use stock_forecast::pipeline::{run_regularized_linear, run_spectral, run_tree_ensemble};
use tempfile::NamedTempFile;

/// A gently trending, lightly cyclical price file in the loader's format
fn synthetic_price_file(rows: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Price").unwrap();

    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    for t in 0..rows {
        let date = start.checked_add_days(Days::new(t as u64)).unwrap();
        let trend = 100.0 * (0.002 * t as f64).exp();
        let cycle = 1.0 + 0.01 * (2.0 * std::f64::consts::PI * t as f64 / 12.0).sin();
        writeln!(file, "{},{:.4}", date.format("%d-%m-%Y"), trend * cycle).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_tree_ensemble_run_end_to_end() {
    let file = synthetic_price_file(130);
    let series = SeriesLoader::from_csv(file.path(), true).unwrap();

    let params = TreeEnsembleParams {
        n_trees: 40,
        ..TreeEnsembleParams::default()
    };
    let report = run_tree_ensemble(&series, 6, 0.1, params).unwrap();

    assert_eq!(report.strategy, "Tree Ensemble Regression");
    // Warmup rows are dropped before the split
    assert_eq!(report.train_rows + report.test_rows, 130 - 6);
    assert_eq!(report.actual.len(), report.test_rows);
    assert_eq!(report.predicted.len(), report.test_rows);
    assert!(report.lower_bound.is_none());

    // Predictions and the next-period bootstrap are back in price domain
    assert!(report.predicted.iter().all(|&p| p > 50.0 && p < 300.0));
    let next = report.next_period.unwrap();
    assert!(next > 50.0 && next < 300.0, "next period {} unreasonable", next);

    assert!(report.metrics.mae.is_finite());
    assert!(report.metrics.mape.unwrap() < 50.0);
}

#[test]
fn test_regularized_linear_run_end_to_end() {
    let file = synthetic_price_file(130);
    let series = SeriesLoader::from_csv(file.path(), true).unwrap();

    let report = run_regularized_linear(&series, 6, 6, 0.001).unwrap();

    assert_eq!(report.strategy, "Regularized Linear Regression");
    assert_eq!(report.test_rows, 6);
    assert_eq!(report.train_rows, 130 - 6 - 6);
    assert!(report.next_period.is_none());

    // Smooth series, one-step predictions should track closely
    assert!(report.metrics.mape.unwrap() < 10.0);
}

#[test]
fn test_spectral_run_end_to_end() {
    let file = synthetic_price_file(130);
    let series = SeriesLoader::from_csv(file.path(), true).unwrap();

    let report = run_spectral(&series, 12, 120, 6, 0.95).unwrap();

    assert_eq!(report.strategy, "Spectral Forecasting");
    assert_eq!(report.test_rows, 6);
    // History beyond the configured series length is not analyzed
    assert_eq!(report.train_rows, 120);
    assert_eq!(report.predicted.len(), 6);

    let lower = report.lower_bound.as_ref().unwrap();
    let upper = report.upper_bound.as_ref().unwrap();
    assert_eq!(lower.len(), 6);
    assert_eq!(upper.len(), 6);
    for i in 0..6 {
        assert!(lower[i] <= report.predicted[i]);
        assert!(report.predicted[i] <= upper[i]);
    }

    assert!(report.metrics.mape.unwrap() < 25.0);
}

#[test]
fn test_reports_serialize_for_external_rendering() {
    let file = synthetic_price_file(130);
    let series = SeriesLoader::from_csv(file.path(), true).unwrap();

    let report = run_regularized_linear(&series, 6, 6, 0.001).unwrap();
    let json = serde_json::to_string(&report).unwrap();

    assert!(json.contains("\"strategy\""));
    assert!(json.contains("\"mae\""));
    assert!(json.contains("\"mape\""));
}
