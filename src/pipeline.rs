//! End-to-end runs, one per strategy
//!
//! Each run is a single sequential pass: build features, split, fit,
//! predict, invert the domain transform and evaluate. Which split policy a
//! strategy gets is a deliberate per-strategy choice, encoded here and
//! never defaulted: the tree ensemble uses the order-free random-fraction
//! split, while the linear regressor and the spectral forecaster hold out
//! the most recent observations so training data strictly precedes test
//! data in time.

use crate::data::PriceSeries;
use crate::engine::PredictionEngine;
use crate::error::{ForecastError, Result};
use crate::features::{build_lag_features, FeatureRow};
use crate::metrics::evaluate;
use crate::models::{
    Regressor, RegularizedLinearRegressor, SpectralForecaster, TreeEnsembleParams,
    TreeEnsembleRegressor,
};
use crate::report::RunReport;
use crate::split::{random_fraction, tail_window};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Run the tree-ensemble strategy with a random-fraction split.
///
/// Also reports a bootstrapped next-period prediction built from the most
/// recent lag values (a single step, not a recursive forecast).
pub fn run_tree_ensemble(
    series: &PriceSeries,
    num_lags: usize,
    test_fraction: f64,
    params: TreeEnsembleParams,
) -> Result<RunReport> {
    let dataset = build_lag_features(series, num_lags)?.skip_warmup();

    let mut rng = StdRng::seed_from_u64(params.seed);
    let split = random_fraction(&dataset, test_fraction, &mut rng)?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "running tree ensemble"
    );

    let strategy = TreeEnsembleRegressor::with_params(params);
    let engine = PredictionEngine::new(strategy.fit(&split.train)?);

    let predicted: Vec<f64> = engine
        .predict_batch(split.test.rows())?
        .into_iter()
        .map(|v| series.to_price_domain(v))
        .collect();
    let actual: Vec<f64> = split
        .test
        .labels()
        .into_iter()
        .map(|v| series.to_price_domain(v))
        .collect();

    let next_row = FeatureRow::next_period(series, num_lags)?;
    let next_period = series.to_price_domain(engine.predict_one(&next_row)?);

    let metrics = evaluate(&actual, &predicted)?;
    Ok(RunReport {
        strategy: strategy.name().to_string(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        actual,
        predicted,
        lower_bound: None,
        upper_bound: None,
        next_period: Some(next_period),
        metrics,
    })
}

/// Run the regularized linear strategy with a tail-window split
pub fn run_regularized_linear(
    series: &PriceSeries,
    num_lags: usize,
    test_size: usize,
    lambda: f64,
) -> Result<RunReport> {
    let dataset = build_lag_features(series, num_lags)?.skip_warmup();
    let split = tail_window(&dataset, test_size)?;
    info!(
        train = split.train.len(),
        test = split.test.len(),
        "running regularized linear regression"
    );

    let strategy = RegularizedLinearRegressor::new(lambda)?;
    let engine = PredictionEngine::new(strategy.fit(&split.train)?);

    let predicted: Vec<f64> = engine
        .predict_batch(split.test.rows())?
        .into_iter()
        .map(|v| series.to_price_domain(v))
        .collect();
    let actual: Vec<f64> = split
        .test
        .labels()
        .into_iter()
        .map(|v| series.to_price_domain(v))
        .collect();

    let metrics = evaluate(&actual, &predicted)?;
    Ok(RunReport {
        strategy: strategy.name().to_string(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        actual,
        predicted,
        lower_bound: None,
        upper_bound: None,
        next_period: None,
        metrics,
    })
}

/// Run the spectral strategy: hold out the last `horizon` observations,
/// fit on everything before them and forecast the held-out window with
/// confidence bounds.
///
/// `series_length` caps how much trailing history the model analyzes; when
/// the training prefix is longer, only its most recent `series_length`
/// values enter the fit.
pub fn run_spectral(
    series: &PriceSeries,
    window_size: usize,
    series_length: usize,
    horizon: usize,
    confidence_level: f64,
) -> Result<RunReport> {
    let values = series.values();
    if horizon >= values.len() {
        return Err(ForecastError::InsufficientData(format!(
            "horizon {} leaves no training data in {} observations",
            horizon,
            values.len()
        )));
    }

    let train_values = &values[..values.len() - horizon];
    let keep = train_values.len().min(series_length);
    let analysis = &train_values[train_values.len() - keep..];
    info!(train = keep, horizon, "running spectral forecast");

    let strategy = SpectralForecaster::new(
        window_size,
        series_length,
        keep,
        horizon,
        confidence_level,
    )?;
    let name = strategy.name().to_string();

    let forecast = strategy
        .fit(analysis)?
        .forecast()?
        .map(|v| series.to_price_domain(v));

    let actual: Vec<f64> = series.points()[values.len() - horizon..]
        .iter()
        .map(|p| p.price)
        .collect();
    let metrics = evaluate(&actual, forecast.predicted())?;

    Ok(RunReport {
        strategy: name,
        train_rows: keep,
        test_rows: horizon,
        actual,
        predicted: forecast.predicted().to_vec(),
        lower_bound: forecast.lower().map(<[f64]>::to_vec),
        upper_bound: forecast.upper().map(<[f64]>::to_vec),
        next_period: None,
        metrics,
    })
}
