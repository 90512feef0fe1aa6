//! Lag-feature construction over an ordered price series

use crate::data::PriceSeries;
use crate::error::{ForecastError, Result};

/// One feature row: a target value and a fixed-width window of prior values
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Target value (price or log price)
    pub label: f64,
    /// `lags[k]` is the value `k + 1` positions before the target, or the
    /// zero sentinel when that position precedes the series start
    pub lags: Vec<f64>,
}

impl FeatureRow {
    /// Create a row for single predictions
    pub fn new(label: f64, lags: Vec<f64>) -> Self {
        Self { label, lags }
    }

    /// True when any lag position fell before the start of the series
    pub fn has_sentinel(&self) -> bool {
        self.lags.iter().any(|&v| v == 0.0)
    }

    /// Build the bootstrapped row for predicting one step past the end of
    /// the series: lags are the most recent known values, newest first.
    /// The label is a placeholder and carries no information.
    pub fn next_period(series: &PriceSeries, num_lags: usize) -> Result<Self> {
        let values = series.values();
        if num_lags == 0 || values.len() < num_lags {
            return Err(ForecastError::InsufficientHistory(format!(
                "need at least {} observations to build a next-period row, have {}",
                num_lags,
                values.len()
            )));
        }

        let lags = values.iter().rev().take(num_lags).copied().collect();
        Ok(Self {
            label: f64::NAN,
            lags,
        })
    }
}

/// An ordered collection of feature rows
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<FeatureRow>,
    num_lags: usize,
}

impl Dataset {
    /// Create a dataset from rows that share a lag width
    pub fn new(rows: Vec<FeatureRow>, num_lags: usize) -> Self {
        Self { rows, num_lags }
    }

    /// The feature rows in series order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Width of the lag window
    pub fn num_lags(&self) -> usize {
        self.num_lags
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Target values in row order
    pub fn labels(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.label).collect()
    }

    /// Drop the leading rows whose lag windows reach before the start of
    /// the series. The first `num_lags` rows carry at least one sentinel.
    pub fn skip_warmup(&self) -> Dataset {
        let rows = self
            .rows
            .iter()
            .skip(self.num_lags.min(self.rows.len()))
            .cloned()
            .collect();
        Dataset::new(rows, self.num_lags)
    }
}

/// Convert a price series into lag-feature rows.
///
/// Row `i` has label `series[i]` and `lags[k] = series[i - k - 1]`, with a
/// `0.0` sentinel where the lag position precedes the series start. Lags are
/// never drawn from the current or a future position.
pub fn build_lag_features(series: &PriceSeries, num_lags: usize) -> Result<Dataset> {
    if num_lags >= series.len() {
        return Err(ForecastError::InsufficientHistory(format!(
            "{} lags requested but the series has only {} observations",
            num_lags,
            series.len()
        )));
    }

    let values = series.values();
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let lags = (0..num_lags)
                .map(|k| {
                    if i > k {
                        values[i - k - 1]
                    } else {
                        0.0
                    }
                })
                .collect();
            FeatureRow { label, lags }
        })
        .collect();

    Ok(Dataset::new(rows, num_lags))
}
