//! Structured run output for an external presentation layer

use crate::metrics::Metrics;
use serde::Serialize;

/// Everything one pipeline run produces, as structured values.
///
/// Rendering (console, files, dashboards) is an external concern; the core
/// never formats report text.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Name of the strategy that ran
    pub strategy: String,
    /// Number of training rows
    pub train_rows: usize,
    /// Number of test rows
    pub test_rows: usize,
    /// Held-out actual values, price domain
    pub actual: Vec<f64>,
    /// Predictions aligned with `actual`, price domain
    pub predicted: Vec<f64>,
    /// Lower confidence bounds, when the strategy produces them
    pub lower_bound: Option<Vec<f64>>,
    /// Upper confidence bounds, when the strategy produces them
    pub upper_bound: Option<Vec<f64>>,
    /// Bootstrapped one-step prediction past the end of the series, when
    /// the strategy supports it
    pub next_period: Option<f64>,
    /// Accuracy metrics over the aligned pairs
    pub metrics: Metrics,
}

impl RunReport {
    /// Aligned (actual, predicted) pairs
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.actual
            .iter()
            .copied()
            .zip(self.predicted.iter().copied())
    }
}
