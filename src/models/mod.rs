//! Forecasting strategies and the trait seam they share

use crate::error::{ForecastError, Result};
use crate::features::{Dataset, FeatureRow};
use std::fmt::Debug;

pub mod linear;
pub mod spectral;
pub mod tree_ensemble;

pub use linear::{FittedLinear, RegularizedLinearRegressor};
pub use spectral::{FittedSpectral, SpectralForecaster};
pub use tree_ensemble::{FittedTreeEnsemble, TreeEnsembleParams, TreeEnsembleRegressor};

/// A multi-step forecast, with optional confidence bounds
#[derive(Debug, Clone)]
pub struct ForecastResult {
    predicted: Vec<f64>,
    lower: Option<Vec<f64>>,
    upper: Option<Vec<f64>>,
}

impl ForecastResult {
    /// Create a forecast without bounds
    pub fn new(predicted: Vec<f64>) -> Self {
        Self {
            predicted,
            lower: None,
            upper: None,
        }
    }

    /// Create a forecast with confidence bounds.
    ///
    /// All three sequences must be aligned and satisfy
    /// `lower[i] <= predicted[i] <= upper[i]`.
    pub fn with_bounds(predicted: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != predicted.len() || upper.len() != predicted.len() {
            return Err(ForecastError::ValidationError(format!(
                "bounds lengths ({}, {}) don't match forecast length ({})",
                lower.len(),
                upper.len(),
                predicted.len()
            )));
        }
        for (i, &p) in predicted.iter().enumerate() {
            if lower[i] > p || p > upper[i] {
                return Err(ForecastError::ValidationError(format!(
                    "bounds out of order at step {}: {} <= {} <= {} does not hold",
                    i, lower[i], p, upper[i]
                )));
            }
        }

        Ok(Self {
            predicted,
            lower: Some(lower),
            upper: Some(upper),
        })
    }

    /// The point forecast
    pub fn predicted(&self) -> &[f64] {
        &self.predicted
    }

    /// Lower confidence bounds, if present
    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    /// Upper confidence bounds, if present
    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.predicted.len()
    }

    /// Apply a monotone transform to the forecast and its bounds, e.g.
    /// `f64::exp` to move a log-domain forecast back to price domain
    pub fn map<F: Fn(f64) -> f64>(self, f: F) -> Self {
        let apply = |v: Vec<f64>| -> Vec<f64> { v.into_iter().map(|x| f(x)).collect() };
        Self {
            predicted: apply(self.predicted),
            lower: self.lower.map(&apply),
            upper: self.upper.map(&apply),
        }
    }
}

/// A single-step regression strategy that learns from lag features
pub trait Regressor: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedRegressor;

    /// Fit the strategy on a training dataset
    fn fit(&self, train: &Dataset) -> Result<Self::Fitted>;

    /// Name of the strategy
    fn name(&self) -> &str;
}

/// A fitted single-step regressor
pub trait FittedRegressor: Debug {
    /// Predict the target for one feature row
    fn predict_row(&self, row: &FeatureRow) -> Result<f64>;

    /// Name of the strategy that produced this model
    fn name(&self) -> &str;
}
