//! Thin prediction façade over a fitted single-step regressor

use crate::error::Result;
use crate::features::FeatureRow;
use crate::models::FittedRegressor;

/// Binds one fitted model to single-row and batch prediction.
///
/// Stateless beyond the wrapped model; safe to call repeatedly and never
/// mutates the model it wraps.
#[derive(Debug)]
pub struct PredictionEngine<M: FittedRegressor> {
    model: M,
}

impl<M: FittedRegressor> PredictionEngine<M> {
    /// Wrap a fitted model
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// Predict the target for a single feature row
    pub fn predict_one(&self, row: &FeatureRow) -> Result<f64> {
        self.model.predict_row(row)
    }

    /// Predict targets for a sequence of rows, aligned with the input
    pub fn predict_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.model.predict_row(row)).collect()
    }

    /// Name of the wrapped strategy
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Consume the engine and return the wrapped model
    pub fn into_model(self) -> M {
        self.model
    }
}
