//! Accuracy metrics over aligned actual/predicted pairs

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Accuracy metrics for one aligned (actual, predicted) pair sequence.
///
/// Values are expected in price domain; domain inversion is the caller's
/// responsibility and happens before evaluation, never inside it.
#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// R-squared
    pub r2: f64,
    /// Mean Absolute Percentage Error; `None` when every actual is zero
    pub mape: Option<f64>,
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Accuracy Metrics:")?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        writeln!(f, "  MSE:  {:.4}", self.mse)?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(f, "  R2:   {:.4}", self.r2)?;
        match self.mape {
            Some(mape) => writeln!(f, "  MAPE: {:.4}%", mape)?,
            None => writeln!(f, "  MAPE: undefined")?,
        }
        Ok(())
    }
}

/// Compute accuracy metrics over aligned actual and predicted sequences.
///
/// Both sequences must be non-empty and of equal length. MAPE excludes
/// pairs whose actual value is zero rather than dividing by it; when every
/// actual is zero the MAPE is reported as undefined.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<Metrics> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::ValidationError(format!(
            "actual ({}) and predicted ({}) must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }

    let n = actual.len() as f64;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| a - p)
        .collect();

    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
    let mse = errors.iter().map(|e| e.powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mean_actual = actual.iter().sum::<f64>() / n;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean_actual).powi(2)).sum();
    let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
    let r2 = if ss_tot == 0.0 {
        // Constant actuals: perfect fit scores 1, anything else 0
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };

    let percentage_terms: Vec<f64> = actual
        .iter()
        .zip(errors.iter())
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &e)| (e.abs() / a.abs()) * 100.0)
        .collect();
    let mape = if percentage_terms.is_empty() {
        None
    } else {
        Some(percentage_terms.iter().sum::<f64>() / percentage_terms.len() as f64)
    };

    Ok(Metrics {
        mae,
        mse,
        rmse,
        r2,
        mape,
    })
}
