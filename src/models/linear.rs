//! Ridge regression over min-max normalized lag features

use crate::error::{ForecastError, Result};
use crate::features::{Dataset, FeatureRow};
use crate::models::{FittedRegressor, Regressor};
use tracing::info;

/// L2-regularized linear regressor.
///
/// Sensitive to feature scale: `fit` min-max normalizes every lag column to
/// [0, 1] and the fitted model applies the same column ranges to incoming
/// rows at predict time.
#[derive(Debug, Clone)]
pub struct RegularizedLinearRegressor {
    lambda: f64,
}

impl RegularizedLinearRegressor {
    /// Create a regressor with regularization strength `lambda`
    pub fn new(lambda: f64) -> Result<Self> {
        if lambda < 0.0 || !lambda.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "regularization strength must be a non-negative finite number, got {}",
                lambda
            )));
        }
        Ok(Self { lambda })
    }
}

impl Default for RegularizedLinearRegressor {
    fn default() -> Self {
        Self { lambda: 0.001 }
    }
}

/// Per-column normalization ranges learned at fit time
#[derive(Debug, Clone)]
struct FeatureScaling {
    mins: Vec<f64>,
    maxs: Vec<f64>,
}

impl FeatureScaling {
    fn fit(rows: &[FeatureRow], num_lags: usize) -> Self {
        let mut mins = vec![f64::INFINITY; num_lags];
        let mut maxs = vec![f64::NEG_INFINITY; num_lags];
        for row in rows {
            for (k, &v) in row.lags.iter().enumerate() {
                mins[k] = mins[k].min(v);
                maxs[k] = maxs[k].max(v);
            }
        }
        Self { mins, maxs }
    }

    fn apply(&self, lags: &[f64]) -> Vec<f64> {
        lags.iter()
            .enumerate()
            .map(|(k, &v)| {
                let range = self.maxs[k] - self.mins[k];
                if range == 0.0 {
                    // Constant column carries no information
                    0.0
                } else {
                    (v - self.mins[k]) / range
                }
            })
            .collect()
    }
}

/// A fitted ridge regression model
#[derive(Debug)]
pub struct FittedLinear {
    /// Intercept followed by one weight per normalized lag
    weights: Vec<f64>,
    scaling: FeatureScaling,
    num_lags: usize,
}

impl Regressor for RegularizedLinearRegressor {
    type Fitted = FittedLinear;

    fn fit(&self, train: &Dataset) -> Result<FittedLinear> {
        if train.is_empty() {
            return Err(ForecastError::InsufficientData(
                "cannot fit a linear regressor on an empty training set".to_string(),
            ));
        }

        info!(
            rows = train.len(),
            lags = train.num_lags(),
            lambda = self.lambda,
            "fitting regularized linear regressor"
        );

        let num_lags = train.num_lags();
        let scaling = FeatureScaling::fit(train.rows(), num_lags);

        // Design matrix rows: [1, normalized lags...]
        let d = num_lags + 1;
        let design: Vec<Vec<f64>> = train
            .rows()
            .iter()
            .map(|row| {
                let mut x = Vec::with_capacity(d);
                x.push(1.0);
                x.extend(scaling.apply(&row.lags));
                x
            })
            .collect();
        let labels = train.labels();

        // Normal equations (X'X + lambda I) w = X'y, intercept unregularized
        let mut xtx = vec![vec![0.0; d]; d];
        let mut xty = vec![0.0; d];
        for (x, &y) in design.iter().zip(labels.iter()) {
            for i in 0..d {
                xty[i] += x[i] * y;
                for j in 0..d {
                    xtx[i][j] += x[i] * x[j];
                }
            }
        }
        for (i, row) in xtx.iter_mut().enumerate().skip(1) {
            row[i] += self.lambda;
        }

        let weights = solve_linear_system(xtx, xty)?;

        Ok(FittedLinear {
            weights,
            scaling,
            num_lags,
        })
    }

    fn name(&self) -> &str {
        "Regularized Linear Regression"
    }
}

impl FittedRegressor for FittedLinear {
    fn predict_row(&self, row: &FeatureRow) -> Result<f64> {
        if row.lags.len() != self.num_lags {
            return Err(ForecastError::ValidationError(format!(
                "row has {} lags, model was fitted on {}",
                row.lags.len(),
                self.num_lags
            )));
        }

        let x = self.scaling.apply(&row.lags);
        let mut prediction = self.weights[0];
        for (w, v) in self.weights[1..].iter().zip(x.iter()) {
            prediction += w * v;
        }
        Ok(prediction)
    }

    fn name(&self) -> &str {
        "Regularized Linear Regression"
    }
}

/// Gaussian elimination with partial pivoting
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or_else(|| ForecastError::FitConvergence("empty system".to_string()))?;

        if a[pivot_row][col].abs() < 1e-12 {
            return Err(ForecastError::FitConvergence(
                "normal equations are singular, features may be degenerate".to_string(),
            ));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for k in row + 1..n {
            sum -= a[row][k] * x[k];
        }
        x[row] = sum / a[row][row];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::FitConvergence(
            "solution of the normal equations is not finite".to_string(),
        ));
    }

    Ok(x)
}
