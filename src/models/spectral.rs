//! Singular-spectrum forecasting with confidence bounds
//!
//! Embeds the training series into a lag-covariance matrix, extracts the
//! signal subspace from its leading eigenvectors and forecasts through the
//! linear recurrence those eigenvectors induce. Confidence bounds come from
//! the in-sample one-step residual deviation and the normal quantile at the
//! configured confidence level.

use crate::error::{ForecastError, Result};
use crate::models::ForecastResult;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::info;

/// Share of eigenvalue energy kept in the signal subspace
const ENERGY_THRESHOLD: f64 = 0.95;

/// Jacobi sweep limit before the eigendecomposition is declared stuck
const MAX_JACOBI_SWEEPS: usize = 100;

/// Multi-step spectral forecaster.
///
/// Unlike the single-step regressors this strategy consumes a contiguous
/// ordered value series, not lag rows. Window size, series length and train
/// size are structural parameters of the fitted model, fixed at
/// construction.
#[derive(Debug, Clone)]
pub struct SpectralForecaster {
    window_size: usize,
    series_length: usize,
    train_size: usize,
    horizon: usize,
    confidence_level: f64,
}

impl SpectralForecaster {
    /// Create a forecaster.
    ///
    /// Requires `2 <= window_size <= series_length`,
    /// `window_size < train_size <= series_length`, `horizon >= 1` and a
    /// confidence level in (0, 1).
    pub fn new(
        window_size: usize,
        series_length: usize,
        train_size: usize,
        horizon: usize,
        confidence_level: f64,
    ) -> Result<Self> {
        if window_size < 2 || window_size > series_length {
            return Err(ForecastError::InvalidParameter(format!(
                "window size {} must lie in [2, series length {}]",
                window_size, series_length
            )));
        }
        if train_size <= window_size || train_size > series_length {
            return Err(ForecastError::InvalidParameter(format!(
                "train size {} must lie in (window size {}, series length {}]",
                train_size, window_size, series_length
            )));
        }
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1".to_string(),
            ));
        }
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "confidence level must be in (0, 1), got {}",
                confidence_level
            )));
        }

        Ok(Self {
            window_size,
            series_length,
            train_size,
            horizon,
            confidence_level,
        })
    }

    /// The forecast horizon
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Fit on a contiguous ordered value series. The first `train_size`
    /// values are used; anything after them is ignored.
    pub fn fit(&self, series: &[f64]) -> Result<FittedSpectral> {
        if series.len() < self.train_size {
            return Err(ForecastError::InsufficientData(format!(
                "train size {} exceeds the {} available observations",
                self.train_size,
                series.len()
            )));
        }

        let x = &series[..self.train_size];
        let w = self.window_size;
        let k = x.len() - w + 1;

        info!(
            window = w,
            train = x.len(),
            horizon = self.horizon,
            "fitting spectral forecaster"
        );

        // Lag-covariance matrix of the embedded series
        let mut cov = vec![vec![0.0; w]; w];
        for start in 0..k {
            let window = &x[start..start + w];
            for i in 0..w {
                for j in 0..w {
                    cov[i][j] += window[i] * window[j];
                }
            }
        }
        for row in cov.iter_mut() {
            for v in row.iter_mut() {
                *v /= k as f64;
            }
        }

        let (eigenvalues, eigenvectors) = jacobi_eigen(cov)?;

        // Signal subspace: leading components covering most of the energy
        let total: f64 = eigenvalues.iter().map(|&l| l.max(0.0)).sum();
        if total <= 0.0 {
            return Err(ForecastError::FitConvergence(
                "degenerate series with no spectral energy".to_string(),
            ));
        }
        let mut rank = 0;
        let mut cumulative = 0.0;
        for &l in &eigenvalues {
            cumulative += l.max(0.0);
            rank += 1;
            if cumulative >= ENERGY_THRESHOLD * total || rank == w - 1 {
                break;
            }
        }

        // Linear recurrence coefficients from the signal eigenvectors
        let mut nu_sq = 0.0;
        for vec in eigenvectors.iter().take(rank) {
            nu_sq += vec[w - 1] * vec[w - 1];
        }
        if nu_sq >= 1.0 - 1e-9 {
            return Err(ForecastError::FitConvergence(
                "signal subspace is vertical, no linear recurrence exists".to_string(),
            ));
        }
        let mut recurrence = vec![0.0; w - 1];
        for vec in eigenvectors.iter().take(rank) {
            let pi = vec[w - 1];
            for (j, r) in recurrence.iter_mut().enumerate() {
                *r += pi * vec[j] / (1.0 - nu_sq);
            }
        }

        // One-step in-sample residuals drive the confidence band width
        let mut residuals = Vec::new();
        for t in (w - 1)..x.len() {
            let window = &x[t - (w - 1)..t];
            let predicted: f64 = recurrence
                .iter()
                .zip(window.iter())
                .map(|(r, v)| r * v)
                .sum();
            residuals.push(x[t] - predicted);
        }
        let sigma = standard_deviation(&residuals);

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.confidence_level / 2.0);

        Ok(FittedSpectral {
            tail: x[x.len() - (w - 1)..].to_vec(),
            recurrence,
            sigma,
            z,
            horizon: self.horizon,
        })
    }

    /// Name of the strategy
    pub fn name(&self) -> &str {
        "Spectral Forecasting"
    }
}

/// A fitted spectral model, good for exactly one forecast
#[derive(Debug)]
pub struct FittedSpectral {
    /// Last `window - 1` training values, the recurrence seed
    tail: Vec<f64>,
    recurrence: Vec<f64>,
    sigma: f64,
    z: f64,
    horizon: usize,
}

impl FittedSpectral {
    /// Produce the multi-step forecast with confidence bounds.
    ///
    /// Consumes the model: the recurrence state is advanced while
    /// forecasting and is not reusable without a re-fit.
    pub fn forecast(mut self) -> Result<ForecastResult> {
        let mut predicted = Vec::with_capacity(self.horizon);
        let mut lower = Vec::with_capacity(self.horizon);
        let mut upper = Vec::with_capacity(self.horizon);

        for step in 0..self.horizon {
            let value: f64 = self
                .recurrence
                .iter()
                .zip(self.tail.iter())
                .map(|(r, v)| r * v)
                .sum();
            if !value.is_finite() {
                return Err(ForecastError::FitConvergence(format!(
                    "recurrence diverged at step {}",
                    step + 1
                )));
            }

            // Uncertainty widens with the number of recursed steps
            let margin = self.z * self.sigma * ((step + 1) as f64).sqrt();
            predicted.push(value);
            lower.push(value - margin);
            upper.push(value + margin);

            self.tail.remove(0);
            self.tail.push(value);
        }

        ForecastResult::with_bounds(predicted, lower, upper)
    }

    /// Name of the strategy that produced this model
    pub fn name(&self) -> &str {
        "Spectral Forecasting"
    }
}

fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues in descending order with their eigenvectors aligned.
fn jacobi_eigen(mut a: Vec<Vec<f64>>) -> Result<(Vec<f64>, Vec<Vec<f64>>)> {
    let n = a.len();
    let mut v = vec![vec![0.0; n]; n];
    for (i, row) in v.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    let off_diagonal = |m: &[Vec<f64>]| -> f64 {
        let mut sum = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    sum += m[i][j] * m[i][j];
                }
            }
        }
        sum
    };

    let scale: f64 = a
        .iter()
        .flat_map(|row| row.iter())
        .map(|x| x * x)
        .sum::<f64>()
        .max(1e-300);
    let tolerance = 1e-18 * scale;

    let mut converged = false;
    for _ in 0..MAX_JACOBI_SWEEPS {
        if off_diagonal(&a) <= tolerance {
            converged = true;
            break;
        }

        for p in 0..n - 1 {
            for q in p + 1..n {
                if a[p][q].abs() < 1e-300 {
                    continue;
                }

                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let vp = row[p];
                    let vq = row[q];
                    row[p] = c * vp - s * vq;
                    row[q] = s * vp + c * vq;
                }
            }
        }
    }

    if !converged && off_diagonal(&a) > tolerance {
        return Err(ForecastError::FitConvergence(
            "eigendecomposition did not converge within the sweep limit".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        a[j][j]
            .partial_cmp(&a[i][i])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let eigenvalues = order.iter().map(|&i| a[i][i]).collect();
    let eigenvectors = order
        .iter()
        .map(|&col| (0..n).map(|row| v[row][col]).collect())
        .collect();

    Ok((eigenvalues, eigenvectors))
}
