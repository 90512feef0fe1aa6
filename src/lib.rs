//! # Stock Forecast
//!
//! A Rust library for lag-feature forecasting of univariate price series.
//!
//! ## Features
//!
//! - Price series ingestion with an optional log-price transform
//! - Fixed-width lag-feature construction with temporal causality preserved
//! - Two train/test split policies (random-fraction, tail-window)
//! - Three interchangeable strategies: a tree ensemble, a regularized
//!   linear regressor and a multi-step spectral forecaster with
//!   confidence bounds
//! - Accuracy metrics (MAE, MSE, RMSE, R2, MAPE) computed in price domain
//!
//! ## Quick Start
//!
//! ```no_run
//! use stock_forecast::data::SeriesLoader;
//! use stock_forecast::models::TreeEnsembleParams;
//! use stock_forecast::pipeline;
//!
//! # fn main() -> stock_forecast::error::Result<()> {
//! // Load data, modeling log prices
//! let series = SeriesLoader::from_csv("prices.csv", true)?;
//!
//! // Fit and score the tree ensemble on a 5% random holdout
//! let report = pipeline::run_tree_ensemble(
//!     &series,
//!     6,
//!     0.05,
//!     TreeEnsembleParams::default(),
//! )?;
//! println!("{}", report.metrics);
//!
//! // Forecast the last six periods with confidence bounds
//! let forecast = pipeline::run_spectral(&series, 12, 120, 6, 0.95)?;
//! println!("{:?}", forecast.predicted);
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod engine;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod split;

// Re-export commonly used types
pub use crate::data::{PricePoint, PriceSeries, SeriesLoader};
pub use crate::engine::PredictionEngine;
pub use crate::error::ForecastError;
pub use crate::features::{build_lag_features, Dataset, FeatureRow};
pub use crate::metrics::{evaluate, Metrics};
pub use crate::models::{FittedRegressor, ForecastResult, Regressor};
pub use crate::report::RunReport;
pub use crate::split::Split;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
