//! Price series loading and domain transforms

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Date format expected in the input file (day-month-year)
const DATE_FORMAT: &str = "%d-%m-%Y";

/// A single observation of the price series
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Calendar date of the observation, the ordering key
    pub date: NaiveDate,
    /// Raw price as parsed from the source
    pub price: f64,
    /// Natural log of the price, present when the series was ingested
    /// with the log transform
    pub log_price: Option<f64>,
}

impl PricePoint {
    /// The value the models operate on: log price when the transform is
    /// active, raw price otherwise
    pub fn value(&self) -> f64 {
        self.log_price.unwrap_or(self.price)
    }
}

/// An ordered univariate price series
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    log_transformed: bool,
}

impl PriceSeries {
    /// Create a series from raw (date, price) pairs, sorting by date and
    /// applying the log transform when requested
    pub fn from_prices(mut pairs: Vec<(NaiveDate, f64)>, use_log: bool) -> Self {
        pairs.sort_by_key(|(date, _)| *date);
        let points = pairs
            .into_iter()
            .map(|(date, price)| PricePoint {
                date,
                price,
                log_price: use_log.then(|| price.ln()),
            })
            .collect();

        Self {
            points,
            log_transformed: use_log,
        }
    }

    /// Whether modeling values are log prices
    pub fn is_log_transformed(&self) -> bool {
        self.log_transformed
    }

    /// The ordered observations
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Modeling values in series order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(PricePoint::value).collect()
    }

    /// Map a modeled value back into price domain
    pub fn to_price_domain(&self, value: f64) -> f64 {
        if self.log_transformed {
            value.exp()
        } else {
            value
        }
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Loader for delimited price files
#[derive(Debug)]
pub struct SeriesLoader;

impl SeriesLoader {
    /// Load a price series from a CSV file with one header row and two
    /// columns: a `dd-mm-yyyy` date and a price string that may carry
    /// currency symbols or thousands separators.
    ///
    /// Rows need not be pre-sorted; the result is sorted ascending by date.
    pub fn from_csv<P: AsRef<Path>>(path: P, use_log: bool) -> Result<PriceSeries> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        // Strips currency symbols and thousands separators before parsing
        let cleaner = Regex::new(r"[^0-9.]").expect("static pattern");

        let mut pairs = Vec::new();
        for (i, record) in reader.records().enumerate() {
            // 1-based data row index, for error context
            let row = i + 1;
            let record = record?;

            let date_field = record.get(0).ok_or_else(|| ForecastError::DataFormat {
                row,
                detail: "missing date column".to_string(),
            })?;
            let date = NaiveDate::parse_from_str(date_field.trim(), DATE_FORMAT).map_err(|e| {
                ForecastError::DataFormat {
                    row,
                    detail: format!("unparsable date '{}': {}", date_field, e),
                }
            })?;

            let price_field = record.get(1).ok_or_else(|| ForecastError::DataFormat {
                row,
                detail: "missing price column".to_string(),
            })?;
            let cleaned = cleaner.replace_all(price_field, "");
            let price: f64 = cleaned.parse().map_err(|_| ForecastError::DataFormat {
                row,
                detail: format!("unparsable price '{}'", price_field),
            })?;

            pairs.push((date, price));
        }

        debug!(rows = pairs.len(), use_log, "loaded price series");
        Ok(PriceSeries::from_prices(pairs, use_log))
    }
}
