//! Train/test partitioning policies

use crate::error::{ForecastError, Result};
use crate::features::Dataset;
use rand::Rng;

/// A disjoint train/test partition of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    /// Training rows
    pub train: Dataset,
    /// Held-out rows
    pub test: Dataset,
}

/// Assign each row to train or test independently at random, so that the
/// test set holds roughly `test_fraction` of the rows.
///
/// Row order carries no meaning in the result; this policy is only valid for
/// strategies with no temporal-order requirement.
pub fn random_fraction<R: Rng>(
    dataset: &Dataset,
    test_fraction: f64,
    rng: &mut R,
) -> Result<Split> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut train = Vec::new();
    let mut test = Vec::new();
    for row in dataset.rows() {
        if rng.gen_bool(test_fraction) {
            test.push(row.clone());
        } else {
            train.push(row.clone());
        }
    }

    if train.is_empty() || test.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "random fraction {} left {} train and {} test rows",
            test_fraction,
            train.len(),
            test.len()
        )));
    }

    Ok(Split {
        train: Dataset::new(train, dataset.num_lags()),
        test: Dataset::new(test, dataset.num_lags()),
    })
}

/// Reserve the last `test_size` rows, in original order, as the test set.
///
/// Training rows strictly precede test rows in time, as multi-step
/// forecasting requires.
pub fn tail_window(dataset: &Dataset, test_size: usize) -> Result<Split> {
    if test_size == 0 || test_size >= dataset.len() {
        return Err(ForecastError::InsufficientData(format!(
            "tail window of {} rows does not leave a non-empty train and test set in {} rows",
            test_size,
            dataset.len()
        )));
    }

    let cut = dataset.len() - test_size;
    let train = dataset.rows()[..cut].to_vec();
    let test = dataset.rows()[cut..].to_vec();

    Ok(Split {
        train: Dataset::new(train, dataset.num_lags()),
        test: Dataset::new(test, dataset.num_lags()),
    })
}
