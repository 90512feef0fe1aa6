//! Bagged regression-tree ensemble over lag features

use crate::error::{ForecastError, Result};
use crate::features::{Dataset, FeatureRow};
use crate::models::{FittedRegressor, Regressor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Ensemble hyperparameters
#[derive(Debug, Clone)]
pub struct TreeEnsembleParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum rows required in a leaf
    pub min_samples_leaf: usize,
    /// Seed for bootstrap sampling and feature subsetting
    pub seed: u64,
}

impl Default for TreeEnsembleParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 6,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// Nonlinear single-step regressor built from bootstrap-aggregated
/// regression trees. Consumes lag features as-is, no normalization needed.
#[derive(Debug, Clone)]
pub struct TreeEnsembleRegressor {
    params: TreeEnsembleParams,
}

impl TreeEnsembleRegressor {
    /// Create an ensemble with default parameters
    pub fn new() -> Self {
        Self::with_params(TreeEnsembleParams::default())
    }

    /// Create an ensemble with custom parameters
    pub fn with_params(params: TreeEnsembleParams) -> Self {
        Self { params }
    }
}

impl Default for TreeEnsembleRegressor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Branch {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, lags: &[f64]) -> f64 {
        match self {
            TreeNode::Leaf { value } => *value,
            TreeNode::Branch {
                feature,
                threshold,
                left,
                right,
            } => {
                if lags[*feature] <= *threshold {
                    left.predict(lags)
                } else {
                    right.predict(lags)
                }
            }
        }
    }
}

/// A fitted tree ensemble
#[derive(Debug)]
pub struct FittedTreeEnsemble {
    trees: Vec<TreeNode>,
    num_lags: usize,
}

impl Regressor for TreeEnsembleRegressor {
    type Fitted = FittedTreeEnsemble;

    fn fit(&self, train: &Dataset) -> Result<FittedTreeEnsemble> {
        if train.is_empty() {
            return Err(ForecastError::InsufficientData(
                "cannot fit a tree ensemble on an empty training set".to_string(),
            ));
        }
        if self.params.n_trees == 0 {
            return Err(ForecastError::InvalidParameter(
                "ensemble needs at least one tree".to_string(),
            ));
        }

        info!(
            rows = train.len(),
            lags = train.num_lags(),
            trees = self.params.n_trees,
            "fitting tree ensemble"
        );

        let rows = train.rows();
        let min_samples_leaf = self.params.min_samples_leaf.max(1);
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        // Random subset size per split, one third of the features
        let m = (train.num_lags().max(1) / 3).max(1);

        let trees = (0..self.params.n_trees)
            .map(|_| {
                let sample: Vec<usize> =
                    (0..rows.len()).map(|_| rng.gen_range(0..rows.len())).collect();
                grow_tree(rows, &sample, m, self.params.max_depth,
                          min_samples_leaf, &mut rng)
            })
            .collect();

        Ok(FittedTreeEnsemble {
            trees,
            num_lags: train.num_lags(),
        })
    }

    fn name(&self) -> &str {
        "Tree Ensemble Regression"
    }
}

impl FittedRegressor for FittedTreeEnsemble {
    fn predict_row(&self, row: &FeatureRow) -> Result<f64> {
        if row.lags.len() != self.num_lags {
            return Err(ForecastError::ValidationError(format!(
                "row has {} lags, model was fitted on {}",
                row.lags.len(),
                self.num_lags
            )));
        }

        let sum: f64 = self.trees.iter().map(|t| t.predict(&row.lags)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "Tree Ensemble Regression"
    }
}

fn mean_label(rows: &[FeatureRow], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| rows[i].label).sum::<f64>() / indices.len() as f64
}

fn sum_squared_error(rows: &[FeatureRow], indices: &[usize]) -> f64 {
    let mean = mean_label(rows, indices);
    indices
        .iter()
        .map(|&i| (rows[i].label - mean).powi(2))
        .sum()
}

fn grow_tree<R: Rng>(
    rows: &[FeatureRow],
    indices: &[usize],
    m: usize,
    depth_left: usize,
    min_samples_leaf: usize,
    rng: &mut R,
) -> TreeNode {
    if depth_left == 0 || indices.len() < 2 * min_samples_leaf {
        return TreeNode::Leaf {
            value: mean_label(rows, indices),
        };
    }

    let num_features = rows[indices[0]].lags.len();
    if num_features == 0 {
        return TreeNode::Leaf {
            value: mean_label(rows, indices),
        };
    }

    // Sample m candidate features without replacement
    let mut features: Vec<usize> = (0..num_features).collect();
    for i in 0..m.min(num_features) {
        let j = rng.gen_range(i..num_features);
        features.swap(i, j);
    }
    let candidates = &features[..m.min(num_features)];

    let parent_sse = sum_squared_error(rows, indices);
    let mut best: Option<(usize, f64, f64)> = None;

    for &feature in candidates {
        let mut values: Vec<f64> = indices.iter().map(|&i| rows[i].lags[feature]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).expect("finite lag values"));
        values.dedup();

        for pair in values.windows(2) {
            let threshold = (pair[0] + pair[1]) / 2.0;
            let (left, right): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| rows[i].lags[feature] <= threshold);
            if left.len() < min_samples_leaf || right.len() < min_samples_leaf {
                continue;
            }

            let sse = sum_squared_error(rows, &left) + sum_squared_error(rows, &right);
            if best.map_or(sse < parent_sse, |(_, _, b)| sse < b) {
                best = Some((feature, threshold, sse));
            }
        }
    }

    match best {
        Some((feature, threshold, _)) => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&i| rows[i].lags[feature] <= threshold);
            TreeNode::Branch {
                feature,
                threshold,
                left: Box::new(grow_tree(
                    rows,
                    &left_idx,
                    m,
                    depth_left - 1,
                    min_samples_leaf,
                    rng,
                )),
                right: Box::new(grow_tree(
                    rows,
                    &right_idx,
                    m,
                    depth_left - 1,
                    min_samples_leaf,
                    rng,
                )),
            }
        }
        None => TreeNode::Leaf {
            value: mean_label(rows, indices),
        },
    }
}
