//! The persisted prediction pipeline: a standard scaler followed by a random forest.
//!
//! The pipeline is produced elsewhere and treated as opaque here. It is loaded
//! once from disk into a caller-owned [`RevenuePipeline`] and only read after that.

use crate::error::{Result, RevenueError};
use crate::features::{FeatureVector, FEATURE_NAMES, N_FEATURES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Default artifact file name, resolved relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "revenue_model.bin";

/// Anything that maps a batch of feature rows to revenue predictions.
pub trait RevenueModel {
    /// Predict one value per row, in row order.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>>;
}

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// A scaler that leaves every column unchanged.
    pub fn identity(n_features: usize) -> Self {
        Self {
            mean: vec![0.0; n_features],
            scale: vec![1.0; n_features],
        }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| (x - mean) / scale)
            .collect()
    }
}

/// A node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegressionTree {
    /// Internal split; rows with `x[feature_idx] <= threshold` go left.
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<RegressionTree>,
        right: Box<RegressionTree>,
    },
    /// Terminal node holding the predicted value.
    Leaf { value: f64 },
}

impl RegressionTree {
    pub fn leaf(value: f64) -> Self {
        Self::Leaf { value }
    }

    pub fn split(feature_idx: usize, threshold: f64, left: Self, right: Self) -> Self {
        Self::Split {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn predict_one(&self, x: &[f64]) -> Result<f64> {
        let mut node = self;
        loop {
            match node {
                RegressionTree::Leaf { value } => return Ok(*value),
                RegressionTree::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    let v = x.get(*feature_idx).ok_or_else(|| {
                        RevenueError::prediction(format!(
                            "tree splits on feature {} but rows have {} columns",
                            feature_idx,
                            x.len()
                        ))
                    })?;
                    node = if *v <= *threshold { left } else { right };
                }
            }
        }
    }
}

/// Scaler + forest, as persisted in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePipeline {
    /// Column names the pipeline was fit on, in order.
    feature_names: Vec<String>,
    scaler: StandardScaler,
    trees: Vec<RegressionTree>,
}

impl RevenuePipeline {
    /// Assemble a pipeline, checking that its parts agree with each other.
    pub fn new(
        feature_names: Vec<String>,
        scaler: StandardScaler,
        trees: Vec<RegressionTree>,
    ) -> Result<Self> {
        let pipeline = Self {
            feature_names,
            scaler,
            trees,
        };
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Pipeline with an identity scaler over [`FEATURE_NAMES`].
    pub fn with_trees(trees: Vec<RegressionTree>) -> Result<Self> {
        Self::new(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            StandardScaler::identity(N_FEATURES),
            trees,
        )
    }

    /// Load a pipeline from a bincode artifact.
    ///
    /// A missing or zero-byte file is reported with its path; no other
    /// location is tried.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RevenueError::ArtifactMissing {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path)?;
        if bytes.is_empty() {
            return Err(RevenueError::ArtifactEmpty {
                path: path.to_path_buf(),
            });
        }

        let pipeline: Self =
            bincode::deserialize(&bytes).map_err(|source| RevenueError::ArtifactDecode {
                path: path.to_path_buf(),
                source,
            })?;
        pipeline.validate()?;

        if pipeline.feature_names != FEATURE_NAMES {
            return Err(RevenueError::ArtifactSchema(format!(
                "pipeline was fit on {:?}, expected {:?}",
                pipeline.feature_names, FEATURE_NAMES
            )));
        }

        info!(
            "Loaded pipeline from {} ({} trees, {} features)",
            path.display(),
            pipeline.trees.len(),
            pipeline.n_features()
        );
        Ok(pipeline)
    }

    /// Write the pipeline as a bincode artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| {
            RevenueError::ArtifactSchema(format!("failed to serialize pipeline: {e}"))
        })?;
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RevenueError::ArtifactSchema(
                "pipeline has no trees".to_string(),
            ));
        }
        let n = self.feature_names.len();
        if self.scaler.mean.len() != n || self.scaler.scale.len() != n {
            return Err(RevenueError::ArtifactSchema(format!(
                "scaler covers {}/{} columns, pipeline has {}",
                self.scaler.mean.len(),
                self.scaler.scale.len(),
                n
            )));
        }
        Ok(())
    }
}

impl RevenueModel for RevenuePipeline {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
        let n_trees = self.trees.len() as f64;
        rows.iter()
            .map(|row| {
                let x = row.as_slice();
                if x.len() != self.scaler.n_features() {
                    return Err(RevenueError::prediction(format!(
                        "pipeline expects {} features, got {}",
                        self.scaler.n_features(),
                        x.len()
                    )));
                }
                let scaled = self.scaler.transform(x);
                let mut sum = 0.0;
                for tree in &self.trees {
                    sum += tree.predict_one(&scaled)?;
                }
                let prediction = sum / n_trees;
                debug!(prediction, "Scored row");
                Ok(prediction)
            })
            .collect()
    }
}
