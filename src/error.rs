//! Error types for the revenue predictor.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, RevenueError>;

/// Errors raised while loading the pipeline, predicting, or evaluating.
#[derive(Debug, Error)]
pub enum RevenueError {
    /// The pipeline artifact does not exist.
    #[error("{} not found. Please ensure the model file is in the project folder.", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// The pipeline artifact exists but holds no bytes.
    #[error("{} is empty. Please ensure the model file is in the project folder.", .path.display())]
    ArtifactEmpty { path: PathBuf },

    /// The pipeline artifact could not be decoded.
    #[error("failed to decode {}: {source}", .path.display())]
    ArtifactDecode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    /// The pipeline artifact is internally inconsistent or was fit on other columns.
    #[error("invalid pipeline artifact: {0}")]
    ArtifactSchema(String),

    /// Required columns are absent from a dataset.
    #[error("missing columns in dataset: {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    /// Inference failed for a request.
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// The evaluation dataset does not exist.
    #[error("'{}' not found in the project folder", .path.display())]
    DatasetMissing { path: PathBuf },

    /// The dataset could not be read or transformed.
    #[error("dataset error: {0}")]
    Dataset(#[from] polars::prelude::PolarsError),

    /// Too few rows to produce both a train and a test split.
    #[error("need at least 2 rows to split, found {0}")]
    InsufficientRows(usize),

    /// A column has no usable values.
    #[error("column '{0}' has no values to impute from")]
    EmptyColumn(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RevenueError {
    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error only affects a single request.
    ///
    /// Everything else halts the process.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Prediction(_))
    }
}
