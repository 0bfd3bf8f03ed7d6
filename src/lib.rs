//! Revenue prediction for YouTube videos.
//!
//! Six engagement metrics plus two interaction terms are fed into a
//! pre-trained scaler + random-forest pipeline loaded from disk.
//!
//! - [`features`]: the eight-column input contract
//! - [`pipeline`]: the persisted pipeline and the [`RevenueModel`] seam
//! - [`predict`]: single-request prediction and currency formatting
//! - [`dataset`], [`metrics`], [`evaluate`]: scoring against a labeled CSV
//! - [`cli`]: the `revenue-predictor` command line

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod predict;

pub use config::{AppConfig, DurationUnit};
pub use error::{Result, RevenueError};
pub use evaluate::{evaluate, EvaluationOptions};
pub use features::{FeatureVector, RawMetrics, FEATURE_NAMES};
pub use metrics::RegressionReport;
pub use pipeline::{RegressionTree, RevenueModel, RevenuePipeline, StandardScaler};
pub use predict::{format_currency, predict_revenue, Prediction};
