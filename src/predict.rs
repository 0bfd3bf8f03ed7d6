//! Single-request revenue prediction.

use crate::error::{Result, RevenueError};
use crate::features::{FeatureVector, RawMetrics};
use crate::pipeline::RevenueModel;
use std::fmt;
use tracing::debug;

/// Outcome of one prediction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Value returned by the pipeline.
    pub raw: f64,
    /// `raw` multiplied by the configured scale.
    pub revenue: f64,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicted Revenue: {}", format_currency(self.revenue))
    }
}

/// Render a dollar amount with two decimal digits, e.g. `$12.34`.
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Run the pipeline on one set of metrics.
///
/// `scale` multiplies the pipeline output; pass `1.0` to report it unchanged.
pub fn predict_revenue<M: RevenueModel + ?Sized>(
    model: &M,
    metrics: &RawMetrics,
    scale: f64,
) -> Result<Prediction> {
    let features = FeatureVector::from(metrics);
    let raw = model
        .predict(std::slice::from_ref(&features))?
        .first()
        .copied()
        .ok_or_else(|| RevenueError::prediction("pipeline returned no predictions"))?;

    let prediction = Prediction {
        raw,
        revenue: raw * scale,
    };
    debug!(?features, raw, revenue = prediction.revenue, "Predicted revenue");
    Ok(prediction)
}
