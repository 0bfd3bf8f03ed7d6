//! Feature construction shared by the prediction service and the evaluation harness.
//!
//! The pipeline was fit on eight columns in a fixed order. Nothing in the
//! artifact checks values, so the order here must match the fit order exactly.

/// Number of columns the pipeline consumes.
pub const N_FEATURES: usize = 8;

/// Column names in pipeline order.
pub const FEATURE_NAMES: [&str; N_FEATURES] = [
    "Video Duration",
    "Views",
    "Likes",
    "Shares",
    "New Subscribers",
    "Video Thumbnail CTR (%)",
    "Views_Likes_Interaction",
    "Views_CTR_Interaction",
];

/// Raw dataset columns that feed the builder, in the same order as [`RawMetrics`].
pub const RAW_FEATURE_COLUMNS: [&str; 6] = [
    "Video Duration",
    "Views",
    "Likes",
    "Shares",
    "New Subscribers",
    "Video Thumbnail CTR (%)",
];

/// Regression target column.
pub const TARGET_COLUMN: &str = "Estimated Revenue (USD)";

/// The six metrics a user supplies for one video.
///
/// No validation happens here; minimums are enforced where the values are collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetrics {
    /// Video length, in the unit the pipeline was fit with.
    pub duration: f64,
    pub views: f64,
    pub likes: f64,
    pub shares: f64,
    pub new_subscribers: f64,
    /// Thumbnail click-through rate in percent.
    pub ctr_percent: f64,
}

impl Default for RawMetrics {
    fn default() -> Self {
        Self {
            duration: 300.0,
            views: 10_000.0,
            likes: 500.0,
            shares: 50.0,
            new_subscribers: 10.0,
            ctr_percent: 5.0,
        }
    }
}

impl RawMetrics {
    /// Build from a dataset row laid out as [`RAW_FEATURE_COLUMNS`].
    pub fn from_row(row: [f64; 6]) -> Self {
        let [duration, views, likes, shares, new_subscribers, ctr_percent] = row;
        Self {
            duration,
            views,
            likes,
            shares,
            new_subscribers,
            ctr_percent,
        }
    }
}

/// Ordered pipeline input: the six raw metrics followed by two interaction terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; N_FEATURES]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Views × Likes.
    pub fn views_likes(&self) -> f64 {
        self.0[6]
    }

    /// Views × CTR.
    pub fn views_ctr(&self) -> f64 {
        self.0[7]
    }
}

impl From<&RawMetrics> for FeatureVector {
    fn from(m: &RawMetrics) -> Self {
        FeatureVector([
            m.duration,
            m.views,
            m.likes,
            m.shares,
            m.new_subscribers,
            m.ctr_percent,
            m.views * m.likes,
            m.views * m.ctr_percent,
        ])
    }
}

impl From<RawMetrics> for FeatureVector {
    fn from(m: RawMetrics) -> Self {
        FeatureVector::from(&m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_reference_vector() {
        let v = FeatureVector::from(RawMetrics::default());
        assert_eq!(
            v.0,
            [300.0, 10_000.0, 500.0, 50.0, 10.0, 5.0, 5_000_000.0, 50_000.0]
        );
        assert_eq!(v.views_likes(), 5_000_000.0);
        assert_eq!(v.views_ctr(), 50_000.0);
    }

    #[test]
    fn interaction_terms_are_exact_products() {
        let m = RawMetrics {
            duration: 12.5,
            views: 123_457.0,
            likes: 9_871.0,
            shares: 3.0,
            new_subscribers: 0.0,
            ctr_percent: 3.7,
        };
        let v = FeatureVector::from(&m);
        assert_eq!(v.as_slice().len(), N_FEATURES);
        assert_eq!(v.0[..6], [12.5, 123_457.0, 9_871.0, 3.0, 0.0, 3.7]);
        assert_eq!(v.views_likes(), 123_457.0 * 9_871.0);
        assert_eq!(v.views_ctr(), 123_457.0 * 3.7);
    }

    #[test]
    fn construction_is_deterministic() {
        let m = RawMetrics::default();
        let first = FeatureVector::from(&m);
        for _ in 0..10 {
            assert_eq!(FeatureVector::from(&m), first);
        }
    }

    #[test]
    fn from_row_follows_column_order() {
        let m = RawMetrics::from_row([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.duration, 1.0);
        assert_eq!(m.ctr_percent, 6.0);
        assert_eq!(FEATURE_NAMES[..6], RAW_FEATURE_COLUMNS);
    }
}
