//! Regression scoring for the evaluation report.

use std::fmt;

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// Constant labels give `1.0` for a perfect fit and `0.0` otherwise.
pub fn r2_score(labels: &[f64], predictions: &[f64]) -> f64 {
    let n = labels.len();
    if n == 0 || n != predictions.len() {
        return 0.0;
    }

    let mean = labels.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = labels.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = labels
        .iter()
        .zip(predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}

pub fn mean_squared_error(labels: &[f64], predictions: &[f64]) -> f64 {
    let n = labels.len();
    if n == 0 || n != predictions.len() {
        return 0.0;
    }
    labels
        .iter()
        .zip(predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Scores of the pipeline on the held-out split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionReport {
    pub r2: f64,
    pub mse: f64,
    pub rmse: f64,
    pub n_test: usize,
}

impl RegressionReport {
    pub fn compute(labels: &[f64], predictions: &[f64]) -> Self {
        let mse = mean_squared_error(labels, predictions);
        Self {
            r2: r2_score(labels, predictions),
            mse,
            rmse: mse.sqrt(),
            n_test: labels.len(),
        }
    }
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "R² Score: {:.3}", self.r2)?;
        writeln!(f, "Mean Squared Error (MSE): {:.3}", self.mse)?;
        write!(f, "Root Mean Squared Error (RMSE): {:.3} USD", self.rmse)
    }
}
