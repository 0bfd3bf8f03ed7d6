//! Batch evaluation of a loaded pipeline against a labeled CSV.

use crate::dataset::{
    check_columns, impute_medians, load_csv_file, split_features_and_target, train_test_split,
};
use crate::error::{Result, RevenueError};
use crate::metrics::RegressionReport;
use crate::pipeline::RevenueModel;
use std::path::Path;
use tracing::{info, warn};

/// How the dataset is split before scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    pub test_size: f64,
    pub seed: u64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
        }
    }
}

/// Score `model` on the held-out part of the dataset at `dataset_path`.
///
/// Column checks run before anything else touches the data. Missing values
/// are imputed from medians over the whole file, so the held-out rows
/// contribute to the statistics used to fill them.
pub fn evaluate<M, P>(model: &M, dataset_path: P, options: &EvaluationOptions) -> Result<RegressionReport>
where
    M: RevenueModel + ?Sized,
    P: AsRef<Path>,
{
    let mut df = load_csv_file(dataset_path)?;
    check_columns(&df)?;

    warn!("Imputing missing values from medians over all rows, including the test split");
    impute_medians(&mut df)?;

    let (_train_df, test_df) = train_test_split(&df, options.test_size, options.seed)?;
    let (x_test, y_test) = split_features_and_target(&test_df)?;

    let y_pred = model.predict(&x_test)?;
    if y_pred.len() != y_test.len() {
        return Err(RevenueError::prediction(format!(
            "pipeline returned {} predictions for {} rows",
            y_pred.len(),
            y_test.len()
        )));
    }

    let report = RegressionReport::compute(&y_test, &y_pred);
    info!(
        r2 = report.r2,
        mse = report.mse,
        rmse = report.rmse,
        n_test = report.n_test,
        "Evaluation finished"
    );
    Ok(report)
}
