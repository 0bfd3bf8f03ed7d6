use revenue_predictor::*;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const HEADER: [&str; 7] = [
    "Video Duration",
    "Views",
    "Likes",
    "Shares",
    "New Subscribers",
    "Video Thumbnail CTR (%)",
    "Estimated Revenue (USD)",
];

/// Revenue is views / 1000 so a views-only forest scores well but not perfectly.
fn write_dataset(dir: &Path, drop: Option<&str>) -> PathBuf {
    let keep: Vec<usize> = (0..HEADER.len())
        .filter(|&i| Some(HEADER[i]) != drop)
        .collect();

    let mut csv = String::new();
    let names: Vec<String> = keep.iter().map(|&i| format!("\"{}\"", HEADER[i])).collect();
    writeln!(csv, "{}", names.join(",")).unwrap();

    for row in 0..50u32 {
        let views = 1_000 * (row + 1);
        let fields = [
            if row == 3 { String::new() } else { (60 + row * 10).to_string() },
            views.to_string(),
            (views / 20).to_string(),
            (row % 7).to_string(),
            (row % 5).to_string(),
            format!("{:.1}", 2.0 + (row % 4) as f64),
            if row == 7 { String::new() } else { format!("{:.2}", views as f64 / 1000.0) },
        ];
        let values: Vec<&str> = keep.iter().map(|&i| fields[i].as_str()).collect();
        writeln!(csv, "{}", values.join(",")).unwrap();
    }

    let path = dir.join("yt performance analytics.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn views_forest() -> RevenuePipeline {
    let low = RegressionTree::split(
        1,
        12_500.0,
        RegressionTree::leaf(6.0),
        RegressionTree::leaf(18.0),
    );
    let high = RegressionTree::split(
        1,
        37_500.0,
        RegressionTree::leaf(31.0),
        RegressionTree::leaf(44.0),
    );
    RevenuePipeline::with_trees(vec![RegressionTree::split(1, 25_000.0, low, high)]).unwrap()
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = write_dataset(dir.path(), None);
    (dir, path)
}

#[test]
fn test_evaluation_is_deterministic() {
    let (_dir, path) = setup();
    let model = views_forest();
    let options = EvaluationOptions::default();

    let first = evaluate(&model, &path, &options).unwrap();
    let second = evaluate(&model, &path, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.n_test, 10);
    assert!(first.r2 > 0.3, "r2 = {}", first.r2);
    assert!((first.rmse - first.mse.sqrt()).abs() < 1e-12);
}

#[test]
fn test_each_missing_column_is_named() {
    let model = views_forest();
    for column in HEADER {
        let dir = tempdir().unwrap();
        let path = write_dataset(dir.path(), Some(column));
        match evaluate(&model, &path, &EvaluationOptions::default()) {
            Err(RevenueError::SchemaMismatch { missing }) => assert_eq!(missing, vec![column]),
            other => panic!("expected schema mismatch for {column}, got {other:?}"),
        }
    }
}

#[test]
fn test_missing_dataset_names_the_file() {
    let dir = tempdir().unwrap();
    let err = evaluate(
        &views_forest(),
        dir.path().join("yt performance analytics.csv"),
        &EvaluationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RevenueError::DatasetMissing { .. }));
    assert!(err.to_string().contains("yt performance analytics.csv"));
}

#[test]
fn test_prediction_failure_surfaces_from_evaluation() {
    let (_dir, path) = setup();
    let tree = RegressionTree::split(
        99,
        0.0,
        RegressionTree::leaf(0.0),
        RegressionTree::leaf(1.0),
    );
    let broken = RevenuePipeline::with_trees(vec![tree]).unwrap();
    let err = evaluate(&broken, &path, &EvaluationOptions::default()).unwrap_err();
    assert!(matches!(err, RevenueError::Prediction(_)));
}

#[test]
fn test_report_prints_three_lines() {
    let (_dir, path) = setup();
    let report = evaluate(&views_forest(), &path, &EvaluationOptions::default()).unwrap();
    let text = report.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("R² Score: "));
    assert!(lines[1].starts_with("Mean Squared Error (MSE): "));
    assert!(lines[2].ends_with(" USD"));
}
