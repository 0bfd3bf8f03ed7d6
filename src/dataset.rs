use crate::error::{Result, RevenueError};
use crate::features::{FeatureVector, RawMetrics, RAW_FEATURE_COLUMNS, TARGET_COLUMN};
use polars::prelude::*;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::path::Path;
use tracing::{debug, info};

/// Default evaluation dataset file name.
pub const DEFAULT_DATASET_PATH: &str = "yt performance analytics.csv";

/// Cell markers read as missing, in addition to empty cells.
const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Every column the evaluation harness reads.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    RAW_FEATURE_COLUMNS
        .iter()
        .copied()
        .chain(std::iter::once(TARGET_COLUMN))
}

pub fn load_csv_file<P: AsRef<Path>>(file_path: P) -> Result<DataFrame> {
    let file_path = file_path.as_ref();
    if !file_path.is_file() {
        return Err(RevenueError::DatasetMissing {
            path: file_path.to_path_buf(),
        });
    }

    let null_values = NullValues::AllColumns(NA_MARKERS.iter().map(|s| s.to_string()).collect());
    let df = CsvReader::from_path(file_path)?
        .has_header(true)
        .with_null_values(Some(null_values))
        .finish()?;

    info!("Loaded {} rows and {} columns", df.height(), df.width());
    debug!("{:?}", df.head(Some(5)));

    Ok(df)
}

/// Fail with the full list of required columns that `df` lacks.
pub fn check_columns(df: &DataFrame) -> Result<()> {
    let present = df.get_column_names();
    let missing: Vec<String> = required_columns()
        .filter(|col| !present.contains(col))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RevenueError::SchemaMismatch { missing })
    }
}

/// Replace nulls in every required column with that column's median.
///
/// Text that does not parse as a number is an error, not a missing value.
///
/// Medians come from all rows, including the ones later held out for testing.
pub fn impute_medians(df: &mut DataFrame) -> Result<()> {
    for name in required_columns() {
        let series = df.column(name)?.strict_cast(&DataType::Float64)?;
        let values = series.f64()?;
        let nulls = values.null_count();

        let median = values
            .median()
            .ok_or_else(|| RevenueError::EmptyColumn(name.to_string()))?;
        let filled = values.fill_null_with_values(median)?;
        if nulls > 0 {
            debug!("Imputed {} nulls in '{}' with median {}", nulls, name, median);
        }

        df.with_column(filled.into_series())?;
    }
    Ok(())
}

/// Shuffle rows with a seeded RNG and hold out `perc_test_size` of them.
///
/// The test split gets `ceil(n * perc_test_size)` rows and the training split
/// the rest. Same seed, same split.
pub fn train_test_split(
    df: &DataFrame,
    perc_test_size: f64,
    seed: u64,
) -> Result<(DataFrame, DataFrame)> {
    let n_rows = df.height();
    let (train_indices, test_indices) = split_indices(n_rows, perc_test_size, seed)?;

    // convert Vec<usize> to the index type polars takes
    let train_indices_ca =
        UInt32Chunked::from_vec("", train_indices.iter().map(|&x| x as u32).collect());
    let test_indices_ca =
        UInt32Chunked::from_vec("", test_indices.iter().map(|&x| x as u32).collect());

    let train_df = df.take(&train_indices_ca)?;
    let test_df = df.take(&test_indices_ca)?;

    info!(
        "Split {} rows into {} train / {} test (seed {})",
        n_rows,
        train_df.height(),
        test_df.height(),
        seed
    );

    Ok((train_df, test_df))
}

fn split_indices(n_rows: usize, perc_test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if n_rows < 2 {
        return Err(RevenueError::InsufficientRows(n_rows));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n_rows as f64) * perc_test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(RevenueError::config(format!(
            "test size {perc_test_size} leaves an empty split for {n_rows} rows"
        )));
    }

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok((train, test))
}

/// Build feature vectors and targets from an imputed frame.
pub fn split_features_and_target(df: &DataFrame) -> Result<(Vec<FeatureVector>, Vec<f64>)> {
    let columns = RAW_FEATURE_COLUMNS
        .iter()
        .map(|name| column_values(df, name))
        .collect::<Result<Vec<_>>>()?;
    let target = column_values(df, TARGET_COLUMN)?;

    let features = (0..df.height())
        .map(|i| {
            let row = [
                columns[0][i],
                columns[1][i],
                columns[2][i],
                columns[3][i],
                columns[4][i],
                columns[5][i],
            ];
            FeatureVector::from(RawMetrics::from_row(row))
        })
        .collect();

    Ok((features, target))
}

fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)?.strict_cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| RevenueError::EmptyColumn(name.to_string())))
        .collect()
}
