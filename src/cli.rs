//! Command-line interface: one-shot prediction, an interactive form, and evaluation.

use crate::config::{AppConfig, DurationUnit};
use crate::error::Result;
use crate::evaluate::{evaluate, EvaluationOptions};
use crate::features::RawMetrics;
use crate::pipeline::{RevenueModel, RevenuePipeline};
use crate::predict::predict_revenue;
use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// YouTube revenue predictor
///
/// Predicts the revenue of a video from six engagement metrics using a
/// pre-trained scaler + random-forest pipeline, and scores that pipeline
/// against a labeled dataset.
#[derive(Parser, Debug)]
#[command(name = "revenue-predictor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand. Flags override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// JSON config file
    #[arg(long, global = true, env = "REVENUE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the pipeline artifact
    #[arg(long, global = true, env = "REVENUE_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Duration unit the pipeline was fit with (seconds or minutes)
    #[arg(long, global = true, env = "REVENUE_DURATION_UNIT")]
    pub duration_unit: Option<DurationUnit>,

    /// Multiplier applied to every prediction
    #[arg(long, global = true, env = "REVENUE_PREDICTION_SCALE")]
    pub prediction_scale: Option<f64>,
}

impl GlobalArgs {
    /// Merge the config file (if any) with command-line overrides.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(path) = &self.model_path {
            config.model_path = path.clone();
        }
        if let Some(unit) = self.duration_unit {
            config.duration_unit = unit;
        }
        if let Some(scale) = self.prediction_scale {
            config.prediction_scale = scale;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict revenue for one video
    Predict(PredictCommand),

    /// Prompt for metrics and predict repeatedly until EOF or `q`
    Interactive,

    /// Score the pipeline on a held-out split of a labeled CSV
    Evaluate(EvaluateCommand),
}

impl Cli {
    /// Load the pipeline and dispatch. Nothing is read from the user before the
    /// pipeline has loaded.
    pub fn run(&self) -> Result<()> {
        let config = self.global.resolve()?;
        info!(
            "Using pipeline {} (duration in {}, scale {})",
            config.model_path.display(),
            config.duration_unit,
            config.prediction_scale
        );

        let pipeline = RevenuePipeline::load(&config.model_path).map_err(|e| {
            error!("{e}");
            e
        })?;

        match &self.command {
            Commands::Predict(cmd) => cmd.run(&pipeline, &config),
            Commands::Interactive => {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                let served = run_form(&pipeline, &config, stdin.lock(), stdout.lock())?;
                info!("Served {} prediction requests", served);
                Ok(())
            }
            Commands::Evaluate(cmd) => cmd.run(&pipeline, &config),
        }
    }
}

/// Predict revenue for a single set of metrics
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Video duration, in the configured unit
    #[arg(long, default_value = "300", value_parser = non_negative)]
    pub duration: f64,

    /// Estimated views
    #[arg(long, default_value = "10000")]
    pub views: u64,

    /// Estimated likes
    #[arg(long, default_value = "500")]
    pub likes: u64,

    /// Estimated shares
    #[arg(long, default_value = "50")]
    pub shares: u64,

    /// Estimated new subscribers
    #[arg(long, default_value = "10")]
    pub subscribers: u64,

    /// Video thumbnail click-through rate, in percent
    #[arg(long, default_value = "5.0", value_parser = non_negative)]
    pub ctr: f64,
}

impl PredictCommand {
    pub fn metrics(&self) -> RawMetrics {
        RawMetrics {
            duration: self.duration,
            views: self.views as f64,
            likes: self.likes as f64,
            shares: self.shares as f64,
            new_subscribers: self.subscribers as f64,
            ctr_percent: self.ctr,
        }
    }

    pub fn run<M: RevenueModel + ?Sized>(&self, model: &M, config: &AppConfig) -> Result<()> {
        let prediction = predict_revenue(model, &self.metrics(), config.prediction_scale)?;
        println!("{prediction}");
        Ok(())
    }
}

/// Evaluate the pipeline against a labeled dataset
#[derive(Args, Debug, Clone)]
pub struct EvaluateCommand {
    /// Labeled CSV file (defaults to the config value)
    #[arg(long, short = 'd', env = "REVENUE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Fraction of rows held out for scoring
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl EvaluateCommand {
    /// Apply the command's overrides on top of `config`.
    pub fn resolve(&self, config: &AppConfig) -> Result<AppConfig> {
        let mut config = config.clone();
        if let Some(path) = &self.dataset {
            config.dataset_path = path.clone();
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn run<M: RevenueModel + ?Sized>(&self, model: &M, config: &AppConfig) -> Result<()> {
        let config = self.resolve(config)?;
        let options = EvaluationOptions {
            test_size: config.test_size,
            seed: config.seed,
        };

        info!("Evaluating against {}", config.dataset_path.display());
        let report = evaluate(model, &config.dataset_path, &options)?;
        println!("{report}");
        Ok(())
    }
}

fn non_negative(s: &str) -> std::result::Result<f64, String> {
    let v: f64 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("must be at least 0, got {s}"));
    }
    Ok(v)
}

struct FormField {
    label: String,
    default: f64,
    integer: bool,
}

impl FormField {
    fn new(label: impl Into<String>, default: f64, integer: bool) -> Self {
        Self {
            label: label.into(),
            default,
            integer,
        }
    }

    /// Empty input takes the default.
    fn parse(&self, input: &str) -> std::result::Result<f64, String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(self.default);
        }
        let v = non_negative(input)?;
        if self.integer && v.fract() != 0.0 {
            return Err(format!("must be a whole number, got {input}"));
        }
        Ok(v)
    }
}

fn form_fields(unit: DurationUnit) -> Vec<FormField> {
    let d = RawMetrics::default();
    vec![
        FormField::new(format!("Video Duration ({unit})"), d.duration, false),
        FormField::new("Estimated Views", d.views, true),
        FormField::new("Estimated Likes", d.likes, true),
        FormField::new("Estimated Shares", d.shares, true),
        FormField::new("Estimated New Subscribers", d.new_subscribers, true),
        FormField::new("Video Thumbnail CTR (%)", d.ctr_percent, false),
    ]
}

/// Terminal form: collect six fields, predict, print, repeat.
///
/// Stops on EOF or when `q` is entered at any prompt. A failed prediction is
/// printed and the form starts over. Returns the number of submissions.
pub fn run_form<M, R, W>(model: &M, config: &AppConfig, input: R, mut output: W) -> Result<usize>
where
    M: RevenueModel + ?Sized,
    R: BufRead,
    W: Write,
{
    let fields = form_fields(config.duration_unit);
    let mut lines = input.lines();
    let mut served = 0;

    writeln!(output, "YouTube Revenue Predictor")?;
    'form: loop {
        let mut values = [0.0; 6];
        for (slot, field) in values.iter_mut().zip(&fields) {
            loop {
                write!(output, "{} [{}]: ", field.label, field.default)?;
                output.flush()?;
                let line = match lines.next() {
                    Some(line) => line?,
                    None => break 'form,
                };
                if line.trim().eq_ignore_ascii_case("q") {
                    break 'form;
                }
                match field.parse(&line) {
                    Ok(v) => {
                        *slot = v;
                        break;
                    }
                    Err(msg) => writeln!(output, "  {msg}")?,
                }
            }
        }

        served += 1;
        match predict_revenue(model, &RawMetrics::from_row(values), config.prediction_scale) {
            Ok(prediction) => writeln!(output, "{prediction}")?,
            Err(e) if e.is_recoverable() => writeln!(output, "Error: {e}")?,
            Err(e) => return Err(e),
        }
    }

    writeln!(output)?;
    Ok(served)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevenueError;
    use crate::features::FeatureVector;
    use std::cell::Cell;

    /// Returns `views / 1000`, failing on every other call.
    struct Flaky {
        calls: Cell<usize>,
    }

    impl RevenueModel for Flaky {
        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<f64>> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n % 2 == 1 {
                return Err(RevenueError::prediction("feature names mismatch"));
            }
            Ok(rows.iter().map(|r| r.0[1] / 1000.0).collect())
        }
    }

    fn flaky() -> Flaky {
        Flaky {
            calls: Cell::new(0),
        }
    }

    fn run(model: &Flaky, input: &str) -> (usize, String) {
        let mut out = Vec::new();
        let served = run_form(model, &AppConfig::default(), input.as_bytes(), &mut out).unwrap();
        (served, String::from_utf8(out).unwrap())
    }

    #[test]
    fn defaults_are_used_for_empty_input() {
        let (served, out) = run(&flaky(), "\n\n\n\n\n\n");
        assert_eq!(served, 1);
        assert!(out.contains("Video Duration (seconds) [300]: "));
        assert!(out.contains("Predicted Revenue: $10.00"));
    }

    #[test]
    fn failure_does_not_stop_the_form() {
        let input = [
            "", "2000", "", "", "", "", // ok
            "", "", "", "", "", "", // fails
            "", "3000", "", "", "", "", // ok
            "q",
        ]
        .join("\n");
        let (served, out) = run(&flaky(), &input);
        assert_eq!(served, 3);
        assert!(out.contains("Predicted Revenue: $2.00"));
        assert!(out.contains("Error: Prediction failed: feature names mismatch"));
        assert!(out.contains("Predicted Revenue: $3.00"));
    }

    #[test]
    fn invalid_values_reprompt() {
        let (served, out) = run(&flaky(), "-5\nabc\n\n1.5\n\n\n\n\n\n");
        assert_eq!(served, 1);
        assert!(out.contains("must be at least 0, got -5"));
        assert!(out.contains("'abc' is not a number"));
        assert!(out.contains("must be a whole number, got 1.5"));
    }

    #[test]
    fn quit_before_submitting() {
        let (served, _) = run(&flaky(), "q\n");
        assert_eq!(served, 0);
    }

    #[test]
    fn labels_follow_duration_unit() {
        let fields = form_fields(DurationUnit::Minutes);
        assert_eq!(fields[0].label, "Video Duration (minutes)");
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn parses_predict_flags() {
        let cli = Cli::try_parse_from([
            "revenue-predictor",
            "--prediction-scale",
            "10",
            "predict",
            "--views",
            "2000",
        ])
        .unwrap();
        assert_eq!(cli.global.prediction_scale, Some(10.0));
        match cli.command {
            Commands::Predict(cmd) => {
                let m = cmd.metrics();
                assert_eq!(m.views, 2000.0);
                assert_eq!(m.duration, 300.0);
                assert_eq!(m.ctr_percent, 5.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_flags() {
        assert!(Cli::try_parse_from(["revenue-predictor", "predict", "--ctr", "-1"]).is_err());
        assert!(Cli::try_parse_from(["revenue-predictor", "predict", "--views", "-1"]).is_err());
    }

    #[test]
    fn evaluate_flags_override_config() {
        let cmd = EvaluateCommand {
            dataset: Some(PathBuf::from("other.csv")),
            test_size: Some(0.25),
            seed: Some(7),
        };
        let config = cmd.resolve(&AppConfig::default()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("other.csv"));
        assert_eq!(config.test_size, 0.25);
        assert_eq!(config.seed, 7);
        assert_eq!(config.model_path, AppConfig::default().model_path);
    }

    #[test]
    fn evaluate_rejects_out_of_range_test_size() {
        let cmd = EvaluateCommand {
            dataset: None,
            test_size: Some(1.5),
            seed: None,
        };
        assert!(matches!(
            cmd.resolve(&AppConfig::default()),
            Err(RevenueError::Config(_))
        ));
    }
}
