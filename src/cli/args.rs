//! Command line argument parsing for the Bhava CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::BhavaConfig;
use crate::error::Result;

/// Bhava - multilingual sentiment classification
#[derive(Parser, Debug, Clone)]
#[command(name = "bhava")]
#[command(about = "Train and serve sentiment classifiers for Hindi, Marathi and Telugu")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct BhavaArgs {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "BHAVA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl BhavaArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose + 1
        }
    }

    /// Configuration from `--config`, or the defaults.
    pub fn load_config(&self) -> Result<BhavaConfig> {
        match &self.config {
            Some(path) => BhavaConfig::from_file(path),
            None => Ok(BhavaConfig::default()),
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model bundle for one language
    Train(TrainArgs),

    /// Predict a label for every line of a file
    Predict(PredictArgs),

    /// Score predictions against a file with trailing labels
    Score(ScoreArgs),

    /// Detect the dominant language of a file
    Detect(DetectArgs),

    /// Show the metadata of a model bundle
    Inspect(InspectArgs),
}

/// Options shared by commands that resolve bundles.
#[derive(Parser, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Directory holding model bundles
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,

    /// Classifier name (svm, logistic, multi-nb, sgd, gradient-boosting)
    #[arg(short, long)]
    pub classifier: Option<String>,
}

impl ModelArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut BhavaConfig) {
        if let Some(model_dir) = &self.model_dir {
            config.model_dir = model_dir.clone();
        }
        if let Some(classifier) = &self.classifier {
            config.classifier = classifier.clone();
        }
    }
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Texts file, one review per line
    #[arg(long, value_name = "FILE")]
    pub texts: PathBuf,

    /// Labels file, one label per line aligned with the texts
    #[arg(long, value_name = "FILE")]
    pub labels: PathBuf,

    /// Language of the corpus (hi, mr, te)
    #[arg(short, long)]
    pub language: String,

    /// Seed for the training shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Input file, one review per line
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// File receiving one label per line
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Use the bundle of this language (hi, mr, te)
    #[arg(short, long, conflicts_with = "detect")]
    pub language: Option<String>,

    /// Detect the dominant language of the input
    #[arg(long)]
    pub detect: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for scoring
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// File whose last token on each line is the expected label
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Use the bundle of this language (hi, mr, te)
    #[arg(short, long, conflicts_with = "detect")]
    pub language: Option<String>,

    /// Detect the dominant language of the input
    #[arg(long)]
    pub detect: bool,

    /// Also write the predictions to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

/// Arguments for language detection
#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    /// Input file, one line per sample
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Arguments for bundle inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path to a bundle file
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
