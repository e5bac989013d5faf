//! Command implementations for the Bhava CLI.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::BhavaConfig;
use crate::corpus;
use crate::error::Result;
use crate::ml::bundle::ModelBundle;
use crate::ml::language::{LanguageCode, LanguageRouter, ScriptLanguageIdentifier};
use crate::pipeline::{InferencePipeline, Routing, TrainingPipeline};

/// Execute a CLI command.
pub fn execute_command(args: BhavaArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Score(score_args) => score(score_args, &args),
        Command::Detect(detect_args) => detect(detect_args, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &args),
    }
}

/// Build the router every inference command shares.
fn build_router(config: &BhavaConfig) -> Result<LanguageRouter> {
    let kind = config.classifier_kind()?;
    Ok(LanguageRouter::new(
        Arc::new(ScriptLanguageIdentifier::new()),
        config.model_dir.clone(),
        kind.name(),
        config.word_analyzer(),
        config.char_analyzer(),
    ))
}

/// `--language` wins; otherwise detect when asked to or when the
/// configuration enables it, and fall back to the configured default language.
fn resolve_routing(language: Option<&str>, detect: bool, config: &BhavaConfig) -> Result<Routing> {
    match language {
        Some(code) => Ok(Routing::Fixed(code.parse()?)),
        None if detect || config.detect_language => Ok(Routing::Detect),
        None => Ok(Routing::Fixed(config.default_language)),
    }
}

/// Train and persist a bundle.
fn train(args: &TrainArgs, cli_args: &BhavaArgs) -> Result<()> {
    let mut config = cli_args.load_config()?;
    args.model.apply(&mut config);
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let language: LanguageCode = args.language.parse()?;

    let start_time = Instant::now();
    let pipeline = TrainingPipeline::new(config)?;
    let bundle = pipeline.train_files(language, &args.texts, &args.labels)?;
    let path = pipeline.persist(&bundle)?;
    let duration = start_time.elapsed();

    output_result(
        "Model trained successfully",
        &TrainingResult {
            bundle_path: path.to_string_lossy().to_string(),
            language: language.to_string(),
            classifier: bundle.metadata().classifier.clone(),
            training_samples: bundle.metadata().training_samples,
            labels: bundle.metadata().labels.clone(),
            dimension: bundle.vectorizer().dimension(),
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Predict every line of a file.
fn predict(args: &PredictArgs, cli_args: &BhavaArgs) -> Result<()> {
    let mut config = cli_args.load_config()?;
    args.model.apply(&mut config);
    config.validate()?;
    let routing = resolve_routing(args.language.as_deref(), args.detect, &config)?;

    let start_time = Instant::now();
    let router = build_router(&config)?;
    let inference =
        InferencePipeline::new(&router).with_transcript_language(config.transcript_language);
    let predictions = inference.predict_file(&args.input, &args.output, routing)?;
    let duration = start_time.elapsed();

    output_result(
        "Predictions written",
        &PredictionResult {
            output_path: args.output.to_string_lossy().to_string(),
            predictions,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Score a trailing-label file.
fn score(args: &ScoreArgs, cli_args: &BhavaArgs) -> Result<()> {
    let mut config = cli_args.load_config()?;
    args.model.apply(&mut config);
    config.validate()?;
    let routing = resolve_routing(args.language.as_deref(), args.detect, &config)?;

    let corpus = corpus::read_trailing_label_file(&args.file)?;
    let router = build_router(&config)?;
    let evaluation = InferencePipeline::new(&router).evaluate(&corpus, routing)?;

    if let Some(output) = &args.output {
        corpus::write_predictions(output, &evaluation.predictions)?;
    }

    output_result(
        "Scoring complete",
        &ScoreResult {
            total: evaluation.total,
            correct: evaluation.correct,
            accuracy: evaluation.accuracy(),
        },
        cli_args,
    )
}

/// Report the dominant language of a file.
fn detect(args: &DetectArgs, cli_args: &BhavaArgs) -> Result<()> {
    let config = cli_args.load_config()?;
    let lines = corpus::read_lines(&args.input)?;
    let router = build_router(&config)?;
    let (language, votes) = router.tally(&lines)?;

    output_result(
        "Language detected",
        &DetectionResult {
            language: language.to_string(),
            lines: lines.len(),
            votes: votes
                .into_iter()
                .map(|(language, votes)| LanguageVotes {
                    language: language.to_string(),
                    votes,
                })
                .collect(),
        },
        cli_args,
    )
}

/// Show bundle metadata.
fn inspect(args: &InspectArgs, cli_args: &BhavaArgs) -> Result<()> {
    output_result("Bundle metadata", &bundle_info(&args.bundle)?, cli_args)
}

fn bundle_info(path: &Path) -> Result<BundleInfo> {
    let bundle = ModelBundle::load(path)?;
    let metadata = bundle.metadata();
    Ok(BundleInfo {
        path: path.to_string_lossy().to_string(),
        language: metadata.language.to_string(),
        classifier: metadata.classifier.clone(),
        labels: metadata.labels.clone(),
        word_vocabulary: bundle.vectorizer().word_space().vocabulary_size(),
        char_vocabulary: bundle.vectorizer().char_space().vocabulary_size(),
        training_samples: metadata.training_samples,
        trained_at: metadata.trained_at.to_rfc3339(),
        version: metadata.version.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BhavaError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_routing() {
        let config = BhavaConfig::default();
        assert_eq!(
            resolve_routing(Some("te"), false, &config).unwrap(),
            Routing::Fixed(LanguageCode::Telugu)
        );
        assert_eq!(
            resolve_routing(None, false, &config).unwrap(),
            Routing::Detect
        );
        assert!(matches!(
            resolve_routing(Some("en"), false, &config),
            Err(BhavaError::UnsupportedLanguage { .. })
        ));

        let config = BhavaConfig {
            detect_language: false,
            ..BhavaConfig::default()
        };
        assert_eq!(
            resolve_routing(None, false, &config).unwrap(),
            Routing::Fixed(LanguageCode::Hindi)
        );

        let config = BhavaConfig {
            detect_language: false,
            default_language: LanguageCode::Marathi,
            ..BhavaConfig::default()
        };
        assert_eq!(
            resolve_routing(None, false, &config).unwrap(),
            Routing::Fixed(LanguageCode::Marathi)
        );
        assert_eq!(
            resolve_routing(None, true, &config).unwrap(),
            Routing::Detect
        );
    }

    #[test]
    fn test_bundle_info() {
        let dir = TempDir::new().unwrap();
        let texts = dir.path().join("texts.txt");
        let labels = dir.path().join("labels.txt");
        fs::write(&texts, "अच्छा है\nबुरा है\nबहुत अच्छा").unwrap();
        fs::write(&labels, "pos\nneg\npos").unwrap();

        let config = BhavaConfig {
            model_dir: dir.path().join("models"),
            seed: Some(1),
            ..BhavaConfig::default()
        };
        let path = TrainingPipeline::new(config)
            .unwrap()
            .train_and_persist(LanguageCode::Hindi, &texts, &labels)
            .unwrap();

        let info = bundle_info(&path).unwrap();
        assert_eq!(info.language, "hi");
        assert_eq!(info.classifier, "svm");
        assert_eq!(info.labels, vec!["neg", "pos"]);
        assert_eq!(info.training_samples, 3);
        assert!(info.word_vocabulary > 0 && info.char_vocabulary > 0);
    }
}
