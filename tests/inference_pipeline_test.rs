//! Integration tests for language routing and inference.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use bhava::config::BhavaConfig;
use bhava::corpus::{self, LabeledCorpus};
use bhava::error::{BhavaError, Result};
use bhava::ml::language::{LanguageCode, LanguageRouter, ScriptLanguageIdentifier};
use bhava::pipeline::{InferencePipeline, Routing, TrainingPipeline, Transcriber};
use tempfile::TempDir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn config(dir: &Path) -> BhavaConfig {
    BhavaConfig {
        model_dir: dir.to_path_buf(),
        seed: Some(11),
        ..BhavaConfig::default()
    }
}

/// Train and persist Hindi and Telugu bundles into `dir`.
fn train_bundles(dir: &Path) -> Result<()> {
    let pipeline = TrainingPipeline::new(config(dir))?;

    let hindi = LabeledCorpus::new(
        strings(&[
            "यह उत्पाद बहुत अच्छा है",
            "शानदार सेवा",
            "यह उत्पाद बहुत खराब है",
            "बेकार सेवा",
        ]),
        strings(&["pos", "pos", "neg", "neg"]),
    )?;
    pipeline.run(LanguageCode::Hindi, hindi)?.save(dir)?;

    let telugu = LabeledCorpus::new(
        strings(&["చాలా బాగుంది", "మంచి సేవ", "చాలా చెడ్డది", "చెడ్డ సేవ"]),
        strings(&["pos", "pos", "neg", "neg"]),
    )?;
    pipeline.run(LanguageCode::Telugu, telugu)?.save(dir)?;
    Ok(())
}

fn router(dir: &Path) -> LanguageRouter {
    let config = config(dir);
    LanguageRouter::new(
        Arc::new(ScriptLanguageIdentifier::new()),
        dir,
        config.classifier_kind().unwrap().name(),
        config.word_analyzer(),
        config.char_analyzer(),
    )
}

#[test]
fn test_detect_routes_to_matching_bundle() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path())?;
    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);

    let telugu_lines = strings(&["చాలా బాగుంది", "చెడ్డ సేవ", "ok"]);
    assert_eq!(router.detect_language(&telugu_lines)?, LanguageCode::Telugu);

    let predictions = inference.predict_lines(&telugu_lines, Routing::Detect)?;
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0], "pos");
    assert_eq!(predictions[1], "neg");
    assert_eq!(router.cached_bundles(), 1);
    Ok(())
}

#[test]
fn test_bundles_are_cached() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path())?;
    let router = router(dir.path());

    let first = router.select_bundle(LanguageCode::Hindi)?;
    let second = router.select_bundle_for_code("hi")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_untrained_language_is_not_found() {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path()).unwrap();
    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);

    let marathi = strings(&["हे उत्पादन खूप चांगले आहे"]);
    assert!(matches!(
        inference.predict_lines(&marathi, Routing::Detect),
        Err(BhavaError::ArtifactNotFound { .. })
    ));
}

#[test]
fn test_unsupported_input_language() {
    let dir = TempDir::new().unwrap();
    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);

    let english = strings(&["great product", "terrible service"]);
    assert!(matches!(
        inference.predict_lines(&english, Routing::Detect),
        Err(BhavaError::NoSupportedLanguageDetected { lines: 2 })
    ));
}

#[test]
fn test_empty_input_file_gives_empty_output() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("predictions.txt");
    fs::write(&input, "\n\n")?;

    // No bundles exist: nothing may be loaded for an empty batch.
    let router = router(dir.path());
    let written = InferencePipeline::new(&router).predict_file(&input, &output, Routing::Detect)?;

    assert_eq!(written, 0);
    assert_eq!(fs::read_to_string(&output)?, "");
    Ok(())
}

#[test]
fn test_predict_file_preserves_order() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path())?;
    let input = dir.path().join("input.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "यह उत्पाद बहुत अच्छा है\n\nबेकार सेवा\n")?;

    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);
    let written = inference.predict_file(&input, &output, Routing::Fixed(LanguageCode::Hindi))?;

    assert_eq!(written, 2);
    assert_eq!(fs::read_to_string(&output)?, "pos\nneg");
    Ok(())
}

#[test]
fn test_evaluate_scoring_file() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path())?;
    let scored = dir.path().join("scored.txt");
    fs::write(&scored, "शानदार सेवा pos\nबेकार सेवा neg\nयह उत्पाद बहुत खराब है pos")?;

    let router = router(dir.path());
    let corpus = corpus::read_trailing_label_file(&scored)?;
    let evaluation =
        InferencePipeline::new(&router).evaluate(&corpus, Routing::Fixed(LanguageCode::Hindi))?;

    assert_eq!(evaluation.total, 3);
    assert_eq!(evaluation.predictions, strings(&["pos", "neg", "neg"]));
    assert_eq!(evaluation.correct, 2);
    assert!((evaluation.accuracy() - 2.0 / 3.0).abs() < 1e-12);
    Ok(())
}

struct FixedTranscriber(&'static str);

impl Transcriber for FixedTranscriber {
    fn transcribe(&self, _audio: &Path) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

struct FailingTranscriber;

impl Transcriber for FailingTranscriber {
    fn transcribe(&self, audio: &Path) -> anyhow::Result<String> {
        anyhow::bail!("cannot decode {}", audio.display())
    }
}

#[test]
fn test_transcript_uses_hindi_bundle() -> Result<()> {
    let dir = TempDir::new().unwrap();
    train_bundles(dir.path())?;
    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);

    // Telugu text, but transcripts never go through detection.
    let transcriber = FixedTranscriber("చాలా బాగుంది\n\nశానదార\nयह उत्पाद बहुत अच्छा है");
    let predictions = inference.predict_transcript(&transcriber, Path::new("clip.wav"))?;

    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[2], "pos");
    assert_eq!(router.cached_bundles(), 1);
    assert_eq!(router.select_bundle(LanguageCode::Hindi)?.language(), LanguageCode::Hindi);
    Ok(())
}

#[test]
fn test_transcriber_failure_is_upstream() {
    let dir = TempDir::new().unwrap();
    let router = router(dir.path());
    let inference = InferencePipeline::new(&router);

    let result = inference.predict_transcript(&FailingTranscriber, Path::new("clip.wav"));
    match result {
        Err(BhavaError::Upstream { stage, message }) => {
            assert_eq!(stage, "transcription");
            assert!(message.contains("clip.wav"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}
