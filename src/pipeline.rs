//! Training and inference orchestration.
//!
//! Training runs LOAD, VALIDATE, SHUFFLE, FIT_FEATURES, FIT_CLASSIFIER and
//! PERSIST in order. Inference runs LOAD_LINES, then either DETECT_LANGUAGE
//! (which also loads the detected bundle) or SELECT_BUNDLE, then TRANSFORM,
//! PREDICT and EMIT. A failing stage is logged with its name and aborts the
//! run.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::BhavaConfig;
use crate::corpus::{self, LabeledCorpus};
use crate::error::{BhavaError, Result};
use crate::ml::bundle::ModelBundle;
use crate::ml::classifier::Classifier;
use crate::ml::language::{LanguageCode, LanguageRouter};
use crate::ml::vectorizer::CombinedVectorizer;

/// Log a failed stage before handing the error back.
fn stage<T>(name: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        log::error!("stage {name} failed: {e}");
    }
    result
}

/// Builds a [`ModelBundle`] for one language from a labelled corpus.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: BhavaConfig,
}

impl TrainingPipeline {
    /// Create a pipeline; the configuration is validated up front so an
    /// unknown classifier fails before any file is read.
    pub fn new(config: BhavaConfig) -> Result<Self> {
        stage("VALIDATE", config.validate())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BhavaConfig {
        &self.config
    }

    /// Train on an in-memory corpus.
    pub fn run(&self, language: LanguageCode, mut corpus: LabeledCorpus) -> Result<ModelBundle> {
        let kind = stage("VALIDATE", self.config.classifier_kind())?;
        if corpus.is_empty() {
            return stage(
                "VALIDATE",
                Err(BhavaError::empty_corpus(format!(
                    "no training lines for {language}"
                ))),
            );
        }
        log::info!(
            "training {} {} bundle on {} samples",
            language,
            kind,
            corpus.len()
        );

        match self.config.seed {
            Some(seed) => corpus.shuffle_with(&mut StdRng::seed_from_u64(seed)),
            None => corpus.shuffle_with(&mut rand::rng()),
        }
        log::debug!("SHUFFLE done (seed {:?})", self.config.seed);

        let vectorizer = stage(
            "FIT_FEATURES",
            CombinedVectorizer::fit(
                corpus.texts(),
                self.config.word_analyzer(),
                self.config.char_analyzer(),
            ),
        )?;
        let features = stage("FIT_FEATURES", vectorizer.transform(corpus.texts()))?;

        let classifier = stage(
            "FIT_CLASSIFIER",
            Classifier::fit(&kind, &features, corpus.labels()),
        )?;
        stage(
            "FIT_CLASSIFIER",
            ModelBundle::new(language, vectorizer, classifier, corpus.len()),
        )
    }

    /// Train from a texts file and a parallel labels file.
    pub fn train_files(
        &self,
        language: LanguageCode,
        texts: &Path,
        labels: &Path,
    ) -> Result<ModelBundle> {
        let corpus = stage("LOAD", corpus::read_labeled_corpus(texts, labels))?;
        self.run(language, corpus)
    }

    /// Write a trained bundle into the model directory.
    pub fn persist(&self, bundle: &ModelBundle) -> Result<PathBuf> {
        stage("PERSIST", bundle.save(&self.config.model_dir))
    }

    /// Train from files and write the bundle into the model directory.
    pub fn train_and_persist(
        &self,
        language: LanguageCode,
        texts: &Path,
        labels: &Path,
    ) -> Result<PathBuf> {
        let bundle = self.train_files(language, texts, labels)?;
        self.persist(&bundle)
    }
}

/// How inference picks its bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// Detect the dominant language of the batch.
    Detect,
    /// Use the bundle of a fixed language.
    Fixed(LanguageCode),
}

/// Accuracy of predictions against known labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub total: usize,
    pub correct: usize,
    pub predictions: Vec<String>,
}

impl Evaluation {
    /// Fraction of correct predictions; zero for an empty corpus.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Speech-to-text collaborator producing a single transcript per clip.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio: &Path) -> anyhow::Result<String>;
}

/// Predicts labels for batches of lines using bundles served by a router.
#[derive(Debug, Clone, Copy)]
pub struct InferencePipeline<'a> {
    router: &'a LanguageRouter,
    transcript_language: LanguageCode,
}

impl<'a> InferencePipeline<'a> {
    /// Transcripts default to the Hindi bundle.
    pub fn new(router: &'a LanguageRouter) -> Self {
        Self {
            router,
            transcript_language: LanguageCode::Hindi,
        }
    }

    pub fn with_transcript_language(mut self, language: LanguageCode) -> Self {
        self.transcript_language = language;
        self
    }

    /// Predict one label per line, in input order. An empty batch returns
    /// no labels without detecting or loading anything.
    pub fn predict_lines(&self, lines: &[String], routing: Routing) -> Result<Vec<String>> {
        if lines.is_empty() {
            log::info!("no input lines, nothing to predict");
            return Ok(Vec::new());
        }

        let bundle = match routing {
            Routing::Detect => stage("DETECT_LANGUAGE", self.router.route(lines))?,
            Routing::Fixed(language) => {
                stage("SELECT_BUNDLE", self.router.select_bundle(language))?
            }
        };

        let predictions = stage("PREDICT", bundle.predict(lines))?;
        log::info!(
            "predicted {} lines with the {} bundle",
            predictions.len(),
            bundle.language()
        );
        Ok(predictions)
    }

    /// Predict the lines of `input` and write the labels to `output`.
    /// Returns the number of labels written.
    pub fn predict_file(&self, input: &Path, output: &Path, routing: Routing) -> Result<usize> {
        let lines = stage("LOAD_LINES", corpus::read_lines(input))?;
        let predictions = self.predict_lines(&lines, routing)?;
        stage("EMIT", corpus::write_predictions(output, &predictions))?;
        Ok(predictions.len())
    }

    /// Score predictions against the labels of a corpus.
    pub fn evaluate(&self, corpus: &LabeledCorpus, routing: Routing) -> Result<Evaluation> {
        let predictions = self.predict_lines(corpus.texts(), routing)?;
        let correct = predictions
            .iter()
            .zip(corpus.labels())
            .filter(|(predicted, expected)| predicted == expected)
            .count();
        Ok(Evaluation {
            total: corpus.len(),
            correct,
            predictions,
        })
    }

    /// Transcribe an audio clip and predict its lines with the transcript
    /// language bundle, skipping detection.
    pub fn predict_transcript(
        &self,
        transcriber: &dyn Transcriber,
        audio: &Path,
    ) -> Result<Vec<String>> {
        let transcript = transcriber.transcribe(audio).map_err(|e| {
            log::error!("transcription of {} failed: {e:#}", audio.display());
            BhavaError::upstream("transcription", format!("{e:#}"))
        })?;

        let lines: Vec<String> = transcript
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        log::debug!("transcript of {} has {} lines", audio.display(), lines.len());

        self.predict_lines(&lines, Routing::Fixed(self.transcript_language))
    }
}
