//! Integration tests for training and bundle persistence.

use std::fs;

use bhava::config::BhavaConfig;
use bhava::corpus::{self, LabeledCorpus};
use bhava::error::{BhavaError, Result};
use bhava::ml::bundle::ModelBundle;
use bhava::ml::language::LanguageCode;
use bhava::pipeline::TrainingPipeline;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn seeded_config(dir: &TempDir, classifier: &str) -> BhavaConfig {
    BhavaConfig {
        model_dir: dir.path().to_path_buf(),
        classifier: classifier.to_string(),
        seed: Some(42),
        ..BhavaConfig::default()
    }
}

fn hindi_reviews() -> LabeledCorpus {
    LabeledCorpus::new(
        strings(&[
            "यह उत्पाद बहुत अच्छा है",
            "बहुत बढ़िया सेवा",
            "शानदार गुणवत्ता और अच्छा दाम",
            "यह उत्पाद बेकार है",
            "बहुत खराब सेवा",
            "घटिया गुणवत्ता और बुरा अनुभव",
        ]),
        strings(&["pos", "pos", "pos", "neg", "neg", "neg"]),
    )
    .unwrap()
}

#[test]
fn test_end_to_end_scenario() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let pipeline = TrainingPipeline::new(seeded_config(&dir, "svm"))?;
    let corpus = LabeledCorpus::new(
        strings(&["good product", "bad product", "great service"]),
        strings(&["pos", "neg", "pos"]),
    )?;

    let first = pipeline.run(LanguageCode::Hindi, corpus.clone())?;
    let second = pipeline.run(LanguageCode::Hindi, corpus)?;

    let line = strings(&["good service"]);
    let prediction = first.predict(&line)?;
    assert_eq!(prediction.len(), 1);
    assert!(prediction[0] == "pos" || prediction[0] == "neg");
    assert_eq!(prediction, second.predict(&line)?);

    Ok(())
}

#[test]
fn test_every_classifier_beats_majority_baseline() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let corpus = hindi_reviews();

    for name in ["svm", "logistic", "multi-nb", "sgd", "gradient-boosting"] {
        let pipeline = TrainingPipeline::new(seeded_config(&dir, name))?;
        let bundle = pipeline.run(LanguageCode::Hindi, corpus.clone())?;

        let predictions = bundle.predict(corpus.texts())?;
        let correct = predictions
            .iter()
            .zip(corpus.labels())
            .filter(|(p, l)| p == l)
            .count();
        assert!(correct > 3, "{name}: {correct}/6 correct");
        assert_eq!(bundle.metadata().classifier, name);
    }
    Ok(())
}

#[test]
fn test_shuffle_preserves_alignment_for_many_seeds() {
    let texts: Vec<String> = (0..30).map(|i| format!("review number {i}")).collect();
    let labels: Vec<String> = (0..30).map(|i| format!("label-{i}")).collect();

    for seed in 0..20 {
        let mut corpus = LabeledCorpus::new(texts.clone(), labels.clone()).unwrap();
        corpus.shuffle_with(&mut StdRng::seed_from_u64(seed));

        for (text, label) in corpus.texts().iter().zip(corpus.labels()) {
            let index = text.trim_start_matches("review number ");
            assert_eq!(label, &format!("label-{index}"));
        }
    }
}

#[test]
fn test_train_and_persist_from_files() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let texts = dir.path().join("mr_texts.txt");
    let labels = dir.path().join("mr_labels.txt");
    fs::write(
        &texts,
        "हे उत्पादन खूप चांगले आहे\n\nसेवा वाईट होती\nखूप छान अनुभव\n",
    )
    .unwrap();
    fs::write(&labels, "pos\n\nneg\npos\n").unwrap();

    let config = BhavaConfig {
        model_dir: dir.path().join("models"),
        seed: Some(3),
        ..BhavaConfig::default()
    };
    let pipeline = TrainingPipeline::new(config)?;
    let path = pipeline.train_and_persist(LanguageCode::Marathi, &texts, &labels)?;

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some("marathi-svm-word-1-1-char-2-5.bundle")
    );
    let bundle = ModelBundle::load(&path)?;
    assert_eq!(bundle.language(), LanguageCode::Marathi);
    assert_eq!(bundle.metadata().training_samples, 3);
    Ok(())
}

#[test]
fn test_misaligned_files_fail_before_fitting() {
    let dir = TempDir::new().unwrap();
    let texts = dir.path().join("texts.txt");
    let labels = dir.path().join("labels.txt");
    fs::write(&texts, "one\ntwo\nthree").unwrap();
    fs::write(&labels, "a\nb").unwrap();

    let pipeline = TrainingPipeline::new(seeded_config(&dir, "svm")).unwrap();
    let result = pipeline.train_and_persist(LanguageCode::Hindi, &texts, &labels);
    assert!(matches!(result, Err(BhavaError::InputValidation(_))));
    assert!(fs::read_dir(dir.path()).unwrap().count() == 2);
}

#[test]
fn test_single_label_corpus_rejected() {
    let dir = TempDir::new().unwrap();
    let pipeline = TrainingPipeline::new(seeded_config(&dir, "logistic")).unwrap();
    let corpus = LabeledCorpus::new(
        strings(&["good product", "great service"]),
        strings(&["pos", "pos"]),
    )
    .unwrap();

    assert!(matches!(
        pipeline.run(LanguageCode::Telugu, corpus),
        Err(BhavaError::InputValidation(_))
    ));
}

#[test]
fn test_trailing_label_file_round_trip() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scored.txt");
    fs::write(&path, "good product pos\nbad product neg")?;

    let corpus = corpus::read_trailing_label_file(&path)?;
    assert_eq!(corpus.texts(), strings(&["good product", "bad product"]).as_slice());
    assert_eq!(corpus.labels(), strings(&["pos", "neg"]).as_slice());
    Ok(())
}
