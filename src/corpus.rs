//! Corpus file I/O.
//!
//! Training reads two parallel files, one text per line and one label per
//! line. The trailing-label format (`text ... label` on a single line) is
//! only read for accuracy scoring.

use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{BhavaError, Result};

/// Texts with their aligned labels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabeledCorpus {
    texts: Vec<String>,
    labels: Vec<String>,
}

impl LabeledCorpus {
    /// Pair texts with labels. Both sequences must have the same length.
    pub fn new(texts: Vec<String>, labels: Vec<String>) -> Result<Self> {
        if texts.len() != labels.len() {
            return Err(BhavaError::input_validation(format!(
                "{} texts but {} labels",
                texts.len(),
                labels.len()
            )));
        }
        Ok(Self { texts, labels })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Reorder texts and labels by one random permutation, keeping every
    /// text paired with its label.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut pairs: Vec<(String, String)> =
            self.texts.drain(..).zip(self.labels.drain(..)).collect();
        pairs.shuffle(rng);
        (self.texts, self.labels) = pairs.into_iter().unzip();
    }
}

/// Read non-blank lines, trimmed. An empty file yields no lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| BhavaError::file_io(path, e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Read a texts file and a labels file into an aligned corpus.
pub fn read_labeled_corpus(texts: &Path, labels: &Path) -> Result<LabeledCorpus> {
    let text_lines = read_lines(texts)?;
    let label_lines = read_lines(labels)?;
    log::debug!(
        "read {} texts from {} and {} labels from {}",
        text_lines.len(),
        texts.display(),
        label_lines.len(),
        labels.display()
    );
    LabeledCorpus::new(text_lines, label_lines).map_err(|e| {
        log::error!(
            "corpus files {} and {} are not aligned",
            texts.display(),
            labels.display()
        );
        e
    })
}

/// Read a file whose last whitespace-separated token on each line is the
/// label. A line holding only a label yields an empty text.
pub fn read_trailing_label_file(path: &Path) -> Result<LabeledCorpus> {
    let mut texts = Vec::new();
    let mut labels = Vec::new();
    for line in read_lines(path)? {
        let (text, label) = split_trailing_label(&line);
        texts.push(text.to_string());
        labels.push(label.to_string());
    }
    LabeledCorpus::new(texts, labels)
}

fn split_trailing_label(line: &str) -> (&str, &str) {
    match line.rsplit_once(char::is_whitespace) {
        Some((text, label)) => (text.trim_end(), label),
        None => ("", line),
    }
}

/// Write one label per line, newline-joined with no trailing newline.
pub fn write_predictions(path: &Path, labels: &[String]) -> Result<()> {
    fs::write(path, labels.join("\n")).map_err(|e| BhavaError::file_io(path, e))
}
