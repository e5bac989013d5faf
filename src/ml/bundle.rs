//! Persisted per-language model bundles.
//!
//! A bundle file is a fixed little-endian header followed by a bincode
//! payload:
//!
//! ```text
//! magic "BHVB" | version: u32 | crc32(payload): u32 | payload length: u64 | payload
//! ```
//!
//! Truncated or corrupted files fail the checksum or length test and are
//! reported as [`BhavaError::Serialization`] instead of decoding garbage.

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalyzerConfig, NgramRange};
use crate::error::{BhavaError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::language::LanguageCode;
use crate::ml::vectorizer::CombinedVectorizer;

/// File magic.
pub const BUNDLE_MAGIC: &[u8; 4] = b"BHVB";

/// Current bundle format version.
pub const BUNDLE_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Descriptive information stored alongside the fitted models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub language: LanguageCode,
    /// Canonical classifier name.
    pub classifier: String,
    pub word_range: NgramRange,
    pub char_range: NgramRange,
    pub training_samples: usize,
    /// Output label domain, sorted.
    pub labels: Vec<String>,
    pub trained_at: DateTime<Utc>,
    /// Version of the crate that trained the bundle.
    pub version: String,
}

/// The fitted vectorizer and classifier for one language.
///
/// Bundles are immutable once built; inference shares them behind `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    metadata: BundleMetadata,
    vectorizer: CombinedVectorizer,
    classifier: Classifier,
}

impl ModelBundle {
    /// Assemble a bundle from freshly fitted parts.
    pub fn new(
        language: LanguageCode,
        vectorizer: CombinedVectorizer,
        classifier: Classifier,
        training_samples: usize,
    ) -> Result<Self> {
        if classifier.n_features() != vectorizer.dimension() {
            return Err(BhavaError::dimension_mismatch(
                "bundle classifier features",
                vectorizer.dimension(),
                classifier.n_features(),
            ));
        }

        let metadata = BundleMetadata {
            language,
            classifier: classifier.name().to_string(),
            word_range: vectorizer.word_space().analyzer_config().ngram_range(),
            char_range: vectorizer.char_space().analyzer_config().ngram_range(),
            training_samples,
            labels: classifier.classes().to_vec(),
            trained_at: Utc::now(),
            version: crate::VERSION.to_string(),
        };

        Ok(Self {
            metadata,
            vectorizer,
            classifier,
        })
    }

    /// Deterministic artifact name, e.g. `hindi-svm-word-1-1-char-2-5.bundle`.
    pub fn file_name(
        language: LanguageCode,
        classifier: &str,
        word: &AnalyzerConfig,
        char: &AnalyzerConfig,
    ) -> String {
        format!("{}-{}-{}-{}.bundle", language.prefix(), classifier, word, char)
    }

    /// This bundle's artifact name.
    pub fn name(&self) -> String {
        Self::file_name(
            self.metadata.language,
            &self.metadata.classifier,
            &self.vectorizer.word_space().analyzer_config(),
            &self.vectorizer.char_space().analyzer_config(),
        )
    }

    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    pub fn language(&self) -> LanguageCode {
        self.metadata.language
    }

    pub fn vectorizer(&self) -> &CombinedVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Predict one label per line, preserving order.
    pub fn predict(&self, lines: &[String]) -> Result<Vec<String>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let features = self.vectorizer.transform(lines)?;
        self.classifier.predict(&features)
    }

    /// Write the bundle into `dir` under its artifact name.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| BhavaError::file_io(dir, e))?;
        let path = dir.join(self.name());
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the bundle to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let payload = bincode::serialize(self)
            .map_err(|e| BhavaError::serialization(path, e.to_string()))?;

        let file = File::create(path).map_err(|e| BhavaError::file_io(path, e))?;
        let mut writer = BufWriter::new(file);
        write_bundle(&mut writer, &payload).map_err(|e| BhavaError::file_io(path, e))?;

        log::info!(
            "saved {} bundle ({} bytes) to {}",
            self.metadata.language,
            payload.len() + HEADER_LEN,
            path.display()
        );
        Ok(())
    }

    /// Load a bundle. A missing file yields [`BhavaError::ArtifactNotFound`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BhavaError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut bytes = Vec::new();
        File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|e| BhavaError::file_io(path, e))?;

        let payload = read_payload(path, &bytes)?;
        let mut bundle: ModelBundle = bincode::deserialize(payload)
            .map_err(|e| BhavaError::serialization(path, e.to_string()))?;
        bundle.vectorizer.prepare()?;

        log::debug!(
            "loaded {} bundle from {}: {} features, labels {:?}",
            bundle.metadata.language,
            path.display(),
            bundle.vectorizer.dimension(),
            bundle.metadata.labels
        );
        Ok(bundle)
    }
}

fn write_bundle<W: Write>(writer: &mut W, payload: &[u8]) -> std::io::Result<()> {
    writer.write_all(BUNDLE_MAGIC)?;
    writer.write_u32::<LittleEndian>(BUNDLE_VERSION)?;
    writer.write_u32::<LittleEndian>(crc32fast::hash(payload))?;
    writer.write_u64::<LittleEndian>(payload.len() as u64)?;
    writer.write_all(payload)?;
    writer.flush()
}

fn read_payload<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a [u8]> {
    if bytes.len() < HEADER_LEN {
        return Err(BhavaError::serialization(
            path,
            format!("file is {} bytes, shorter than the header", bytes.len()),
        ));
    }

    let mut header = Cursor::new(&bytes[..HEADER_LEN]);
    let mut magic = [0u8; 4];
    header.read_exact(&mut magic)?;
    if &magic != BUNDLE_MAGIC {
        return Err(BhavaError::serialization(path, "not a bundle file (bad magic)"));
    }

    let version = header.read_u32::<LittleEndian>()?;
    if version != BUNDLE_VERSION {
        return Err(BhavaError::serialization(
            path,
            format!("unsupported bundle version {version}, expected {BUNDLE_VERSION}"),
        ));
    }

    let checksum = header.read_u32::<LittleEndian>()?;
    let length = header.read_u64::<LittleEndian>()?;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() as u64 != length {
        return Err(BhavaError::serialization(
            path,
            format!("payload is {} bytes, header says {length}", payload.len()),
        ));
    }
    if crc32fast::hash(payload) != checksum {
        return Err(BhavaError::serialization(path, "payload checksum mismatch"));
    }
    Ok(payload)
}
