//! Language identification and bundle routing.
//!
//! A [`LanguageRouter`] is built once at startup and shared by reference
//! with every inference call. It owns the language identifier and a
//! read-through cache of loaded bundles, so each bundle is read from disk at
//! most once per process.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerConfig;
use crate::error::{BhavaError, Result};
use crate::ml::bundle::ModelBundle;

/// The closed set of languages with trained bundles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "te")]
    Telugu,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 3] = [
        LanguageCode::Hindi,
        LanguageCode::Marathi,
        LanguageCode::Telugu,
    ];

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::Hindi => "hi",
            LanguageCode::Marathi => "mr",
            LanguageCode::Telugu => "te",
        }
    }

    /// Bundle name prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            LanguageCode::Hindi => "hindi",
            LanguageCode::Marathi => "marathi",
            LanguageCode::Telugu => "telugu",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = BhavaError;

    /// Accepts the ISO code or the bundle prefix, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        LanguageCode::ALL
            .into_iter()
            .find(|language| language.code() == lowered || language.prefix() == lowered)
            .ok_or_else(|| BhavaError::unsupported_language(s.trim()))
    }
}

/// Per-line language identification.
///
/// Implementations may return any ISO 639-1 code, or `None` when a line
/// carries no usable signal. Failures are opaque to the router and surface
/// as [`BhavaError::Upstream`].
pub trait LanguageIdentifier: Send + Sync {
    fn identify(&self, line: &str) -> anyhow::Result<Option<String>>;
}

/// Marker words that are common in Marathi but not in Hindi.
const MARATHI_MARKERS: &[&str] = &[
    "आहे", "आहेत", "नाही", "आणि", "खूप", "मला", "तुम्ही", "आम्ही", "चांगला", "चांगले", "चांगली",
    "वाईट", "होता", "होती", "झाले", "पण", "हे", "ते", "या",
];

/// Marker words that are common in Hindi but not in Marathi.
const HINDI_MARKERS: &[&str] = &[
    "है", "हैं", "नहीं", "और", "बहुत", "का", "की", "के", "में", "यह", "वह", "था", "थी", "अच्छा",
    "अच्छी", "बुरा", "लेकिन", "मुझे", "हम",
];

/// Script-based identifier needing no trained model.
///
/// Counts letters per Unicode block: Telugu yields `te`, Latin yields `en`,
/// and Devanagari is split into `mr` or `hi` by marker words and the letter
/// `ळ`, which Hindi does not use. Devanagari ties go to `hi`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptLanguageIdentifier;

#[derive(Default)]
struct ScriptCounts {
    devanagari: usize,
    telugu: usize,
    latin: usize,
    other: usize,
}

impl ScriptLanguageIdentifier {
    pub fn new() -> Self {
        Self
    }

    fn count_scripts(line: &str) -> ScriptCounts {
        let mut counts = ScriptCounts::default();
        for c in line.chars().filter(|c| c.is_alphabetic()) {
            match c {
                '\u{0900}'..='\u{097F}' => counts.devanagari += 1,
                '\u{0C00}'..='\u{0C7F}' => counts.telugu += 1,
                'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => counts.latin += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }

    fn devanagari_language(line: &str) -> &'static str {
        let mut marathi = line.chars().filter(|&c| c == 'ळ').count();
        let mut hindi = 0;
        for word in line.split(|c: char| !c.is_alphanumeric() && !is_devanagari_mark(c)) {
            if MARATHI_MARKERS.contains(&word) {
                marathi += 1;
            }
            if HINDI_MARKERS.contains(&word) {
                hindi += 1;
            }
        }
        if marathi > hindi { "mr" } else { "hi" }
    }
}

/// Devanagari combining marks belong to the word even where Unicode does not
/// class them as alphanumeric.
fn is_devanagari_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0900}'..='\u{0903}'
            | '\u{093A}'..='\u{094F}'
            | '\u{0951}'..='\u{0957}'
            | '\u{0962}'..='\u{0963}'
    )
}

impl LanguageIdentifier for ScriptLanguageIdentifier {
    fn identify(&self, line: &str) -> anyhow::Result<Option<String>> {
        let counts = Self::count_scripts(line);
        let best = [
            (counts.devanagari, "devanagari"),
            (counts.telugu, "te"),
            (counts.latin, "en"),
            (counts.other, "other"),
        ]
        .into_iter()
        .fold((0, ""), |best, candidate| {
            if candidate.0 > best.0 { candidate } else { best }
        });

        Ok(match best {
            (0, _) | (_, "other") => None,
            (_, "devanagari") => Some(Self::devanagari_language(line).to_string()),
            (_, code) => Some(code.to_string()),
        })
    }
}

/// Selects the bundle matching the dominant language of a batch.
pub struct LanguageRouter {
    identifier: Arc<dyn LanguageIdentifier>,
    model_dir: PathBuf,
    classifier: String,
    word: AnalyzerConfig,
    char: AnalyzerConfig,
    cache: RwLock<HashMap<LanguageCode, Arc<ModelBundle>>>,
}

impl fmt::Debug for LanguageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageRouter")
            .field("model_dir", &self.model_dir)
            .field("classifier", &self.classifier)
            .field("word", &self.word)
            .field("char", &self.char)
            .field("cached", &self.cache.read().len())
            .finish()
    }
}

impl LanguageRouter {
    /// Create a router resolving bundles under `model_dir` named for
    /// `classifier` (a canonical classifier name) and the two analyzers.
    pub fn new(
        identifier: Arc<dyn LanguageIdentifier>,
        model_dir: impl Into<PathBuf>,
        classifier: impl Into<String>,
        word: AnalyzerConfig,
        char: AnalyzerConfig,
    ) -> Self {
        Self {
            identifier,
            model_dir: model_dir.into(),
            classifier: classifier.into(),
            word,
            char,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Detect the dominant language of `lines`.
    ///
    /// Every non-blank line with a detected code casts one vote, supported or
    /// not. The most voted code wins, and among equal counts the one seen
    /// first. A winning code outside [`LanguageCode::ALL`] is unsupported.
    pub fn detect_language(&self, lines: &[String]) -> Result<LanguageCode> {
        Ok(self.tally(lines)?.0)
    }

    /// Like [`detect_language`](Self::detect_language), also returning the
    /// vote count of every detected code, in first-seen order.
    pub fn tally(&self, lines: &[String]) -> Result<(LanguageCode, Vec<(String, usize)>)> {
        let mut votes: Vec<(String, usize)> = Vec::new();

        for line in lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            let detected = self.identifier.identify(line).map_err(|e| {
                log::error!("language identification failed: {e:#}");
                BhavaError::upstream("language identification", format!("{e:#}"))
            })?;

            let Some(code) = detected else { continue };
            let code = code.trim().to_lowercase();
            match votes.iter_mut().find(|(c, _)| *c == code) {
                Some((_, count)) => *count += 1,
                None => votes.push((code, 1)),
            }
        }
        log::debug!("language votes {votes:?}");

        let mut winner: Option<(&str, usize)> = None;
        for (code, count) in &votes {
            if winner.is_none_or(|(_, best)| *count > best) {
                winner = Some((code.as_str(), *count));
            }
        }

        let supported_votes = votes
            .iter()
            .any(|(code, _)| code.parse::<LanguageCode>().is_ok());
        let (Some((code, count)), true) = (winner, supported_votes) else {
            return Err(BhavaError::NoSupportedLanguageDetected { lines: lines.len() });
        };
        let language: LanguageCode = code.parse()?;
        log::info!("detected language {language} with {count} vote(s)");
        Ok((language, votes))
    }

    /// Artifact path for a language.
    pub fn bundle_path(&self, language: LanguageCode) -> PathBuf {
        self.model_dir.join(ModelBundle::file_name(
            language,
            &self.classifier,
            &self.word,
            &self.char,
        ))
    }

    /// Fetch the bundle trained for `language`, loading it on first use.
    pub fn select_bundle(&self, language: LanguageCode) -> Result<Arc<ModelBundle>> {
        if let Some(bundle) = self.cache.read().get(&language) {
            return Ok(Arc::clone(bundle));
        }

        let path = self.bundle_path(language);
        log::info!("loading {language} bundle from {}", path.display());
        let bundle = ModelBundle::load(&path)?;
        if bundle.language() != language {
            return Err(BhavaError::serialization(
                &path,
                format!("bundle was trained for {}, not {language}", bundle.language()),
            ));
        }

        let mut cache = self.cache.write();
        let bundle = cache.entry(language).or_insert_with(|| Arc::new(bundle));
        Ok(Arc::clone(bundle))
    }

    /// Fetch a bundle by language code string.
    pub fn select_bundle_for_code(&self, code: &str) -> Result<Arc<ModelBundle>> {
        self.select_bundle(code.parse()?)
    }

    /// Detect the dominant language and fetch its bundle.
    pub fn route(&self, lines: &[String]) -> Result<Arc<ModelBundle>> {
        let language = self.detect_language(lines)?;
        self.select_bundle(language)
    }

    /// Serve an in-memory bundle without touching disk. Its name must match
    /// the one this router would load for its language.
    pub fn register(&self, bundle: ModelBundle) -> Result<Arc<ModelBundle>> {
        let expected =
            ModelBundle::file_name(bundle.language(), &self.classifier, &self.word, &self.char);
        if bundle.name() != expected {
            return Err(BhavaError::invalid_config(format!(
                "bundle {} does not match router artifact {expected}",
                bundle.name()
            )));
        }
        let bundle = Arc::new(bundle);
        self.cache.write().insert(bundle.language(), Arc::clone(&bundle));
        Ok(bundle)
    }

    /// Number of bundles currently loaded.
    pub fn cached_bundles(&self) -> usize {
        self.cache.read().len()
    }
}
