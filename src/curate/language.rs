//! Keep rows whose description is written in one natural language.
//!
//! Repository descriptions are short and full of product names, so the
//! default detector only chooses among a small set of candidate languages
//! (`curate.candidate_languages`) instead of every language it knows.

use anyhow::{bail, Result};
use lingua::{Language, LanguageDetectorBuilder};

use crate::dataset::Dataset;

/// Column holding the free-text repository description.
pub const DESCRIPTION_COLUMN: &str = "desc.";

/// ISO 639-3 code, detector language and output file label.
const KNOWN_LANGUAGES: [(&str, Language, &str); 9] = [
    ("eng", Language::English, "ENGLISH"),
    ("por", Language::Portuguese, "PORTUGUESE"),
    ("spa", Language::Spanish, "SPANISH"),
    ("fra", Language::French, "FRENCH"),
    ("deu", Language::German, "GERMAN"),
    ("rus", Language::Russian, "RUSSIAN"),
    ("zho", Language::Chinese, "CHINESE"),
    ("jpn", Language::Japanese, "JAPANESE"),
    ("kor", Language::Korean, "KOREAN"),
];

/// Every code the default detector can be configured with.
pub fn known_codes() -> Vec<String> {
    KNOWN_LANGUAGES
        .iter()
        .map(|(code, _, _)| code.to_string())
        .collect()
}

/// Check that `code` names a language the default detector knows.
pub fn is_supported(code: &str) -> bool {
    KNOWN_LANGUAGES.iter().any(|(c, _, _)| *c == code)
}

/// Upper-case name used in output file names, e.g. `ENGLISH` for `eng`.
pub fn language_label(code: &str) -> String {
    KNOWN_LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, _, label)| label.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Natural-language classifier.
pub trait LanguageDetector {
    /// ISO 639-3 code of the detected language, or `None` when the text
    /// cannot be classified.
    fn detect(&self, text: &str) -> Option<String>;
}

/// N-gram detection from the `lingua` crate over a bounded candidate set.
pub struct LinguaDetector {
    inner: lingua::LanguageDetector,
}

impl LinguaDetector {
    /// Build a detector choosing among `candidates` (ISO 639-3 codes).
    /// At least two distinct known languages are required.
    pub fn new<I, S>(candidates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut languages: Vec<Language> = Vec::new();
        for code in candidates {
            let code = code.as_ref();
            let Some((_, language, _)) = KNOWN_LANGUAGES.iter().find(|(c, _, _)| *c == code)
            else {
                bail!(
                    "Unknown candidate language: '{}'. Known codes: {}",
                    code,
                    known_codes().join(", ")
                );
            };
            if !languages.contains(language) {
                languages.push(*language);
            }
        }
        if languages.len() < 2 {
            bail!("At least two distinct candidate languages are required");
        }

        Ok(Self {
            inner: LanguageDetectorBuilder::from_languages(&languages).build(),
        })
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        let languages: Vec<Language> = KNOWN_LANGUAGES.iter().map(|(_, l, _)| *l).collect();
        Self {
            inner: LanguageDetectorBuilder::from_languages(&languages).build(),
        }
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let detected = self.inner.detect_language_of(text)?;
        KNOWN_LANGUAGES
            .iter()
            .find(|(_, l, _)| *l == detected)
            .map(|(code, _, _)| code.to_string())
    }
}

/// Keep rows whose description is classified as `language`.
///
/// Blank descriptions and undetectable ones are dropped. Without a
/// description column the result is an empty dataset with the same header.
pub fn retain_language(dataset: Dataset, detector: &dyn LanguageDetector, language: &str) -> Dataset {
    if dataset.column_index(DESCRIPTION_COLUMN).is_none() {
        tracing::warn!(
            column = DESCRIPTION_COLUMN,
            "description column not found; emitting an empty dataset"
        );
        return dataset.empty_like();
    }

    let before = dataset.len();
    let out = dataset.retain_rows(|record| {
        let description = record.get(DESCRIPTION_COLUMN).unwrap_or_default();
        if description.trim().is_empty() {
            return false;
        }
        detector.detect(description).as_deref() == Some(language)
    });

    tracing::info!(before, after = out.len(), language, "language filter applied");
    out
}
