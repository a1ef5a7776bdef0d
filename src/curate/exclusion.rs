//! Drop rows whose text mentions a low-signal keyword.

use crate::config::default_exclusion_terms;
use crate::dataset::{CuratedRecord, Dataset};

/// Lowercased keywords matched as substrings.
#[derive(Debug, Clone)]
pub struct ExclusionVocabulary {
    terms: Vec<String>,
}

impl ExclusionVocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        Self { terms }
    }

    /// First keyword found in `haystack`, which must already be lowercase.
    pub fn first_match(&self, haystack: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| haystack.contains(t.as_str()))
            .map(String::as_str)
    }
}

impl Default for ExclusionVocabulary {
    fn default() -> Self {
        Self::new(default_exclusion_terms())
    }
}

/// `name`, `desc.` and every search term, space-joined and lowercased.
pub fn haystack(record: &CuratedRecord<'_>) -> String {
    let name = record.get("name").unwrap_or_default();
    let desc = record.get("desc.").unwrap_or_default();
    let terms = record.search_terms().join(" ");
    format!("{} {} {}", name, desc, terms).to_lowercase()
}

/// Keep rows whose haystack contains none of the vocabulary's keywords.
pub fn exclude(dataset: Dataset, vocabulary: &ExclusionVocabulary) -> Dataset {
    let before = dataset.len();
    let out = dataset.retain_rows(|record| match vocabulary.first_match(&haystack(record)) {
        Some(term) => {
            tracing::debug!(
                repo = record.get("full_name").unwrap_or_default(),
                term,
                "excluded"
            );
            false
        }
        None => true,
    });

    tracing::info!(before, after = out.len(), "exclusion terms applied");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(rows: &[(&str, &str, &str)]) -> Dataset {
        Dataset::new(
            vec!["name".into(), "desc.".into(), "search_term".into()],
            rows.iter()
                .map(|(n, d, t)| vec![n.to_string(), d.to_string(), t.to_string()])
                .collect(),
        )
    }

    fn names(ds: &Dataset) -> Vec<String> {
        ds.records().map(|r| r.get("name").unwrap().to_string()).collect()
    }

    #[test]
    fn test_demo_and_toy_are_dropped() {
        let input = ds(&[
            ("ml-bots", "A tiny machine learning demo for toy robots", "tinyml"),
            ("edge-rt", "A production inference runtime for constrained devices", "tinyml"),
        ]);
        let out = exclude(input, &ExclusionVocabulary::default());
        assert_eq!(names(&out), vec!["edge-rt"]);
    }

    #[test]
    fn test_case_insensitive() {
        let input = ds(&[
            ("a", "Tutorial on sensors", "edge ai"),
            ("b", "tutorial on sensors", "edge ai"),
            ("c", "TUTORIAL", "edge ai"),
        ]);
        assert!(exclude(input, &ExclusionVocabulary::default()).is_empty());
    }

    #[test]
    fn test_name_and_search_terms_are_searched() {
        let input = ds(&[
            ("awesome-course", "", "edge ai"),
            ("runtime", "", "edge ai, cutting edge"),
            ("kept", "firmware", "edge ai"),
        ]);
        let out = exclude(input, &ExclusionVocabulary::default());
        assert_eq!(names(&out), vec!["kept"]);
    }

    #[test]
    fn test_vocabulary_is_normalised() {
        let vocab = ExclusionVocabulary::new(["  Demo ", "", "demo"]);
        assert_eq!(vocab.first_match("a demo app"), Some("demo"));
        assert_eq!(vocab.first_match("a product"), None);
    }

    #[test]
    fn test_order_preserved() {
        let input = ds(&[
            ("z", "firmware", "x"),
            ("drop", "book", "x"),
            ("a", "firmware", "x"),
        ]);
        let out = exclude(input, &ExclusionVocabulary::default());
        assert_eq!(names(&out), vec!["z", "a"]);
    }
}
