//! Core data types for the collection phase.
//!
//! A [`SearchHit`] is decoded straight from one entry of the search
//! response's `items` array. An [`EnrichedRecord`] is a hit plus the derived
//! commit and contributor counts, and is the unit written to a raw dataset.

use serde::Deserialize;

/// Owner object nested inside a search hit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// One repository returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    #[serde(default)]
    pub owner: Owner,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub contributors_url: String,
    #[serde(default)]
    pub collaborators_url: String,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

/// Body of a search response. Pagination is implied by `items.len()`.
///
/// Items stay raw so one malformed entry does not discard the whole page;
/// see [`SearchPage::hits`].
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl SearchPage {
    /// Decode every item, logging and skipping the ones that do not parse.
    pub fn hits(self) -> Vec<SearchHit> {
        self.items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<SearchHit>(item) {
                Ok(hit) => Some(hit),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed search item");
                    None
                }
            })
            .collect()
    }
}

/// A search hit plus derived statistics, immutable once built.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub hit: SearchHit,
    pub total_commits: u64,
    /// Commits inside the configured calendar year.
    pub year_commits: u64,
    /// First page of contributors only; a lower bound for large projects.
    pub collaborators: u64,
    pub search_term: String,
}

impl EnrichedRecord {
    /// Column header for a raw dataset; the year column is `commits_<year>`.
    pub fn columns(year: i32) -> Vec<String> {
        [
            "name",
            "full_name",
            "URL",
            "desc.",
            "total_commits",
            "last_commit",
        ]
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(format!("commits_{}", year)))
        .chain(
            [
                "stars",
                "fork",
                "forks",
                "lang",
                "size",
                "score",
                "template",
                "archived",
                "disabled",
                "contributors_url",
                "collaborators_url",
                "collaborators",
                "search_term",
            ]
            .iter()
            .map(|s| s.to_string()),
        )
        .collect()
    }

    /// Row values in the same order as [`EnrichedRecord::columns`].
    pub fn to_row(&self) -> Vec<String> {
        let h = &self.hit;
        vec![
            h.name.clone(),
            h.full_name.clone(),
            h.html_url.clone(),
            h.description.clone().unwrap_or_default(),
            self.total_commits.to_string(),
            h.pushed_at.clone().unwrap_or_default(),
            self.year_commits.to_string(),
            h.stargazers_count.to_string(),
            h.fork.to_string(),
            h.forks_count.to_string(),
            h.language.clone().unwrap_or_default(),
            h.size.to_string(),
            format!("{:?}", h.score),
            h.is_template.to_string(),
            h.archived.to_string(),
            h.disabled.to_string(),
            h.contributors_url.clone(),
            h.collaborators_url.clone(),
            self.collaborators.to_string(),
            self.search_term.clone(),
        ]
    }
}
