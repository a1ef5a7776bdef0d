//! TOML configuration for collection and curation.
//!
//! Every field has a default, so an empty file (or [`Config::default`]) is a
//! valid configuration. Components receive the section they need by value at
//! construction time; nothing reads configuration from global state.
//!
//! ```toml
//! [github]
//! token_env = "GITHUB_TOKEN"
//! page_size = 100
//! max_results = 1000
//! commit_sentinel = 100
//! commit_year = 2024
//!
//! [collect]
//! output_dir = "dataset/raw_data"
//! search_terms = ["tinyml", "edge ai"]
//!
//! [curate]
//! processed_dir = "dataset/processed_data"
//! language = "eng"
//! candidate_languages = ["eng", "por", "spa"]
//! ```

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub curate: CurateConfig,
}

/// Settings for the search and enrichment endpoints.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// `per_page` sent with every search request.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upper bound on unique hits returned for one search term.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_min_stars")]
    pub min_stars: u64,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// `YYYY-MM-DD`; when unset the cutoff is one year before run time.
    #[serde(default)]
    pub pushed_after: Option<String>,
    /// `per_page` sent with every commits request.
    #[serde(default = "default_commit_page_size")]
    pub commit_page_size: usize,
    /// A commits page shorter than this is the last one.
    #[serde(default = "default_commit_sentinel")]
    pub commit_sentinel: usize,
    #[serde(default = "default_commit_year")]
    pub commit_year: i32,
    #[serde(default = "default_collaborator_page_size")]
    pub collaborator_page_size: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            user_agent: default_user_agent(),
            page_size: default_page_size(),
            max_results: default_max_results(),
            min_stars: default_min_stars(),
            sort: default_sort(),
            order: default_order(),
            page_delay_ms: default_page_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            pushed_after: None,
            commit_page_size: default_commit_page_size(),
            commit_sentinel: default_commit_sentinel(),
            commit_year: default_commit_year(),
            collaborator_page_size: default_collaborator_page_size(),
        }
    }
}

impl GithubConfig {
    /// The "pushed after" cutoff used in search queries.
    pub fn pushed_after_date(&self) -> Result<NaiveDate> {
        match &self.pushed_after {
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("github.pushed_after is not a YYYY-MM-DD date: '{}'", s)),
            None => Ok((Utc::now() - Duration::days(365)).date_naive()),
        }
    }

    pub fn page_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.page_delay_ms)
    }

    /// Reads the bearer token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}
fn default_user_agent() -> String {
    concat!("repo-scout/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_page_size() -> usize {
    100
}
fn default_max_results() -> usize {
    1000
}
fn default_min_stars() -> u64 {
    10
}
fn default_sort() -> String {
    "stars".to_string()
}
fn default_order() -> String {
    "desc".to_string()
}
fn default_page_delay_ms() -> u64 {
    3000
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_commit_page_size() -> usize {
    100
}
fn default_commit_sentinel() -> usize {
    100
}
fn default_commit_year() -> i32 {
    2024
}
fn default_collaborator_page_size() -> usize {
    100
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CollectConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_search_terms")]
    pub search_terms: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            search_terms: default_search_terms(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dataset/raw_data")
}
fn default_file_prefix() -> String {
    "RAW_".to_string()
}
fn default_search_terms() -> Vec<String> {
    [
        "edge ai",
        "edge_ai",
        "edgeiot",
        "edge iot",
        "edge-tpu",
        "edgetpu",
        "edge tpu",
        "edge_tpu",
        "tiny-ml",
        "tinyml",
        "tiny ml",
        "tiny_ml",
        "edge-impulse",
        "edgeimpulse",
        "edge impulse",
        "edge_impulse",
        "edge-architecture",
        "edgearchitecture",
        "edge architecture",
        "edge_architecture",
        "edge-ai-architecture",
        "edgeaiarchitecture",
        "edge ai architecture",
        "edge_ai_architecture",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurateConfig {
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
    /// Which files inside a folder the merge stage reads.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    /// ISO 639-3 code of the language descriptions must be written in.
    #[serde(default = "default_language")]
    pub language: String,
    /// Languages the detector chooses between; must include `language`.
    #[serde(default = "default_candidate_languages")]
    pub candidate_languages: Vec<String>,
    #[serde(default = "default_exclusion_terms")]
    pub exclusion_terms: Vec<String>,
}

impl Default for CurateConfig {
    fn default() -> Self {
        Self {
            processed_dir: default_processed_dir(),
            include_globs: default_include_globs(),
            language: default_language(),
            candidate_languages: default_candidate_languages(),
            exclusion_terms: default_exclusion_terms(),
        }
    }
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("dataset/processed_data")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.csv".to_string()]
}
fn default_language() -> String {
    "eng".to_string()
}
fn default_candidate_languages() -> Vec<String> {
    crate::curate::language::known_codes()
}

/// Low-signal terms that mark tutorials, demos, course material and
/// libraries rather than projects.
pub fn default_exclusion_terms() -> Vec<String> {
    [
        "courses",
        "toy",
        "tutorial",
        "classes",
        "books",
        "book",
        "guidelines",
        "tools",
        "tool",
        "demos",
        "demo",
        "simulator",
        "simulators",
        "class",
        "course",
        "toys",
        "cutting-edge",
        "library",
        "cuttingedge",
        "cutting_edge",
        "cutting edge",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

pub fn validate(config: &Config) -> Result<()> {
    let gh = &config.github;

    if gh.page_size == 0 || gh.page_size > 100 {
        bail!("github.page_size must be in 1..=100");
    }
    if gh.max_results == 0 {
        bail!("github.max_results must be >= 1");
    }
    if gh.commit_page_size == 0 {
        bail!("github.commit_page_size must be >= 1");
    }
    if gh.commit_sentinel == 0 {
        bail!("github.commit_sentinel must be >= 1");
    }
    if gh.collaborator_page_size == 0 {
        bail!("github.collaborator_page_size must be >= 1");
    }
    gh.pushed_after_date()?;

    // Left as configured: counts can be off by a page when the two differ.
    if gh.commit_sentinel != gh.commit_page_size {
        tracing::warn!(
            commit_sentinel = gh.commit_sentinel,
            commit_page_size = gh.commit_page_size,
            "commit_sentinel differs from commit_page_size; commit counts may over- or under-shoot by one page"
        );
    }

    let curate = &config.curate;
    for code in std::iter::once(&curate.language).chain(&curate.candidate_languages) {
        if !crate::curate::language::is_supported(code) {
            bail!(
                "Unknown language code: '{}'. Must be one of: {}",
                code,
                crate::curate::language::known_codes().join(", ")
            );
        }
    }
    if !curate.candidate_languages.contains(&curate.language) {
        bail!(
            "curate.candidate_languages must include curate.language ('{}')",
            curate.language
        );
    }

    Ok(())
}
