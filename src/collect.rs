//! Collection phase: search → enrich → write, once per search term.
//!
//! Each term produces its own raw dataset named
//! `<output_dir>/<file_prefix><term>_repos_<timestamp>.csv`. A term with no
//! hits writes nothing. Terms run strictly one after another.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::dataset::{file_timestamp, output_path};
use crate::enrich::EnrichmentClient;
use crate::http::{GitHubTransport, Transport};
use crate::search::SearchClient;
use crate::writer::RecordWriter;

/// Outcome for one search term.
#[derive(Debug, Clone)]
pub struct TermSummary {
    pub term: String,
    pub hits: usize,
    pub output: Option<PathBuf>,
}

pub struct Collector {
    search: SearchClient,
    enricher: EnrichmentClient,
    config: Config,
}

impl Collector {
    /// A collector talking to the real API.
    pub fn from_config(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(GitHubTransport::new(&config.github)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            search: SearchClient::new(transport.clone(), config.github.clone()),
            enricher: EnrichmentClient::new(transport, config.github.clone()),
            config,
        }
    }

    /// Collect every term in order. Only local I/O errors abort the run.
    pub fn run(&self, terms: &[String]) -> Result<Vec<TermSummary>> {
        let mut summaries = Vec::with_capacity(terms.len());
        for term in terms {
            summaries.push(self.collect_term(term)?);
        }
        Ok(summaries)
    }

    pub fn collect_term(&self, term: &str) -> Result<TermSummary> {
        tracing::info!(term, "searching repositories");
        let hits = self.search.search_default(term)?;
        let count = hits.len();

        if hits.is_empty() {
            tracing::info!(term, "no repositories found");
            return Ok(TermSummary {
                term: term.to_string(),
                hits: 0,
                output: None,
            });
        }

        let collect = &self.config.collect;
        let path = output_path(
            &collect.output_dir,
            &format!("{}{}_repos_{}", collect.file_prefix, term, file_timestamp()),
        );
        let output = RecordWriter::new(&self.enricher).write(hits, term, &path)?;
        if let Some(ref p) = output {
            tracing::info!(term, hits = count, output = %p.display(), "data saved");
        }

        Ok(TermSummary {
            term: term.to_string(),
            hits: count,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testkit::{commits_page, search_page, Scripted, ScriptedTransport};
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        let mut config = Config::default();
        config.github.page_delay_ms = 0;
        config.github.page_size = 2;
        config.github.pushed_after = Some("2024-01-01".to_string());
        config.collect.output_dir = tmp.path().join("raw");
        config
    }

    #[test]
    fn test_term_with_hits_writes_file() {
        let tmp = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new(vec![
            search_page(&[1]),
            commits_page(3),
            commits_page(1),
            commits_page(2),
        ]));
        let collector = Collector::with_transport(config(&tmp), transport.clone());

        let summary = collector.collect_term("tinyml").unwrap();
        assert_eq!(summary.hits, 1);
        let path = summary.output.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("RAW_tinyml_repos_"));
        assert!(name.ends_with(".csv"));
        assert!(path.exists());
        assert_eq!(transport.call_count(), 4);
    }

    #[test]
    fn test_failed_search_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new(vec![Scripted::Ok(
            403,
            r#"{"message":"API rate limit exceeded"}"#.to_string(),
        )]));
        let collector = Collector::with_transport(config(&tmp), transport);

        let summaries = collector.run(&["edge ai".to_string()]).unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].output.is_none());
        assert!(!tmp.path().join("raw").exists());
    }
}
