//! Raw dataset writer.
//!
//! Writes one row per search hit using the fixed raw column schema. Each
//! hit is enriched just before its row is written, so the cost of a write
//! is dominated by the enrichment requests, not by I/O.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::enrich::EnrichmentClient;
use crate::models::{EnrichedRecord, SearchHit};

pub struct RecordWriter<'a> {
    enricher: &'a EnrichmentClient,
}

impl<'a> RecordWriter<'a> {
    pub fn new(enricher: &'a EnrichmentClient) -> Self {
        Self { enricher }
    }

    /// Enrich `hits` and write them to `path`.
    ///
    /// Returns `Ok(None)` without touching the filesystem when `hits` is
    /// empty.
    pub fn write(&self, hits: Vec<SearchHit>, term: &str, path: &Path) -> Result<Option<PathBuf>> {
        if hits.is_empty() {
            tracing::info!(term, "no data to save");
            return Ok(None);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut out = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        out.write_record(EnrichedRecord::columns(self.enricher.commit_year()))?;

        let total = hits.len();
        for (i, hit) in hits.into_iter().enumerate() {
            let record = self.enricher.enrich(hit, term);
            out.write_record(record.to_row())?;
            tracing::debug!(n = i + 1, total, repo = %record.hit.full_name, "row written");
        }
        out.flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;

        Ok(Some(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GithubConfig;
    use crate::http::testkit::{commits_page, ScriptedTransport};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn hit(id: u64, description: &str) -> SearchHit {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "owner": {"login": "octo"},
            "name": format!("repo{}", id),
            "full_name": format!("octo/repo{}", id),
            "description": description,
            "html_url": format!("https://github.com/octo/repo{}", id),
            "stargazers_count": 11,
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_list_creates_no_file() {
        let tmp = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::default());
        let enricher = EnrichmentClient::new(transport.clone(), GithubConfig::default());
        let path = tmp.path().join("raw").join("RAW_x.csv");

        let written = RecordWriter::new(&enricher).write(vec![], "x", &path).unwrap();
        assert!(written.is_none());
        assert!(!path.exists());
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_rows_follow_schema() {
        let tmp = TempDir::new().unwrap();
        let transport = Arc::new(ScriptedTransport::new(vec![
            commits_page(7),
            commits_page(2),
            commits_page(4),
        ]));
        let enricher = EnrichmentClient::new(transport.clone(), GithubConfig::default());
        let path = tmp.path().join("RAW_tinyml.csv");

        let written = RecordWriter::new(&enricher)
            .write(vec![hit(1, "Inference, on the edge")], "tinyml", &path)
            .unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, EnrichedRecord::columns(2024));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "repo1");
        assert_eq!(&rows[0][3], "Inference, on the edge");
        assert_eq!(&rows[0][4], "7");
        assert_eq!(&rows[0][6], "2");
        assert_eq!(&rows[0][18], "4");
        assert_eq!(&rows[0][19], "tinyml");
        assert_eq!(transport.call_count(), 3);
    }
}
