//! Repository search with cross-page deduplication and a result cap.
//!
//! Issues successive `GET /search/repositories` requests for one term and
//! accumulates unique hits (by numeric id) until the endpoint runs dry, a
//! request fails, or `max_results` unique hits have been collected.
//!
//! # Query
//!
//! ```text
//! <term> in:name,description,topics pushed:>YYYY-MM-DD stars:>N
//! ```
//!
//! # Termination
//!
//! | Condition | Result |
//! |-----------|--------|
//! | non-success status / transport error | stop, return hits so far |
//! | page with zero items | stop |
//! | unique hits reached `max_results` | stop, truncate to `max_results` |
//! | page shorter than `per_page` | process it, then stop |
//!
//! A fixed delay separates consecutive page requests. Failures are not retried.
//! An item that does not decode is skipped; the rest of its page is kept and
//! still counts toward the page length.

use anyhow::Result;
use std::sync::Arc;

use crate::config::GithubConfig;
use crate::fetch::{BestEffort, PageCursor, Step};
use crate::http::Transport;
use crate::models::{SearchHit, SearchPage};

pub struct SearchClient {
    transport: Arc<dyn Transport>,
    config: GithubConfig,
    policy: BestEffort,
}

impl SearchClient {
    pub fn new(transport: Arc<dyn Transport>, config: GithubConfig) -> Self {
        Self {
            transport,
            config,
            policy: BestEffort,
        }
    }

    /// Search with the configured sort, order and page size.
    pub fn search_default(&self, term: &str) -> Result<Vec<SearchHit>> {
        self.search(term, &self.config.sort, &self.config.order, self.config.page_size)
    }

    /// Collect up to `max_results` unique hits for `term`.
    ///
    /// Only an invalid `pushed_after` setting is an error; request failures
    /// end pagination and the partial list is returned.
    pub fn search(
        &self,
        term: &str,
        sort: &str,
        order: &str,
        page_size: usize,
    ) -> Result<Vec<SearchHit>> {
        let url = format!(
            "{}/search/repositories",
            self.config.api_base.trim_end_matches('/')
        );
        let query = build_query(term, &self.config)?;
        let cap = self.config.max_results;

        let mut cursor = PageCursor::new().with_cap(cap);
        let mut hits: Vec<SearchHit> = Vec::new();

        let step = loop {
            if cursor.page() > 1 {
                std::thread::sleep(self.config.page_delay());
            }

            let params = vec![
                ("q".to_string(), query.clone()),
                ("sort".to_string(), sort.to_string()),
                ("order".to_string(), order.to_string()),
                ("per_page".to_string(), page_size.to_string()),
                ("page".to_string(), cursor.page().to_string()),
            ];

            let what = format!("search '{}' page {}", term, cursor.page());
            let outcome = self.transport.get(&url, &params);
            let Some(page) = self.policy.decode::<SearchPage>(&what, outcome) else {
                break Step::Failed;
            };

            let page_len = page.items.len();
            for hit in page.hits() {
                if cursor.admit(hit.id) {
                    hits.push(hit);
                }
            }

            tracing::info!(
                term,
                page = cursor.page(),
                returned = page_len,
                unique = hits.len(),
                "search page loaded"
            );

            let step = cursor.after_page(page_len, page_size);
            if step.is_terminal() {
                break step;
            }
        };

        hits.truncate(cap);
        tracing::debug!(term, ?step, hits = hits.len(), "search finished");
        Ok(hits)
    }
}

/// Build the `q` parameter for a term.
pub fn build_query(term: &str, config: &GithubConfig) -> Result<String> {
    let pushed_after = config.pushed_after_date()?;
    Ok(format!(
        "{} in:name,description,topics pushed:>{} stars:>{}",
        term,
        pushed_after.format("%Y-%m-%d"),
        config.min_stars
    ))
}
