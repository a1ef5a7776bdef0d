//! Per-repository statistics from the commits and contributors endpoints.
//!
//! All three counters are best effort: a failed request is logged and the
//! count gathered so far (possibly zero) is returned. One repository's
//! failure never stops enrichment of the next.
//!
//! Commit counting pages through `GET /repos/{owner}/{name}/commits` and sums
//! page lengths. A page with fewer than `commit_sentinel` items is the last.
//! The sentinel is a separate setting from `commit_page_size`; when the two
//! differ the count can be off by up to a page.
//!
//! Collaborator counting reads a single page of
//! `GET /repos/{owner}/{name}/contributors`, so for projects with more than
//! `collaborator_page_size` contributors the value is a lower bound.

use serde_json::Value;
use std::sync::Arc;

use crate::config::GithubConfig;
use crate::fetch::{BestEffort, PageCursor, Step};
use crate::http::Transport;
use crate::models::{EnrichedRecord, SearchHit};

pub struct EnrichmentClient {
    transport: Arc<dyn Transport>,
    config: GithubConfig,
    policy: BestEffort,
}

impl EnrichmentClient {
    pub fn new(transport: Arc<dyn Transport>, config: GithubConfig) -> Self {
        Self {
            transport,
            config,
            policy: BestEffort,
        }
    }

    pub fn commit_year(&self) -> i32 {
        self.config.commit_year
    }

    /// Total number of commits on the default branch.
    pub fn count_total_commits(&self, owner: &str, name: &str) -> u64 {
        self.count_commits(owner, name, &[], "commits")
    }

    /// Commits between January 1st and December 31st of `commit_year` (UTC).
    pub fn count_commits_in_year(&self, owner: &str, name: &str) -> u64 {
        let year = self.config.commit_year;
        let window = [
            ("since".to_string(), format!("{}-01-01T00:00:00Z", year)),
            ("until".to_string(), format!("{}-12-31T23:59:59Z", year)),
        ];
        self.count_commits(owner, name, &window, &format!("commits in {}", year))
    }

    /// Length of the first contributors page.
    pub fn count_collaborators(&self, owner: &str, name: &str) -> u64 {
        let url = self.repo_url(owner, name, "contributors");
        let params = vec![(
            "per_page".to_string(),
            self.config.collaborator_page_size.to_string(),
        )];
        let what = format!("contributors for {}/{}", owner, name);
        self.policy
            .decode::<Vec<Value>>(&what, self.transport.get(&url, &params))
            .map(|items| items.len() as u64)
            .unwrap_or(0)
    }

    /// Run all three counters for one hit.
    pub fn enrich(&self, hit: SearchHit, term: &str) -> EnrichedRecord {
        let owner = hit.owner.login.as_str();
        let name = hit.name.as_str();
        let total_commits = self.count_total_commits(owner, name);
        let year_commits = self.count_commits_in_year(owner, name);
        let collaborators = self.count_collaborators(owner, name);

        tracing::debug!(
            repo = %hit.full_name,
            total_commits,
            year_commits,
            collaborators,
            "enriched"
        );

        EnrichedRecord {
            hit,
            total_commits,
            year_commits,
            collaborators,
            search_term: term.to_string(),
        }
    }

    fn count_commits(
        &self,
        owner: &str,
        name: &str,
        extra: &[(String, String)],
        label: &str,
    ) -> u64 {
        let url = self.repo_url(owner, name, "commits");
        let mut cursor: PageCursor<()> = PageCursor::new();

        loop {
            let mut params = vec![
                (
                    "per_page".to_string(),
                    self.config.commit_page_size.to_string(),
                ),
                ("page".to_string(), cursor.page().to_string()),
            ];
            params.extend_from_slice(extra);

            let what = format!("{} for {}/{} page {}", label, owner, name, cursor.page());
            let Some(commits) = self
                .policy
                .decode::<Vec<Value>>(&what, self.transport.get(&url, &params))
            else {
                break;
            };

            cursor.add(commits.len());
            if cursor.after_page(commits.len(), self.config.commit_sentinel) != Step::Advance {
                break;
            }
        }

        cursor.accumulated() as u64
    }

    fn repo_url(&self, owner: &str, name: &str, endpoint: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            owner,
            name,
            endpoint
        )
    }
}
