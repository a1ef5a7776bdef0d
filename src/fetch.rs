//! Pagination state and the shared best-effort failure policy.
//!
//! Every paginated fetch in the crate is a loop over a [`PageCursor`]: issue
//! a request for `cursor.page()`, feed the outcome to the cursor, and act on
//! the returned [`Step`]. Failures never propagate out of a fetch; the
//! [`BestEffort`] policy logs them and the cursor stops with whatever has
//! accumulated.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::Hash;

use crate::http::ApiResponse;

/// Transition taken after a page has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Request the next page.
    Advance,
    /// The endpoint has no more data.
    Exhausted,
    /// The accumulated count reached the cap.
    Capped,
    /// The request failed; keep the partial result.
    Failed,
}

impl Step {
    pub fn is_terminal(self) -> bool {
        self != Step::Advance
    }
}

/// State of one paginated fetch: page index, accumulated count and the keys
/// already seen across all pages.
#[derive(Debug)]
pub struct PageCursor<K> {
    page: u32,
    accumulated: usize,
    seen: HashSet<K>,
    cap: Option<usize>,
}

impl<K: Eq + Hash> PageCursor<K> {
    /// A cursor starting at page 1 with no cap.
    pub fn new() -> Self {
        Self {
            page: 1,
            accumulated: 0,
            seen: HashSet::new(),
            cap: None,
        }
    }

    /// Stop with [`Step::Capped`] once `cap` items have been accumulated.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn accumulated(&self) -> usize {
        self.accumulated
    }

    /// Records `key`; returns `false` if it was seen on an earlier page.
    pub fn admit(&mut self, key: K) -> bool {
        if self.seen.insert(key) {
            self.accumulated += 1;
            true
        } else {
            false
        }
    }

    /// Adds `n` items without key tracking (count-only fetches).
    pub fn add(&mut self, n: usize) {
        self.accumulated += n;
    }

    /// Decide what follows a page that returned `page_len` items.
    ///
    /// `last_page_below` is the item count under which a page is taken to
    /// be the final one. An empty page always ends the fetch.
    pub fn after_page(&mut self, page_len: usize, last_page_below: usize) -> Step {
        if matches!(self.cap, Some(cap) if self.accumulated >= cap) {
            return Step::Capped;
        }
        if page_len == 0 || page_len < last_page_below {
            return Step::Exhausted;
        }
        self.page += 1;
        Step::Advance
    }
}

impl<K: Eq + Hash> Default for PageCursor<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Degrade-to-partial policy shared by all fetchers: anything that is not a
/// successful, decodable response is logged and becomes `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestEffort;

impl BestEffort {
    /// Accept a successful response, or log why it was not.
    pub fn settle(&self, what: &str, outcome: anyhow::Result<ApiResponse>) -> Option<ApiResponse> {
        match outcome {
            Ok(resp) if resp.is_success() => Some(resp),
            Ok(resp) => {
                tracing::warn!(
                    status = resp.status,
                    body = %truncate(&resp.body, 300),
                    "{} failed",
                    what
                );
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "{} failed", what);
                None
            }
        }
    }

    /// [`settle`](Self::settle), then decode the body as JSON.
    pub fn decode<T: DeserializeOwned>(
        &self,
        what: &str,
        outcome: anyhow::Result<ApiResponse>,
    ) -> Option<T> {
        let resp = self.settle(what, outcome)?;
        match serde_json::from_str(&resp.body) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "{}: undecodable response body", what);
                None
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
