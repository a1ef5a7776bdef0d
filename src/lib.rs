//! # Repo Scout
//!
//! Discover repositories on the GitHub search API, enrich each hit with
//! commit and contributor statistics, and curate the collected data into a
//! research dataset.
//!
//! ## Architecture
//!
//! ```text
//!  collection                               curation
//! ┌────────┐   ┌────────┐   ┌────────┐       ┌───────┐   ┌───────┐   ┌──────────┐   ┌───────────┐
//! │ Search │──▶│ Enrich │──▶│ Writer │──CSV─▶│ Merge │──▶│ Dedup │──▶│ Language │──▶│ Exclusion │
//! └────────┘   └────────┘   └────────┘       └───────┘   └───────┘   └──────────┘   └───────────┘
//! ```
//!
//! The two phases only meet at the flat-file boundary: curation can run on
//! any accumulation of raw datasets at any later time.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration |
//! | [`http`] | Blocking HTTP transport |
//! | [`fetch`] | Pagination state and best-effort failure policy |
//! | [`search`] | Repository search |
//! | [`enrich`] | Commit and contributor counts |
//! | [`writer`] | Raw dataset writer |
//! | [`collect`] | Collection phase per search term |
//! | [`dataset`] | CSV tables for curation |
//! | [`curate`] | Merge, dedup, language and exclusion stages |

pub mod collect;
pub mod config;
pub mod curate;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod http;
pub mod models;
pub mod search;
pub mod writer;
