//! Offline curation pipeline.
//!
//! ```text
//! raw CSV folder ──▶ merge ──▶ dedup ──▶ language ──▶ exclusion
//! ```
//!
//! Each stage is a pure transform over a [`Dataset`](crate::dataset::Dataset)
//! in its own module; [`pipeline`] wraps them in the read → transform →
//! write steps the CLI runs, naming every output file with the stage's
//! prefix and a timestamp.
//!
//! | Stage | Output prefix |
//! |-------|---------------|
//! | [`merge`] | `[CONCATENATED]-<folder>-<ts>` |
//! | [`dedup`] | `[NO-DUPLICATED]_repo-files_<ts>` |
//! | [`language`] | `[<LANGUAGE>-DESC]_repo-files_<ts>` |
//! | [`exclusion`] | `[EXCLUSION-TERM]_<term>_<ts>` |

pub mod dedup;
pub mod exclusion;
pub mod language;
pub mod merge;
pub mod pipeline;

pub use dedup::dedup;
pub use exclusion::{exclude, ExclusionVocabulary};
pub use language::{retain_language, LanguageDetector, LinguaDetector};
pub use merge::{merge_dir, MergeOutcome};
