//! Union of every CSV file in a folder.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::dataset::Dataset;
use crate::error::{CurateError, CurateResult};

/// Result of merging a folder.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// `None` when no file could be read.
    pub dataset: Option<Dataset>,
    pub files_read: Vec<PathBuf>,
    pub files_skipped: Vec<PathBuf>,
}

/// Read every file directly inside `dir` whose name matches `include_globs`
/// and concatenate the rows, file by file in name order.
///
/// A file that fails to parse is logged and skipped. Only a missing `dir`
/// is an error.
pub fn merge_dir(dir: &Path, include_globs: &[String]) -> CurateResult<MergeOutcome> {
    if !dir.is_dir() {
        return Err(CurateError::NotFound(dir.to_path_buf()));
    }

    let include_set = build_globset(include_globs)?;
    let mut outcome = MergeOutcome::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !include_set.is_match(&*file_name) {
            continue;
        }

        let path = entry.path();
        tracing::info!(file = %file_name, "processing file");
        match Dataset::read(path) {
            Ok(ds) => {
                if let Some(merged) = outcome.dataset.as_mut() {
                    merged.append(ds);
                } else {
                    outcome.dataset = Some(ds);
                }
                outcome.files_read.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::error!(file = %file_name, error = %e, "error reading file");
                outcome.files_skipped.push(path.to_path_buf());
            }
        }
    }

    if outcome.dataset.is_none() {
        tracing::warn!(dir = %dir.display(), "no CSV file processed");
    }

    Ok(outcome)
}

fn build_globset(patterns: &[String]) -> CurateResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
