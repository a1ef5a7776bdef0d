//! File-level curation runs: read, apply one stage, write.
//!
//! Every runner takes explicit paths. A missing input file or folder is the
//! only failure that reaches the caller (as
//! [`CurateError::NotFound`](crate::error::CurateError::NotFound));
//! everything else degrades with a log line.

use std::path::{Path, PathBuf};

use crate::config::CurateConfig;
use crate::dataset::{file_timestamp, output_path, Dataset};
use crate::error::CurateResult;

use super::language::language_label;
use super::{dedup, exclude, merge_dir, retain_language, ExclusionVocabulary, LanguageDetector};

/// What one stage did.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: &'static str,
    pub rows_in: usize,
    pub rows_out: usize,
    /// `None` when the stage had nothing to write.
    pub output: Option<PathBuf>,
}

/// Merge every matching file in `dir` into `[CONCATENATED]-<folder>-<ts>.csv`.
pub fn run_merge(config: &CurateConfig, dir: &Path) -> CurateResult<StageReport> {
    let outcome = merge_dir(dir, &config.include_globs)?;
    let Some(merged) = outcome.dataset else {
        return Ok(StageReport {
            stage: "merge",
            rows_in: 0,
            rows_out: 0,
            output: None,
        });
    };

    let folder = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "dataset".to_string());
    let path = output_path(
        &config.processed_dir,
        &format!("[CONCATENATED]-{}-{}", folder, file_timestamp()),
    );
    merged.write(&path)?;
    tracing::info!(
        files = outcome.files_read.len(),
        skipped = outcome.files_skipped.len(),
        output = %path.display(),
        "concatenated file saved"
    );

    Ok(StageReport {
        stage: "merge",
        rows_in: merged.len(),
        rows_out: merged.len(),
        output: Some(path),
    })
}

/// Remove duplicate repositories into `[NO-DUPLICATED]_repo-files_<ts>.csv`.
pub fn run_dedup(config: &CurateConfig, input: &Path) -> CurateResult<StageReport> {
    let dataset = Dataset::read(input)?;
    let rows_in = dataset.len();
    let out = dedup(dataset);
    let path = output_path(
        &config.processed_dir,
        &format!("[NO-DUPLICATED]_repo-files_{}", file_timestamp()),
    );
    out.write(&path)?;
    tracing::info!(output = %path.display(), "file saved without duplicates");

    Ok(StageReport {
        stage: "dedup",
        rows_in,
        rows_out: out.len(),
        output: Some(path),
    })
}

/// Keep descriptions in the configured language, into
/// `[<LANGUAGE>-DESC]_repo-files_<ts>.csv` (`[ENGLISH-DESC]` for `eng`).
pub fn run_language(
    config: &CurateConfig,
    input: &Path,
    detector: &dyn LanguageDetector,
) -> CurateResult<StageReport> {
    let dataset = Dataset::read(input)?;
    let rows_in = dataset.len();
    let out = retain_language(dataset, detector, &config.language);
    let path = output_path(
        &config.processed_dir,
        &format!(
            "[{}-DESC]_repo-files_{}",
            language_label(&config.language),
            file_timestamp()
        ),
    );
    out.write(&path)?;
    tracing::info!(output = %path.display(), "file saved with filtered descriptions");

    Ok(StageReport {
        stage: "language",
        rows_in,
        rows_out: out.len(),
        output: Some(path),
    })
}

/// Drop excluded repositories into `[EXCLUSION-TERM]_<label>_<ts>.csv`.
///
/// Without a `label`, the second `_`-separated token of the input file
/// name is used. Nothing is written when every row is excluded.
pub fn run_exclusion(
    config: &CurateConfig,
    input: &Path,
    label: Option<&str>,
) -> CurateResult<StageReport> {
    let dataset = Dataset::read(input)?;
    let rows_in = dataset.len();
    let vocabulary = ExclusionVocabulary::new(&config.exclusion_terms);
    let out = exclude(dataset, &vocabulary);

    let label = match label {
        Some(l) => l.to_string(),
        None => {
            let inferred = label_from_file_name(input);
            tracing::debug!(label = %inferred, file = %input.display(), "inferred label from file name");
            inferred
        }
    };

    if out.is_empty() {
        tracing::warn!("no repositories to save after filtering");
        return Ok(StageReport {
            stage: "exclusion",
            rows_in,
            rows_out: 0,
            output: None,
        });
    }

    let path = output_path(
        &config.processed_dir,
        &format!("[EXCLUSION-TERM]_{}_{}", label, file_timestamp()),
    );
    out.write(&path)?;
    tracing::info!(
        input = rows_in,
        kept = out.len(),
        output = %path.display(),
        "filtered repositories saved"
    );

    Ok(StageReport {
        stage: "exclusion",
        rows_in,
        rows_out: out.len(),
        output: Some(path),
    })
}

/// Merge `dir`, then dedup, language-filter and exclude, writing every
/// intermediate file. Stops early when a stage produces no file.
pub fn run_all(
    config: &CurateConfig,
    dir: &Path,
    detector: &dyn LanguageDetector,
) -> CurateResult<Vec<StageReport>> {
    let mut reports = Vec::new();

    let merged = run_merge(config, dir)?;
    let Some(mut current) = merged.output.clone() else {
        reports.push(merged);
        return Ok(reports);
    };
    reports.push(merged);

    let deduped = run_dedup(config, &current)?;
    current = deduped.output.clone().unwrap_or(current);
    reports.push(deduped);

    let filtered = run_language(config, &current, detector)?;
    current = filtered.output.clone().unwrap_or(current);
    reports.push(filtered);

    let label = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "dataset".to_string());
    reports.push(run_exclusion(config, &current, Some(&label))?);

    Ok(reports)
}

/// `RAW_tinyml_repos_2025-01-01_10:00:00.csv` → `tinyml`.
pub fn label_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let tokens: Vec<&str> = stem.split('_').collect();
    if tokens.len() >= 2 {
        tokens[1].to_string()
    } else {
        tokens[0].to_string()
    }
}
