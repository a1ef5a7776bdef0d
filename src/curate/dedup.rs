//! Duplicate removal by natural key.

use std::collections::HashSet;

use crate::dataset::Dataset;

/// Columns that identify a repository across raw files.
pub const KEY_COLUMNS: [&str; 3] = ["name", "full_name", "URL"];

/// Drop every row whose key repeats an earlier row's, keeping the first.
///
/// The key is whichever of [`KEY_COLUMNS`] the dataset has. With none of
/// them present the whole row is the key.
pub fn dedup(dataset: Dataset) -> Dataset {
    let key_idx: Vec<usize> = KEY_COLUMNS
        .iter()
        .filter_map(|c| dataset.column_index(c))
        .collect();

    if key_idx.is_empty() {
        tracing::warn!(
            expected = ?KEY_COLUMNS,
            "none of the key columns found; falling back to full-row duplicate removal"
        );
    }

    let before = dataset.len();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let out = dataset.retain_rows(|record| {
        let values = record.values();
        let key: Vec<String> = if key_idx.is_empty() {
            values.to_vec()
        } else {
            key_idx.iter().map(|&i| values[i].clone()).collect()
        };
        seen.insert(key)
    });

    tracing::info!(before, after = out.len(), "duplicates removed");
    out
}
