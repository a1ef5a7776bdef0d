//! Tabular model for curation.
//!
//! A [`Dataset`] is whatever columns a CSV file defines plus its rows, kept
//! as strings. Stages only drop rows or pass them through; no cell is ever
//! rewritten.

use chrono::Local;
use std::path::{Path, PathBuf};

use crate::error::{CurateError, CurateResult};

/// Timestamp embedded in every output file name.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

pub fn file_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset. Rows are padded with empty cells or cut to the
    /// width of `columns`.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { columns, rows }
    }

    /// Same header, no rows.
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn records(&self) -> impl Iterator<Item = CuratedRecord<'_>> {
        self.rows.iter().map(move |values| CuratedRecord {
            columns: &self.columns,
            values,
        })
    }

    /// Keep the rows for which `keep` returns true, in order.
    pub fn retain_rows<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&CuratedRecord<'_>) -> bool,
    {
        let Dataset { columns, rows } = self;
        let rows = rows
            .into_iter()
            .filter(|values| {
                keep(&CuratedRecord {
                    columns: &columns,
                    values,
                })
            })
            .collect();
        Dataset { columns, rows }
    }

    /// Append `other`, widening the header with any columns not seen yet.
    /// Cells a source does not define are left empty.
    pub fn append(&mut self, other: Dataset) {
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .map(|c| match self.column_index(c) {
                Some(i) => i,
                None => {
                    self.columns.push(c.clone());
                    self.columns.len() - 1
                }
            })
            .collect();

        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for values in other.rows {
            let mut row = vec![String::new(); width];
            for (value, &target) in values.into_iter().zip(&mapping) {
                row[target] = value;
            }
            self.rows.push(row);
        }
    }

    /// Read a CSV file with a header row.
    pub fn read(path: &Path) -> CurateResult<Self> {
        if !path.exists() {
            return Err(CurateError::NotFound(path.to_path_buf()));
        }

        let csv_err = |source: csv::Error| CurateError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_err)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Write header and rows, creating the parent directory if needed.
    pub fn write(&self, path: &Path) -> CurateResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CurateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let csv_err = |source: csv::Error| CurateError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
        writer.write_record(&self.columns).map_err(csv_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| CurateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct CuratedRecord<'a> {
    columns: &'a [String],
    values: &'a [String],
}

impl<'a> CuratedRecord<'a> {
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// The `search_term` cell split on commas.
    pub fn search_terms(&self) -> Vec<&'a str> {
        self.get("search_term")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `<dir>/<name>.csv`
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.csv", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = Dataset::read(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, CurateError::NotFound(_)));
    }

    #[test]
    fn test_write_then_read_preserves_quoting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("a.csv");
        let ds = Dataset::new(
            strings(&["name", "desc."]),
            vec![strings(&["a", "has, a comma"]), strings(&["b", "says \"hi\""])],
        );
        ds.write(&path).unwrap();
        assert_eq!(Dataset::read(&path).unwrap(), ds);
    }

    #[test]
    fn test_ragged_file_fails_to_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.csv");
        std::fs::write(&path, "name,URL\na,b,c\n").unwrap();
        assert!(matches!(
            Dataset::read(&path),
            Err(CurateError::Csv { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_are_normalised() {
        let ds = Dataset::new(
            strings(&["name", "URL", "stars"]),
            vec![strings(&["a"]), strings(&["b", "u", "5", "extra"])],
        );
        let rows: Vec<&[String]> = ds.records().map(|r| r.values()).collect();
        assert_eq!(rows[0], strings(&["a", "", ""]).as_slice());
        assert_eq!(rows[1], strings(&["b", "u", "5"]).as_slice());
        assert_eq!(ds.records().next().unwrap().get("stars"), Some(""));
    }

    #[test]
    fn test_search_terms_split() {
        let ds = Dataset::new(
            strings(&["name", "search_term"]),
            vec![strings(&["a", "tinyml, edge ai,,"])],
        );
        let record = ds.records().next().unwrap();
        assert_eq!(record.search_terms(), vec!["tinyml", "edge ai"]);
    }

    #[test]
    fn test_append_unions_columns() {
        let mut ds = Dataset::new(strings(&["name", "URL"]), vec![strings(&["a", "u1"])]);
        ds.append(Dataset::new(
            strings(&["URL", "stars"]),
            vec![strings(&["u2", "5"])],
        ));
        assert_eq!(ds.columns(), strings(&["name", "URL", "stars"]).as_slice());
        let rows: Vec<Vec<String>> = ds.records().map(|r| r.values().to_vec()).collect();
        assert_eq!(rows[0], strings(&["a", "u1", ""]));
        assert_eq!(rows[1], strings(&["", "u2", "5"]));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = file_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
