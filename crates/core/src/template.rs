//! Sample / prep metadata template files.
//!
//! A template is a tab-separated text file. The first non-comment line holds
//! the column headers and must include a `sample_name` column; every other
//! line describes one sample. Headers are trimmed and lower-cased, values are
//! trimmed. Blank lines and lines starting with `#` are ignored.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Name of the column identifying each sample.
pub const SAMPLE_NAME_COLUMN: &str = "sample_name";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("could not read template file: {0}")]
    Io(#[from] std::io::Error),

    #[error("template file is empty")]
    Empty,

    #[error("template has no '{SAMPLE_NAME_COLUMN}' column")]
    MissingSampleName,

    #[error("template has no samples")]
    NoSamples,

    #[error("duplicated column header: {0}")]
    DuplicateHeader(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: empty sample name")]
    EmptySampleName { line: usize },

    #[error("duplicated sample name: {0}")]
    DuplicateSample(String),
}

/// One sample of a metadata table. `values` is aligned with
/// [`MetadataTable::headers`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub sample_name: String,
    pub values: Vec<String>,
}

/// Parsed template content indexed by sample name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetadataTable {
    /// Metadata column names, excluding `sample_name`, in file order.
    pub headers: Vec<String>,
    pub rows: Vec<MetadataRow>,
}

impl MetadataTable {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn metadata_headers(&self) -> &[String] {
        &self.headers
    }

    pub fn sample_names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.sample_name.as_str())
    }
}

/// Parse template text.
pub fn parse_template(content: &str) -> Result<MetadataTable, TemplateError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with('#'));

    let (_, header_line) = lines.next().ok_or(TemplateError::Empty)?;
    let all_headers: Vec<String> = header_line
        .split('\t')
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    for h in &all_headers {
        if !seen.insert(h.as_str()) {
            return Err(TemplateError::DuplicateHeader(h.clone()));
        }
    }

    let name_idx = all_headers
        .iter()
        .position(|h| h == SAMPLE_NAME_COLUMN)
        .ok_or(TemplateError::MissingSampleName)?;

    let headers: Vec<String> = all_headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != name_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut rows = Vec::new();
    let mut samples = HashSet::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() != all_headers.len() {
            return Err(TemplateError::RaggedRow {
                line: line_no,
                expected: all_headers.len(),
                found: fields.len(),
            });
        }

        let sample_name = fields[name_idx].to_string();
        if sample_name.is_empty() {
            return Err(TemplateError::EmptySampleName { line: line_no });
        }
        if !samples.insert(sample_name.clone()) {
            return Err(TemplateError::DuplicateSample(sample_name));
        }

        let values = fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != name_idx)
            .map(|(_, v)| v.to_string())
            .collect();
        rows.push(MetadataRow { sample_name, values });
    }

    if rows.is_empty() {
        return Err(TemplateError::NoSamples);
    }

    Ok(MetadataTable { headers, rows })
}
