//! Descriptive statistics over metadata tables.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::template::MetadataTable;

/// How many samples carry a given value in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Per-column value counts, keyed by column name. Values within a column are
/// in natural sort order (`S2` before `S10`).
pub type TableStats = BTreeMap<String, Vec<ValueCount>>;

pub fn stats_from_table(table: &MetadataTable) -> TableStats {
    let mut out = TableStats::new();
    for (idx, header) in table.headers.iter().enumerate() {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &table.rows {
            *counts.entry(row.values[idx].as_str()).or_default() += 1;
        }
        let mut counts: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| natural_cmp(&a.value, &b.value));
        out.insert(header.clone(), counts);
    }
    out
}

/// Split a string into alternating digit / non-digit runs.
fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_digit: Option<bool> = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if prev_digit.is_some_and(|p| p != digit) {
            out.push(&s[start..i]);
            start = i;
        }
        prev_digit = Some(digit);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

/// Compare two strings so that embedded numbers order numerically.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(cb.iter()) {
        let both_digits = x.starts_with(|c: char| c.is_ascii_digit())
            && y.starts_with(|c: char| c.is_ascii_digit());
        let ord = if both_digits {
            let (xt, yt) = (x.trim_start_matches('0'), y.trim_start_matches('0'));
            xt.len().cmp(&yt.len()).then_with(|| xt.cmp(yt))
        } else {
            x.cmp(y)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len()).then_with(|| a.cmp(b))
}
