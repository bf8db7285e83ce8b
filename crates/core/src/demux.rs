//! Summary statistics over demultiplexed sequence files.
//!
//! A demultiplexed file holds every read of a study, labelled by sample. Both
//! FASTA (`>` headers, sequence possibly wrapped across lines) and FASTQ
//! (four-line records) layouts are accepted; the layout is detected from the
//! first non-blank character.

use std::path::Path;

use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum DemuxError {
    #[error("could not read demultiplexed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognised demultiplexed file format")]
    UnknownFormat,

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: &'static str },
}

/// Sequence-length statistics for one demultiplexed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemuxStats {
    /// Number of sequences.
    pub n: usize,
    pub max: usize,
    pub min: usize,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
}

impl DemuxStats {
    fn from_lengths(mut lengths: Vec<usize>) -> Self {
        let n = lengths.len();
        if n == 0 {
            return Self {
                n: 0,
                max: 0,
                min: 0,
                mean: 0.0,
                std: 0.0,
                median: 0.0,
            };
        }

        lengths.sort_unstable();
        let sum: usize = lengths.iter().sum();
        let mean = sum as f64 / n as f64;
        let var = lengths
            .iter()
            .map(|&l| (l as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let median = if n % 2 == 1 {
            lengths[n / 2] as f64
        } else {
            (lengths[n / 2 - 1] + lengths[n / 2]) as f64 / 2.0
        };

        Self {
            n,
            max: lengths[n - 1],
            min: lengths[0],
            mean,
            std: var.sqrt(),
            median,
        }
    }
}

/// Compute statistics for the demultiplexed file at `path`.
pub fn demux_stats(path: &Path) -> Result<DemuxStats, DemuxError> {
    let content = std::fs::read_to_string(path)?;
    parse_demux(&content)
}

/// Compute statistics from in-memory file content.
pub fn parse_demux(content: &str) -> Result<DemuxStats, DemuxError> {
    let first = content.trim_start().chars().next();
    let lengths = match first {
        None => Vec::new(),
        Some('>') => fasta_lengths(content)?,
        Some('@') => fastq_lengths(content)?,
        Some(_) => return Err(DemuxError::UnknownFormat),
    };
    Ok(DemuxStats::from_lengths(lengths))
}

fn fasta_lengths(content: &str) -> Result<Vec<usize>, DemuxError> {
    let mut lengths = Vec::new();
    let mut current: Option<usize> = None;
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            if let Some(len) = current.replace(0) {
                lengths.push(len);
            }
        } else {
            match current.as_mut() {
                Some(len) => *len += line.len(),
                None => {
                    return Err(DemuxError::Malformed {
                        line: i + 1,
                        reason: "sequence data before the first header",
                    })
                }
            }
        }
    }
    if let Some(len) = current {
        lengths.push(len);
    }
    Ok(lengths)
}

fn fastq_lengths(content: &str) -> Result<Vec<usize>, DemuxError> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    let mut lengths = Vec::with_capacity(lines.len() / 4);
    for record in lines.chunks(4) {
        let [(hl, header), (_, seq), (pl, plus), (ql, qual)] = record else {
            return Err(DemuxError::Malformed {
                line: record[0].0,
                reason: "truncated FASTQ record",
            });
        };
        if !header.starts_with('@') {
            return Err(DemuxError::Malformed {
                line: *hl,
                reason: "FASTQ header must start with '@'",
            });
        }
        if !plus.starts_with('+') {
            return Err(DemuxError::Malformed {
                line: *pl,
                reason: "FASTQ separator must start with '+'",
            });
        }
        if qual.len() != seq.len() {
            return Err(DemuxError::Malformed {
                line: *ql,
                reason: "quality length does not match sequence length",
            });
        }
        lengths.push(seq.len());
    }
    Ok(lengths)
}
