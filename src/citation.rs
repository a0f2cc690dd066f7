//! Citation creation.
//!
//! A citation is always re-derived from the live file table: the path must
//! resolve to an indexed file and the range must overlap it. Nothing from a
//! previous search result is trusted.

use thiserror::Error;

use crate::index::CorpusIndex;
use crate::models::Citation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CitationError {
    #[error("file not found: {0}")]
    UnknownPath(String),

    #[error("invalid line range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("line {start} is past the end of {path} ({line_count} lines)")]
    OutOfRange {
        path: String,
        start: usize,
        line_count: usize,
    },
}

/// Build a citation for `line_start..=line_end` (1-based) of `relative_path`.
///
/// A start of 0 is treated as 1 and an end past the last line is clamped. A
/// range that is empty after clamping (`0..=0`) is invalid.
pub fn create_citation(
    index: &CorpusIndex,
    relative_path: &str,
    line_start: usize,
    line_end: usize,
    reason: Option<&str>,
) -> Result<Citation, CitationError> {
    let file = index
        .get_file(relative_path)
        .ok_or_else(|| CitationError::UnknownPath(relative_path.to_string()))?;

    if line_start > line_end {
        return Err(CitationError::InvalidRange {
            start: line_start,
            end: line_end,
        });
    }

    let line_count = file.line_count();
    let start = line_start.max(1);
    if start > line_count {
        return Err(CitationError::OutOfRange {
            path: file.relative_path.clone(),
            start,
            line_count,
        });
    }
    let end = line_end.min(line_count);
    if end < start {
        return Err(CitationError::InvalidRange {
            start: line_start,
            end: line_end,
        });
    }

    Ok(Citation {
        relative_path: file.relative_path.clone(),
        line_start: start,
        line_end: end,
        text: file.text_range(start, end),
        reason: reason.map(|r| r.to_string()),
    })
}

/// CLI entry point for `cite cite <path> <start> <end>`.
pub fn run_cite(
    index: &CorpusIndex,
    relative_path: &str,
    line_start: usize,
    line_end: usize,
    reason: Option<&str>,
) -> anyhow::Result<()> {
    let citation = create_citation(index, relative_path, line_start, line_end, reason)
        .map_err(|e| anyhow::anyhow!("invalid citation: {}", e))?;

    println!("{}", citation);
    if let Some(ref reason) = citation.reason {
        println!("reason: {}", reason);
    }
    println!("---");
    println!("{}", citation.text);
    Ok(())
}
