//! Core data models used throughout the corpus index.
//!
//! These types represent the ingested files, their extracted metadata, and
//! the transient search results and citations handed to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Role tag assigned to a file by the root it was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Example,
    Doc,
    Template,
    Other,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Example => "example",
            Classification::Doc => "doc",
            Classification::Template => "template",
            Classification::Other => "other",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields pulled from a file's leading `metadata:` block.
///
/// Every field is optional; a file without a block has all fields `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub title: Option<String>,
    pub short_title: Option<String>,
    pub documentation: Option<String>,
    pub example_start: Option<u32>,
    pub example_end: Option<u32>,
}

impl FileMetadata {
    pub fn is_empty(&self) -> bool {
        self == &FileMetadata::default()
    }
}

/// One ingested file. Immutable once the index is built.
#[derive(Debug, Clone, Serialize)]
pub struct IndexedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub classification: Classification,
    pub content: String,
    pub lines: Vec<String>,
    /// Byte offset of the start of each line in `content`.
    #[serde(skip)]
    pub line_offsets: Vec<usize>,
    pub metadata: FileMetadata,
}

impl IndexedFile {
    /// Split `content` into lines and extract metadata.
    pub fn new(
        path: PathBuf,
        relative_path: String,
        classification: Classification,
        content: String,
    ) -> Self {
        let (lines, line_offsets) = split_lines(&content);
        let metadata = crate::metadata::extract_metadata(&content);
        Self {
            path,
            relative_path,
            classification,
            content,
            lines,
            line_offsets,
            metadata,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// File base name with the extension stripped (`ask-name.yml` → `ask-name`).
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Lines `start..=end` (1-based, caller guarantees bounds) joined by `\n`.
    pub fn text_range(&self, start: usize, end: usize) -> String {
        self.lines[start - 1..end].join("\n")
    }
}

/// Splits on `\n` so the line count always equals the number of
/// newline-delimited segments. A trailing `\r` is dropped from each line.
fn split_lines(content: &str) -> (Vec<String>, Vec<usize>) {
    let mut lines = Vec::new();
    let mut offsets = Vec::new();
    let mut offset = 0;
    for segment in content.split('\n') {
        offsets.push(offset);
        offset += segment.len() + 1;
        lines.push(segment.strip_suffix('\r').unwrap_or(segment).to_string());
    }
    (lines, offsets)
}

/// A scored, windowed hit returned by [`crate::search::search`].
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub relative_path: String,
    pub classification: Classification,
    pub line_start: usize,
    pub line_end: usize,
    /// The line that produced the hit.
    pub match_line: usize,
    pub text: String,
    pub score: f64,
}

/// A re-verified reference to an exact line range in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub relative_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}-{}",
            self.relative_path, self.line_start, self.line_end
        )
    }
}

/// Counts reported by [`crate::index::CorpusIndex::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_files: usize,
    pub examples: usize,
    pub docs: usize,
    pub templates: usize,
    pub other: usize,
    pub keyword_count: usize,
}
