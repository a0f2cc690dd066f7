//! Inverted keyword index over a fixed vocabulary.
//!
//! Built once after ingestion: every vocabulary term is compiled into a
//! case-insensitive whole-word matcher and run against every file. Lookups
//! afterwards are a single map access.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

use crate::models::IndexedFile;

/// Interview-language terms indexed by default.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "question",
    "subquestion",
    "under",
    "help",
    "fields",
    "datatype",
    "choices",
    "buttons",
    "dropdown",
    "combobox",
    "radio",
    "checkboxes",
    "yesno",
    "noyes",
    "yesnomaybe",
    "field",
    "default",
    "hint",
    "required",
    "show if",
    "hide if",
    "enable if",
    "disable if",
    "js show if",
    "validation code",
    "validate",
    "mandatory",
    "initial",
    "code",
    "event",
    "need",
    "depends on",
    "reconsider",
    "continue button field",
    "continue button label",
    "objects",
    "objects from file",
    "data",
    "data from code",
    "sections",
    "progress",
    "features",
    "metadata",
    "include",
    "modules",
    "imports",
    "interview help",
    "terms",
    "auto terms",
    "template",
    "content file",
    "attachment",
    "attachments",
    "docx template file",
    "pdf template file",
    "review",
    "table",
    "signature",
    "generic object",
    "list collect",
    "action",
    "id",
    "language",
    "translations",
    "default screen parts",
    "css",
    "javascript",
    "decoration",
    "image sets",
    "machine learning storage",
];

/// Keyword → relative paths of files containing it as a whole word.
#[derive(Debug, Default)]
pub struct KeywordIndex {
    entries: HashMap<String, BTreeSet<String>>,
}

impl KeywordIndex {
    /// Scan every file against every keyword.
    pub fn build(vocabulary: &[String], files: &[IndexedFile]) -> Result<Self> {
        let mut entries: HashMap<String, BTreeSet<String>> = HashMap::new();

        for keyword in vocabulary {
            let normalized = normalize_keyword(keyword);
            if normalized.is_empty() {
                continue;
            }
            let matcher = keyword_matcher(&normalized)?;

            for file in files {
                if matcher.is_match(&file.content) {
                    entries
                        .entry(normalized.clone())
                        .or_default()
                        .insert(file.relative_path.clone());
                }
            }
        }

        log::debug!(
            "Keyword index: {} of {} terms matched",
            entries.len(),
            vocabulary.len()
        );

        Ok(Self { entries })
    }

    /// Relative paths for `keyword`; empty when unknown or unmatched.
    pub fn paths(&self, keyword: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(&normalize_keyword(keyword))
    }

    /// Number of keywords that matched at least one file.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// `(?i)\b<escaped words joined by \s+>\b`.
fn keyword_matcher(keyword: &str) -> Result<Regex> {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?i)\b{}\b", body))
        .with_context(|| format!("Failed to compile keyword matcher for '{}'", keyword))
}
