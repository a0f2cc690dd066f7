//! Line-scored, windowed full-text search.
//!
//! # Scoring
//!
//! The query is lowercased and split on whitespace. Every line of every
//! candidate file is scored independently. For each query term found in the
//! line (repeated terms count again):
//!
//! | Signal | Points |
//! |--------|--------|
//! | term is a substring of the line | +10 |
//! | line starts with `<term>:` (after indentation) | +20 |
//! | term matches on word boundaries | +5 |
//!
//! A hit line then gets a coverage bonus of `matched / terms × 10` and +15
//! for each term found in the file's metadata title.
//!
//! # Windowing and ranking
//!
//! 1. Each hit becomes a window of 2 lines before and 5 lines after.
//! 2. Hits are sorted by score and only the best hit per
//!    `(file, window_start / 10)` bucket is kept.
//! 3. Survivors are sorted by score (stable, so ties keep corpus order) and
//!    truncated to `max_results`.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::index::CorpusIndex;
use crate::models::{Classification, IndexedFile, SearchResult};

/// Upper bound on `max_results`.
pub const MAX_RESULTS_CAP: usize = 25;

const CONTEXT_BEFORE: usize = 2;
const CONTEXT_AFTER: usize = 5;
const DEDUP_BUCKET_LINES: usize = 10;

const TERM_SCORE: f64 = 10.0;
const FIELD_DECLARATION_BOOST: f64 = 20.0;
const WORD_BOUNDARY_BOOST: f64 = 5.0;
const COVERAGE_WEIGHT: f64 = 10.0;
const TITLE_BOOST: f64 = 15.0;

/// Which classifications a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Docs,
    Examples,
    DocsAndExamples,
    #[default]
    All,
}

impl Scope {
    pub fn includes(&self, classification: Classification) -> bool {
        match self {
            Scope::Docs => classification == Classification::Doc,
            Scope::Examples => classification == Classification::Example,
            Scope::DocsAndExamples => matches!(
                classification,
                Classification::Doc | Classification::Example
            ),
            Scope::All => true,
        }
    }
}

impl std::str::FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "docs" => Ok(Scope::Docs),
            "examples" => Ok(Scope::Examples),
            "docs_and_examples" => Ok(Scope::DocsAndExamples),
            "all" => Ok(Scope::All),
            other => anyhow::bail!(
                "Unknown scope: '{}'. Use docs, examples, docs_and_examples, or all.",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Clamped into `1..=MAX_RESULTS_CAP`.
    pub max_results: usize,
    pub scope: Scope,
    /// When non-empty, a file's relative path must match at least one glob.
    pub file_globs: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            scope: Scope::All,
            file_globs: Vec::new(),
        }
    }
}

/// Compiled glob patterns keyed by the literal glob string.
#[derive(Debug, Default)]
pub struct GlobCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl GlobCache {
    pub fn get(&self, glob: &str) -> Result<Regex> {
        let mut compiled = self
            .compiled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(re) = compiled.get(glob) {
            return Ok(re.clone());
        }
        let re = Regex::new(&glob_to_regex(glob))
            .with_context(|| format!("Invalid file glob: {}", glob))?;
        compiled.insert(glob.to_string(), re.clone());
        Ok(re)
    }

    pub fn len(&self) -> usize {
        self.compiled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `**` spans separators, `*` stays within one segment, `?` is any single
/// character. A leading `**/` also matches zero directories. Anchored.
pub fn glob_to_regex(glob: &str) -> String {
    let mut out = String::from("^");
    let chars: Vec<char> = glob.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    out.push('$');
    out
}

struct Hit<'a> {
    file: &'a IndexedFile,
    match_line: usize,
    line_start: usize,
    line_end: usize,
    score: f64,
}

/// Run a query against the index.
pub fn search(index: &CorpusIndex, query: &str, opts: &SearchOptions) -> Result<Vec<SearchResult>> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let max_results = opts.max_results.clamp(1, MAX_RESULTS_CAP);

    let globs = opts
        .file_globs
        .iter()
        .map(|g| index.glob_cache().get(g))
        .collect::<Result<Vec<_>>>()?;

    let word_matchers = terms
        .iter()
        .map(|t| Regex::new(&format!(r"\b{}\b", regex::escape(t))))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to compile query term matcher")?;

    let mut hits: Vec<Hit> = Vec::new();

    for file in index.all_files() {
        if !opts.scope.includes(file.classification) {
            continue;
        }
        if !globs.is_empty() && !globs.iter().any(|re| re.is_match(&file.relative_path)) {
            continue;
        }
        score_file(file, &terms, &word_matchers, &mut hits);
    }

    // Best hit per (file, bucket)
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut seen_buckets: HashSet<(&str, usize)> = HashSet::new();
    let mut deduped: Vec<Hit> = hits
        .into_iter()
        .filter(|h| {
            let file: &IndexedFile = h.file;
            seen_buckets.insert((file.relative_path.as_str(), h.line_start / DEDUP_BUCKET_LINES))
        })
        .collect();

    deduped.sort_by(|a, b| b.score.total_cmp(&a.score));
    deduped.truncate(max_results);

    Ok(deduped
        .into_iter()
        .map(|h| SearchResult {
            relative_path: h.file.relative_path.clone(),
            classification: h.file.classification,
            line_start: h.line_start,
            line_end: h.line_end,
            match_line: h.match_line,
            text: h.file.text_range(h.line_start, h.line_end),
            score: h.score,
        })
        .collect())
}

/// CLI entry point: run a query and print ranked windows.
pub fn run_search(index: &CorpusIndex, query: &str, opts: &SearchOptions) -> Result<()> {
    let results = search(index, query, opts)?;

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. [{:.2}] {}:{}-{} ({})",
            i + 1,
            result.score,
            result.relative_path,
            result.line_start,
            result.line_end,
            result.classification
        );
        for (offset, line) in result.text.lines().enumerate() {
            let line_no = result.line_start + offset;
            let marker = if line_no == result.match_line { ">" } else { " " };
            println!("  {}{:>5} | {}", marker, line_no, line);
        }
        println!();
    }

    Ok(())
}

fn score_file<'a>(
    file: &'a IndexedFile,
    terms: &[&str],
    word_matchers: &[Regex],
    hits: &mut Vec<Hit<'a>>,
) {
    let title_bonus = match &file.metadata.title {
        Some(title) => {
            let title = title.to_lowercase();
            terms.iter().filter(|t| title.contains(**t)).count() as f64 * TITLE_BOOST
        }
        None => 0.0,
    };

    let line_count = file.line_count();

    for (idx, line) in file.lines.iter().enumerate() {
        let lower = line.to_lowercase();
        let declaration = lower.trim_start();

        let mut score = 0.0;
        let mut matched = 0usize;

        for (term, word) in terms.iter().zip(word_matchers) {
            if !lower.contains(term) {
                continue;
            }
            matched += 1;
            score += TERM_SCORE;
            if declaration
                .strip_prefix(term)
                .is_some_and(|rest| rest.starts_with(':'))
            {
                score += FIELD_DECLARATION_BOOST;
            }
            if word.is_match(&lower) {
                score += WORD_BOUNDARY_BOOST;
            }
        }

        if matched == 0 {
            continue;
        }

        score += (matched as f64 / terms.len() as f64) * COVERAGE_WEIGHT;
        score += title_bonus;

        let line_no = idx + 1;
        hits.push(Hit {
            file,
            match_line: line_no,
            line_start: line_no.saturating_sub(CONTEXT_BEFORE).max(1),
            line_end: (line_no + CONTEXT_AFTER).min(line_count),
            score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_translation() {
        let re = |g: &str| Regex::new(&glob_to_regex(g)).unwrap();

        assert!(re("examples/*.yml").is_match("examples/a.yml"));
        assert!(!re("examples/*.yml").is_match("examples/sub/a.yml"));
        assert!(re("examples/**").is_match("examples/sub/deep/a.yml"));
        assert!(re("**/*.md").is_match("docs/a.md"));
        assert!(re("**/*.md").is_match("a.md"));
        assert!(re("docs/?.md").is_match("docs/a.md"));
        assert!(!re("docs/?.md").is_match("docs/ab.md"));
        // `.` is literal
        assert!(!re("*.yml").is_match("ayml"));
        assert!(!re("docs/*.md").is_match("xdocs/a.md"));
    }

    #[test]
    fn test_glob_wildcards_are_not_component_bound() {
        let re = |g: &str| Regex::new(&glob_to_regex(g)).unwrap();

        // `**` spans separators even inside a component
        assert!(re("examples/a**.yml").is_match("examples/a/b/c.yml"));
        // `?` is exactly one character of any kind
        assert!(re("docs?a.md").is_match("docs/a.md"));
        assert!(!re("docs?a.md").is_match("docs//a.md"));
        // bracket and brace characters are literal
        assert!(re("docs/[draft]{1}.md").is_match("docs/[draft]{1}.md"));
        assert!(!re("docs/[draft].md").is_match("docs/d.md"));
    }

    #[test]
    fn test_glob_cache_reuses_patterns() {
        let cache = GlobCache::default();
        cache.get("**/*.yml").unwrap();
        cache.get("**/*.yml").unwrap();
        cache.get("docs/*").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_scope_parsing_and_membership() {
        let scope: Scope = "docs_and_examples".parse().unwrap();
        assert!(scope.includes(Classification::Doc));
        assert!(scope.includes(Classification::Example));
        assert!(!scope.includes(Classification::Template));
        assert!(Scope::All.includes(Classification::Other));
        assert!("everything".parse::<Scope>().is_err());
    }
}
