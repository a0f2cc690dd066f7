//! The immutable corpus index.
//!
//! [`CorpusIndex::initialize`] runs the whole build (ingest, extract
//! metadata, build the keyword index) and returns an owned value with no
//! mutating methods. Share it behind an `Arc` and query it from any number
//! of threads.

use anyhow::Result;
use std::collections::HashMap;

use crate::citation::{self, CitationError};
use crate::config::Config;
use crate::ingest;
use crate::keywords::KeywordIndex;
use crate::models::{Citation, Classification, IndexStats, IndexedFile, SearchResult};
use crate::search::{self, GlobCache, SearchOptions};

pub struct CorpusIndex {
    files: Vec<IndexedFile>,
    by_path: HashMap<String, usize>,
    examples_by_name: HashMap<String, usize>,
    keywords: KeywordIndex,
    glob_cache: GlobCache,
}

impl CorpusIndex {
    /// Ingest the configured corpus and build the index.
    ///
    /// Fails when the corpus root is missing; callers must not serve queries
    /// in that case.
    pub fn initialize(config: &Config) -> Result<Self> {
        let files = ingest::ingest(&config.corpus)?;
        let index = Self::from_files(files, &config.keywords.resolved_vocabulary())?;

        let stats = index.stats();
        log::info!(
            "Indexed {} files ({} examples, {} docs, {} templates, {} other), {} keywords",
            stats.total_files,
            stats.examples,
            stats.docs,
            stats.templates,
            stats.other,
            stats.keyword_count
        );

        Ok(index)
    }

    /// Build an index from already-loaded files.
    ///
    /// Later files with an already-registered relative path are dropped.
    pub fn from_files(files: Vec<IndexedFile>, vocabulary: &[String]) -> Result<Self> {
        let mut unique = Vec::with_capacity(files.len());
        let mut by_path = HashMap::new();
        let mut examples_by_name = HashMap::new();

        for file in files {
            if by_path.contains_key(&file.relative_path) {
                log::warn!("Duplicate relative path ignored: {}", file.relative_path);
                continue;
            }
            let pos = unique.len();
            by_path.insert(file.relative_path.clone(), pos);

            if file.classification == Classification::Example {
                let name = file.base_name();
                if let Some(&existing) = examples_by_name.get(&name) {
                    let existing: &IndexedFile = &unique[existing];
                    log::debug!(
                        "Example name '{}' already maps to {}; {} not reachable by name",
                        name,
                        existing.relative_path,
                        file.relative_path
                    );
                } else {
                    examples_by_name.insert(name, pos);
                }
            }
            unique.push(file);
        }

        let keywords = KeywordIndex::build(vocabulary, &unique)?;

        Ok(Self {
            files: unique,
            by_path,
            examples_by_name,
            keywords,
            glob_cache: GlobCache::default(),
        })
    }

    pub fn search(&self, query: &str, opts: &SearchOptions) -> Result<Vec<SearchResult>> {
        search::search(self, query, opts)
    }

    pub fn get_file(&self, relative_path: &str) -> Option<&IndexedFile> {
        let key = relative_path.trim_start_matches("./");
        self.by_path.get(key).map(|&i| &self.files[i])
    }

    /// Example file by base name, extension stripped.
    pub fn get_example_by_name(&self, name: &str) -> Option<&IndexedFile> {
        self.examples_by_name.get(name).map(|&i| &self.files[i])
    }

    /// Files whose content contains `keyword` as a whole word, in corpus order.
    pub fn files_with_keyword(&self, keyword: &str) -> Vec<&IndexedFile> {
        let Some(paths) = self.keywords.paths(keyword) else {
            return Vec::new();
        };
        let mut positions: Vec<usize> = paths
            .iter()
            .filter_map(|p| self.by_path.get(p).copied())
            .collect();
        positions.sort_unstable();
        positions.into_iter().map(|i| &self.files[i]).collect()
    }

    pub fn all_examples(&self) -> Vec<&IndexedFile> {
        self.files
            .iter()
            .filter(|f| f.classification == Classification::Example)
            .collect()
    }

    pub fn all_files(&self) -> &[IndexedFile] {
        &self.files
    }

    pub fn create_citation(
        &self,
        relative_path: &str,
        line_start: usize,
        line_end: usize,
        reason: Option<&str>,
    ) -> Result<Citation, CitationError> {
        citation::create_citation(self, relative_path, line_start, line_end, reason)
    }

    pub fn keyword_index(&self) -> &KeywordIndex {
        &self.keywords
    }

    pub fn stats(&self) -> IndexStats {
        let count = |c: Classification| self.files.iter().filter(|f| f.classification == c).count();
        IndexStats {
            total_files: self.files.len(),
            examples: count(Classification::Example),
            docs: count(Classification::Doc),
            templates: count(Classification::Template),
            other: count(Classification::Other),
            keyword_count: self.keywords.len(),
        }
    }

    pub(crate) fn glob_cache(&self) -> &GlobCache {
        &self.glob_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(rel: &str, class: Classification, content: &str) -> IndexedFile {
        IndexedFile::new(
            PathBuf::from("/corpus").join(rel),
            rel.to_string(),
            class,
            content.to_string(),
        )
    }

    fn vocab() -> Vec<String> {
        vec!["question".to_string(), "show if".to_string()]
    }

    #[test]
    fn test_lookup_by_path_and_name() {
        let index = CorpusIndex::from_files(
            vec![
                file("examples/ask-name.yml", Classification::Example, "question: Name?"),
                file("docs/ask-name.md", Classification::Doc, "# Name"),
            ],
            &vocab(),
        )
        .unwrap();

        assert!(index.get_file("examples/ask-name.yml").is_some());
        assert!(index.get_file("./docs/ask-name.md").is_some());
        assert!(index.get_file("missing.yml").is_none());

        let example = index.get_example_by_name("ask-name").unwrap();
        assert_eq!(example.relative_path, "examples/ask-name.yml");
        assert!(index.get_example_by_name("ask-name.yml").is_none());
    }

    #[test]
    fn test_duplicate_relative_path_dropped() {
        let index = CorpusIndex::from_files(
            vec![
                file("a.yml", Classification::Example, "first"),
                file("a.yml", Classification::Doc, "second"),
            ],
            &vocab(),
        )
        .unwrap();
        assert_eq!(index.all_files().len(), 1);
        assert_eq!(index.get_file("a.yml").unwrap().content, "first");
    }

    #[test]
    fn test_files_with_keyword_in_corpus_order() {
        let index = CorpusIndex::from_files(
            vec![
                file("z.yml", Classification::Example, "question: z"),
                file("a.yml", Classification::Example, "fields:\n  - x: y\n    show if: z"),
                file("m.yml", Classification::Example, "QUESTION: m"),
            ],
            &vocab(),
        )
        .unwrap();
        let paths: Vec<_> = index
            .files_with_keyword("Question")
            .iter()
            .map(|f| f.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["z.yml", "m.yml"]);
        assert_eq!(index.files_with_keyword("show if").len(), 1);
        assert!(index.files_with_keyword("attachment").is_empty());
    }

    #[test]
    fn test_stats_partition_total() {
        let index = CorpusIndex::from_files(
            vec![
                file("e.yml", Classification::Example, "question: e"),
                file("d.md", Classification::Doc, "doc"),
                file("t.yml", Classification::Template, "template"),
                file("o.yml", Classification::Other, "other"),
            ],
            &vocab(),
        )
        .unwrap();
        let s = index.stats();
        assert_eq!(s.total_files, 4);
        assert_eq!(s.total_files, s.examples + s.docs + s.templates + s.other);
        assert_eq!(s.keyword_count, 1);
        assert_eq!(index.all_examples().len(), 1);
    }
}
