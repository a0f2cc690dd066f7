//! Filesystem ingestion.
//!
//! Walks each configured root, keeps files with an accepted extension, and
//! reads them into [`IndexedFile`]s tagged with the root's classification.
//! Only a missing corpus root is fatal; a missing sub-root or an unreadable
//! file is logged and skipped so a partial corpus can still be served.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::config::{CorpusConfig, RootConfig};
use crate::models::IndexedFile;

/// Directory names never descended into.
const SKIP_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// Ingest every configured root. Returns files in walk order.
pub fn ingest(config: &CorpusConfig) -> Result<Vec<IndexedFile>> {
    if !config.root.is_dir() {
        bail!("Corpus root does not exist: {}", config.root.display());
    }

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let extensions: Vec<String> = config
        .extensions
        .iter()
        .map(|e| format!(".{}", e.trim_start_matches('.').to_lowercase()))
        .collect();

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for root in &config.roots {
        let before = files.len();
        ingest_root(config, root, &extensions, &exclude_set, &mut seen, &mut files);
        log::info!(
            "Ingested {} {} file(s) from {}",
            files.len() - before,
            root.classification,
            config.resolve(root).display()
        );
    }

    Ok(files)
}

fn ingest_root(
    config: &CorpusConfig,
    root: &RootConfig,
    extensions: &[String],
    exclude_set: &GlobSet,
    seen: &mut HashSet<String>,
    files: &mut Vec<IndexedFile>,
) {
    let dir = config.resolve(root);
    if !dir.is_dir() {
        log::warn!(
            "Skipping {} root, directory does not exist: {}",
            root.classification,
            dir.display()
        );
        return;
    }

    let walker = WalkDir::new(&dir)
        .follow_links(config.follow_symlinks)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !SKIP_DIRS.contains(&name.as_ref())
                && !exclude_set.is_match(relative_path(e.path(), &config.root, &dir))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read entry under {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !has_accepted_extension(path, extensions) {
            continue;
        }

        let relative = relative_path(path, &config.root, &dir);
        if exclude_set.is_match(&relative) {
            continue;
        }

        if seen.contains(&relative) {
            log::warn!(
                "Skipping {}: already registered as {}",
                path.display(),
                relative
            );
            continue;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };

        let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        seen.insert(relative.clone());
        files.push(IndexedFile::new(
            absolute,
            relative,
            root.classification,
            content,
        ));
    }
}

fn has_accepted_extension(path: &Path, extensions: &[String]) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy().to_lowercase(),
        None => return false,
    };
    extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Path relative to the corpus root, falling back to the sub-root, with
/// `/` separators.
fn relative_path(path: &Path, corpus_root: &Path, dir: &Path) -> String {
    let relative = path
        .strip_prefix(corpus_root)
        .or_else(|_| path.strip_prefix(dir))
        .unwrap_or(path);

    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Classification;
    use std::fs;
    use tempfile::TempDir;

    fn corpus() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("examples/nested/deeper")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join("examples/.git")).unwrap();
        fs::write(root.join("examples/a.yml"), "question: A").unwrap();
        fs::write(root.join("examples/nested/deeper/b.YAML"), "question: B").unwrap();
        fs::write(root.join("examples/notes.txt"), "ignored").unwrap();
        fs::write(root.join("examples/.git/config.yml"), "ignored").unwrap();
        fs::write(root.join("docs/fields.md"), "# Fields").unwrap();
        tmp
    }

    #[test]
    fn test_ingest_filters_and_recurses() {
        let tmp = corpus();
        let config = CorpusConfig {
            root: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        let rels: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            rels,
            vec!["examples/a.yml", "examples/nested/deeper/b.YAML", "docs/fields.md"]
        );
        assert_eq!(files[0].classification, Classification::Example);
        assert_eq!(files[2].classification, Classification::Doc);
        assert!(files[0].path.is_absolute());
    }

    #[test]
    fn test_missing_corpus_root_is_fatal() {
        let config = CorpusConfig {
            root: "/definitely/not/here".into(),
            ..Default::default()
        };
        assert!(ingest(&config).is_err());
    }

    #[test]
    fn test_missing_sub_root_contributes_nothing() {
        let tmp = corpus();
        let config = CorpusConfig {
            root: tmp.path().to_path_buf(),
            roots: vec![
                RootConfig::new("templates", Classification::Template),
                RootConfig::new("docs", Classification::Doc),
            ],
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "docs/fields.md");
    }

    #[test]
    fn test_overlapping_roots_register_once() {
        let tmp = corpus();
        let config = CorpusConfig {
            root: tmp.path().to_path_buf(),
            roots: vec![
                RootConfig::new("docs", Classification::Doc),
                RootConfig::new(".", Classification::Other),
            ],
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        let docs: Vec<_> = files
            .iter()
            .filter(|f| f.relative_path == "docs/fields.md")
            .collect();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].classification, Classification::Doc);
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_exclude_globs() {
        let tmp = corpus();
        let config = CorpusConfig {
            root: tmp.path().to_path_buf(),
            exclude_globs: vec!["examples/nested/**".to_string()],
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        assert!(files.iter().all(|f| !f.relative_path.contains("nested")));
    }

    #[test]
    fn test_excluded_directories_are_pruned() {
        let tmp = corpus();
        let root = tmp.path();
        fs::create_dir_all(root.join("examples/node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("examples/drafts")).unwrap();
        fs::write(root.join("examples/node_modules/pkg/x.yml"), "question: X").unwrap();
        fs::write(root.join("examples/drafts/d.yml"), "question: D").unwrap();

        let config = CorpusConfig {
            root: root.to_path_buf(),
            exclude_globs: vec!["**/drafts".to_string()],
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        let rels: Vec<_> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(
            rels,
            vec!["examples/a.yml", "examples/nested/deeper/b.YAML", "docs/fields.md"]
        );
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let tmp = corpus();
        let root = tmp.path();
        fs::write(root.join("docs/broken.md"), [0xff, 0xfe, b'\n']).unwrap();

        let config = CorpusConfig {
            root: root.to_path_buf(),
            roots: vec![RootConfig::new("docs", Classification::Doc)],
            ..Default::default()
        };
        let files = ingest(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "docs/fields.md");
    }

    #[test]
    fn test_relative_path_outside_corpus_root() {
        let rel = relative_path(
            Path::new("/other/place/x.md"),
            Path::new("/corpus"),
            Path::new("/other/place"),
        );
        assert_eq!(rel, "x.md");
    }
}
