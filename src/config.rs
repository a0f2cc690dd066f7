//! TOML configuration parsing.
//!
//! Every section has defaults, so an empty file (or no file at all, via
//! [`Config::for_root`]) yields a usable configuration rooted at a corpus
//! directory with the conventional `examples/`, `docs/` and `templates/`
//! sub-roots.

use anyhow::{bail, Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::Classification;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_roots")]
    pub roots: Vec<RootConfig>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            roots: default_roots(),
            extensions: default_extensions(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// A directory to walk and the classification every file under it receives.
///
/// Relative paths are resolved against [`CorpusConfig::root`].
#[derive(Debug, Deserialize, Clone)]
pub struct RootConfig {
    pub path: PathBuf,
    pub classification: Classification,
}

impl RootConfig {
    pub fn new(path: impl Into<PathBuf>, classification: Classification) -> Self {
        Self {
            path: path.into(),
            classification,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("./corpus")
}

fn default_roots() -> Vec<RootConfig> {
    vec![
        RootConfig::new("examples", Classification::Example),
        RootConfig::new("docs", Classification::Doc),
        RootConfig::new("templates", Classification::Template),
    ]
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string(), "md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KeywordsConfig {
    /// Replaces the built-in vocabulary when set.
    #[serde(default)]
    pub vocabulary: Option<Vec<String>>,
}

impl KeywordsConfig {
    pub fn resolved_vocabulary(&self) -> Vec<String> {
        match &self.vocabulary {
            Some(terms) => terms.clone(),
            None => crate::keywords::DEFAULT_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CorpusConfig {
    /// Resolve a sub-root against the corpus root.
    pub fn resolve(&self, root: &RootConfig) -> PathBuf {
        if root.path.is_absolute() {
            root.path.clone()
        } else {
            self.root.join(&root.path)
        }
    }
}

impl Config {
    /// Default configuration pointing at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.corpus.root = root.into();
        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.corpus.extensions.is_empty() {
            bail!("corpus.extensions must not be empty");
        }
        if self.corpus.extensions.iter().any(|e| e.trim().is_empty()) {
            bail!("corpus.extensions must not contain empty entries");
        }

        for pattern in &self.corpus.exclude_globs {
            Glob::new(pattern)
                .with_context(|| format!("Invalid corpus.exclude_globs entry: {}", pattern))?;
        }

        if !(1..=crate::search::MAX_RESULTS_CAP).contains(&self.search.default_limit) {
            bail!(
                "search.default_limit must be in [1, {}]",
                crate::search::MAX_RESULTS_CAP
            );
        }

        if let Some(vocab) = &self.keywords.vocabulary {
            if vocab.iter().any(|k| k.trim().is_empty()) {
                bail!("keywords.vocabulary must not contain empty entries");
            }
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
