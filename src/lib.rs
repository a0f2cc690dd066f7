//! # Corpus Cite
//!
//! A read-only corpus index with scored, windowed search and verifiable
//! citations.
//!
//! The index walks a tree of reference files (interview examples, docs,
//! templates), extracts each file's `metadata:` block, builds a keyword
//! index over a fixed vocabulary, and then serves line-level search and
//! exact `path:start-end` citations for the rest of the process lifetime.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │  Ingest  │──▶│ Metadata │──▶│  CorpusIndex │◀── Keyword index
//! │ walkdir  │   │  regex   │   │  (immutable) │
//! └──────────┘   └──────────┘   └──────┬───────┘
//!                                      │
//!                 ┌────────────────────┼────────────────┐
//!                 ▼                    ▼                ▼
//!           ┌──────────┐        ┌────────────┐    ┌──────────┐
//!           │  search  │        │  citation  │    │  tools   │
//!           └──────────┘        └────────────┘    └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cite --root ./corpus stats
//! cite --root ./corpus search "show if" --scope examples
//! cite --root ./corpus cite examples/ask-name.yml 3 8 --reason "field syntax"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`ingest`] | Filesystem walk and file loading |
//! | [`metadata`] | `metadata:` block extraction |
//! | [`keywords`] | Vocabulary keyword index |
//! | [`index`] | The immutable corpus index |
//! | [`search`] | Line scoring, windowing and ranking |
//! | [`citation`] | Verified citations |
//! | [`tools`] | JSON tool surface for external layers |

pub mod citation;
pub mod config;
pub mod get;
pub mod index;
pub mod ingest;
pub mod keywords;
pub mod metadata;
pub mod models;
pub mod search;
pub mod stats;
pub mod tools;
