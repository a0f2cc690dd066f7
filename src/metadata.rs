//! Best-effort extraction of the leading `metadata:` block.
//!
//! Interview files open with a declaration block such as:
//!
//! ```yaml
//! metadata:
//!   title: Ask for a name
//!   short title: Name
//!   documentation: "https://example.org/docs/fields.html#name"
//!   example start: 2
//!   example end: 3
//! ```
//!
//! The block is located once, then each field is matched by its own pattern
//! so a missing or malformed field never hides the others. Nothing here is
//! an error: no block means an empty [`FileMetadata`].

use regex::Regex;
use std::sync::OnceLock;

use crate::models::FileMetadata;

struct Patterns {
    block: Regex,
    title: Regex,
    short_title: Regex,
    documentation: Regex,
    example_start: Regex,
    example_end: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let field = |name: &str| {
            Regex::new(&format!(r"(?m)^[ \t]+{}:[ \t]*(\S.*?)[ \t]*\r?$", name))
                .expect("static metadata pattern")
        };
        let marker = |name: &str| {
            Regex::new(&format!(r"(?m)^[ \t]+{}:[ \t]*(\d+)[ \t]*\r?$", name))
                .expect("static metadata pattern")
        };
        Patterns {
            block: Regex::new(r"(?m)^metadata:[ \t]*\r?\n((?:[ \t]+.*\n?)+)")
                .expect("static metadata pattern"),
            title: field("title"),
            short_title: field(r"short[ \t]+title"),
            documentation: field("documentation"),
            example_start: marker(r"example[ \t]+start"),
            example_end: marker(r"example[ \t]+end"),
        }
    })
}

/// Extract metadata fields from raw file content.
pub fn extract_metadata(content: &str) -> FileMetadata {
    let p = patterns();

    let Some(block) = p.block.captures(content).and_then(|c| c.get(1)) else {
        return FileMetadata::default();
    };
    let block = block.as_str();

    FileMetadata {
        title: capture_text(&p.title, block),
        short_title: capture_text(&p.short_title, block),
        documentation: capture_text(&p.documentation, block),
        example_start: capture_number(&p.example_start, block),
        example_end: capture_number(&p.example_end, block),
    }
}

fn capture_text(re: &Regex, block: &str) -> Option<String> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .map(|m| unquote(m.as_str()).to_string())
}

fn capture_number(re: &Regex, block: &str) -> Option<u32> {
    re.captures(block)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
