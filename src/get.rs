//! File retrieval commands.
//!
//! Prints an indexed file looked up by relative path, by example name, or by
//! keyword. Used by `cite get`, `cite example` and `cite keyword`.

use anyhow::{bail, Result};

use crate::index::CorpusIndex;
use crate::models::IndexedFile;

/// CLI entry point for `cite get <path>`.
pub fn run_get(index: &CorpusIndex, relative_path: &str) -> Result<()> {
    match index.get_file(relative_path) {
        Some(file) => {
            print_file(file);
            Ok(())
        }
        None => bail!("file not found: {}", relative_path),
    }
}

/// CLI entry point for `cite example <name>`.
pub fn run_example(index: &CorpusIndex, name: &str) -> Result<()> {
    match index.get_example_by_name(name) {
        Some(file) => {
            print_file(file);
            Ok(())
        }
        None => bail!("example not found: {}", name),
    }
}

/// CLI entry point for `cite keyword <term>`.
pub fn run_keyword(index: &CorpusIndex, keyword: &str) -> Result<()> {
    let files = index.files_with_keyword(keyword);
    if files.is_empty() {
        println!("No files use '{}'.", keyword);
        return Ok(());
    }

    println!("{:<60} {:<10} TITLE", "PATH", "CLASS");
    for file in files {
        println!(
            "{:<60} {:<10} {}",
            file.relative_path,
            file.classification,
            file.metadata.title.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn print_file(file: &IndexedFile) {
    let meta = &file.metadata;

    println!("--- File ---");
    println!("path:           {}", file.relative_path);
    println!("absolute:       {}", file.path.display());
    println!("classification: {}", file.classification);
    println!("lines:          {}", file.line_count());
    println!(
        "title:          {}",
        meta.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(ref short) = meta.short_title {
        println!("short title:    {}", short);
    }
    if let Some(ref doc) = meta.documentation {
        println!("documentation:  {}", doc);
    }
    if let (Some(start), Some(end)) = (meta.example_start, meta.example_end) {
        println!("example range:  {}-{}", start, end);
    }
    println!();

    println!("--- Content ---");
    for (i, line) in file.lines.iter().enumerate() {
        println!("{:>5} | {}", i + 1, line);
    }
}
