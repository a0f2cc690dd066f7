//! Index statistics overview.
//!
//! Gives a quick summary of what was ingested so an operator can confirm the
//! corpus roots were found before pointing tools at the index.

use anyhow::Result;

use crate::index::CorpusIndex;
use crate::models::Classification;

/// Run the stats command: print counts per classification and keyword
/// coverage.
pub fn run_stats(index: &CorpusIndex) -> Result<()> {
    let stats = index.stats();
    let total_bytes: usize = index.all_files().iter().map(|f| f.content.len()).sum();
    let total_lines: usize = index.all_files().iter().map(|f| f.line_count()).sum();

    println!("Corpus Index Stats");
    println!("==================");
    println!();
    println!("  Files:       {}", stats.total_files);
    println!("  Lines:       {}", total_lines);
    println!("  Size:        {}", format_bytes(total_bytes as u64));
    println!("  Keywords:    {}", stats.keyword_count);
    println!();
    println!("  {:<12} {:>6}", "CLASS", "FILES");
    println!("  {}", "-".repeat(19));
    for (class, count) in [
        (Classification::Example, stats.examples),
        (Classification::Doc, stats.docs),
        (Classification::Template, stats.templates),
        (Classification::Other, stats.other),
    ] {
        println!("  {:<12} {:>6}", class.as_str(), count);
    }

    let titled = index
        .all_examples()
        .iter()
        .filter(|f| f.metadata.title.is_some())
        .count();
    if stats.examples > 0 {
        println!();
        println!(
            "  Examples with a title: {} / {} ({}%)",
            titled,
            stats.examples,
            (titled * 100) / stats.examples
        );
    }
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
