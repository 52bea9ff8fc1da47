//! Output sink: sorted, newline-terminated wordlist emission.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Sort lexicographically and write one title per line.
///
/// Input is expected to be already unique (it comes out of a set); the sink
/// only orders and emits.
pub fn write_wordlist<W: Write>(mut titles: Vec<String>, out: &mut W) -> Result<()> {
    titles.sort();
    for title in &titles {
        writeln!(out, "{}", title)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_wordlist_to_path(titles: Vec<String>, path: &str) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output file: {}", path))?;
    let mut writer = BufWriter::new(file);
    write_wordlist(titles, &mut writer)
}
