//! Plain word-list cleaners.
//!
//! Post-processing utilities for wordlists produced by the extractor: both
//! read a word per line, dedupe through a set, and write the sorted
//! survivors through the same sink the extractor uses.

use crate::output::write_wordlist;
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::io::{BufRead, Write};

/// Drop reflexive verb forms (suffix `ся`) whenever the non-reflexive base
/// verb is also present. Returns the number of words written.
pub fn clean_reflexive<W: Write>(input: impl BufRead, out: &mut W) -> Result<usize> {
    let mut words = FxHashSet::default();
    for line in input.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.insert(word.to_string());
        }
    }

    let kept: Vec<String> = words
        .iter()
        .filter(|w| match w.strip_suffix("ся") {
            Some(base) => !words.contains(base),
            None => true,
        })
        .cloned()
        .collect();

    let count = kept.len();
    write_wordlist(kept, out)?;
    Ok(count)
}

/// Keep only plausible dictionary words: printable, at least one letter,
/// nothing but letters and ASCII punctuation, and no `:` or `/` (those mark
/// Wiktionary service pages). Returns the number of words written.
pub fn clean_plaintext<W: Write>(input: impl BufRead, out: &mut W) -> Result<usize> {
    let mut words = FxHashSet::default();
    for line in input.lines() {
        let line = line?;
        let word = line.trim();
        if is_clean_word(word) {
            words.insert(word.to_string());
        }
    }

    let count = words.len();
    write_wordlist(words.into_iter().collect(), out)?;
    Ok(count)
}

fn is_clean_word(word: &str) -> bool {
    if word.is_empty() || word.contains('/') || word.contains(':') {
        return false;
    }
    let mut has_letters = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            has_letters = true;
        } else if ch.is_control() || !ch.is_ascii_punctuation() {
            return false;
        }
    }
    has_letters
}
