//! Wiktio: memory-efficient word extraction from Wiktionary XML dumps
//!
//! This crate streams a MediaWiki XML dump (optionally bz2-compressed) and
//! collects the titles of dictionary entries matching a set of filters:
//! main-namespace only, language section marker, part-of-speech marker, and
//! an optional free-form regex over revision text. Dumps routinely exceed
//! tens of gigabytes uncompressed, so the whole pipeline is built around one
//! constraint: memory use is bounded by document depth, never document size.
//!
//! # Architecture
//!
//! - **Streaming walk** -- quick-xml events are mirrored into a partial tree
//!   holding only the open-element chain plus the record currently parsing
//! - **Reclaim on advance** -- pulling the next record frees the previous
//!   record's subtree and any earlier siblings up the ancestor chain, so
//!   O(1) records are live at any moment
//! - **Fail-soft aborts** -- malformed or truncated markup ends the walk but
//!   preserves every title collected before the failure point
//! - **Fail-fast configuration** -- user regexes are compiled before any
//!   parsing begins
//!
//! # Key Modules
//!
//! - [`parser`] -- Streaming dump walker with BZ2 decompression
//! - [`tree`] -- Partial-tree arena with subtree reclamation
//! - [`filter`] -- Namespace/language/POS/regex predicates
//! - [`extract`] -- The walk loop feeding accepted titles into a set
//! - [`titles`] -- Uniqueness-preserving title accumulator
//! - [`output`] -- Sorted, newline-terminated wordlist writer
//! - [`clean`] -- Post-processing wordlist cleaners
//! - [`models`] -- Record state and walk termination types
//! - [`config`] -- Constants
//!
//! # Example Usage
//!
//! ```bash
//! # All Russian nouns from a ru-wiktionary dump
//! wiktio extract -i ruwiktionary-latest-pages-articles.xml.bz2 -o nouns.txt -l ru -p сущ
//!
//! # Drop reflexive doublets from the result
//! wiktio clean-reflexive nouns.txt nouns-clean.txt
//! ```

pub mod clean;
pub mod config;
pub mod extract;
pub mod filter;
pub mod models;
pub mod output;
pub mod parser;
pub mod titles;
pub mod tree;
