//! Record filtering: namespace, language marker, part-of-speech, free regex.
//!
//! All patterns are compiled up front in [`TitleFilter::new`], so a bad
//! user-supplied regex fails before any parsing starts instead of being
//! silently treated as match-all or match-nothing.

use crate::models::RecordState;
use anyhow::{Context, Result};
use regex::Regex;

/// Search pattern for a part-of-speech marker, e.g. `\{\{сущ.ru`.
///
/// Markers in ru-wiktionary revision text look like `{{сущ ru` or `{{сущ-ru`,
/// so the separator between the POS token and the language code is a
/// match-any-character wildcard, not an escaped literal. This is wider than
/// strictly needed (it also matches e.g. `{{сущXru`) but is kept as-is for
/// compatibility with the established extractor behavior.
pub fn pos_search_pattern(pos: &str, lang: &str) -> String {
    format!(r"\{{\{{{}.{}", pos, lang)
}

/// Literal language-section marker, e.g. `= {{-ru-}} =`.
fn lang_section_marker(lang: &str) -> String {
    format!("= {{{{-{}-}}}} =", lang)
}

/// Compiled inclusion predicates for one extraction run.
///
/// Each filter left empty is always true; the verdict is the AND of all four
/// checks, evaluated against whatever record fields the walk materialized.
pub struct TitleFilter {
    lang: String,
    lang_marker: String,
    pos_pattern: Option<Regex>,
    extra_pattern: Option<Regex>,
}

impl TitleFilter {
    /// Build a filter from the raw CLI strings; empty strings disable the
    /// corresponding check. Fails fast on an uncompilable pattern.
    pub fn new(lang: &str, pos: &str, extra: &str) -> Result<Self> {
        let pos_pattern = if pos.is_empty() {
            None
        } else {
            let pattern = pos_search_pattern(pos, lang);
            Some(
                Regex::new(&pattern)
                    .with_context(|| format!("Invalid part-of-speech pattern: {}", pattern))?,
            )
        };
        let extra_pattern = if extra.is_empty() {
            None
        } else {
            Some(Regex::new(extra).with_context(|| format!("Invalid filter regex: {}", extra))?)
        };
        Ok(Self {
            lang: lang.to_string(),
            lang_marker: lang_section_marker(lang),
            pos_pattern,
            extra_pattern,
        })
    }

    /// Accept everything in the main namespace.
    pub fn unrestricted() -> Self {
        Self {
            lang: String::new(),
            lang_marker: String::new(),
            pos_pattern: None,
            extra_pattern: None,
        }
    }

    /// Pure verdict over the materialized record fields.
    pub fn accept(&self, record: &RecordState) -> bool {
        if !record.namespace_ids.iter().any(|v| v == "0") {
            return false;
        }
        if !self.lang.is_empty()
            && !record
                .revision_texts
                .iter()
                .any(|t| t.contains(&self.lang_marker))
        {
            return false;
        }
        if let Some(re) = &self.pos_pattern {
            if !record.revision_texts.iter().any(|t| re.is_match(t)) {
                return false;
            }
        }
        if let Some(re) = &self.extra_pattern {
            if !record.revision_texts.iter().any(|t| re.is_match(t)) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ns: &str, texts: &[&str]) -> RecordState {
        RecordState {
            title: Some("слово".to_string()),
            namespace_ids: vec![ns.to_string()],
            revision_texts: texts.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn ru_noun_accepted() {
        let filter = TitleFilter::new("ru", "сущ", "").unwrap();
        let rec = record("0", &["= {{-ru-}} =\n{{сущ ru |основа=слов}}"]);
        assert!(filter.accept(&rec));
    }

    #[test]
    fn wrong_language_rejected() {
        let filter = TitleFilter::new("en", "сущ", "").unwrap();
        let rec = record("0", &["= {{-ru-}} =\n{{сущ ru |основа=слов}}"]);
        assert!(!filter.accept(&rec));
    }

    #[test]
    fn non_main_namespace_always_rejected() {
        let filter = TitleFilter::unrestricted();
        let rec = record("1", &["= {{-ru-}} =\n{{сущ ru}}"]);
        assert!(!filter.accept(&rec));
    }

    #[test]
    fn empty_filters_accept_main_namespace() {
        let filter = TitleFilter::unrestricted();
        assert!(filter.accept(&record("0", &["anything at all"])));
        assert!(filter.accept(&record("0", &[])));
    }

    #[test]
    fn pos_separator_matches_space_and_hyphen() {
        let filter = TitleFilter::new("ru", "сущ", "").unwrap();
        assert!(filter.accept(&record("0", &["= {{-ru-}} =\n{{сущ ru"])));
        assert!(filter.accept(&record("0", &["= {{-ru-}} =\n{{сущ-ru"])));
        assert!(!filter.accept(&record("0", &["= {{-ru-}} =\n{{гл ru"])));
    }

    #[test]
    fn free_regex_filters_revision_text() {
        let filter = TitleFilter::new("", "", "основа=сло.").unwrap();
        assert!(filter.accept(&record("0", &["{{сущ ru |основа=слов}}"])));
        assert!(!filter.accept(&record("0", &["{{сущ ru |основа=др}}"])));
    }

    #[test]
    fn checks_span_multiple_revision_texts() {
        // Any revision text may satisfy each check independently.
        let filter = TitleFilter::new("ru", "сущ", "").unwrap();
        let rec = record("0", &["= {{-ru-}} =", "{{сущ ru"]);
        assert!(filter.accept(&rec));
    }

    #[test]
    fn invalid_free_regex_fails_fast() {
        assert!(TitleFilter::new("", "", "[unclosed").is_err());
    }

    #[test]
    fn pos_pattern_construction() {
        assert_eq!(pos_search_pattern("сущ", "ru"), r"\{\{сущ.ru");
    }
}
