//! Accumulator for accepted titles.

use rustc_hash::FxHashSet;

/// Uniqueness-preserving title accumulator with a single writer: the
/// extraction loop. FxHash is fine here, the input is a trusted dump.
#[derive(Debug, Default)]
pub struct TitleSet {
    titles: FxHashSet<String>,
}

impl TitleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless already present; returns whether the title was new.
    pub fn offer(&mut self, title: String) -> bool {
        self.titles.insert(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Destructive handoff to the output sink; order is arbitrary.
    pub fn drain(self) -> Vec<String> {
        self.titles.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_dedupes() {
        let mut set = TitleSet::new();
        assert!(set.offer("слово".to_string()));
        assert!(!set.offer("слово".to_string()));
        assert_eq!(set.len(), 1);
        assert!(set.contains("слово"));
        assert!(!set.contains("слова"));
    }

    #[test]
    fn drain_hands_off_everything_once() {
        let mut set = TitleSet::new();
        set.offer("b".to_string());
        set.offer("a".to_string());
        set.offer("a".to_string());
        let mut titles = set.drain();
        titles.sort();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
