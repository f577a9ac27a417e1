use crate::tokenizer::tokenize;
use std::collections::HashSet;

/// Words excluded from indexing.
///
/// Entries are stored verbatim and matched exactly; callers look up the
/// normalized form of a token.
#[derive(Debug, Default, Clone)]
pub struct NoiseWords {
    words: HashSet<String>,
}

impl NoiseWords {
    pub fn new() -> Self { Self::default() }

    /// Registers every whitespace-separated token of `text`. Returns how many were new.
    pub fn add_text(&mut self, text: &str) -> usize {
        tokenize(text).filter(|token| self.insert(token)).count()
    }

    pub fn insert(&mut self, word: &str) -> bool {
        if word.is_empty() || self.words.contains(word) {
            return false;
        }
        self.words.insert(word.to_string())
    }

    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn clear(&mut self) { self.words.clear() }
}

impl<S: Into<String>> FromIterator<S> for NoiseWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let words = iter.into_iter().map(Into::into).filter(|w: &String| !w.is_empty()).collect();
        Self { words }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_text_is_idempotent() {
        let mut noise = NoiseWords::new();
        assert_eq!(noise.add_text("the a  an\nthe"), 3);
        assert_eq!(noise.add_text("the a"), 0);
        assert_eq!(noise.len(), 3);
    }

    #[test]
    fn membership_is_exact() {
        let mut noise = NoiseWords::new();
        noise.add_text("The");
        assert!(noise.contains("The"));
        assert!(!noise.contains("the"));
    }
}
