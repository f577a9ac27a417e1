use crate::{Occurrence, Postings};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalized word -> document name -> occurrence.
///
/// Empty words are never stored, and a word whose postings become empty is
/// dropped from the vocabulary.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    words: HashMap<String, Postings>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Counts one occurrence of `word` in `doc`. The first call for a
    /// `(word, doc)` pair fixes the line; later calls only bump the count.
    pub fn record(&mut self, word: &str, doc: &str, line: &str, line_number: u32) {
        if word.is_empty() {
            return;
        }
        let postings = self.words.entry(word.to_string()).or_default();
        match postings.get_mut(doc) {
            Some(occ) => occ.count += 1,
            None => {
                postings.insert(doc.to_string(), Occurrence::new(line, line_number));
            }
        }
    }

    /// Folds `occ` into the existing entry for `(word, doc)`: counts add up,
    /// an already recorded line is kept.
    pub fn merge(&mut self, word: &str, doc: &str, occ: Occurrence) {
        if word.is_empty() {
            return;
        }
        let postings = self.words.entry(word.to_string()).or_default();
        match postings.get_mut(doc) {
            Some(existing) => existing.count += occ.count,
            None => {
                postings.insert(doc.to_string(), occ);
            }
        }
    }

    pub fn postings(&self, word: &str) -> Option<&Postings> { self.words.get(word) }

    pub fn set_postings(&mut self, word: &str, postings: Postings) {
        if word.is_empty() || postings.is_empty() {
            self.words.remove(word);
        } else {
            self.words.insert(word.to_string(), postings);
        }
    }

    /// Detaches the postings of `word`, leaving it out of the vocabulary.
    pub fn take(&mut self, word: &str) -> Option<Postings> { self.words.remove(word) }

    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn clear(&mut self) { self.words.clear() }
}

impl IntoIterator for InvertedIndex {
    type Item = (String, Postings);
    type IntoIter = std::collections::hash_map::IntoIter<String, Postings>;

    fn into_iter(self) -> Self::IntoIter { self.words.into_iter() }
}

impl FromIterator<(String, Postings)> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = (String, Postings)>>(iter: I) -> Self {
        let mut index = InvertedIndex::new();
        for (word, postings) in iter {
            index.set_postings(&word, postings);
        }
        index
    }
}
