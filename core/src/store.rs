use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::noise::NoiseWords;
use crate::Postings;
use std::collections::HashMap;

/// Persistence capability the core indexes and searches through.
///
/// Reads take `&self` and writes `&mut self`; there is no locking inside a
/// store, so concurrent writers must be serialized by the owner.
pub trait Store {
    /// Stores or overwrites the full text of `name`.
    fn save_document(&mut self, name: &str, content: &str) -> Result<()>;

    /// Fails with [`Error::NotFound`] if `name` was never saved.
    fn load_document(&self, name: &str) -> Result<String>;

    /// Replaces the postings of `word`. Empty postings remove the word.
    fn upsert_posting(&mut self, word: &str, postings: Postings) -> Result<()>;

    /// Postings for each requested word that is indexed. Unknown words are absent.
    fn get_postings(&self, words: &[String]) -> Result<InvertedIndex>;

    fn list_vocabulary(&self) -> Result<Vec<String>>;

    fn register_noise_word(&mut self, word: &str) -> Result<()>;

    fn list_noise_words(&self) -> Result<Vec<String>>;

    /// Drops documents, postings and noise words.
    fn clear(&mut self) -> Result<()>;

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn save_document(&mut self, name: &str, content: &str) -> Result<()> {
        self.as_mut().save_document(name, content)
    }

    fn load_document(&self, name: &str) -> Result<String> {
        self.as_ref().load_document(name)
    }

    fn upsert_posting(&mut self, word: &str, postings: Postings) -> Result<()> {
        self.as_mut().upsert_posting(word, postings)
    }

    fn get_postings(&self, words: &[String]) -> Result<InvertedIndex> {
        self.as_ref().get_postings(words)
    }

    fn list_vocabulary(&self) -> Result<Vec<String>> {
        self.as_ref().list_vocabulary()
    }

    fn register_noise_word(&mut self, word: &str) -> Result<()> {
        self.as_mut().register_noise_word(word)
    }

    fn list_noise_words(&self) -> Result<Vec<String>> {
        self.as_ref().list_noise_words()
    }

    fn clear(&mut self) -> Result<()> {
        self.as_mut().clear()
    }

    fn flush(&mut self) -> Result<()> {
        self.as_mut().flush()
    }
}

/// In-process backend. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
    index: InvertedIndex,
    noise: NoiseWords,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn noise_words(&self) -> &NoiseWords { &self.noise }

    pub fn num_docs(&self) -> usize { self.documents.len() }
}

impl Store for MemoryStore {
    fn save_document(&mut self, name: &str, content: &str) -> Result<()> {
        self.documents.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn load_document(&self, name: &str) -> Result<String> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn upsert_posting(&mut self, word: &str, postings: Postings) -> Result<()> {
        self.index.set_postings(word, postings);
        Ok(())
    }

    fn get_postings(&self, words: &[String]) -> Result<InvertedIndex> {
        Ok(words
            .iter()
            .filter_map(|w| self.index.postings(w).map(|p| (w.clone(), p.clone())))
            .collect())
    }

    fn list_vocabulary(&self) -> Result<Vec<String>> {
        Ok(self.index.vocabulary().map(str::to_string).collect())
    }

    fn register_noise_word(&mut self, word: &str) -> Result<()> {
        self.noise.insert(word);
        Ok(())
    }

    fn list_noise_words(&self) -> Result<Vec<String>> {
        Ok(self.noise.iter().map(str::to_string).collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.documents.clear();
        self.index.clear();
        self.noise.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence;

    #[test]
    fn documents_overwrite_and_miss() {
        let mut store = MemoryStore::new();
        store.save_document("d1", "old").unwrap();
        store.save_document("d1", "new").unwrap();
        assert_eq!(store.load_document("d1").unwrap(), "new");
        assert!(store.load_document("d2").unwrap_err().is_not_found());
        assert_eq!(store.num_docs(), 1);
    }

    #[test]
    fn get_postings_skips_unknown_words() {
        let mut store = MemoryStore::new();
        let mut postings = Postings::new();
        postings.insert("d1".into(), Occurrence::new("cat", 1));
        store.upsert_posting("cat", postings).unwrap();

        let found = store.get_postings(&["cat".into(), "dog".into()]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.postings("cat").is_some());
        assert_eq!(store.list_vocabulary().unwrap(), vec!["cat"]);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = MemoryStore::new();
        store.save_document("d1", "x").unwrap();
        store.register_noise_word("the").unwrap();
        store.clear().unwrap();
        assert!(store.list_noise_words().unwrap().is_empty());
        assert!(store.load_document("d1").is_err());
    }
}
