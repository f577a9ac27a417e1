use crate::error::Result;
use crate::indexer::{self, IndexStats, Reindex};
use crate::noise::NoiseWords;
use crate::store::Store;
use crate::tokenizer;
use crate::{complete, search, SearchResult};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinderOptions {
    pub reindex: Reindex,
}

/// Indexes documents into a [`Store`] and answers searches and completions from it.
///
/// The finder owns its store. `&mut self` methods must not run concurrently
/// with anything else on the same store; the `&self` queries may.
pub struct DocFinder<S> {
    store: S,
    options: FinderOptions,
}

impl<S: Store> DocFinder<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, FinderOptions::default())
    }

    pub fn with_options(store: S, options: FinderOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> FinderOptions { self.options }

    pub fn store(&self) -> &S { &self.store }

    pub fn into_store(self) -> S { self.store }

    /// Registers every whitespace-separated token of `text` as a noise word.
    /// Returns how many were not registered before.
    pub fn add_noise_words(&mut self, text: &str) -> Result<usize> {
        let mut known: NoiseWords = self.store.list_noise_words()?.into_iter().collect();
        let mut added = 0;
        for word in tokenizer::tokenize(text) {
            if known.insert(word) {
                self.store.register_noise_word(word)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Non-noise normalized words of `text`, empty ones dropped.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        let noise: NoiseWords = self.store.list_noise_words()?.into_iter().collect();
        Ok(tokenizer::words(text, &noise).filter(|w| !w.is_empty()).collect())
    }

    pub fn add_content(&mut self, name: &str, content: &str) -> Result<IndexStats> {
        match indexer::add_document(&mut self.store, name, content, self.options.reindex) {
            Ok(stats) => {
                info!(doc = name, words = stats.words, occurrences = stats.occurrences, "added document");
                Ok(stats)
            }
            Err(err) => {
                warn!(doc = name, error = %err, "indexing aborted; earlier postings were kept");
                Err(err)
            }
        }
    }

    pub fn doc_content(&self, name: &str) -> Result<String> {
        self.store.load_document(name)
    }

    /// Ranked results for already-split search terms.
    pub fn find<T: AsRef<str>>(&self, terms: &[T]) -> Result<Vec<SearchResult>> {
        search::find(&self.store, terms)
    }

    /// Splits and filters a free-text query before running [`DocFinder::find`].
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let terms = self.words(query)?;
        self.find(&terms)
    }

    pub fn complete(&self, text: &str) -> Result<Vec<String>> {
        complete::complete(&self.store, text)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        info!("cleared store");
        Ok(())
    }

    /// Flushes the store and gives up ownership of it.
    pub fn close(mut self) -> Result<()> {
        self.store.flush()
    }
}
