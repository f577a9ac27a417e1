use crate::error::Result;
use crate::index::InvertedIndex;
use crate::noise::NoiseWords;
use crate::store::Store;
use crate::tokenizer::words;
use crate::Occurrence;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with postings left over from an earlier `add_document` of the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reindex {
    /// Keep them: counts grow on every re-add and first-seen lines stay.
    #[default]
    Accumulate,
    /// Remove the document from every posting before indexing it again.
    Replace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Non-blank lines seen.
    pub lines: u32,
    /// Distinct non-noise words written.
    pub words: usize,
    pub occurrences: u64,
    /// Words whose postings lost this document under [`Reindex::Replace`].
    pub replaced: usize,
}

/// Lines taking part in indexing with their 1-based numbers. Lines that are
/// empty or a single space are skipped and do not advance the count.
pub fn numbered_lines(content: &str) -> impl Iterator<Item = (u32, &str)> {
    content
        .split('\n')
        .filter(|line| !line.is_empty() && *line != " ")
        .zip(1..)
        .map(|(line, number)| (number, line))
}

/// Index of a single document, built without touching any store.
pub fn document_index(name: &str, content: &str, noise: &NoiseWords) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (number, line) in numbered_lines(content) {
        for word in words(line, noise) {
            index.record(&word, name, line, number);
        }
    }
    index
}

/// Saves `content` under `name` and folds its words into the stored postings.
///
/// Postings are written one word at a time in ascending word order. A store
/// failure aborts the remaining writes; words already written stay written.
pub fn add_document<S: Store + ?Sized>(
    store: &mut S,
    name: &str,
    content: &str,
    reindex: Reindex,
) -> Result<IndexStats> {
    store.save_document(name, content)?;
    let noise: NoiseWords = store.list_noise_words()?.into_iter().collect();

    let mut stats = IndexStats { lines: numbered_lines(content).count() as u32, ..Default::default() };
    if reindex == Reindex::Replace {
        stats.replaced = purge_document(store, name)?;
    }

    let mut entries: Vec<(String, Occurrence)> = document_index(name, content, &noise)
        .into_iter()
        .filter_map(|(word, mut postings)| postings.remove(name).map(|occ| (word, occ)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    stats.words = entries.len();
    stats.occurrences = entries.iter().map(|(_, occ)| u64::from(occ.count)).sum();

    let words: Vec<String> = entries.iter().map(|(word, _)| word.clone()).collect();
    let mut current = store.get_postings(&words)?;
    for (word, occ) in entries {
        current.merge(&word, name, occ);
        let postings = current.take(&word).unwrap_or_default();
        store.upsert_posting(&word, postings)?;
    }
    debug!(doc = name, lines = stats.lines, words = stats.words, "indexed document");
    Ok(stats)
}

fn purge_document<S: Store + ?Sized>(store: &mut S, name: &str) -> Result<usize> {
    let vocabulary = store.list_vocabulary()?;
    let mut purged = 0;
    for (word, mut postings) in store.get_postings(&vocabulary)? {
        if postings.remove(name).is_some() {
            store.upsert_posting(&word, postings)?;
            purged += 1;
        }
    }
    Ok(purged)
}
