use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::store::Store;
use crate::Postings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const FORMAT_VERSION: u32 = 1;

const META_KEY: &[u8] = b"meta";
const DOCUMENTS_TREE: &str = "documents";
const POSTINGS_TREE: &str = "postings";
const NOISE_TREE: &str = "noise";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFile {
    pub version: u32,
    pub created_at: String,
}

/// Durable backend over an embedded sled database.
///
/// Documents are stored as UTF-8, postings as bincode, and noise words as
/// keys with empty values.
pub struct SledStore {
    root: Option<PathBuf>,
    db: sled::Db,
    documents: sled::Tree,
    postings: sled::Tree,
    noise: sled::Tree,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let db = sled::open(&root)?;
        let store = Self::from_db(Some(root), db)?;
        Ok(store)
    }

    /// Throwaway database removed on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(None, db)
    }

    fn from_db(root: Option<PathBuf>, db: sled::Db) -> Result<Self> {
        let meta = load_or_init_meta(&db)?;
        if meta.version != FORMAT_VERSION {
            return Err(Error::persistence(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                meta.version
            )));
        }
        debug!(root = ?root, created_at = %meta.created_at, "opened sled store");
        Ok(Self {
            root,
            documents: db.open_tree(DOCUMENTS_TREE)?,
            postings: db.open_tree(POSTINGS_TREE)?,
            noise: db.open_tree(NOISE_TREE)?,
            db,
        })
    }

    pub fn root(&self) -> Option<&Path> { self.root.as_deref() }

    pub fn meta(&self) -> Result<MetaFile> { load_or_init_meta(&self.db) }

    pub fn num_docs(&self) -> usize { self.documents.len() }
}

fn load_or_init_meta(db: &sled::Db) -> Result<MetaFile> {
    if let Some(bytes) = db.get(META_KEY)? {
        let meta: MetaFile = serde_json::from_slice(&bytes)?;
        return Ok(meta);
    }
    let meta = MetaFile {
        version: FORMAT_VERSION,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
    };
    db.insert(META_KEY, serde_json::to_vec_pretty(&meta)?)?;
    Ok(meta)
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::persistence(format!("invalid utf-8: {e}")))
}

impl Store for SledStore {
    fn save_document(&mut self, name: &str, content: &str) -> Result<()> {
        self.documents.insert(name.as_bytes(), content.as_bytes())?;
        Ok(())
    }

    fn load_document(&self, name: &str) -> Result<String> {
        match self.documents.get(name.as_bytes())? {
            Some(bytes) => decode_utf8(&bytes),
            None => Err(Error::NotFound(name.to_string())),
        }
    }

    fn upsert_posting(&mut self, word: &str, postings: Postings) -> Result<()> {
        if postings.is_empty() {
            self.postings.remove(word.as_bytes())?;
        } else {
            let bytes = bincode::serialize(&postings)?;
            self.postings.insert(word.as_bytes(), bytes)?;
        }
        Ok(())
    }

    fn get_postings(&self, words: &[String]) -> Result<InvertedIndex> {
        let mut found = InvertedIndex::new();
        for word in words {
            if let Some(bytes) = self.postings.get(word.as_bytes())? {
                let postings: Postings = bincode::deserialize(&bytes)?;
                found.set_postings(word, postings);
            }
        }
        Ok(found)
    }

    fn list_vocabulary(&self) -> Result<Vec<String>> {
        let mut words = Vec::with_capacity(self.postings.len());
        for key in self.postings.iter().keys() {
            words.push(decode_utf8(&key?)?);
        }
        Ok(words)
    }

    fn register_noise_word(&mut self, word: &str) -> Result<()> {
        if !word.is_empty() {
            self.noise.insert(word.as_bytes(), &[] as &[u8])?;
        }
        Ok(())
    }

    fn list_noise_words(&self) -> Result<Vec<String>> {
        let mut words = Vec::with_capacity(self.noise.len());
        for key in self.noise.iter().keys() {
            words.push(decode_utf8(&key?)?);
        }
        Ok(words)
    }

    fn clear(&mut self) -> Result<()> {
        self.documents.clear()?;
        self.postings.clear()?;
        self.noise.clear()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence;

    #[test]
    fn postings_round_trip_through_bincode() {
        let mut store = SledStore::temporary().unwrap();
        let mut postings = Postings::new();
        postings.insert("d1".into(), Occurrence { count: 3, line: "dog dog dog".into(), line_number: 1 });
        store.upsert_posting("dog", postings.clone()).unwrap();

        let found = store.get_postings(&["dog".into(), "cat".into()]).unwrap();
        assert_eq!(found.postings("dog"), Some(&postings));
        assert!(found.postings("cat").is_none());

        store.upsert_posting("dog", Postings::new()).unwrap();
        assert!(store.list_vocabulary().unwrap().is_empty());
    }

    #[test]
    fn missing_document_is_not_found() {
        let store = SledStore::temporary().unwrap();
        let err = store.load_document("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(ref name) if name == "missing"));
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = sled::open(dir.path()).unwrap();
            let meta = MetaFile { version: FORMAT_VERSION + 1, created_at: String::new() };
            db.insert(META_KEY, serde_json::to_vec(&meta).unwrap()).unwrap();
            db.flush().unwrap();
        }
        match SledStore::open(dir.path()) {
            Err(Error::Persistence(msg)) => assert!(msg.contains("format version")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("opened a database with an unknown format"),
        }
    }

    #[test]
    fn meta_written_on_first_open() {
        let store = SledStore::temporary().unwrap();
        assert_eq!(store.meta().unwrap().version, FORMAT_VERSION);
        assert!(store.root().is_none());
    }
}
