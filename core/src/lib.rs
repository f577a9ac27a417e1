pub mod complete;
pub mod error;
pub mod finder;
pub mod index;
pub mod indexer;
pub mod noise;
pub mod persist;
pub mod search;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use error::{Error, Result};
pub use finder::{DocFinder, FinderOptions};
pub use indexer::{IndexStats, Reindex};
pub use index::InvertedIndex;
pub use noise::NoiseWords;
pub use persist::SledStore;
pub use store::{MemoryStore, Store};

/// Where and how often a word occurs in one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub count: u32,
    /// Full text of the first line the word was seen on. Never updated after insertion.
    pub line: String,
    /// 1-based number of that line, counting only non-blank lines.
    pub line_number: u32,
}

impl Occurrence {
    pub fn new(line: &str, line_number: u32) -> Self {
        Self { count: 1, line: line.to_string(), line_number }
    }
}

/// Occurrences of a single word keyed by document name.
pub type Postings = HashMap<String, Occurrence>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub score: u64,
    /// Representative lines, each terminated by `\n`, in source order.
    pub lines: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}\n{}", self.name, self.score, self.lines)
    }
}
