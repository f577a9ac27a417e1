use crate::error::Result;
use crate::index::InvertedIndex;
use crate::store::Store;
use crate::tokenizer::normalize;
use crate::{Postings, SearchResult};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Scores documents against `terms`.
///
/// A single term is only lowercased before lookup. Several terms are
/// normalized, de-duplicated, and matched as a union: a document qualifies
/// if it contains any of them. Unknown or empty terms yield no results.
pub fn find<S: Store + ?Sized, T: AsRef<str>>(store: &S, terms: &[T]) -> Result<Vec<SearchResult>> {
    match terms {
        [] => Ok(Vec::new()),
        [term] => {
            let key = term.as_ref().to_lowercase();
            if key.is_empty() {
                return Ok(Vec::new());
            }
            let found = store.get_postings(std::slice::from_ref(&key))?;
            Ok(found.postings(&key).map(single_term).unwrap_or_default())
        }
        _ => {
            let keys: BTreeSet<String> = terms
                .iter()
                .map(|t| normalize(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect();
            let keys: Vec<String> = keys.into_iter().collect();
            let found = store.get_postings(&keys)?;
            Ok(multi_term(&keys, &found))
        }
    }
}

/// One result per document: the occurrence count and its first line.
pub fn single_term(postings: &Postings) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = postings
        .iter()
        .map(|(name, occ)| SearchResult {
            name: name.clone(),
            score: u64::from(occ.count),
            lines: format!("{}\n", occ.line),
        })
        .collect();
    rank(&mut results);
    results
}

struct Hit<'a> {
    count: u32,
    line: &'a str,
    line_number: u32,
}

/// Sums counts per document over every term it contains. Each document's
/// lines come out in source order, a line matching several terms only once.
pub fn multi_term(terms: &[String], index: &InvertedIndex) -> Vec<SearchResult> {
    let mut by_doc: HashMap<&str, Vec<Hit<'_>>> = HashMap::new();
    for term in terms {
        let Some(postings) = index.postings(term) else { continue };
        for (name, occ) in postings {
            by_doc.entry(name.as_str()).or_default().push(Hit {
                count: occ.count,
                line: &occ.line,
                line_number: occ.line_number,
            });
        }
    }

    let mut results: Vec<SearchResult> = by_doc
        .into_iter()
        .map(|(name, mut hits)| {
            hits.sort_by_key(|hit| hit.line_number);
            let mut seen = HashSet::new();
            let mut lines = String::new();
            for hit in hits.iter().filter(|hit| seen.insert(hit.line)) {
                lines.push_str(hit.line);
                lines.push('\n');
            }
            SearchResult {
                name: name.to_string(),
                score: hits.iter().map(|hit| u64::from(hit.count)).sum(),
                lines,
            }
        })
        .collect();
    rank(&mut results);
    results
}

/// Score descending, then name ascending by byte order.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(compare_results);
}

pub fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence;

    fn result(name: &str, score: u64) -> SearchResult {
        SearchResult { name: name.into(), score, lines: String::new() }
    }

    #[test]
    fn rank_breaks_ties_by_name() {
        let mut results = vec![result("b", 1), result("a", 1), result("B", 1), result("c", 5)];
        rank(&mut results);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["c", "B", "a", "b"]);
    }

    #[test]
    fn shared_line_is_listed_once() {
        let mut index = InvertedIndex::new();
        index.record("cat", "d1", "cat and dog", 1);
        index.record("dog", "d1", "cat and dog", 1);
        index.record("fish", "d1", "a fish", 2);
        index.record("fish", "d1", "fish again", 3);
        let terms = vec!["fish".to_string(), "dog".to_string(), "cat".to_string()];
        let results = multi_term(&terms, &index);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 4);
        assert_eq!(results[0].lines, "cat and dog\na fish\n");
    }

    #[test]
    fn lines_from_earlier_adds_are_kept() {
        let mut index = InvertedIndex::new();
        index.record("apple", "d1", "apple", 1);
        index.record("banana", "d1", "banana", 1);
        index.record("cherry", "d1", "apple", 2);
        let terms = vec!["apple".to_string(), "banana".to_string(), "cherry".to_string()];
        let results = multi_term(&terms, &index);
        assert_eq!(results[0].score, 3);
        assert_eq!(results[0].lines.matches("apple\n").count(), 1);
        assert!(results[0].lines.contains("banana\n"));
    }

    #[test]
    fn single_term_appends_newline() {
        let mut postings = Postings::new();
        postings.insert("d1".into(), Occurrence { count: 2, line: "hello hello".into(), line_number: 1 });
        let results = single_term(&postings);
        assert_eq!(results, vec![SearchResult { name: "d1".into(), score: 2, lines: "hello hello\n".into() }]);
    }
}
