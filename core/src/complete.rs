use crate::error::Result;
use crate::store::Store;
use crate::tokenizer::normalize;

/// Normalized form of the last whitespace-separated token of `text`.
///
/// `None` when there is nothing to complete: empty text, a lone space, a
/// trailing separator, or a last token with no letters.
pub fn prefix(text: &str) -> Option<String> {
    if text.is_empty() || text == " " {
        return None;
    }
    let last = text.split(char::is_whitespace).last().unwrap_or_default();
    let prefix = normalize(last);
    (!prefix.is_empty()).then_some(prefix)
}

/// Sorted vocabulary words starting with the normalized last word of `text`.
pub fn complete<S: Store + ?Sized>(store: &S, text: &str) -> Result<Vec<String>> {
    match prefix(text) {
        Some(head) => Ok(matching(&head, store.list_vocabulary()?)),
        None => Ok(Vec::new()),
    }
}

pub fn matching<I>(prefix: &str, vocabulary: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut words: Vec<String> = vocabulary.into_iter().filter(|word| word.starts_with(prefix)).collect();
    words.sort_unstable();
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_uses_last_token() {
        assert_eq!(prefix("the quick Bro").as_deref(), Some("bro"));
        assert_eq!(prefix("Cat's").as_deref(), Some("cat"));
    }

    #[test]
    fn nothing_to_complete() {
        assert_eq!(prefix(""), None);
        assert_eq!(prefix(" "), None);
        assert_eq!(prefix("cat "), None);
        assert_eq!(prefix("cat 42"), None);
    }

    #[test]
    fn matching_is_sorted() {
        let vocab = ["dog", "cat", "car", "scar"].map(String::from);
        assert_eq!(matching("ca", vocab), vec!["car", "cat"]);
    }
}
