use crate::noise::NoiseWords;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    static ref POSSESSIVE: Regex = Regex::new(r"'s$").expect("valid regex");
    static ref NON_ALPHA: Regex = Regex::new(r"[^a-z]").expect("valid regex");
}

/// Placeholder stemmer: drops one trailing `'s` and nothing else.
pub fn stem(word: &str) -> Cow<'_, str> {
    POSSESSIVE.replace(word, "")
}

/// Lowercase, stem, then strip everything outside `a-z`. May return an empty string.
pub fn normalize(token: &str) -> String {
    let lower = token.to_lowercase();
    let stemmed = stem(&lower);
    NON_ALPHA.replace_all(&stemmed, "").into_owned()
}

/// Maximal runs of non-whitespace.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Normalized words of `text` that are not noise words, in source order.
///
/// Each token is normalized before the noise lookup. Empty results are
/// yielded as-is; the index drops them.
pub fn words<'a>(text: &'a str, noise: &'a NoiseWords) -> impl Iterator<Item = String> + 'a {
    tokenize(text)
        .map(normalize)
        .filter(move |word| !noise.contains(word))
}
