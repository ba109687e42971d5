//! Text folding shared by canonicalization and keyword matching.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip diacritics and lowercase: "Caffè" -> "caffe".
pub fn fold(s: &str) -> String {
    s.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Fold and reduce to space-separated words, padded on both sides so a
/// phrase can be located with a plain `contains(" phrase ")`.
pub fn word_padded(s: &str) -> String {
    let folded = fold(s);
    let words: Vec<&str> = folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" "))
}

/// True when `phrase` (one or more words) occurs as whole words in `padded`,
/// which must come from [`word_padded`].
pub fn contains_phrase(padded: &str, phrase: &str) -> bool {
    let needle = word_padded(phrase);
    if needle.trim().is_empty() {
        return false;
    }
    padded.contains(&needle)
}
