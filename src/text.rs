//! Text normalization, tokenization and excerpt trimming.

use std::collections::HashSet;
use std::sync::OnceLock;

use unicode_normalization::UnicodeNormalization;

/// Tokens shorter than this are dropped.
pub const MIN_TOKEN_CHARS: usize = 3;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "ask", "at", "be", "been", "before", "begin", "being", "below", "between", "both",
    "but", "by", "can", "come", "could", "did", "do", "does", "doing", "down", "during", "each",
    "feel", "few", "find", "for", "from", "further", "get", "give", "go", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is",
    "it", "its", "just", "keep", "know", "leave", "let", "like", "make", "may", "me", "mean",
    "might", "more", "most", "must", "my", "need", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "out", "over", "own", "put", "same", "say",
    "see", "seem", "shall", "she", "should", "so", "some", "start", "such", "take", "tell",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "think",
    "this", "those", "through", "to", "too", "try", "under", "until", "up", "us", "use", "very",
    "want", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "work", "would", "you", "your", "yours",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Check if a lower-case word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

/// Normalize extracted text: NFC, ligatures expanded, control characters
/// removed, whitespace collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfc() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if c.is_control() {
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expansion)) => out.push_str(expansion),
            None => out.push(c),
        }
    }

    out
}

/// Lower-case words split on anything that is not alphanumeric, unfiltered.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Content tokens: lower-case, alphabetic, at least three characters, no stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    words(text)
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Trim `text` to at most `max_chars` characters without cutting a word.
///
/// Text within the bound is returned unchanged. Longer text is cut after the
/// last sentence terminator in the final 30% of the bound; failing that, at the
/// last word boundary. A single word longer than the bound is kept whole.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> &str {
    let limit = match text.char_indices().nth(max_chars) {
        Some((i, _)) => i,
        None => return text,
    };
    let window = &text[..limit];

    // A sentence cut must keep at least 70% of the bound.
    let floor = max_chars * 7 / 10;
    let mut sentence_end = None;
    for (n, (i, c)) in window.char_indices().enumerate() {
        if matches!(c, '.' | '!' | '?') && n + 1 >= floor {
            let end = i + c.len_utf8();
            if text[end..].chars().next().map_or(true, char::is_whitespace) {
                sentence_end = Some(end);
            }
        }
    }
    if let Some(end) = sentence_end {
        return text[..end].trim_end();
    }

    if text[limit..].starts_with(char::is_whitespace) {
        return window.trim_end();
    }
    if let Some(ws) = window.rfind(char::is_whitespace) {
        let cut = text[..ws].trim_end();
        if !cut.is_empty() {
            return cut;
        }
    }

    let start = text.len() - text.trim_start().len();
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| start + i);
    &text[..end]
}
