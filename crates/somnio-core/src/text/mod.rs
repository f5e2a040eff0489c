//! Text processing utilities for keyword extraction

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Maximum number of keywords returned by [`extract_keywords`]
pub const MAX_KEYWORDS: usize = 20;

/// Tokens of this many characters or fewer are discarded
const MIN_TOKEN_CHARS: usize = 2;

/// Common English function words filtered out before counting
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
            "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
            "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
            "what", "which", "who", "whom", "this", "that", "these", "those", "am", "is", "are",
            "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does",
            "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as", "until",
            "while", "of", "at", "by", "for", "with", "about", "against", "between", "into",
            "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
            "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
        ]
        .iter()
        .copied()
        .collect()
    })
}

/// ASCII word characters and whitespace survive; everything else becomes a separator
fn is_word_or_space(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace()
}

/// Whether `word` is in the stop-word list
pub fn is_stop_word(word: &str) -> bool {
    get_stop_words().contains(word)
}

/// Lowercase, strip punctuation and split into tokens, dropping short tokens and stop words
fn significant_tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_or_space(c) { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .filter(|token| !is_stop_word(token))
        .map(|token| token.to_string())
        .collect()
}

/// Extract up to [`MAX_KEYWORDS`] distinct keywords ranked by frequency
///
/// Ties keep the order in which the words first appear in `text`. Numeric
/// tokens are not hoisted or sorted among themselves: `"zebra 2024 apple 101"`
/// yields `zebra, 2024, apple, 101`.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let tokens = significant_tokens(text);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for token in &tokens {
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(token.as_str());
        }
        *count += 1;
    }

    // Stable sort keeps first-seen order among equal frequencies
    first_seen.sort_by(|a, b| counts[b].cmp(&counts[a]));
    first_seen
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|word| word.to_string())
        .collect()
}
