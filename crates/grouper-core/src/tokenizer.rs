use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{COMPASS_WORDS, STOP_WORDS};

static NON_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.]").unwrap());
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:\.\d+)?\b|\b\w+\b").unwrap());
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap());

/// Tokenize normalized text into lowercase words and numbers.
/// Decimals stay whole ("2.5"), other punctuation is dropped, and the
/// locality stop words are removed. Alias markers are stripped with the
/// rest of the punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned = NON_TOKEN.replace_all(text, "").to_lowercase();
    TOKEN
        .find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Tokens of a single whitespace-delimited word, stop words kept.
/// Uses the same boundaries as [`tokenize`], so `north-northeast` is the
/// one token `northnortheast`.
pub fn word_tokens(word: &str) -> Vec<String> {
    let cleaned = NON_TOKEN.replace_all(word, "").to_lowercase();
    TOKEN
        .find_iter(&cleaned)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// An integer or decimal, e.g. "5" or "2.5".
pub fn is_numeric_token(token: &str) -> bool {
    NUMERIC.is_match(token)
}

pub fn is_compass_token(token: &str) -> bool {
    COMPASS_WORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenize() {
        let tokens = tokenize("5 miles south of norman oklahoma");
        assert_eq!(tokens, vec!["5", "miles", "south", "norman"]);
    }

    #[test]
    fn test_decimals_kept_whole() {
        let tokens = tokenize("2.5 miles east");
        assert_eq!(tokens, vec!["2.5", "miles", "east"]);
    }

    #[test]
    fn test_punctuation_deleted_not_split() {
        // hyphenated compound directions fuse into one token
        let tokens = tokenize("north-northeast of ada");
        assert_eq!(tokens, vec!["northnortheast", "ada"]);
    }

    #[test]
    fn test_word_tokens_match_tokenize_boundaries() {
        assert_eq!(word_tokens("North-Northeast"), vec!["northnortheast"]);
        assert_eq!(word_tokens("*norman"), vec!["norman"]);
        assert_eq!(word_tokens("of"), vec!["of"]);
    }

    #[test]
    fn test_alias_marker_stripped() {
        let tokens = tokenize("*norman lake");
        assert_eq!(tokens, vec!["norman", "lake"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n  ").is_empty());
    }

    #[test]
    fn test_stop_words_removed() {
        let tokens = tokenize("the sandy bank x along the river");
        assert_eq!(tokens, vec!["river"]);
    }

    #[test]
    fn test_no_stemming() {
        let tokens = tokenize("springs spring");
        assert_eq!(tokens, vec!["springs", "spring"]);
    }

    #[test]
    fn test_token_classes() {
        assert!(is_numeric_token("5"));
        assert!(is_numeric_token("2.5"));
        assert!(!is_numeric_token("5th"));
        assert!(!is_numeric_token("t5n"));
        assert!(is_compass_token("southwest"));
        assert!(!is_compass_token("northnortheast"));
    }
}
