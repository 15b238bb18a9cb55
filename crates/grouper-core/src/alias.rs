//! Corpus vocabulary and fuzzy token aliasing.
//!
//! Rare spellings ("normon", df 1) that score close enough to a frequent
//! token ("norman", df 40) are rewritten to the frequent form before
//! vectorization, so typos stop splitting otherwise identical localities.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::config::AliasConfig;
use crate::constants::{ALIAS_MARKER, COMPASS_WORDS};
use crate::fuzzy::PairScore;
use crate::tokenizer::word_tokens;

static ORDINAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,4}(?:st|nd|rd|th)$").unwrap());
static TOWNSHIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[trs]\d{1,3}[nsew]?$").unwrap());

const DIRECTION_ADJECTIVES: [&str; 5] = ["northern", "southern", "eastern", "western", "central"];

const ORDINAL_WORDS: [&str; 20] = [
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
];

/// Structural words that carry meaning on their own and never become
/// alias keys. They may still be alias targets.
pub fn is_protected(token: &str) -> bool {
    COMPASS_WORDS.contains(&token)
        || is_compass_compound(token)
        || DIRECTION_ADJECTIVES.contains(&token)
        || ORDINAL_WORDS.contains(&token)
}

/// Two compass words fused by tokenization, e.g. `northnortheast` from
/// `north-northeast`.
fn is_compass_compound(token: &str) -> bool {
    COMPASS_WORDS.iter().any(|head| {
        token
            .strip_prefix(head)
            .is_some_and(|tail| COMPASS_WORDS.contains(&tail))
    })
}

/// Tokens that never take part in fuzzy comparison at all: numbers,
/// ordinal-suffixed numbers ("3rd") and township/range/section codes ("t5n").
pub fn is_excluded(token: &str) -> bool {
    let digits_only = !token.is_empty()
        && token.chars().any(|c| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == '.');
    digits_only || ORDINAL_NUMBER.is_match(token) || TOWNSHIP_CODE.is_match(token)
}

/// Document frequency per token, in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    df: Vec<usize>,
}

impl Vocabulary {
    /// Build from tokenized documents. A token counts once per document.
    pub fn build<D: AsRef<[String]>>(documents: &[D]) -> Self {
        let mut vocab = Self::default();
        for doc in documents {
            let mut seen = BTreeSet::new();
            for token in doc.as_ref() {
                let idx = match vocab.index.get(token) {
                    Some(&idx) => idx,
                    None => {
                        let idx = vocab.terms.len();
                        vocab.terms.push(token.clone());
                        vocab.index.insert(token.clone(), idx);
                        vocab.df.push(0);
                        idx
                    }
                };
                if seen.insert(idx) {
                    vocab.df[idx] += 1;
                }
            }
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Number of documents containing `token`; 0 when unknown.
    pub fn document_frequency(&self, token: &str) -> usize {
        self.index_of(token).map_or(0, |idx| self.df[idx])
    }

    pub fn df_at(&self, idx: usize) -> usize {
        self.df[idx]
    }
}

/// Variant token to canonical token.
///
/// A token is a key at most once, and no target is ever also a key.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AliasMap {
    #[serde(flatten)]
    aliases: BTreeMap<String, String>,
    #[serde(skip)]
    targets: BTreeSet<String>,
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `variant -> canonical`. Refused (returns false) when the
    /// insertion would create a chain or re-alias a variant.
    pub fn insert(&mut self, variant: &str, canonical: &str) -> bool {
        if variant == canonical
            || self.is_key(variant)
            || self.is_target(variant)
            || self.is_key(canonical)
        {
            return false;
        }
        self.aliases
            .insert(variant.to_string(), canonical.to_string());
        self.targets.insert(canonical.to_string());
        true
    }

    pub fn get(&self, variant: &str) -> Option<&str> {
        self.aliases.get(variant).map(String::as_str)
    }

    pub fn is_key(&self, token: &str) -> bool {
        self.aliases.contains_key(token)
    }

    pub fn is_target(&self, token: &str) -> bool {
        self.targets.contains(token)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Rewrite every key in `text` to its marked canonical form
    /// (`normon` -> `*norman`). Words are split into tokens on the
    /// tokenizer's boundaries, so a key fused from a hyphenated word is
    /// found too. Words holding no key are kept verbatim. Marked tokens are
    /// never keys, so reapplying is a no-op.
    pub fn apply(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                let tokens = word_tokens(word);
                if !tokens.iter().any(|t| self.is_key(t)) {
                    return word.to_string();
                }
                tokens
                    .iter()
                    .map(|token| match self.get(token) {
                        Some(canonical) => format!("{ALIAS_MARKER}{canonical}"),
                        None => token.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Discover aliases by comparing every unordered pair of vocabulary tokens
/// once, in first-appearance order.
pub fn build_aliases(vocab: &Vocabulary, config: &AliasConfig) -> AliasMap {
    let mut aliases = AliasMap::new();
    let terms = vocab.terms();
    let rare = |idx: usize| vocab.df_at(idx) < config.canonical_min_df;

    for i in 0..terms.len() {
        let token_i = &terms[i];
        if is_excluded(token_i) || aliases.is_key(token_i) {
            continue;
        }

        for j in (i + 1)..terms.len() {
            let token_j = &terms[j];
            if is_excluded(token_j) || aliases.is_key(token_j) {
                continue;
            }

            let Some(score) = PairScore::screen(token_i, token_j, config) else {
                continue;
            };
            if !score.is_match(config) {
                continue;
            }

            let (variant, canonical) = match (rare(i), rare(j)) {
                (true, false) => (i, j),
                (false, true) => (j, i),
                _ => continue,
            };
            let (variant, canonical) = (&terms[variant], &terms[canonical]);
            if is_protected(variant) {
                continue;
            }

            if aliases.insert(variant, canonical) {
                tracing::debug!(
                    "aliasing '{variant}' ({}) to '{canonical}' ({}) (score {:.2} >= {:.2})",
                    vocab.document_frequency(variant),
                    vocab.document_frequency(canonical),
                    score.ratio,
                    score.threshold
                );
            }
        }
    }

    aliases
}
