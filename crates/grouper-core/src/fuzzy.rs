//! Edit-distance similarity between vocabulary tokens.

use crate::config::AliasConfig;

/// Longest common subsequence length, over chars. Keeps two rows of the
/// DP table, sized to the shorter input.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];
    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[short.len()]
}

/// Insertion/deletion similarity on a 0-100 scale:
/// `100 * (1 - indel_distance / (len(a) + len(b)))`, which equals
/// `200 * lcs / (len(a) + len(b))`. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(&a, &b) as f64 / total as f64
}

/// Ratio threshold for a token pair, rising linearly from `base` at an
/// average length of 5 chars to `max` at 15.
pub fn dynamic_threshold(a: &str, b: &str, base: f64, max: f64) -> f64 {
    let avg = (a.chars().count() + b.chars().count()) as f64 / 2.0;
    if avg <= 5.0 {
        base
    } else if avg >= 15.0 {
        max
    } else {
        base + ((avg - 5.0) / 10.0) * (max - base)
    }
}

/// Shorter length over longer length; 1.0 for two empty tokens.
pub fn length_ratio(a: &str, b: &str) -> f64 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    let longer = la.max(lb);
    if longer == 0 {
        return 1.0;
    }
    la.min(lb) as f64 / longer as f64
}

/// Outcome of comparing one token pair, before frequencies are considered.
#[derive(Clone, Debug, PartialEq)]
pub struct PairScore {
    pub ratio: f64,
    pub threshold: f64,
    pub length_ratio: f64,
}

impl PairScore {
    pub fn compute(a: &str, b: &str, config: &AliasConfig) -> Self {
        Self {
            ratio: ratio(a, b),
            threshold: dynamic_threshold(a, b, config.base_threshold, config.max_threshold),
            length_ratio: length_ratio(a, b),
        }
    }

    /// Score a pair only when their lengths are close enough to compare.
    /// Pairs failing the length gate are rejected without running the
    /// edit-distance table.
    pub fn screen(a: &str, b: &str, config: &AliasConfig) -> Option<Self> {
        if length_ratio(a, b) < config.min_length_ratio {
            return None;
        }
        Some(Self::compute(a, b, config))
    }

    /// Lengths are close enough to compare and the ratio meets the threshold.
    pub fn is_match(&self, config: &AliasConfig) -> bool {
        self.length_ratio >= config.min_length_ratio && self.ratio >= self.threshold
    }
}
