//! TF-IDF feature vectors over the alias-applied corpus.

use crate::alias::Vocabulary;
use crate::tokenizer::{is_compass_token, is_numeric_token};

/// Sparse vector of `(column, weight)` pairs, sorted by column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Entries may arrive in any order; duplicate columns are summed.
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(col, _)| col);
        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (col, w) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == col => *acc += w,
                _ => merged.push((col, w)),
            }
        }
        Self { entries: merged }
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    fn scale(&mut self, factor: f64) {
        for (_, w) in &mut self.entries {
            *w *= factor;
        }
    }
}

/// Fitted TF-IDF representation of a corpus.
#[derive(Clone, Debug)]
pub struct TfIdf {
    pub vocabulary: Vocabulary,
    pub idf: Vec<f64>,
    pub rows: Vec<SparseVector>,
}

/// Smoothed TF-IDF with L2-normalized rows and a post-normalization boost
/// on compass-word and numeric columns.
#[derive(Clone, Debug)]
pub struct Vectorizer {
    boost: f64,
}

impl Vectorizer {
    pub fn new(boost: f64) -> Self {
        Self { boost }
    }

    /// Whether a vocabulary column receives the boost.
    pub fn is_boosted(token: &str) -> bool {
        is_compass_token(token) || is_numeric_token(token)
    }

    /// `idf = ln((1 + n) / (1 + df)) + 1`, `tf` is the raw count.
    pub fn fit_transform(&self, documents: &[Vec<String>]) -> TfIdf {
        let vocabulary = Vocabulary::build(documents);
        let n = documents.len() as f64;
        let idf: Vec<f64> = (0..vocabulary.len())
            .map(|idx| ((1.0 + n) / (1.0 + vocabulary.df_at(idx) as f64)).ln() + 1.0)
            .collect();
        let boosted: Vec<bool> = vocabulary
            .terms()
            .iter()
            .map(|t| Self::is_boosted(t))
            .collect();

        let rows = documents
            .iter()
            .map(|doc| {
                let mut row = SparseVector::from_entries(
                    doc.iter()
                        .filter_map(|t| vocabulary.index_of(t))
                        .map(|idx| (idx, 1.0))
                        .collect(),
                );
                for (col, w) in &mut row.entries {
                    *w *= idf[*col];
                }
                let norm = row.norm();
                if norm > 0.0 {
                    row.scale(1.0 / norm);
                }
                for (col, w) in &mut row.entries {
                    if boosted[*col] {
                        *w *= self.boost;
                    }
                }
                row
            })
            .collect();

        TfIdf {
            vocabulary,
            idf,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use approx::assert_relative_eq;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts.iter().map(|t| tokenize(t)).collect()
    }

    fn weight(v: &SparseVector, col: usize) -> f64 {
        v.entries
            .iter()
            .find(|&&(c, _)| c == col)
            .map_or(0.0, |&(_, w)| w)
    }

    #[test]
    fn test_sparse_vector_merges_duplicates() {
        let v = SparseVector::from_entries(vec![(3, 1.0), (1, 2.0), (3, 1.5)]);
        assert_eq!(v.entries, [(1, 2.0), (3, 2.5)]);
        assert_relative_eq!(weight(&v, 3), 2.5);
        assert_relative_eq!(weight(&v, 2), 0.0);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = SparseVector::from_entries(vec![(0, 3.0), (2, 4.0)]);
        let b = SparseVector::from_entries(vec![(2, 1.0), (5, 7.0)]);
        assert_relative_eq!(a.dot(&b), 4.0);
        assert_relative_eq!(a.norm(), 5.0);
        assert_relative_eq!(SparseVector::default().norm(), 0.0);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let tfidf = Vectorizer::new(1.0).fit_transform(&docs(&["lake murray", "lake texoma"]));
        let lake = tfidf.vocabulary.index_of("lake").unwrap();
        let murray = tfidf.vocabulary.index_of("murray").unwrap();
        assert_relative_eq!(tfidf.idf[lake], 1.0);
        assert_relative_eq!(tfidf.idf[murray], (3.0f64 / 2.0).ln() + 1.0);
    }

    #[test]
    fn test_rows_are_unit_length_without_boost() {
        let tfidf = Vectorizer::new(1.0).fit_transform(&docs(&["lake murray lake", "dam"]));
        for row in &tfidf.rows {
            assert_relative_eq!(row.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_raw_counts_weight_repeated_tokens() {
        let tfidf = Vectorizer::new(1.0).fit_transform(&docs(&["lake lake murray", "murray"]));
        let row = &tfidf.rows[0];
        let lake = tfidf.vocabulary.index_of("lake").unwrap();
        let murray = tfidf.vocabulary.index_of("murray").unwrap();
        // lake: tf 2, idf ln(3/2)+1; murray: tf 1, idf 1
        let lake_raw = 2.0 * ((1.5f64).ln() + 1.0);
        let norm = (lake_raw * lake_raw + 1.0).sqrt();
        assert_relative_eq!(weight(row, lake), lake_raw / norm, epsilon = 1e-12);
        assert_relative_eq!(weight(row, murray), 1.0 / norm, epsilon = 1e-12);
    }

    #[test]
    fn test_boost_applies_to_direction_and_numeric_columns() {
        let plain = Vectorizer::new(1.0).fit_transform(&docs(&["5 miles south norman"]));
        let boosted = Vectorizer::new(1.1).fit_transform(&docs(&["5 miles south norman"]));
        for (token, factor) in [("5", 1.1), ("south", 1.1), ("miles", 1.0), ("norman", 1.0)] {
            let col = plain.vocabulary.index_of(token).unwrap();
            assert_relative_eq!(
                weight(&boosted.rows[0], col),
                weight(&plain.rows[0], col) * factor,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_boost_predicate() {
        assert!(Vectorizer::is_boosted("northwest"));
        assert!(Vectorizer::is_boosted("2.5"));
        assert!(!Vectorizer::is_boosted("5th"));
        assert!(!Vectorizer::is_boosted("northern"));
    }

    #[test]
    fn test_empty_document_is_zero_vector() {
        let tfidf = Vectorizer::new(1.1).fit_transform(&docs(&["", "lake"]));
        assert!(tfidf.rows[0].entries.is_empty());
        assert_relative_eq!(tfidf.rows[1].norm(), 1.0, epsilon = 1e-12);
    }
}
