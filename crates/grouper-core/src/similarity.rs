use crate::constants::EPSILON;
use crate::vectorize::SparseVector;

/// Dense symmetric n×n matrix of pairwise cosine similarities.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Pairwise cosines of `rows`. A pair involving a zero vector scores 0,
    /// on the diagonal too.
    pub fn from_vectors(rows: &[SparseVector]) -> Self {
        let n = rows.len();
        let norms: Vec<f64> = rows.iter().map(SparseVector::norm).collect();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let denom = norms[i] * norms[j];
                let sim = if denom < EPSILON {
                    0.0
                } else {
                    rows[i].dot(&rows[j]) / denom
                };
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }
        Self { n, values }
    }

    /// Build from explicit rows. Rows must be square; used to construct
    /// similarity structures directly.
    pub fn from_dense(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        debug_assert!(rows.iter().all(|r| r.len() == n), "matrix must be square");
        Self {
            n,
            values: rows.into_iter().flatten().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}
