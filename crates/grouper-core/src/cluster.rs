//! Single-pass leader clustering.
//!
//! Records are visited in corpus order. An unassigned record becomes the
//! leader of a new cluster and claims every later unassigned record whose
//! similarity to the leader meets the threshold. Members are never compared
//! with each other, so membership is not transitive: a record close to a
//! member but not to the leader starts its own cluster.

use crate::similarity::SimilarityMatrix;

/// Base cluster number per record, numbered from 1 in leader order.
pub fn leader_cluster(similarity: &SimilarityMatrix, threshold: f64) -> Vec<u32> {
    let n = similarity.len();
    let mut assigned: Vec<Option<u32>> = vec![None; n];
    let mut next = 1u32;

    for leader in 0..n {
        if assigned[leader].is_some() {
            continue;
        }
        assigned[leader] = Some(next);
        for candidate in (leader + 1)..n {
            if assigned[candidate].is_none() && similarity.get(leader, candidate) >= threshold {
                assigned[candidate] = Some(next);
            }
        }
        next += 1;
    }

    assigned.into_iter().map(|id| id.unwrap_or(0)).collect()
}

/// Number of distinct clusters in a leader assignment.
pub fn cluster_count(assignment: &[u32]) -> usize {
    assignment.iter().copied().max().unwrap_or(0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> SimilarityMatrix {
        SimilarityMatrix::from_dense(rows.iter().map(|r| r.to_vec()).collect())
    }

    #[test]
    fn test_empty() {
        assert!(leader_cluster(&matrix(&[]), 0.85).is_empty());
    }

    #[test]
    fn test_all_distinct() {
        let m = matrix(&[&[1.0, 0.1, 0.2], &[0.1, 1.0, 0.3], &[0.2, 0.3, 1.0]]);
        assert_eq!(leader_cluster(&m, 0.85), vec![1, 2, 3]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let m = matrix(&[&[1.0, 0.85], &[0.85, 1.0]]);
        assert_eq!(leader_cluster(&m, 0.85), vec![1, 1]);
    }

    #[test]
    fn test_membership_follows_leader_not_chain() {
        // A~B and B~C, but A and C are far apart
        let m = matrix(&[
            &[1.0, 0.90, 0.50],
            &[0.90, 1.0, 0.90],
            &[0.50, 0.90, 1.0],
        ]);
        assert_eq!(leader_cluster(&m, 0.85), vec![1, 1, 2]);
    }

    #[test]
    fn test_later_member_not_compared_with_earlier_member() {
        // A leads {A, B, C}; D is close to C only and so leads its own cluster
        let m = matrix(&[
            &[1.0, 0.90, 0.88, 0.20],
            &[0.90, 1.0, 0.70, 0.30],
            &[0.88, 0.70, 1.0, 0.95],
            &[0.20, 0.30, 0.95, 1.0],
        ]);
        assert_eq!(leader_cluster(&m, 0.85), vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_order_dependence() {
        // same similarities, B visited first: B leads and claims both
        let m = matrix(&[
            &[1.0, 0.90, 0.90],
            &[0.90, 1.0, 0.50],
            &[0.90, 0.50, 1.0],
        ]);
        assert_eq!(leader_cluster(&m, 0.85), vec![1, 1, 1]);
    }

    #[test]
    fn test_cluster_count() {
        assert_eq!(cluster_count(&[1, 1, 2, 3, 2]), 3);
        assert_eq!(cluster_count(&[]), 0);
    }
}
