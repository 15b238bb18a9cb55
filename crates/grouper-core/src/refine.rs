//! Post-clustering refinements: split clusters by spatial signature, pin
//! placeholder localities to the null group, score confidence, and anchor
//! lone records next to the group they most resemble.

use std::collections::BTreeMap;

use crate::constants::PLACEHOLDER_LOCALITIES;
use crate::group_id::GroupId;
use crate::signature::Signature;
use crate::similarity::SimilarityMatrix;

/// Record indices per label, in label order.
pub fn members_by_group(ids: &[GroupId]) -> BTreeMap<GroupId, Vec<usize>> {
    let mut members: BTreeMap<GroupId, Vec<usize>> = BTreeMap::new();
    for (idx, id) in ids.iter().enumerate() {
        members.entry(*id).or_default().push(idx);
    }
    members
}

/// Split each base cluster whose members carry two or more distinct
/// signatures into parts `.1`, `.2`, ... numbered by first appearance of
/// each signature. Clusters with a single shared signature (including the
/// all-empty case) keep their plain base label.
pub fn split_by_signature(base_ids: &[u32], signatures: &[Signature]) -> Vec<GroupId> {
    debug_assert_eq!(base_ids.len(), signatures.len());
    let mut ids: Vec<GroupId> = base_ids.iter().map(|&b| GroupId::new(b)).collect();

    let mut clusters: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, &base) in base_ids.iter().enumerate() {
        clusters.entry(base).or_default().push(idx);
    }

    for (base, members) in clusters {
        let mut distinct: Vec<&Signature> = Vec::new();
        let mut part_of = Vec::with_capacity(members.len());
        for &idx in &members {
            let sig = &signatures[idx];
            let part = match distinct.iter().position(|d| *d == sig) {
                Some(pos) => pos,
                None => {
                    distinct.push(sig);
                    distinct.len() - 1
                }
            };
            part_of.push(part);
        }

        if distinct.len() <= 1 {
            continue;
        }
        for (&idx, part) in members.iter().zip(part_of) {
            ids[idx] = GroupId::with_part(base, part as u32 + 1);
        }
    }

    ids
}

/// True for a missing or blank locality, or one that matches a known
/// placeholder ("unknown", "[no locality]", ...) trimmed and case-insensitive.
pub fn is_placeholder(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None => true,
        Some(text) if text.is_empty() => true,
        Some(text) => {
            let lowered = text.to_lowercase();
            PLACEHOLDER_LOCALITIES.contains(&lowered.as_str())
        }
    }
}

/// Move every placeholder locality into the null group. Returns how many
/// records were reassigned.
pub fn classify_nulls(ids: &mut [GroupId], raw: &[Option<&str>]) -> usize {
    debug_assert_eq!(ids.len(), raw.len());
    let mut count = 0;
    for (id, locality) in ids.iter_mut().zip(raw) {
        if is_placeholder(*locality) {
            *id = GroupId::NULL;
            count += 1;
        }
    }
    count
}

/// Per-record confidence on a 0-100 scale: the mean similarity to every
/// other record sharing its final label, rounded to one decimal. A record
/// alone in its label scores 100.
pub fn confidence(ids: &[GroupId], similarity: &SimilarityMatrix) -> Vec<f64> {
    let mut scores = vec![100.0; ids.len()];
    for members in members_by_group(ids).values() {
        if members.len() < 2 {
            continue;
        }
        for &i in members {
            let total: f64 = members
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| similarity.get(i, j))
                .sum();
            let mean = total / (members.len() - 1) as f64;
            scores[i] = (mean * 1000.0).round() / 10.0;
        }
    }
    scores
}

/// Find an anchor group for every true singleton.
///
/// A true singleton is a label with exactly one record that is neither the
/// null group nor a part split off a base cluster with other records. Its
/// anchor is the multi-record label holding the record it is most similar
/// to, provided that similarity reaches `threshold`. Ties go to the lower
/// label. Anchors only affect presentation order.
pub fn place_singletons(
    ids: &[GroupId],
    similarity: &SimilarityMatrix,
    threshold: f64,
) -> Vec<Option<GroupId>> {
    let groups = members_by_group(ids);
    let mut base_sizes: BTreeMap<u32, usize> = BTreeMap::new();
    for id in ids.iter().filter(|id| !id.is_null()) {
        *base_sizes.entry(id.base).or_default() += 1;
    }

    let anchors_pool: Vec<(&GroupId, &Vec<usize>)> = groups
        .iter()
        .filter(|(id, members)| !id.is_null() && members.len() >= 2)
        .collect();

    let mut anchors = vec![None; ids.len()];
    for (id, members) in &groups {
        let [record] = members.as_slice() else {
            continue;
        };
        let split_fragment = id.is_split() && base_sizes.get(&id.base).copied().unwrap_or(0) > 1;
        if id.is_null() || split_fragment {
            continue;
        }

        let mut best: Option<(GroupId, f64)> = None;
        for (candidate, candidate_members) in &anchors_pool {
            let score = candidate_members
                .iter()
                .map(|&m| similarity.get(*record, m))
                .fold(f64::NEG_INFINITY, f64::max);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((**candidate, score));
            }
        }

        if let Some((anchor, score)) = best
            && score >= threshold
        {
            anchors[*record] = Some(anchor);
        }
    }
    anchors
}

/// Presentation order key: a record sorts with its anchor group (or its
/// own group), anchored singletons immediately after the group they
/// attach to, then by own label and corpus position.
pub fn presentation_key(
    own: GroupId,
    anchor: Option<GroupId>,
    index: usize,
) -> (GroupId, u8, GroupId, usize) {
    match anchor {
        Some(anchor) => (anchor, 1, own, index),
        None => (own, 0, own, index),
    }
}
