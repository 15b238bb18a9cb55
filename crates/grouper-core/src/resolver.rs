//! End-to-end locality resolution.
//!
//! normalize -> signature -> vocabulary/aliases -> TF-IDF -> similarity ->
//! leader clusters -> signature split -> nulls -> confidence -> singleton
//! anchors. State built by one stage (alias map, vocabulary, similarity
//! matrix) is passed explicitly to the next.

use std::collections::HashMap;

use serde::Serialize;

use crate::alias::{AliasMap, Vocabulary, build_aliases};
use crate::cluster::{cluster_count, leader_cluster};
use crate::config::GrouperConfig;
use crate::error::{GrouperError, Result};
use crate::group_id::GroupId;
use crate::normalize::Normalizer;
use crate::refine::{
    classify_nulls, confidence, place_singletons, presentation_key, split_by_signature,
};
use crate::signature::{Signature, extract};
use crate::similarity::SimilarityMatrix;
use crate::table::{OUTPUT_COLUMNS, Table, dedup_by_key};
use crate::tokenizer::tokenize;
use crate::vectorize::Vectorizer;

/// One distinct locality and everything derived for it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocalityGroup {
    pub raw: Option<String>,
    /// Normalized text with aliases applied.
    pub normalized: String,
    pub signature: Signature,
    pub group_id: GroupId,
    pub confidence: f64,
    /// Group this record is presented next to, for true singletons only.
    pub anchor: Option<GroupId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResolutionStats {
    pub groups: usize,
    pub vocabulary: usize,
    pub aliases: usize,
    pub clusters: usize,
    pub split_clusters: usize,
    pub nulls: usize,
    pub anchored: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Resolution {
    pub groups: Vec<LocalityGroup>,
    pub aliases: AliasMap,
    pub stats: ResolutionStats,
}

impl Resolution {
    /// Group indices in presentation order.
    pub fn presentation_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.groups.len()).collect();
        order.sort_by_key(|&i| {
            let g = &self.groups[i];
            presentation_key(g.group_id, g.anchor, i)
        });
        order
    }
}

/// The annotated record table plus the resolution behind it.
#[derive(Clone, Debug)]
pub struct ResolvedTable {
    pub table: Table,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct Resolver {
    config: GrouperConfig,
    normalizer: Normalizer,
}

impl Resolver {
    pub fn new(config: GrouperConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(&config.normalize);
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    fn check_limit(what: &'static str, size: usize, limit: Option<usize>) -> Result<()> {
        match limit {
            Some(limit) if size > limit => {
                Err(GrouperError::CorpusTooLarge { what, size, limit })
            }
            _ => Ok(()),
        }
    }

    /// Resolve one locality per distinct grouping key, in corpus order.
    pub fn resolve(&self, localities: &[Option<&str>]) -> Result<Resolution> {
        let n = localities.len();
        Self::check_limit("locality group", n, self.config.limits.max_groups)?;

        let normalized: Vec<String> = localities
            .iter()
            .map(|raw| self.normalizer.normalize(*raw))
            .collect();
        let signatures: Vec<Signature> = normalized.iter().map(|t| extract(t)).collect();
        tracing::info!(
            "normalized {n} localities, {} with a distance/direction signature",
            signatures.iter().filter(|s| !s.is_empty()).count()
        );

        let tokens: Vec<Vec<String>> = normalized.iter().map(|t| tokenize(t)).collect();
        let vocabulary = Vocabulary::build(&tokens);
        Self::check_limit(
            "vocabulary token",
            vocabulary.len(),
            self.config.limits.max_vocabulary,
        )?;
        let aliases = build_aliases(&vocabulary, &self.config.alias);
        tracing::info!(
            "vocabulary of {} tokens, {} aliases",
            vocabulary.len(),
            aliases.len()
        );

        let aliased: Vec<String> = normalized.iter().map(|t| aliases.apply(t)).collect();
        let aliased_tokens: Vec<Vec<String>> = aliased.iter().map(|t| tokenize(t)).collect();
        let tfidf = Vectorizer::new(self.config.cluster.boost).fit_transform(&aliased_tokens);
        let similarity = SimilarityMatrix::from_vectors(&tfidf.rows);

        let base_ids = leader_cluster(&similarity, self.config.cluster.similarity_threshold);
        let clusters = cluster_count(&base_ids);
        tracing::info!(
            "{clusters} clusters at threshold {}",
            self.config.cluster.similarity_threshold
        );

        let mut ids = split_by_signature(&base_ids, &signatures);
        let split_clusters = count_split_bases(&ids);
        let nulls = classify_nulls(&mut ids, localities);
        tracing::info!("{split_clusters} clusters split by signature, {nulls} null localities");

        let scores = confidence(&ids, &similarity);
        let anchors = place_singletons(
            &ids,
            &similarity,
            self.config.cluster.singleton_threshold,
        );
        let anchored = anchors.iter().filter(|a| a.is_some()).count();
        tracing::info!("{anchored} singletons anchored");

        let groups = localities
            .iter()
            .zip(aliased)
            .zip(signatures)
            .enumerate()
            .map(|(i, ((raw, normalized), signature))| LocalityGroup {
                raw: raw.map(str::to_string),
                normalized,
                signature,
                group_id: ids[i],
                confidence: scores[i],
                anchor: anchors[i],
            })
            .collect();

        Ok(Resolution {
            groups,
            stats: ResolutionStats {
                groups: n,
                vocabulary: vocabulary.len(),
                aliases: aliases.len(),
                clusters,
                split_clusters,
                nulls,
                anchored,
            },
            aliases,
        })
    }

    /// Deduplicate records by grouping key, resolve, and join the result
    /// back onto every record. Output rows carry the input columns plus
    /// [`OUTPUT_COLUMNS`], in presentation order.
    pub fn resolve_table(&self, table: &Table) -> Result<ResolvedTable> {
        let locality_col = table.column(&self.config.columns.locality)?;
        let key_col = table.column(&self.config.columns.key)?;

        let keyed = dedup_by_key(table, key_col, locality_col);
        let localities: Vec<Option<&str>> = keyed.iter().map(|(_, l)| l.as_deref()).collect();
        let resolution = self.resolve(&localities)?;

        let group_of: HashMap<&str, usize> = keyed
            .iter()
            .enumerate()
            .map(|(i, (key, _))| (key.as_str(), i))
            .collect();
        let mut rank = vec![0; keyed.len()];
        for (pos, idx) in resolution.presentation_order().into_iter().enumerate() {
            rank[idx] = pos;
        }

        let mut records: Vec<(usize, usize, usize)> = (0..table.len())
            .filter_map(|row| {
                group_of
                    .get(table.cell(row, key_col))
                    .map(|&group| (rank[group], row, group))
            })
            .collect();
        records.sort_unstable();

        let width = table.headers.len();
        let mut headers = table.headers.clone();
        headers.extend(OUTPUT_COLUMNS.iter().map(|c| c.to_string()));
        let rows = records
            .into_iter()
            .map(|(_, row, group)| {
                let group = &resolution.groups[group];
                let mut cells: Vec<String> =
                    (0..width).map(|c| table.cell(row, c).to_string()).collect();
                cells.push(group.group_id.to_string());
                cells.push(group.normalized.clone());
                cells.push(format!("{:.1}", group.confidence));
                cells.push(group.signature.render());
                cells
            })
            .collect();

        tracing::info!(
            "joined {} records onto {} locality groups",
            table.len(),
            resolution.groups.len()
        );
        Ok(ResolvedTable {
            table: Table::new(headers, rows),
            resolution,
        })
    }
}

fn count_split_bases(ids: &[GroupId]) -> usize {
    let mut bases: Vec<u32> = ids
        .iter()
        .filter(|id| id.is_split())
        .map(|id| id.base)
        .collect();
    bases.sort_unstable();
    bases.dedup();
    bases.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitConfig;

    fn resolver() -> Resolver {
        Resolver::new(GrouperConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GrouperConfig::default();
        config.cluster.similarity_threshold = 2.0;
        assert!(matches!(
            Resolver::new(config).unwrap_err(),
            GrouperError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_empty_corpus() {
        let resolution = resolver().resolve(&[]).unwrap();
        assert!(resolution.groups.is_empty());
        assert_eq!(resolution.stats, ResolutionStats::default());
    }

    #[test]
    fn test_group_limit() {
        let config = GrouperConfig {
            limits: LimitConfig {
                max_groups: Some(2),
                max_vocabulary: None,
            },
            ..GrouperConfig::default()
        };
        let err = Resolver::new(config)
            .unwrap()
            .resolve(&[Some("a"), Some("b"), Some("c")])
            .unwrap_err();
        assert_eq!(
            err,
            GrouperError::CorpusTooLarge {
                what: "locality group",
                size: 3,
                limit: 2
            }
        );
    }

    #[test]
    fn test_vocabulary_limit() {
        let config = GrouperConfig {
            limits: LimitConfig {
                max_groups: None,
                max_vocabulary: Some(2),
            },
            ..GrouperConfig::default()
        };
        let err = Resolver::new(config)
            .unwrap()
            .resolve(&[Some("lake murray"), Some("turner falls")])
            .unwrap_err();
        assert!(matches!(
            err,
            GrouperError::CorpusTooLarge { size: 4, limit: 2, .. }
        ));
    }

    #[test]
    fn test_identical_localities_share_a_group() {
        let resolution = resolver()
            .resolve(&[Some("Lake Murray"), Some("Turner Falls"), Some("lake murray")])
            .unwrap();
        let ids: Vec<String> = resolution
            .groups
            .iter()
            .map(|g| g.group_id.to_string())
            .collect();
        assert_eq!(ids, ["1", "2", "1"]);
        assert_eq!(resolution.groups[0].confidence, 100.0);
        assert_eq!(resolution.stats.clusters, 2);
    }

    #[test]
    fn test_missing_columns_reported_before_processing() {
        let table = Table::new(vec!["locality".into()], vec![vec!["Ada".into()]]);
        let err = resolver().resolve_table(&table).unwrap_err();
        assert_eq!(
            err,
            GrouperError::MissingColumn {
                column: "bels_location_id".into()
            }
        );

        let table = Table::new(vec!["bels_location_id".into()], vec![]);
        let err = resolver().resolve_table(&table).unwrap_err();
        assert_eq!(
            err,
            GrouperError::MissingColumn {
                column: "locality".into()
            }
        );
    }
}
