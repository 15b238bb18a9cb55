//! Tunable parameters for the resolution pipeline.
//!
//! Every field has a default, so a TOML file only needs the keys it
//! overrides. The magic constants of the heuristics (meters cutoff, cluster
//! and singleton thresholds, alias thresholds) all live here.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ALIAS_BASE_THRESHOLD, ALIAS_CANONICAL_MIN_DF, ALIAS_MAX_THRESHOLD, ALIAS_MIN_LENGTH_RATIO,
    CLUSTER_THRESHOLD, DIRECTION_NUMERIC_BOOST, MAX_NORMALIZE_PASSES, METERS_CUTOFF,
    SINGLETON_THRESHOLD,
};
use crate::error::{GrouperError, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrouperConfig {
    pub columns: ColumnConfig,
    pub normalize: NormalizeConfig,
    pub alias: AliasConfig,
    pub cluster: ClusterConfig,
    pub limits: LimitConfig,
}

/// Names of the input columns the pipeline depends on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub locality: String,
    pub key: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            locality: "locality".to_string(),
            key: "bels_location_id".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// A bare "m" after a number greater than this reads as meters.
    pub meters_cutoff: f64,
    pub max_passes: usize,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            meters_cutoff: METERS_CUTOFF,
            max_passes: MAX_NORMALIZE_PASSES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub base_threshold: f64,
    pub max_threshold: f64,
    pub min_length_ratio: f64,
    pub canonical_min_df: usize,
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            base_threshold: ALIAS_BASE_THRESHOLD,
            max_threshold: ALIAS_MAX_THRESHOLD,
            min_length_ratio: ALIAS_MIN_LENGTH_RATIO,
            canonical_min_df: ALIAS_CANONICAL_MIN_DF,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub similarity_threshold: f64,
    pub singleton_threshold: f64,
    pub boost: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: CLUSTER_THRESHOLD,
            singleton_threshold: SINGLETON_THRESHOLD,
            boost: DIRECTION_NUMERIC_BOOST,
        }
    }
}

/// Capacity guards for the quadratic stages. `None` means unlimited.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    pub max_groups: Option<usize>,
    pub max_vocabulary: Option<usize>,
}

impl GrouperConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: GrouperConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(GrouperError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {v}"
                )))
            }
        };
        unit("cluster.similarity_threshold", self.cluster.similarity_threshold)?;
        unit("cluster.singleton_threshold", self.cluster.singleton_threshold)?;
        unit("alias.min_length_ratio", self.alias.min_length_ratio)?;

        if self.cluster.boost <= 0.0 {
            return Err(GrouperError::InvalidConfig(format!(
                "cluster.boost must be positive, got {}",
                self.cluster.boost
            )));
        }
        if !(0.0..=100.0).contains(&self.alias.base_threshold)
            || !(0.0..=100.0).contains(&self.alias.max_threshold)
            || self.alias.base_threshold > self.alias.max_threshold
        {
            return Err(GrouperError::InvalidConfig(format!(
                "alias thresholds must satisfy 0 <= base ({}) <= max ({}) <= 100",
                self.alias.base_threshold, self.alias.max_threshold
            )));
        }
        if self.normalize.max_passes == 0 {
            return Err(GrouperError::InvalidConfig(
                "normalize.max_passes must be at least 1".to_string(),
            ));
        }
        if self.columns.locality.is_empty() || self.columns.key.is_empty() {
            return Err(GrouperError::InvalidConfig(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
