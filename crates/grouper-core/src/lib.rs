//! Locality entity resolution for specimen records.
//!
//! Decides which free-text locality descriptions name the same place:
//! rule-based normalization, distance/direction signatures, fuzzy token
//! aliasing, TF-IDF cosine similarity with single-pass leader clustering,
//! and post-clustering refinement (signature splits, null placeholders,
//! confidence, singleton anchoring).
//!
//! Zero I/O: tables come in and go out as in-memory values.

pub mod alias;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod direction;
pub mod error;
pub mod fuzzy;
pub mod group_id;
pub mod normalize;
pub mod refine;
pub mod resolver;
pub mod rules;
pub mod signature;
pub mod similarity;
pub mod table;
pub mod tokenizer;
pub mod vectorize;

pub use alias::{AliasMap, Vocabulary, build_aliases};
pub use cluster::leader_cluster;
pub use config::GrouperConfig;
pub use constants::{CLUSTER_THRESHOLD, NULL_GROUP, SINGLETON_THRESHOLD};
pub use direction::Direction;
pub use error::{GrouperError, Result};
pub use fuzzy::{dynamic_threshold, ratio};
pub use group_id::GroupId;
pub use normalize::{Normalizer, normalize};
pub use resolver::{LocalityGroup, Resolution, ResolutionStats, ResolvedTable, Resolver};
pub use signature::{Offset, Signature, extract};
pub use similarity::SimilarityMatrix;
pub use table::Table;
pub use tokenizer::tokenize;
pub use vectorize::Vectorizer;
