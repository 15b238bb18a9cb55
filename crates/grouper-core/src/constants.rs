/// Minimum cosine similarity for a group to join a leader's cluster
pub const CLUSTER_THRESHOLD: f64 = 0.85;

/// Minimum similarity for a true singleton to be anchored next to a larger group
pub const SINGLETON_THRESHOLD: f64 = 0.80;

/// Weight multiplier applied to compass-direction and numeric vocabulary columns
pub const DIRECTION_NUMERIC_BOOST: f64 = 1.10;

/// A bare "m" after a number above this magnitude reads as meters, otherwise miles
pub const METERS_CUTOFF: f64 = 20.0;

/// Upper bound on normalization passes while seeking a fixed point
pub const MAX_NORMALIZE_PASSES: usize = 8;

/// Fuzzy ratio threshold for short tokens (average length <= 5)
pub const ALIAS_BASE_THRESHOLD: f64 = 75.0;

/// Fuzzy ratio threshold for long tokens (average length >= 15)
pub const ALIAS_MAX_THRESHOLD: f64 = 90.0;

/// Shorter/longer length ratio below which a token pair is never compared
pub const ALIAS_MIN_LENGTH_RATIO: f64 = 0.8;

/// Document frequency at or above which a token may serve as a canonical form
pub const ALIAS_CANONICAL_MIN_DF: usize = 5;

/// Prefix marking a token that was rewritten by the alias map
pub const ALIAS_MARKER: char = '*';

/// Reserved group identifier for records with no usable locality
pub const NULL_GROUP: &str = "0";

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-12;

/// The eight principal and diagonal compass words.
pub const COMPASS_WORDS: [&str; 8] = [
    "north",
    "south",
    "east",
    "west",
    "northeast",
    "northwest",
    "southeast",
    "southwest",
];

/// Stop words tuned for geographic and soil filler in specimen labels.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "in", "at", "on", "for", "by", "with", "and", "of", "or", "but", "from",
    "between", "along", "texas", "oklahoma", "sandy", "clay", "soil", "loam", "rocky", "silt",
    "bed", "bank", "x",
];

/// Locality strings that mean "nothing usable here", compared trimmed and lowercased.
pub const PLACEHOLDER_LOCALITIES: &[&str] = &[
    "unknown",
    "no locality",
    "[no locality]",
    "[no additional data]",
    "[no additional locality data on sheet]",
    "[locality not indicated]",
    "[unspecified]",
    "[no location data on label.]",
    "[ not readable ]",
    "[none]",
    "none listed",
    "no further locality",
    "no location",
];
