//! Integration tests exercising the full resolution pipeline:
//! normalize → alias → vectorize → cluster → refine → join, through the
//! public API only.

use grouper_core::{
    GroupId, GrouperConfig, Resolver, SimilarityMatrix, Table, leader_cluster, normalize,
};
use proptest::prelude::*;

const SCENARIO: [&str; 5] = [
    "5 mi S of Norman, OK",
    "5 miles south of Norman, Oklahoma",
    "10 mi N Norman OK",
    "Unknown",
    "3 mi NE Enid, OK",
];

fn resolver() -> Resolver {
    Resolver::new(GrouperConfig::default()).unwrap()
}

fn labels(resolver: &Resolver, localities: &[Option<&str>]) -> Vec<String> {
    resolver
        .resolve(localities)
        .unwrap()
        .groups
        .iter()
        .map(|g| g.group_id.to_string())
        .collect()
}

fn scenario_table() -> Table {
    let headers = ["catalogNumber", "locality", "bels_location_id"]
        .map(String::from)
        .to_vec();
    let rows = [
        ["C1", SCENARIO[0], "k1"],
        ["C2", SCENARIO[1], "k2"],
        ["C3", SCENARIO[2], "k3"],
        ["C4", SCENARIO[3], "k4"],
        ["C5", SCENARIO[4], "k5"],
        ["C6", "a different label for the same site", "k1"],
    ]
    .iter()
    .map(|r| r.map(String::from).to_vec())
    .collect();
    Table::new(headers, rows)
}

/// Test 1: the two spellings of the Norman locality collapse to one group;
/// different offsets and the placeholder stay apart.
#[test]
fn scenario_end_to_end() {
    assert_eq!(normalize(Some(SCENARIO[0])), normalize(Some(SCENARIO[1])));

    let localities: Vec<Option<&str>> = SCENARIO.iter().map(|s| Some(*s)).collect();
    let resolution = resolver().resolve(&localities).unwrap();
    let groups = &resolution.groups;

    assert_eq!(groups[0].group_id, groups[1].group_id);
    assert!(!groups[0].group_id.is_null());
    assert_eq!(groups[3].group_id, GroupId::NULL);
    assert_ne!(groups[2].group_id.base, groups[0].group_id.base);
    assert_ne!(groups[4].group_id.base, groups[0].group_id.base);

    assert_eq!(groups[0].signature.render(), "south-miles-5");
    assert_eq!(groups[2].signature.render(), "north-miles-10");
    assert_eq!(groups[4].signature.render(), "northeast-miles-3");
    assert_eq!(groups[0].confidence, 100.0);
    assert_eq!(resolution.stats.nulls, 1);
}

/// Test 2: identical input, identical output, down to confidence and order.
#[test]
fn resolution_is_deterministic() {
    let table = scenario_table();
    let first = resolver().resolve_table(&table).unwrap();
    let second = resolver().resolve_table(&table).unwrap();
    assert_eq!(first.table, second.table);
    assert_eq!(first.resolution, second.resolution);
}

/// Test 3: the key table carries every record, joined by grouping key and
/// sorted by group label.
#[test]
fn table_join_and_sort() {
    let resolved = resolver().resolve_table(&scenario_table()).unwrap();
    let out = &resolved.table;

    assert_eq!(
        out.headers,
        [
            "catalogNumber",
            "locality",
            "bels_location_id",
            "Grouper_ID",
            "normalized_locality",
            "Confidence",
            "distance_direction"
        ]
    );
    assert_eq!(out.len(), 6);

    let column = |name: &str| -> Vec<&str> {
        (0..out.len())
            .map(|row| out.value(row, name).unwrap())
            .collect()
    };
    assert_eq!(column("catalogNumber"), ["C4", "C1", "C6", "C2", "C3", "C5"]);
    assert_eq!(column("Grouper_ID"), ["0", "1", "1", "1", "2", "4"]);

    // C6 shares k1 with C1 and inherits its group's derived values
    assert_eq!(out.value(2, "locality"), Some("a different label for the same site"));
    assert_eq!(
        out.value(2, "normalized_locality"),
        Some("5 miles south of norman oklahoma")
    );
    assert_eq!(out.value(2, "Confidence"), Some("100.0"));
    assert_eq!(out.value(2, "distance_direction"), Some("south-miles-5"));
    assert_eq!(out.value(0, "distance_direction"), Some(""));
}

/// Test 4: placeholders are null regardless of how similar they are.
#[test]
fn placeholders_always_null() {
    let got = labels(
        &resolver(),
        &[
            Some("unknown"),
            Some("UNKNOWN"),
            Some("  No Locality "),
            None,
            Some(""),
            Some("unknown creek"),
        ],
    );
    assert_eq!(got[..5], ["0", "0", "0", "0", "0"]);
    assert_ne!(got[5], "0");
}

/// Test 5: same words, different offsets end up in different parts of a
/// cluster, or different clusters, never one label.
#[test]
fn differing_signatures_never_share_a_label() {
    let localities = [
        Some("Lake Murray State Park, 2 mi N of the lodge"),
        Some("Lake Murray State Park, 2 mi S of the lodge"),
        Some("Lake Murray State Park, 2 mi N of the lodge"),
    ];
    let resolution = resolver().resolve(&localities).unwrap();
    let groups = &resolution.groups;
    assert_eq!(groups[0].group_id, groups[2].group_id);
    assert_ne!(groups[0].group_id, groups[1].group_id);
}

/// Test 6: a sixteen-point bearing is not read as its leading cardinal.
#[test]
fn compound_bearing_differs_from_cardinal() {
    let localities = [
        Some("Lake Murray State Park, 2.5 mi NNW of the lodge"),
        Some("Lake Murray State Park, 2.5 mi N of the lodge"),
    ];
    let resolution = resolver().resolve(&localities).unwrap();
    let groups = &resolution.groups;
    assert_eq!(groups[0].signature.render(), "northwest-miles-2.5");
    assert_eq!(groups[1].signature.render(), "north-miles-2.5");
    assert_ne!(groups[0].group_id, groups[1].group_id);
}

/// Test 7: clusters with no offsets at all never split.
#[test]
fn empty_signatures_never_split() {
    let got = labels(
        &resolver(),
        &[Some("Turner Falls Park"), Some("Turner Falls Park"), Some("turner falls park")],
    );
    assert_eq!(got, ["1", "1", "1"]);
}

/// Test 8: membership is decided against the leader only.
#[test]
fn leader_clustering_is_not_transitive() {
    // sim(A,B) >= 0.85, sim(B,C) >= 0.85, sim(A,C) < 0.85
    let similarity = SimilarityMatrix::from_dense(vec![
        vec![1.0, 0.90, 0.40],
        vec![0.90, 1.0, 0.90],
        vec![0.40, 0.90, 1.0],
    ]);
    let ids = leader_cluster(&similarity, 0.85);
    assert_eq!(ids[0], ids[1], "B joins leader A");
    assert_ne!(ids[0], ids[2], "C is never compared with B");
}

/// Test 9: a missing grouping-key column stops the run before any work.
#[test]
fn missing_key_column_is_blocking() {
    let table = Table::new(
        vec!["locality".into()],
        vec![vec!["5 mi S of Norman".into()]],
    );
    let err = resolver().resolve_table(&table).unwrap_err();
    assert_eq!(
        err.to_string(),
        "input is missing required column 'bels_location_id'"
    );
}

/// Test 10: custom column names from configuration.
#[test]
fn configured_columns() {
    let config = GrouperConfig::from_toml_str(
        "[columns]\nlocality = \"verbatimLocality\"\nkey = \"site\"\n",
    )
    .unwrap();
    let table = Table::new(
        vec!["site".into(), "verbatimLocality".into()],
        vec![
            vec!["s1".into(), "Ft. Sill".into()],
            vec!["s2".into(), "Fort Sill".into()],
        ],
    );
    let resolved = Resolver::new(config).unwrap().resolve_table(&table).unwrap();
    assert_eq!(resolved.table.value(0, "Grouper_ID"), Some("1"));
    assert_eq!(resolved.table.value(1, "Grouper_ID"), Some("1"));
    assert_eq!(resolved.table.value(0, "normalized_locality"), Some("fort sill"));
}

const PHRASE_PARTS: &[&str] = &[
    "5", "3", "10", "2.5", "1/2", "½", "mi", "mi.", "miles", "km", "ft", "N", "S", "E", "W",
    "NE", "sw", "N.E.", "nne", "of", "Norman", "Enid", "OK", "Tex.", "Hwy", "9", "US", "77",
    "Co.", "Rd", "Lake", "Creek", "Ft.", "Mt.", "&", "three", "half", "and", "a", "(", ")",
    ",", "#", "Sec.", "T5N",
];

proptest! {
    #[test]
    fn normalization_is_idempotent(
        parts in prop::collection::vec(prop::sample::select(PHRASE_PARTS), 0..12)
    ) {
        let raw = parts.join(" ");
        let once = normalize(Some(&raw));
        prop_assert_eq!(normalize(Some(&once)), once.clone());
    }

    #[test]
    fn normalization_is_idempotent_on_free_text(raw in "[A-Za-z0-9 .,;'/&#-]{0,40}") {
        let once = normalize(Some(&raw));
        prop_assert_eq!(normalize(Some(&once)), once.clone());
    }
}
