//! In-memory record table: the shape the pipeline reads and writes.

use crate::error::{GrouperError, Result};

/// Derived columns appended to every output record.
pub const OUTPUT_COLUMNS: [&str; 4] = [
    "Grouper_ID",
    "normalized_locality",
    "Confidence",
    "distance_direction",
];

/// Header plus rows of string cells. Short rows read as blank cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, or `MissingColumn`.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| GrouperError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    /// Cell value by header name; `None` when the header is absent.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name).ok()?;
        Some(self.cell(row, col))
    }
}

/// One row per distinct key: the first record's key and locality, in first
/// appearance order. A blank locality reads as missing.
pub fn dedup_by_key(
    table: &Table,
    key_col: usize,
    locality_col: usize,
) -> Vec<(String, Option<String>)> {
    let mut seen = std::collections::HashSet::new();
    let mut groups = Vec::new();
    for row in 0..table.len() {
        let key = table.cell(row, key_col);
        if !seen.insert(key.to_string()) {
            continue;
        }
        let locality = table.cell(row, locality_col);
        let locality = (!locality.trim().is_empty()).then(|| locality.to_string());
        groups.push((key.to_string(), locality));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            vec!["id".into(), "key".into(), "locality".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_column_lookup() {
        let t = table(&[]);
        assert_eq!(t.column("locality").unwrap(), 2);
        assert_eq!(
            t.column("bels_location_id").unwrap_err(),
            GrouperError::MissingColumn {
                column: "bels_location_id".into()
            }
        );
    }

    #[test]
    fn test_short_rows_read_blank() {
        let t = table(&[&["1", "k1"]]);
        assert_eq!(t.cell(0, 2), "");
        assert_eq!(t.cell(5, 0), "");
        assert_eq!(t.value(0, "key"), Some("k1"));
        assert_eq!(t.value(0, "nope"), None);
    }

    #[test]
    fn test_dedup_keeps_first_record_per_key() {
        let t = table(&[
            &["1", "a", "Norman"],
            &["2", "b", "  "],
            &["3", "a", "Moore"],
            &["4", "c", "Ada"],
        ]);
        let groups = dedup_by_key(&t, 1, 2);
        assert_eq!(
            groups,
            vec![
                ("a".to_string(), Some("Norman".to_string())),
                ("b".to_string(), None),
                ("c".to_string(), Some("Ada".to_string())),
            ]
        );
    }
}
