//! Distance/direction signatures.
//!
//! A signature is the set of spatial offsets a normalized locality states
//! ("3 miles south", "200 meters east"), sorted by direction and then
//! magnitude. Two localities with equal signatures describe the same offset
//! regardless of the order the offsets were written in.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::constants::ALIAS_MARKER;
use crate::direction::Direction;
use crate::normalize::render_number;

static OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*(miles?|kilometers?|meters?|feet|mi|km)?[\s,]*\b(northeast|northwest|southeast|southwest|north|south|east|west)(?:-(northeast|northwest|southeast|southwest|north|south|east|west))?\b",
    )
    .unwrap()
});
static NUMBER_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d+)?)\s*(miles?|kilometers?|meters?|feet|mi|km)\b").unwrap()
});
static DIRECTION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(northeast|northwest|southeast|southwest|north|south|east|west)(?:-(northeast|northwest|southeast|southwest|north|south|east|west))?\b",
    )
    .unwrap()
});

/// One (magnitude, unit, direction) triple.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Offset {
    pub magnitude: f64,
    /// Canonical plural unit word, or empty when the text gave none.
    pub unit: String,
    pub direction: Direction,
}

impl Offset {
    /// `direction-unit-magnitude`, omitting an empty unit.
    pub fn render(&self) -> String {
        let magnitude = render_number(self.magnitude);
        if self.unit.is_empty() {
            format!("{}-{magnitude}", self.direction)
        } else {
            format!("{}-{}-{magnitude}", self.direction, self.unit)
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Signature(Vec<Offset>);

impl Signature {
    pub fn new(mut offsets: Vec<Offset>) -> Self {
        offsets.sort_by(|a, b| {
            a.direction
                .cmp(&b.direction)
                .then(a.magnitude.total_cmp(&b.magnitude))
        });
        Self(offsets)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.0
    }

    /// Human-readable rendering, offsets joined by `"; "`.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(Offset::render)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn canonical_unit(unit: &str) -> &'static str {
    match unit {
        "mile" | "miles" | "mi" => "miles",
        "kilometer" | "kilometers" | "km" => "kilometers",
        "meter" | "meters" => "meters",
        "feet" => "feet",
        _ => "",
    }
}

/// Direction of a match whose word sits in `first`, with an optional
/// hyphenated second word. A compound such as `north-northwest` resolves
/// to its trailing diagonal, never to the leading cardinal.
fn matched_direction(caps: &regex::Captures<'_>, first: usize) -> Option<Direction> {
    let word = caps.get(first + 1).or_else(|| caps.get(first))?;
    Direction::from_word(word.as_str())
}

fn parse_magnitude(text: &str) -> Option<f64> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::debug!("skipping unparseable magnitude {text:?}");
            None
        }
    }
}

/// Extract the distance/direction signature of normalized text.
///
/// Scans for every `<number> [unit] <direction>` run. When none is present,
/// falls back to pairing the first standalone `<number> <unit>` with the
/// first direction word anywhere in the text. Alias markers are ignored.
pub fn extract(normalized: &str) -> Signature {
    let text = normalized.replace(ALIAS_MARKER, "");

    let offsets: Vec<Offset> = OFFSET
        .captures_iter(&text)
        .filter_map(|caps| {
            let magnitude = parse_magnitude(&caps[1])?;
            let unit = caps.get(2).map_or("", |m| canonical_unit(m.as_str()));
            let direction = matched_direction(&caps, 3)?;
            Some(Offset {
                magnitude,
                unit: unit.to_string(),
                direction,
            })
        })
        .collect();

    if !offsets.is_empty() {
        return Signature::new(offsets);
    }

    let number_unit = NUMBER_UNIT.captures(&text);
    let direction = DIRECTION_WORD
        .captures(&text)
        .and_then(|caps| matched_direction(&caps, 1));

    match (number_unit, direction) {
        (Some(caps), Some(direction)) => match parse_magnitude(&caps[1]) {
            Some(magnitude) => Signature::new(vec![Offset {
                magnitude,
                unit: canonical_unit(&caps[2]).to_string(),
                direction,
            }]),
            None => Signature::default(),
        },
        _ => Signature::default(),
    }
}
