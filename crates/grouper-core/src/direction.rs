use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight principal and diagonal compass directions.
///
/// Variants are declared in alphabetical order of their names so the derived
/// `Ord` sorts signatures the same way a sort on the direction word would.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    North,
    Northeast,
    Northwest,
    South,
    Southeast,
    Southwest,
    West,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::East,
        Direction::North,
        Direction::Northeast,
        Direction::Northwest,
        Direction::South,
        Direction::Southeast,
        Direction::Southwest,
        Direction::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::East => "east",
            Self::North => "north",
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::South => "south",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
            Self::West => "west",
        }
    }

    /// Parse a full, lower-case compass word.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == word)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_words() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_word(d.as_str()), Some(d));
        }
        assert_eq!(Direction::from_word("up"), None);
        assert_eq!(Direction::from_word("North"), None);
    }

    #[test]
    fn test_order_is_alphabetical() {
        let mut words: Vec<&str> = Direction::ALL.iter().map(|d| d.as_str()).collect();
        words.sort();
        let by_ord: Vec<&str> = Direction::ALL.iter().map(|d| d.as_str()).collect();
        assert_eq!(words, by_ord);
        assert!(Direction::East < Direction::South);
        assert!(Direction::North < Direction::Northeast);
    }
}
