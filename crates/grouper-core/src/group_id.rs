use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::GrouperError;

/// A cluster label: a base integer, optionally split into numbered parts
/// (`"12"`, `"12.1"`, `"12.2"`). Base 0 without a part is reserved for
/// records with no usable locality.
///
/// Ordering is numeric on the base, then the part, with an unsplit base
/// before its first part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId {
    pub base: u32,
    pub part: Option<u32>,
}

impl GroupId {
    pub const NULL: GroupId = GroupId {
        base: 0,
        part: None,
    };

    pub fn new(base: u32) -> Self {
        Self { base, part: None }
    }

    pub fn with_part(base: u32, part: u32) -> Self {
        Self {
            base,
            part: Some(part),
        }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    pub fn is_split(&self) -> bool {
        self.part.is_some()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Some(part) => write!(f, "{}.{part}", self.base),
            None => write!(f, "{}", self.base),
        }
    }
}

impl FromStr for GroupId {
    type Err = GrouperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GrouperError::InvalidGroupId(s.to_string());
        let parse = |digits: &str| {
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse::<u32>().map_err(|_| invalid())
        };
        match s.split_once('.') {
            Some((base, part)) => Ok(Self::with_part(parse(base)?, parse(part)?)),
            None => Ok(Self::new(parse(s)?)),
        }
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NULL_GROUP;

    #[test]
    fn test_display() {
        assert_eq!(GroupId::new(12).to_string(), "12");
        assert_eq!(GroupId::with_part(12, 3).to_string(), "12.3");
        assert_eq!(GroupId::NULL.to_string(), NULL_GROUP);
    }

    #[test]
    fn test_parse() {
        assert_eq!("7".parse::<GroupId>().unwrap(), GroupId::new(7));
        assert_eq!("7.2".parse::<GroupId>().unwrap(), GroupId::with_part(7, 2));
        assert!(NULL_GROUP.parse::<GroupId>().unwrap().is_null());
        for bad in ["", "a", "7.", ".2", "7.2.1", "-1", "+3", "7.x"] {
            assert!(bad.parse::<GroupId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_numeric_ordering() {
        let mut ids: Vec<GroupId> = ["10", "2.2", "2", "2.10", "0", "2.1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let labels: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["0", "2", "2.1", "2.2", "2.10", "10"]);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&GroupId::with_part(4, 1)).unwrap();
        assert_eq!(json, "\"4.1\"");
    }
}
