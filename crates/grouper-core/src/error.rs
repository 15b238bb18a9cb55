use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GrouperError {
    /// A required input column is absent from the table header.
    MissingColumn { column: String },
    /// A quadratic stage would exceed its configured capacity.
    CorpusTooLarge {
        what: &'static str,
        size: usize,
        limit: usize,
    },
    InvalidConfig(String),
    InvalidGroupId(String),
}

impl fmt::Display for GrouperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrouperError::MissingColumn { column } => {
                write!(f, "input is missing required column '{column}'")
            }
            GrouperError::CorpusTooLarge { what, size, limit } => {
                write!(f, "{what} count {size} exceeds configured limit {limit}")
            }
            GrouperError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            GrouperError::InvalidGroupId(s) => write!(f, "invalid group identifier: {s:?}"),
        }
    }
}

impl std::error::Error for GrouperError {}

impl From<toml::de::Error> for GrouperError {
    fn from(e: toml::de::Error) -> Self {
        GrouperError::InvalidConfig(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GrouperError>;
