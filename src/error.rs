use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LongMapError {
    /// `put` was handed `None`; the map was left untouched.
    #[error("absent value for key {key}")]
    AbsentValue { key: i64 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
