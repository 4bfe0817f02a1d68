use thiserror::Error;

/// Errors surfaced by finders and range construction.
///
/// Search and restore failures that stem from stale data are reported as
/// `RangeResolution`; the other variants indicate caller bugs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Unable to resolve path: {path}")]
    RangeResolution { path: String },
    #[error("Invalid range: start {start} > end {end}")]
    InvalidRange { start: usize, end: usize },
}

impl From<regex::Error> for EngineError {
    fn from(err: regex::Error) -> Self {
        EngineError::InvalidQuery(err.to_string())
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
