use thiserror::Error;

pub type SegmentResult<T> = Result<T, SegmentError>;

/// Errors raised at the collaborator boundary (store, import, analysis).
/// Rule evaluation itself never fails; a type mismatch is a non-match.
#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Import parse error: {0}")]
    Import(String),

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    #[error("Segment id already exists: {0}")]
    DuplicateSegment(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for SegmentError {
    fn from(err: config::ConfigError) -> Self {
        SegmentError::Config(err.to_string())
    }
}
