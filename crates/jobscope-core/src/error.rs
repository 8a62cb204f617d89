use thiserror::Error;

/// Core error type for jobscope operations.
#[derive(Error, Debug)]
pub enum JobscopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("URL is not on the upstream origin: {0}")]
    ForbiddenUrl(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for JobscopeError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            JobscopeError::Deserialization(e.to_string())
        } else {
            JobscopeError::Serialization(e.to_string())
        }
    }
}

/// Result type alias using JobscopeError.
pub type Result<T> = std::result::Result<T, JobscopeError>;
