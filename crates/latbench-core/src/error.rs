//! Shared error type across latbench crates.

use thiserror::Error;

/// Coarse error classes (stable API, used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration or metrics pipeline could not be brought up.
    Startup,
    /// The request never produced response headers.
    Transport,
    /// Response headers arrived but the body could not be drained.
    Body,
    /// Anything else.
    Internal,
}

impl ErrorKind {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Startup => "STARTUP",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::Body => "BODY",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, LatBenchError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum LatBenchError {
    #[error("{0} not set")]
    MissingEnv(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to initialize {0} exporter")]
    Exporter(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("body: {0}")]
    Body(String),
    #[error("meter provider already shut down")]
    AlreadyShutdown,
    #[error("internal: {0}")]
    Internal(String),
}

impl LatBenchError {
    /// Map an error to its stable class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LatBenchError::MissingEnv(_)
            | LatBenchError::InvalidConfig(_)
            | LatBenchError::Exporter(_) => ErrorKind::Startup,
            LatBenchError::InvalidUrl(_) | LatBenchError::Transport(_) => ErrorKind::Transport,
            LatBenchError::Body(_) => ErrorKind::Body,
            LatBenchError::AlreadyShutdown | LatBenchError::Internal(_) => ErrorKind::Internal,
        }
    }
}
