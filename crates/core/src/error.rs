use thiserror::Error;

/// Errors raised by core parsing and configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown quality tier: {0}")]
    UnknownTier(String),

    #[error("unknown access type: {0}")]
    UnknownAccessType(String),

    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    #[error("invalid completion time: {0}")]
    InvalidCompletionTime(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
