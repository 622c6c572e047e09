use thiserror::Error;

/// Top-level error type for linkfix.
#[derive(Debug, Error)]
pub enum LinkfixError {
    /// Configuration error (unreadable or malformed config file).
    #[error("config error: {0}")]
    Config(String),

    /// Rewrite rule validation error. Always startup-fatal, never
    /// tolerated at message time.
    #[error("rule validation error: {0}")]
    Validation(String),

    /// Durable-state I/O failure (opt-out table, fix counters).
    #[error("store error: {0}")]
    Store(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
