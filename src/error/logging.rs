use thiserror::Error;

/// Ошибки настройки логирования.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoggingError {
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    #[error("global tracing subscriber is already set")]
    AlreadyInitialized,
}
