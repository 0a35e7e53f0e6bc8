use thiserror::Error;

/// Сообщение, с которым `subscribe` отклоняет невызываемый обработчик.
pub const CALLBACK_MUST_BE_FUNCTION: &str = "Callback must be a function";

pub type SignalResult<T> = Result<T, SignalError>;

/// Ошибки реестра сигналов.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Переданный обработчик нельзя вызвать.
    #[error("{0}")]
    InvalidArgument(&'static str),

    /// Реестр создаётся вне tokio runtime, отложенную доставку запускать
    /// негде.
    #[error("signal registry must be created inside a tokio runtime")]
    RuntimeUnavailable,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SignalError {
    /// Ошибка для обработчика, который не является функцией.
    pub fn not_callable() -> Self {
        SignalError::InvalidArgument(CALLBACK_MUST_BE_FUNCTION)
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SignalError::InvalidArgument(_))
    }
}
