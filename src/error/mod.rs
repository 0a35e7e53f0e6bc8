pub mod logging;
pub mod signal;

// Публичный экспорт типов ошибок из вложенных модулей.
pub use logging::LoggingError;
pub use signal::{SignalError, SignalResult, CALLBACK_MUST_BE_FUNCTION};
