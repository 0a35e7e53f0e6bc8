use std::sync::Arc;

/// Имя сигнала по умолчанию, когда вызывающий передал пустую строку.
pub const ANY_SIGNAL: &str = "any";
/// Суффикс фазы, слушатели которой вызываются до основного сигнала.
pub const BEFORE_SUFFIX: &str = ":before";
/// Суффикс фазы, слушатели которой вызываются после основного сигнала.
pub const AFTER_SUFFIX: &str = ":after";

/// Возвращает фактическое имя сигнала: пустое имя превращается в `"any"`.
#[inline]
pub fn signal_type(signal: &str) -> &str {
    if signal.is_empty() {
        ANY_SIGNAL
    } else {
        signal
    }
}

/// Имена всех трёх фаз одного сигнала.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseNames {
    pub before: Arc<str>,
    pub main: Arc<str>,
    pub after: Arc<str>,
}

impl PhaseNames {
    pub fn of(signal: &str) -> Self {
        let main = signal_type(signal);
        Self {
            before: Arc::from(format!("{main}{BEFORE_SUFFIX}")),
            main: Arc::from(main),
            after: Arc::from(format!("{main}{AFTER_SUFFIX}")),
        }
    }
}
