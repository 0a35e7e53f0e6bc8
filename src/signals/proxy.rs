use std::{fmt, sync::Arc};

use super::SignalRegistry;

/// Переиспользуемый вызов `broadcast` для одного сигнала.
///
/// Не хранит ничего, кроме ссылки на реестр и имени сигнала; сам не
/// подписывает и не отписывает слушателей.
pub struct SignalProxy<T> {
    registry: SignalRegistry<T>,
    signal: Arc<str>,
}

impl<T> SignalProxy<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn new(
        registry: SignalRegistry<T>,
        signal: &str,
    ) -> Self {
        Self {
            registry,
            signal: Arc::from(signal),
        }
    }

    /// Имя сигнала, для которого создан прокси.
    pub fn signal(&self) -> &str {
        &self.signal
    }

    /// Эквивалентно `broadcast(signal, argument)`.
    pub fn call(
        &self,
        argument: Option<T>,
    ) {
        self.registry.broadcast(&self.signal, argument);
    }

    /// Эквивалентно `broadcast(signal, None)`.
    pub fn fire(&self) {
        self.call(None);
    }

    /// Превращает прокси в обычное замыкание.
    pub fn into_fn(self) -> impl Fn(Option<T>) + Send + Sync + 'static {
        move |argument: Option<T>| self.call(argument)
    }
}

impl<T> Clone for SignalProxy<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            signal: self.signal.clone(),
        }
    }
}

impl<T> fmt::Debug for SignalProxy<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SignalProxy")
            .field("signal", &self.signal)
            .finish()
    }
}
