use std::{fmt, sync::Arc};

use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use super::{
    name::signal_type,
    scope::{Action, DeliveryScope},
    store::{ListenerStore, RegistryStats},
    Callback, Context, Delivery, Handlers, Listener, SignalProxy,
};
use crate::{
    config::SignalSettings,
    error::{SignalError, SignalResult},
};

/// Реестр сигналов.
///
/// Поддерживает:
/// - Подписку одного обработчика или списка обработчиков с контекстом
/// - Отложенную доставку с фазами `:before` и `:after`
/// - Отписку по идентичности обработчика
/// - Прокси для повторного вещания одного сигнала
///
/// Пустое имя сигнала везде означает `"any"`. Клоны реестра разделяют одно
/// хранилище.
pub struct SignalRegistry<T> {
    store: Arc<ListenerStore<T>>,
    delivery: Delivery,
    handle: Handle,
}

impl<T> SignalRegistry<T>
where
    T: Send + Sync + 'static,
{
    /// Создаёт реестр с троттлинговой доставкой по умолчанию.
    ///
    /// Должен вызываться внутри tokio runtime.
    pub fn new() -> SignalResult<Self> {
        Self::with_delivery(Delivery::default())
    }

    pub fn with_delivery(delivery: Delivery) -> SignalResult<Self> {
        let handle = Handle::try_current().map_err(|_| SignalError::RuntimeUnavailable)?;
        Ok(Self::with_handle(handle, delivery))
    }

    /// Создаёт реестр по загруженным настройкам.
    pub fn from_settings(settings: &SignalSettings) -> SignalResult<Self> {
        Self::with_delivery(settings.delivery())
    }

    /// Создаёт реестр, который планирует доставку на переданный runtime.
    pub fn with_handle(
        handle: Handle,
        delivery: Delivery,
    ) -> Self {
        Self {
            store: Arc::new(ListenerStore::new()),
            delivery,
            handle,
        }
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Подписывает обработчик или список обработчиков на сигнал.
    ///
    /// Каждый элемент проверяется отдельно: первый невызываемый элемент
    /// прерывает подписку с `SignalError::InvalidArgument`, а уже
    /// зарегистрированные до него элементы остаются. Сигнал становится
    /// наблюдаемым до проверки, даже если подписка не удалась.
    pub fn subscribe<H>(
        &self,
        signal: &str,
        handlers: H,
        context: Option<Context>,
    ) -> SignalResult<()>
    where
        H: Into<Handlers<T>>,
    {
        let signal = signal_type(signal);
        self.store.make_observable(signal);

        for handler in handlers.into() {
            let callback = match handler.into_callback() {
                Ok(callback) => callback,
                Err(err) => {
                    warn!(signal, %err, "rejected non-callable subscriber");
                    return Err(err);
                }
            };
            self.store
                .push(signal, Listener::new(callback, context.clone()));
        }

        debug!(
            signal,
            listeners = self.listener_count(signal),
            "subscribed"
        );
        Ok(())
    }

    /// Подписывает функцию с контекстом по умолчанию и возвращает обработчик
    /// для последующего `unsubscribe`.
    pub fn listen<F>(
        &self,
        signal: &str,
        f: F,
    ) -> Callback<T>
    where
        F: Fn(&Context, Option<&T>) + Send + Sync + 'static,
    {
        let callback = Callback::new(f);
        let signal = signal_type(signal);
        self.store
            .push(signal, Listener::new(callback.clone(), None));
        debug!(signal, "listener added");
        callback
    }

    /// Вещает аргумент всем слушателям сигнала и его фаз.
    ///
    /// Возвращается сразу: слушатели вызываются позже на runtime реестра.
    /// Для ненаблюдаемого сигнала ничего не делает.
    pub fn broadcast(
        &self,
        signal: &str,
        argument: Option<T>,
    ) {
        let signal = signal_type(signal);
        let Some(scope) =
            DeliveryScope::init(self.store.clone(), self.handle.clone(), signal)
        else {
            self.store.record_broadcast(false);
            trace!(signal, "broadcast to unobservable signal ignored");
            return;
        };
        self.store.record_broadcast(true);

        debug!(
            signal,
            tracked = scope.process_total(),
            delivery = ?self.delivery,
            "broadcast scheduled"
        );

        let argument = argument.map(Arc::new);
        match self.delivery {
            Delivery::Throttled { step } => {
                self.handle.spawn(scope.run(Action::Fire, argument, step));
            }
            Delivery::Immediate => {
                scope.scatter(argument);
            }
        }
    }

    /// Удаляет из сигнала слушателей с данным обработчиком.
    ///
    /// Затрагивает только основной сигнал, не его фазы. Проход однократный,
    /// поэтому из двух подряд идущих совпадений удаляется только первое.
    pub fn unsubscribe(
        &self,
        signal: &str,
        callback: &Callback<T>,
    ) {
        let signal = signal_type(signal);
        let removed = Action::Unload(callback.clone()).sweep(&self.store, signal);
        debug!(signal, removed, "unsubscribed");
    }

    /// Был ли сигнал когда-либо сделан наблюдаемым.
    pub fn is_observable(
        &self,
        signal: &str,
    ) -> bool {
        self.store.contains(signal_type(signal))
    }

    /// Количество слушателей сигнала (0 для ненаблюдаемого).
    pub fn listener_count(
        &self,
        signal: &str,
    ) -> usize {
        self.store.len(signal_type(signal)).unwrap_or(0)
    }

    /// Устаревший псевдоним [`Self::listener_count`].
    #[deprecated(since = "0.2.0", note = "Use listener_count instead")]
    pub fn subscriber_count(
        &self,
        signal: &str,
    ) -> usize {
        self.listener_count(signal)
    }

    /// Возвращает прокси, вещающий данный сигнал.
    pub fn proxy(
        &self,
        signal: &str,
    ) -> SignalProxy<T> {
        SignalProxy::new(self.clone(), signal_type(signal))
    }

    /// Имена всех наблюдаемых сигналов, включая фазовые.
    pub fn signals(&self) -> Vec<String> {
        self.store.names()
    }

    pub fn stats(&self) -> RegistryStats {
        self.store.stats()
    }
}

impl<T> Clone for SignalRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            delivery: self.delivery,
            handle: self.handle.clone(),
        }
    }
}

impl<T> fmt::Debug for SignalRegistry<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("SignalRegistry")
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}
