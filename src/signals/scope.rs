//! Фазовая доставка одного вызова `broadcast`.
//!
//! Слушатели обходятся троттлинг-итератором: элемент последовательности
//! обрабатывается, затем, если элементы ещё есть, итератор засыпает на `step`
//! и продолжает. Фаза `:before` идёт первой, за ней основная; каждый
//! обработанный элемент увеличивает счётчик, и когда он достигает
//! `process_total`, запускается фаза `:after`.
//!
//! Длина каждой фазы фиксируется в момент `broadcast`: слушатель,
//! добавленный позже (в том числе из другого слушателя), ждёт следующего
//! `broadcast`. Элементы читаются по живому индексу, поэтому удаление во
//! время доставки сдвигает индекс и может оставить счётчик ниже итога (фаза
//! `:after` тогда не запустится).
//!
//! Паника слушателя прерывает задачу доставки: оставшиеся слушатели фазы и
//! фаза `:after` не вызываются.

use std::{sync::Arc, time::Duration};

use tokio::runtime::Handle;
use tracing::trace;

use super::{store::ListenerStore, Callback, PhaseNames};

/// Действие над элементом последовательности.
pub(crate) enum Action<T> {
    /// Вызвать слушателя с аргументом.
    Fire,
    /// Удалить слушателя, если его обработчик совпадает.
    Unload(Callback<T>),
}

impl<T> Clone for Action<T> {
    fn clone(&self) -> Self {
        match self {
            Action::Fire => Action::Fire,
            Action::Unload(callback) => Action::Unload(callback.clone()),
        }
    }
}

impl<T> Action<T> {
    /// Применяет действие к элементу `index` живой последовательности.
    ///
    /// Возвращает `false`, если по индексу нет элемента.
    pub(crate) fn apply(
        &self,
        store: &ListenerStore<T>,
        signal: &str,
        index: usize,
        argument: Option<&T>,
    ) -> bool {
        match self {
            Action::Fire => match store.get(signal, index) {
                Some(listener) => {
                    trace!(signal, index, "firing listener");
                    listener.fire(argument);
                    store.record_delivery();
                    true
                }
                None => false,
            },
            Action::Unload(callback) => store.unload_at(signal, index, callback).is_some(),
        }
    }

    /// Один синхронный проход по последовательности.
    ///
    /// Длина снимается один раз, индекс растёт на каждом шаге, а удаление
    /// сдвигает оставшиеся элементы влево. Поэтому элемент сразу за
    /// удалённым в этом проходе не проверяется. Возвращает число удалённых.
    pub(crate) fn sweep(
        &self,
        store: &ListenerStore<T>,
        signal: &str,
    ) -> usize {
        let Some(total) = store.len(signal) else {
            return 0;
        };
        for index in 0..total {
            self.apply(store, signal, index, None);
        }
        total - store.len(signal).unwrap_or(0)
    }
}

/// Обходит не более `limit` первых элементов `signal` по одному с паузой
/// `step`.
async fn throttle<T, F>(
    store: &ListenerStore<T>,
    signal: &str,
    limit: usize,
    action: &Action<T>,
    argument: Option<&T>,
    step: Duration,
    mut on_step: F,
) where
    F: FnMut(),
{
    let mut index = 0;
    while index < limit && action.apply(store, signal, index, argument) {
        on_step();
        index += 1;
        if index >= limit || index >= store.len(signal).unwrap_or(0) {
            break;
        }
        tokio::time::sleep(step).await;
    }
}

/// Состояние области доставки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeState {
    Created,
    DispatchingBefore,
    DispatchingMain,
    DispatchingAfter,
    Done,
}

/// Область доставки одного `broadcast`: три фазы, их длины на момент
/// вещания и счётчик завершения.
pub(crate) struct DeliveryScope<T> {
    store: Arc<ListenerStore<T>>,
    handle: Handle,
    names: PhaseNames,
    before_len: Option<usize>,
    main_len: usize,
    after_len: Option<usize>,
    processed: usize,
    process_total: usize,
    state: ScopeState,
}

impl<T> DeliveryScope<T>
where
    T: Send + Sync + 'static,
{
    /// Создаёт область для сигнала или `None`, если основной сигнал не
    /// наблюдаем. Вся отложенная работа планируется на `handle`.
    pub(crate) fn init(
        store: Arc<ListenerStore<T>>,
        handle: Handle,
        signal: &str,
    ) -> Option<Self> {
        let names = PhaseNames::of(signal);
        let main_len = store.len(&names.main)?;
        let before_len = store.len(&names.before);
        let after_len = store.len(&names.after);

        Some(Self {
            process_total: main_len + before_len.unwrap_or(0),
            before_len,
            main_len,
            after_len,
            processed: 0,
            names,
            store,
            handle,
            state: ScopeState::Created,
        })
    }

    pub(crate) fn process_total(&self) -> usize {
        self.process_total
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ScopeState {
        self.state
    }

    fn enter(
        &mut self,
        state: ScopeState,
    ) {
        trace!(signal = %self.names.main, from = ?self.state, to = ?state, "delivery scope state");
        self.state = state;
    }

    /// Троттлинговая доставка: `:before`, затем основная фаза; `:after`
    /// запускается из [`Self::track`].
    pub(crate) async fn run(
        mut self,
        action: Action<T>,
        argument: Option<Arc<T>>,
        step: Duration,
    ) -> ScopeState {
        let store = self.store.clone();
        let arg = argument.as_deref();

        if let Some(limit) = self.before_len {
            self.enter(ScopeState::DispatchingBefore);
            let name = self.names.before.clone();
            throttle(&store, &name, limit, &action, arg, step, || {
                self.track(&action, &argument, step)
            })
            .await;
        }

        if self.state != ScopeState::DispatchingAfter {
            self.enter(ScopeState::DispatchingMain);
        }
        let name = self.names.main.clone();
        let limit = self.main_len;
        throttle(&store, &name, limit, &action, arg, step, || {
            self.track(&action, &argument, step)
        })
        .await;

        if self.state != ScopeState::DispatchingAfter {
            self.enter(ScopeState::Done);
        }
        self.state
    }

    /// Учитывает обработанный элемент и запускает фазу `:after`, когда
    /// обработаны все элементы `:before` и основной фазы.
    fn track(
        &mut self,
        action: &Action<T>,
        argument: &Option<Arc<T>>,
        step: Duration,
    ) {
        self.processed += 1;
        let Some(limit) = self.after_len else {
            return;
        };
        if self.processed != self.process_total {
            return;
        }

        self.enter(ScopeState::DispatchingAfter);
        let store = self.store.clone();
        let name = self.names.after.clone();
        let action = action.clone();
        let argument = argument.clone();
        self.handle.spawn(async move {
            throttle(&store, &name, limit, &action, argument.as_deref(), step, || {}).await;
            trace!(signal = %name, "after phase finished");
        });
    }

    /// Немедленная доставка: каждый слушатель каждой фазы запускается
    /// отдельной задачей, порядок завершения не определён.
    pub(crate) fn scatter(
        self,
        argument: Option<Arc<T>>,
    ) -> usize {
        let mut spawned = 0;
        let phases = [
            (self.before_len, &self.names.before),
            (Some(self.main_len), &self.names.main),
            (self.after_len, &self.names.after),
        ];
        for (len, name) in phases {
            let Some(len) = len else {
                continue;
            };
            for listener in self.store.snapshot(name).into_iter().take(len) {
                let store = self.store.clone();
                let argument = argument.clone();
                self.handle.spawn(async move {
                    listener.fire(argument.as_deref());
                    store.record_delivery();
                });
                spawned += 1;
            }
        }
        spawned
    }
}
