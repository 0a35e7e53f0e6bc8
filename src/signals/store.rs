use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dashmap::DashMap;

use super::{Callback, Listener};

type SignalKey = Arc<str>;

/// Хранилище слушателей: имя сигнала → упорядоченный список слушателей.
///
/// Записи создаются лениво и никогда не удаляются, только опустошаются.
/// Ни один guard `DashMap` не удерживается во время вызова слушателя, поэтому
/// слушатель может подписываться, отписываться и вещать повторно.
pub(crate) struct ListenerStore<T> {
    signals: DashMap<SignalKey, Vec<Listener<T>>>,
    /// Общее количество вызовов `broadcast`
    broadcast_count: AtomicUsize,
    /// Вызовы `broadcast` для сигнала, который ещё не наблюдаем
    unknown_signal_count: AtomicUsize,
    /// Количество фактически вызванных слушателей
    delivered_count: AtomicUsize,
}

/// Снимок счётчиков реестра.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub broadcasts: usize,
    pub unknown_signal_broadcasts: usize,
    pub deliveries: usize,
}

impl<T> ListenerStore<T> {
    pub(crate) fn new() -> Self {
        Self {
            signals: DashMap::new(),
            broadcast_count: AtomicUsize::new(0),
            unknown_signal_count: AtomicUsize::new(0),
            delivered_count: AtomicUsize::new(0),
        }
    }

    /// Делает сигнал наблюдаемым, если он ещё не был.
    pub(crate) fn make_observable(
        &self,
        signal: &str,
    ) {
        if !self.signals.contains_key(signal) {
            self.signals.entry(Arc::from(signal)).or_default();
        }
    }

    pub(crate) fn push(
        &self,
        signal: &str,
        listener: Listener<T>,
    ) {
        self.signals
            .entry(Arc::from(signal))
            .or_default()
            .push(listener);
    }

    pub(crate) fn contains(
        &self,
        signal: &str,
    ) -> bool {
        self.signals.contains_key(signal)
    }

    /// Длина списка или `None`, если сигнал не наблюдаем.
    pub(crate) fn len(
        &self,
        signal: &str,
    ) -> Option<usize> {
        self.signals.get(signal).map(|list| list.len())
    }

    /// Клон слушателя по текущему (живому) индексу.
    pub(crate) fn get(
        &self,
        signal: &str,
        index: usize,
    ) -> Option<Listener<T>> {
        self.signals
            .get(signal)
            .and_then(|list| list.get(index).cloned())
    }

    /// Снимок списка слушателей.
    pub(crate) fn snapshot(
        &self,
        signal: &str,
    ) -> Vec<Listener<T>> {
        self.signals
            .get(signal)
            .map(|list| list.value().clone())
            .unwrap_or_default()
    }

    /// Удаляет слушателя по индексу, если его обработчик совпадает.
    ///
    /// Возвращает `None`, если по индексу ничего нет, иначе признак удаления.
    pub(crate) fn unload_at(
        &self,
        signal: &str,
        index: usize,
        callback: &Callback<T>,
    ) -> Option<bool> {
        let mut list = self.signals.get_mut(signal)?;
        let listener = list.get(index)?;
        if listener.matches(callback) {
            list.remove(index);
            Some(true)
        } else {
            Some(false)
        }
    }

    pub(crate) fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .signals
            .iter()
            .map(|entry| entry.key().to_string())
            .collect();
        names.sort();
        names
    }

    pub(crate) fn record_broadcast(
        &self,
        known: bool,
    ) {
        self.broadcast_count.fetch_add(1, Ordering::Relaxed);
        if !known {
            self.unknown_signal_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_delivery(&self) {
        self.delivered_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn stats(&self) -> RegistryStats {
        RegistryStats {
            broadcasts: self.broadcast_count.load(Ordering::Relaxed),
            unknown_signal_broadcasts: self.unknown_signal_count.load(Ordering::Relaxed),
            deliveries: self.delivered_count.load(Ordering::Relaxed),
        }
    }
}
