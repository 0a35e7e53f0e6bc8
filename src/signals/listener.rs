use std::{any::Any, fmt, sync::Arc};

use once_cell::sync::Lazy;

/// Контекст, с которым вызывается слушатель (аналог `this`).
pub type Context = Arc<dyn Any + Send + Sync>;

/// Контекст по умолчанию: общий для всех слушателей, подписанных без
/// собственного контекста.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GlobalContext;

static GLOBAL_CONTEXT: Lazy<Context> = Lazy::new(|| Arc::new(GlobalContext));

/// Возвращает общий контекст по умолчанию.
pub fn global_context() -> Context {
    GLOBAL_CONTEXT.clone()
}

type CallbackFn<T> = dyn Fn(&Context, Option<&T>) + Send + Sync;

/// Вызываемый обработчик сигнала.
///
/// Идентичность определяется указателем: клоны одного `Callback` равны между
/// собой, два независимо созданных `Callback` не равны никогда, даже если
/// обёрнута одна и та же функция. Именно по этой идентичности работает
/// `unsubscribe`.
pub struct Callback<T>(Arc<CallbackFn<T>>);

impl<T> Callback<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, Option<&T>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Проверяет, что оба значения ссылаются на один и тот же обработчик.
    pub fn same(
        &self,
        other: &Callback<T>,
    ) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn call(
        &self,
        context: &Context,
        argument: Option<&T>,
    ) {
        (self.0)(context, argument)
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for Callback<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.same(other)
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}

/// Зарегистрированный слушатель: обработчик и контекст его вызова.
pub struct Listener<T> {
    pub callback: Callback<T>,
    pub context: Context,
}

impl<T> Listener<T> {
    /// Создаёт слушателя; без контекста используется [`global_context`].
    pub fn new(
        callback: Callback<T>,
        context: Option<Context>,
    ) -> Self {
        Self {
            callback,
            context: context.unwrap_or_else(global_context),
        }
    }

    /// Вызывает обработчик с привязанным контекстом.
    pub fn fire(
        &self,
        argument: Option<&T>,
    ) {
        self.callback.call(&self.context, argument)
    }

    pub fn matches(
        &self,
        callback: &Callback<T>,
    ) -> bool {
        self.callback.same(callback)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
            context: self.context.clone(),
        }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Listener")
            .field("callback", &self.callback)
            .finish_non_exhaustive()
    }
}
