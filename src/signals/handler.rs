use serde_json::Value;

use super::Callback;
use crate::error::{SignalError, SignalResult};

/// Значение, переданное в `subscribe` в качестве обработчика.
///
/// Кроме настоящих функций сюда может попасть произвольное значение
/// (например, имя функции строкой из конфигурации). Такие значения
/// отклоняются при подписке с `SignalError::InvalidArgument`.
pub enum Handler<T> {
    Function(Callback<T>),
    Value(Value),
}

impl<T> Handler<T> {
    pub fn is_callable(&self) -> bool {
        matches!(self, Handler::Function(_))
    }

    /// Возвращает обработчик или ошибку, если значение нельзя вызвать.
    pub fn into_callback(self) -> SignalResult<Callback<T>> {
        match self {
            Handler::Function(callback) => Ok(callback),
            Handler::Value(_) => Err(SignalError::not_callable()),
        }
    }
}

impl<T> From<Callback<T>> for Handler<T> {
    fn from(callback: Callback<T>) -> Self {
        Handler::Function(callback)
    }
}

impl<T> From<&Callback<T>> for Handler<T> {
    fn from(callback: &Callback<T>) -> Self {
        Handler::Function(callback.clone())
    }
}

impl<T> From<Value> for Handler<T> {
    fn from(value: Value) -> Self {
        Handler::Value(value)
    }
}

impl<T> From<&str> for Handler<T> {
    fn from(value: &str) -> Self {
        Handler::Value(Value::String(value.to_string()))
    }
}

/// Один обработчик или список обработчиков для `subscribe`.
pub enum Handlers<T> {
    One(Handler<T>),
    Many(Vec<Handler<T>>),
}

impl<T> Handlers<T> {
    pub fn len(&self) -> usize {
        match self {
            Handlers::One(_) => 1,
            Handlers::Many(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> IntoIterator for Handlers<T> {
    type Item = Handler<T>;
    type IntoIter = std::vec::IntoIter<Handler<T>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Handlers::One(handler) => vec![handler].into_iter(),
            Handlers::Many(list) => list.into_iter(),
        }
    }
}

impl<T> From<Handler<T>> for Handlers<T> {
    fn from(handler: Handler<T>) -> Self {
        Handlers::One(handler)
    }
}

impl<T> From<Callback<T>> for Handlers<T> {
    fn from(callback: Callback<T>) -> Self {
        Handlers::One(callback.into())
    }
}

impl<T> From<&Callback<T>> for Handlers<T> {
    fn from(callback: &Callback<T>) -> Self {
        Handlers::One(callback.into())
    }
}

impl<T> From<&str> for Handlers<T> {
    fn from(value: &str) -> Self {
        Handlers::One(value.into())
    }
}

impl<T> From<Value> for Handlers<T> {
    fn from(value: Value) -> Self {
        Handlers::One(value.into())
    }
}

impl<T> From<Vec<Handler<T>>> for Handlers<T> {
    fn from(list: Vec<Handler<T>>) -> Self {
        Handlers::Many(list)
    }
}

impl<T> From<Vec<Callback<T>>> for Handlers<T> {
    fn from(list: Vec<Callback<T>>) -> Self {
        Handlers::Many(list.into_iter().map(Handler::Function).collect())
    }
}
