//! Сигналы: лёгкий внутрипроцессный pub/sub.
//!
//! - `registry`: реестр сигналов и его публичные операции.
//! - `listener`: обработчики, контексты и зарегистрированные слушатели.
//! - `handler`: значения, принимаемые `subscribe`, и их проверка.
//! - `delivery`: стратегии отложенной доставки.
//! - `scope` (приватный): фазовая доставка одного `broadcast`.
//! - `store` (приватный): хранилище слушателей и счётчики.
//! - `proxy`: прокси для повторного вещания одного сигнала.
//! - `name`: имя по умолчанию и суффиксы фаз.

pub mod delivery;
pub mod handler;
pub mod listener;
pub mod name;
pub mod proxy;
pub mod registry;
mod scope;
mod store;

pub use delivery::{Delivery, DEFAULT_STEP};
pub use handler::{Handler, Handlers};
pub use listener::{global_context, Callback, Context, GlobalContext, Listener};
pub use name::{signal_type, PhaseNames, AFTER_SUFFIX, ANY_SIGNAL, BEFORE_SUFFIX};
pub use proxy::SignalProxy;
pub use registry::SignalRegistry;
pub use store::RegistryStats;
