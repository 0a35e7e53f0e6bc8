//! Лёгкий внутрипроцессный pub/sub: слушатели подписываются на именованные
//! сигналы, а `broadcast` отложенно доставляет им значение.
//!
//! ```no_run
//! use signals::{Callback, SignalRegistry};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), signals::SignalError> {
//! let registry = SignalRegistry::<String>::new()?;
//! let greet = Callback::new(|_, name: Option<&String>| {
//!     println!("hello, {}", name.map(String::as_str).unwrap_or("world"));
//! });
//! registry.subscribe("greet", &greet, None)?;
//! registry.broadcast("greet", Some("Jon".to_string()));
//! # Ok(())
//! # }
//! ```

/// Settings loading (delivery model, throttle step).
pub mod config;
/// Common error types.
pub mod error;
/// Logging setup (filters, formats).
pub mod logging;
/// Signals: registry, listeners, phased delivery, proxies.
pub mod signals;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use self::config::{DeliveryMode, SignalSettings};
/// Operation errors and result types.
pub use error::{LoggingError, SignalError, SignalResult};
/// Logging.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Signals API.
pub use signals::{
    global_context, Callback, Context, Delivery, GlobalContext, Handler, Handlers, Listener,
    RegistryStats, SignalProxy, SignalRegistry, ANY_SIGNAL,
};
