pub mod settings;

pub use settings::{DeliveryMode, SignalSettings, DEFAULT_STEP_MS, ENV_PREFIX};
