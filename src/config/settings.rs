use std::time::Duration;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::{error::SignalResult, signals::Delivery};

/// Префикс переменных окружения (`SIGNALS_DELIVERY`, `SIGNALS_STEP_MS`).
pub const ENV_PREFIX: &str = "SIGNALS";
/// Пауза троттлинговой доставки по умолчанию, мс.
pub const DEFAULT_STEP_MS: u64 = 10;

/// Модель доставки в конфигурации.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    #[default]
    Throttled,
    Immediate,
}

/// Настройки реестра сигналов.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSettings {
    pub delivery: DeliveryMode,
    pub step_ms: u64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::Throttled,
            step_ms: DEFAULT_STEP_MS,
        }
    }
}

impl SignalSettings {
    pub fn load() -> SignalResult<Self> {
        Self::load_with_prefix(ENV_PREFIX)
    }

    pub fn load_with_prefix(prefix: &str) -> SignalResult<Self> {
        let cfg = Config::builder()
            // Значения по умолчанию
            .set_default("delivery", "throttled")?
            .set_default("step_ms", DEFAULT_STEP_MS as i64)?
            // Переменные окружения с префиксом
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// Стратегия доставки для реестра.
    pub fn delivery(&self) -> Delivery {
        match self.delivery {
            DeliveryMode::Throttled => Delivery::throttled(Duration::from_millis(self.step_ms)),
            DeliveryMode::Immediate => Delivery::Immediate,
        }
    }
}
