use std::time::Duration;

/// Пауза между соседними слушателями одной последовательности.
pub const DEFAULT_STEP: Duration = Duration::from_millis(10);

/// Стратегия отложенной доставки, выбирается при создании реестра.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Слушатели вызываются строго по одному с паузой `step` между ними;
    /// фазы `:before` и основная завершаются до начала фазы `:after`.
    Throttled { step: Duration },
    /// Каждый слушатель каждой фазы запускается отдельной задачей без
    /// задержки. Порядок завершения не гарантируется.
    Immediate,
}

impl Default for Delivery {
    fn default() -> Self {
        Delivery::Throttled { step: DEFAULT_STEP }
    }
}

impl Delivery {
    pub fn throttled(step: Duration) -> Self {
        Delivery::Throttled { step }
    }

    pub fn step(&self) -> Duration {
        match self {
            Delivery::Throttled { step } => *step,
            Delivery::Immediate => Duration::ZERO,
        }
    }

    /// Время, после которого доставка `listeners` слушателей гарантированно
    /// закончена (при отсутствии повторного входа из слушателей).
    pub fn settle_time(
        &self,
        listeners: usize,
    ) -> Duration {
        match self {
            Delivery::Throttled { step } => {
                let steps = u32::try_from(listeners)
                    .unwrap_or(u32::MAX)
                    .saturating_add(1);
                step.saturating_mul(steps)
            }
            Delivery::Immediate => Duration::from_millis(1),
        }
    }
}
