//! Compile-time controller configuration.
//!
//! There is no persisted storage on the board. The only knobs are the task
//! periods and the delay floor, validated once at startup.

use core::fmt;
use core::time::Duration;

use crate::delay::{DELAY_CEILING_MS, DELAY_FLOOR_MS, DelayTimeConverter};

/// Default period of the main control task.
pub const DEFAULT_MAIN_PERIOD: Duration = Duration::from_millis(10);
/// Period of the head-array input task.
pub const DEFAULT_INPUT_PERIOD: Duration = Duration::from_millis(20);
/// Longest main period that still resolves the 100 ms reset pulses.
pub const MAX_MAIN_PERIOD: Duration = Duration::from_millis(100);

/// Scheduler priority of the head-array input task. Lower runs first.
pub const HEAD_ARRAY_TASK_PRIORITY: u8 = 1;
/// Scheduler priority of the main control task.
pub const MAIN_TASK_PRIORITY: u8 = 2;

/// Configuration problems detected at startup.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    ZeroPeriod,
    /// Periods must be a whole number of milliseconds.
    FractionalPeriod,
    MainPeriodTooLong,
    FloorAboveCeiling,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Validated controller configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ControllerConfig {
    main_period: Duration,
    input_period: Duration,
    delay_floor_ms: u16,
}

impl ControllerConfig {
    /// Builds a configuration after checking every field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a period is zero, not a whole number of
    /// milliseconds, or when the main period is too coarse for the reset
    /// pulses, or when the delay floor exceeds the ceiling.
    pub fn new(
        main_period: Duration,
        input_period: Duration,
        delay_floor_ms: u16,
    ) -> Result<Self, ConfigError> {
        for period in [main_period, input_period] {
            if period.is_zero() {
                return Err(ConfigError::ZeroPeriod);
            }
            if period.subsec_nanos() % 1_000_000 != 0 {
                return Err(ConfigError::FractionalPeriod);
            }
        }
        if main_period > MAX_MAIN_PERIOD {
            return Err(ConfigError::MainPeriodTooLong);
        }
        if delay_floor_ms > DELAY_CEILING_MS {
            return Err(ConfigError::FloorAboveCeiling);
        }

        Ok(Self {
            main_period,
            input_period,
            delay_floor_ms,
        })
    }

    #[must_use]
    pub const fn main_period(&self) -> Duration {
        self.main_period
    }

    #[must_use]
    pub const fn input_period(&self) -> Duration {
        self.input_period
    }

    /// Main period in milliseconds. Never zero.
    #[must_use]
    pub fn main_period_ms(&self) -> u16 {
        u16::try_from(self.main_period.as_millis()).unwrap_or(u16::MAX)
    }

    /// Number of main ticks covering `duration_ms`, rounded down.
    #[must_use]
    pub fn ticks_for(&self, duration_ms: u16) -> u16 {
        duration_ms / self.main_period_ms().max(1)
    }

    #[must_use]
    pub const fn delay_converter(&self) -> DelayTimeConverter {
        DelayTimeConverter::new(self.delay_floor_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            main_period: DEFAULT_MAIN_PERIOD,
            input_period: DEFAULT_INPUT_PERIOD,
            delay_floor_ms: DELAY_FLOOR_MS,
        }
    }
}
