//! Blink configuration

use tivablink_hal::nvic::Priority;

use crate::init::timer::{ReloadValue, TimerError};

/// Core clock after reset (16 MHz internal oscillator)
pub const DEFAULT_CORE_CLOCK_HZ: u32 = 16_000_000;

/// Green LED toggle period
pub const DEFAULT_TOGGLE_PERIOD_MS: u32 = 500;

/// Port interrupt priority level
pub const DEFAULT_PORT_PRIORITY: u8 = 3;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Core clock frequency is zero
    ZeroClock,
    /// Toggle period rounds down to zero ticks
    ZeroPeriod,
    /// Toggle period does not fit the timer's counter
    PeriodTooLong,
    /// Priority level is not implemented by the interrupt controller
    InvalidPriority,
}

impl From<TimerError> for ConfigError {
    fn from(e: TimerError) -> Self {
        match e {
            TimerError::ZeroPeriod => ConfigError::ZeroPeriod,
            TimerError::PeriodTooLong => ConfigError::PeriodTooLong,
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkConfig {
    /// Core clock feeding the timer (Hz)
    pub core_clock_hz: u32,
    /// Time between green LED toggles (ms); a full blink is twice this
    pub toggle_period_ms: u32,
    /// Priority level of the port interrupt (0 = highest)
    pub port_priority: u8,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BlinkConfig {
    /// LaunchPad defaults: 16 MHz, 0.5 s toggle, port priority 3
    pub const DEFAULT: BlinkConfig = BlinkConfig {
        core_clock_hz: DEFAULT_CORE_CLOCK_HZ,
        toggle_period_ms: DEFAULT_TOGGLE_PERIOD_MS,
        port_priority: DEFAULT_PORT_PRIORITY,
    };

    /// Timer reload for the toggle period
    pub fn reload_value(&self) -> Result<ReloadValue, ConfigError> {
        if self.core_clock_hz == 0 {
            return Err(ConfigError::ZeroClock);
        }
        Ok(ReloadValue::from_period(
            self.core_clock_hz,
            self.toggle_period_ms,
        )?)
    }

    /// Port interrupt priority
    pub fn port_priority(&self) -> Result<Priority, ConfigError> {
        Priority::new(self.port_priority).ok_or(ConfigError::InvalidPriority)
    }

    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reload_value()?;
        self.port_priority()?;
        Ok(())
    }
}
