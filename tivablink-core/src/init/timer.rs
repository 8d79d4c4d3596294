//! Timer initialization

use tivablink_hal::timer::{ClockSource, CountdownTimer, COUNTER_BITS};

/// Reload value errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// A period of zero ticks never fires
    ZeroPeriod,
    /// Period exceeds the counter width
    PeriodTooLong,
}

/// Timer period in core clock ticks
///
/// Always within `1..=2^24`. The counter is zero-based, so the value
/// written to the reload register is one less than the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReloadValue(u32);

impl ReloadValue {
    /// Longest supported period
    pub const MAX_PERIOD: u32 = 1 << COUNTER_BITS;

    /// Create a reload value for a period of `ticks`
    pub const fn new(ticks: u32) -> Result<Self, TimerError> {
        if ticks == 0 {
            Err(TimerError::ZeroPeriod)
        } else if ticks > Self::MAX_PERIOD {
            Err(TimerError::PeriodTooLong)
        } else {
            Ok(Self(ticks))
        }
    }

    /// Reload value for a period of `period_ms` on a `clock_hz` clock
    pub fn from_period(clock_hz: u32, period_ms: u32) -> Result<Self, TimerError> {
        let ticks = clock_hz as u64 * period_ms as u64 / 1000;
        if ticks > Self::MAX_PERIOD as u64 {
            return Err(TimerError::PeriodTooLong);
        }
        Self::new(ticks as u32)
    }

    /// Period in ticks
    pub const fn period(self) -> u32 {
        self.0
    }

    /// Value for the reload register
    pub const fn register_value(self) -> u32 {
        self.0 - 1
    }
}

/// Program `timer` to interrupt every `reload` ticks of the core clock
///
/// The timer is stopped while it is reprogrammed, so no wrap interrupt
/// can fire with a half-written configuration.
pub fn init_timer<T: CountdownTimer>(timer: &mut T, reload: ReloadValue) {
    timer.disable();
    timer.clear_current();
    timer.set_reload(reload.register_value());
    timer.enable(ClockSource::Core, true);
}
