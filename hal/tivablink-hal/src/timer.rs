//! Countdown timer abstractions
//!
//! Models a free-running down counter that reloads on reaching zero and
//! raises an interrupt on each wrap (SysTick on Cortex-M).

/// Width of the counter in bits
pub const COUNTER_BITS: u32 = 24;

/// Largest value the reload register holds
pub const MAX_RELOAD: u32 = (1 << COUNTER_BITS) - 1;

/// Timer clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Processor core clock
    Core,
    /// Implementation-defined external reference
    External,
}

/// Periodic countdown timer
pub trait CountdownTimer {
    /// Stop counting and disable the wrap interrupt
    fn disable(&mut self);

    /// Write the reload register (value loaded after each wrap)
    ///
    /// Only the low [`COUNTER_BITS`] bits are kept by the hardware.
    fn set_reload(&mut self, reload: u32);

    /// Current reload register value
    fn reload(&self) -> u32;

    /// Reset the current count to zero
    fn clear_current(&mut self);

    /// Start counting from `source`, optionally interrupting on each wrap
    fn enable(&mut self, source: ClockSource, interrupt: bool);

    /// Check whether the counter is running
    fn is_running(&self) -> bool;

    /// Check whether the wrap interrupt is enabled
    fn interrupt_enabled(&self) -> bool;
}
