//! System control abstractions
//!
//! Peripheral clock gating. A GPIO port's registers are only accessible
//! once its clock runs and the port reports ready.

/// GPIO port identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Port {
    /// Bit position of this port in the clock gating and ready registers
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Bit mask of this port in the clock gating and ready registers
    pub const fn mask(self) -> u32 {
        1 << self.index()
    }
}

/// System control block
pub trait SystemControl {
    /// Start the run-mode clock of a GPIO port
    fn enable_gpio_clock(&mut self, port: Port);

    /// Check whether the port is ready for register access
    fn gpio_ready(&self, port: Port) -> bool;

    /// Start the port clock and wait until the port is ready
    fn enable_gpio(&mut self, port: Port) {
        self.enable_gpio_clock(port);
        while !self.gpio_ready(port) {
            core::hint::spin_loop();
        }
    }
}
