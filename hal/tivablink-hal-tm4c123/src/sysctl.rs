//! System control for TM4C123

use core::ptr::{read_volatile, write_volatile};

use tivablink_hal::sysctl::{Port, SystemControl};

/// GPIO run-mode clock gating control
const RCGCGPIO: *mut u32 = 0x400F_E608 as *mut u32;

/// GPIO peripheral ready
const PRGPIO: *const u32 = 0x400F_EA08 as *const u32;

/// Handle to the system control block
pub struct Tm4cSysCtl {
    _private: (),
}

impl Tm4cSysCtl {
    /// Create the system control handle
    ///
    /// # Safety
    ///
    /// Only one handle may modify clock gating at a time.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl SystemControl for Tm4cSysCtl {
    fn enable_gpio_clock(&mut self, port: Port) {
        // SAFETY: fixed system control register
        unsafe {
            let value = read_volatile(RCGCGPIO);
            write_volatile(RCGCGPIO, value | port.mask());
        }
    }

    fn gpio_ready(&self, port: Port) -> bool {
        // SAFETY: fixed, read-only system control register
        unsafe { read_volatile(PRGPIO) & port.mask() != 0 }
    }
}
