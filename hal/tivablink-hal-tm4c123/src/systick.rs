//! SysTick countdown timer

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use tivablink_hal::timer::{ClockSource, CountdownTimer, MAX_RELOAD};

/// STCTRL counter enable
const CSR_ENABLE: u32 = 1 << 0;

/// STCTRL interrupt enable
const CSR_TICKINT: u32 = 1 << 1;

/// SysTick owned as a countdown timer
pub struct Tm4cSysTick {
    syst: SYST,
}

impl Tm4cSysTick {
    /// Take ownership of the core SysTick peripheral
    pub fn new(syst: SYST) -> Self {
        Self { syst }
    }

    /// Give back the core peripheral
    pub fn free(self) -> SYST {
        self.syst
    }
}

impl CountdownTimer for Tm4cSysTick {
    fn disable(&mut self) {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
    }

    fn set_reload(&mut self, reload: u32) {
        self.syst.set_reload(reload & MAX_RELOAD);
    }

    fn reload(&self) -> u32 {
        self.syst.rvr.read()
    }

    fn clear_current(&mut self) {
        self.syst.clear_current();
    }

    fn enable(&mut self, source: ClockSource, interrupt: bool) {
        self.syst.set_clock_source(match source {
            ClockSource::Core => SystClkSource::Core,
            ClockSource::External => SystClkSource::External,
        });
        if interrupt {
            self.syst.enable_interrupt();
        } else {
            self.syst.disable_interrupt();
        }
        self.syst.enable_counter();
    }

    fn is_running(&self) -> bool {
        self.syst.csr.read() & CSR_ENABLE != 0
    }

    fn interrupt_enabled(&self) -> bool {
        self.syst.csr.read() & CSR_TICKINT != 0
    }
}
