//! NVIC for TM4C123

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;

use tivablink_hal::nvic::{InterruptController, IrqNumber, Priority};

/// GPIO Port F interrupt line
pub const GPIOF_IRQ: IrqNumber = IrqNumber(30);

#[derive(Clone, Copy)]
struct Line(u16);

// SAFETY: only built from `IrqNumber`s below `IRQ_COUNT`, checked in the
// accessors
unsafe impl InterruptNumber for Line {
    fn number(self) -> u16 {
        self.0
    }
}

fn line(irq: IrqNumber) -> Line {
    debug_assert!((irq.0 as usize) < crate::IRQ_COUNT);
    Line(irq.0)
}

/// NVIC owned as an interrupt controller
pub struct Tm4cNvic {
    nvic: NVIC,
}

impl Tm4cNvic {
    /// Take ownership of the core NVIC peripheral
    pub fn new(nvic: NVIC) -> Self {
        Self { nvic }
    }
}

impl InterruptController for Tm4cNvic {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) {
        // SAFETY: changing a priority can break priority-based critical
        // sections; none are used for this line
        unsafe { self.nvic.set_priority(line(irq), priority.raw()) }
    }

    fn priority(&self, irq: IrqNumber) -> Priority {
        Priority::from_raw(NVIC::get_priority(line(irq)))
    }

    fn enable(&mut self, irq: IrqNumber) {
        // SAFETY: the handler for this line is installed in the vector table
        unsafe { NVIC::unmask(line(irq)) }
    }

    fn is_enabled(&self, irq: IrqNumber) -> bool {
        NVIC::is_enabled(line(irq))
    }
}
