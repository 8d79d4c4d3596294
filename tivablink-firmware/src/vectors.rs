//! Device interrupt vector table
//!
//! There is no peripheral access crate in the build, so the firmware
//! provides the device half of the vector table that `cortex-m-rt` places
//! after the core exceptions. Only the Port F line has a handler; every
//! other line falls through to `DefaultHandler`.

use tivablink_hal_tm4c123::nvic::GPIOF_IRQ;
use tivablink_hal_tm4c123::IRQ_COUNT;

/// Device interrupts with a handler, for the `#[interrupt]` attribute
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy)]
pub enum interrupt {
    GPIOF = 30,
}

extern "C" {
    fn GPIOF();
    fn DefaultHandler();
}

#[link_section = ".vector_table.interrupts"]
#[no_mangle]
pub static __INTERRUPTS: [unsafe extern "C" fn(); IRQ_COUNT] = {
    let mut vectors = [DefaultHandler as unsafe extern "C" fn(); IRQ_COUNT];
    vectors[GPIOF_IRQ.0 as usize] = GPIOF;
    vectors
};

const _: () = assert!(interrupt::GPIOF as u16 == GPIOF_IRQ.0);
