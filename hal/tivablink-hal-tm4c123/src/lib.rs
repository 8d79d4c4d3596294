//! TM4C123-specific HAL for the tivablink firmware
//!
//! Memory-mapped implementations of the `tivablink-hal` traits for the
//! TM4C123GH6PM:
//!
//! - [`gpio::Tm4cGpio`] - GPIO ports on the APB aperture
//! - [`sysctl::Tm4cSysCtl`] - GPIO run-mode clock gating
//! - [`systick::Tm4cSysTick`] - SysTick through `cortex_m::peripheral::SYST`
//! - [`nvic::Tm4cNvic`] - NVIC through `cortex_m::peripheral::NVIC`
//!
//! # Safety
//!
//! The GPIO and system control handles are created with `steal`, which
//! hands out access to a fixed register block. Firmware must make sure
//! that handles used from different interrupt priorities only touch
//! disjoint pins.

#![no_std]

pub mod gpio;
pub mod nvic;
pub mod sysctl;
pub mod systick;

pub use gpio::Tm4cGpio;
pub use nvic::Tm4cNvic;
pub use sysctl::Tm4cSysCtl;
pub use systick::Tm4cSysTick;

/// Core clock after reset (precision internal oscillator)
pub const PIOSC_HZ: u32 = 16_000_000;

/// Number of device interrupt lines
pub const IRQ_COUNT: usize = 139;
