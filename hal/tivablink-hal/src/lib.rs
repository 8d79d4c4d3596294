//! tivablink Hardware Abstraction Layer
//!
//! This crate defines the peripheral handle traits used by the firmware
//! logic. Each trait owns exclusive access to one memory-mapped register
//! region, so the same initialization and interrupt code can drive real
//! hardware or a simulated register set.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tivablink-firmware / tivablink-core    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tivablink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ tivablink-hal-│       │ tivablink-core│
//! │    tm4c123    │       │  ::sim        │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioPort`] - Port register block (direction, interrupts, data)
//! - [`sysctl::SystemControl`] - Peripheral clock gating
//! - [`timer::CountdownTimer`] - Periodic down-counting timer
//! - [`nvic::InterruptController`] - Interrupt line priority and enable

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod nvic;
pub mod pins;
pub mod sysctl;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::{GpioPort, GpioRegister, PortPin};
pub use nvic::{InterruptController, IrqNumber, Priority};
pub use pins::PinMask;
pub use sysctl::{Port, SystemControl};
pub use timer::{ClockSource, CountdownTimer};
