//! Board logic for the tivablink firmware
//!
//! This crate contains everything that does not touch a register address
//! directly:
//!
//! - Board pin map (LEDs, buttons, port interrupt line)
//! - Configuration types and validation
//! - Port and timer initialization sequences
//! - Periodic and edge interrupt handlers
//! - A simulated register set for host tests (`sim` feature)
//!
//! All hardware access goes through the `tivablink-hal` traits, so the
//! firmware passes memory-mapped handles and the tests pass simulated ones.

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod config;
pub mod handlers;
pub mod init;

#[cfg(any(test, feature = "sim"))]
pub mod sim;
