//! Configuration types
//!
//! Board configuration is fixed at build time; the firmware's build script
//! turns `board.toml` into a [`BlinkConfig`] constant.

pub mod types;

pub use types::*;
