//! Interrupt handlers
//!
//! Plain functions of a port handle. The firmware calls them from its
//! interrupt service routines; the simulator calls them from its
//! dispatcher. Neither handler loops or blocks.

pub mod edge;
pub mod periodic;

pub use edge::{on_button_edge, EdgeReport};
pub use periodic::on_timer_expiry;
