//! Peripheral initialization
//!
//! Start-up routines. They run before the port interrupt is enabled, so
//! they take no critical sections; calling them again once interrupts are
//! live is not supported.

pub mod port;
pub mod timer;

pub use port::init_port;
pub use timer::{init_timer, ReloadValue, TimerError};

use tivablink_hal::gpio::GpioPort;
use tivablink_hal::nvic::InterruptController;
use tivablink_hal::sysctl::SystemControl;
use tivablink_hal::timer::CountdownTimer;

use crate::config::{BlinkConfig, ConfigError};

/// Validate `config`, then initialize the port and the timer
///
/// Nothing is written to the hardware if the configuration is invalid.
/// Returns the programmed reload value.
pub fn init_board<S, G, N, T>(
    sysctl: &mut S,
    port: &mut G,
    nvic: &mut N,
    timer: &mut T,
    config: &BlinkConfig,
) -> Result<ReloadValue, ConfigError>
where
    S: SystemControl,
    G: GpioPort,
    N: InterruptController,
    T: CountdownTimer,
{
    let reload = config.reload_value()?;
    let priority = config.port_priority()?;

    init_port(sysctl, port, nvic, priority);
    init_timer(timer, reload);

    Ok(reload)
}
