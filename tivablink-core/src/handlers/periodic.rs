//! Timer expiry handler

use tivablink_hal::gpio::GpioPort;
use tivablink_hal::pins::PinMask;

use crate::board::Led;

/// Toggle the green LED, returning the toggled pins
pub fn on_timer_expiry<G: GpioPort>(port: &mut G) -> PinMask {
    let pins = Led::Green.mask();
    port.toggle_pins(pins);
    pins
}
