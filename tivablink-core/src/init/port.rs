//! Port initialization
//!
//! Brings up the LED/switch port: clock, unlock of the protected switch
//! pin, pin function, pull-ups, falling-edge interrupts, and finally the
//! interrupt line at the controller.

use tivablink_hal::gpio::{GpioPort, GpioRegister};
use tivablink_hal::nvic::{InterruptController, Priority};
use tivablink_hal::sysctl::SystemControl;

use crate::board::{BUTTONS, LEDS, PORT, PORT_IRQ, USED_PINS};

/// Configure the board port and enable its interrupt line
///
/// Every step sets or clears bits, so running it twice leaves the same
/// register state as running it once. The interrupt line is enabled last;
/// nothing fires while the port is half configured.
pub fn init_port<S, G, N>(sysctl: &mut S, port: &mut G, nvic: &mut N, priority: Priority)
where
    S: SystemControl,
    G: GpioPort,
    N: InterruptController,
{
    // Registers are only accessible once the port reports ready
    sysctl.enable_gpio(PORT);

    // SW2 (PF0) is locked after reset
    port.unlock_commit(BUTTONS);

    port.set_pins(GpioRegister::Dir, LEDS);
    port.clear_pins(GpioRegister::Dir, BUTTONS);

    port.clear_pins(GpioRegister::Afsel, USED_PINS);
    port.clear_pins(GpioRegister::Amsel, USED_PINS);
    port.set_pins(GpioRegister::Den, USED_PINS);

    port.set_pins(GpioRegister::Pur, BUTTONS);

    // Edge sensitive, single edge, falling
    port.clear_pins(GpioRegister::Is, BUTTONS);
    port.clear_pins(GpioRegister::Ibe, BUTTONS);
    port.clear_pins(GpioRegister::Iev, BUTTONS);
    port.clear_interrupts(BUTTONS);
    port.set_pins(GpioRegister::Im, BUTTONS);

    nvic.set_priority(PORT_IRQ, priority);
    nvic.enable(PORT_IRQ);
}
