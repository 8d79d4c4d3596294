//! LaunchPad pin map
//!
//! The EK-TM4C123GXL wires an RGB LED and both user switches to Port F.
//! The switches connect their pin to ground when pressed, so an enabled
//! pull-up makes an idle switch read high and a press produce a falling
//! edge.

use tivablink_hal::nvic::IrqNumber;
use tivablink_hal::pins::PinMask;
use tivablink_hal::sysctl::Port;

/// Port carrying the LEDs and switches
pub const PORT: Port = Port::F;

/// Interrupt line of [`PORT`]
pub const PORT_IRQ: IrqNumber = IrqNumber(30);

/// PF1
pub const RED_LED: PinMask = PinMask::pin(1);
/// PF2
pub const BLUE_LED: PinMask = PinMask::pin(2);
/// PF3
pub const GREEN_LED: PinMask = PinMask::pin(3);

/// PF4
pub const SW1: PinMask = PinMask::pin(4);
/// PF0, locked after reset
pub const SW2: PinMask = PinMask::pin(0);

/// All LED pins
pub const LEDS: PinMask = RED_LED.union(BLUE_LED).union(GREEN_LED);

/// All switch pins
pub const BUTTONS: PinMask = SW1.union(SW2);

/// Every pin used by the board
pub const USED_PINS: PinMask = LEDS.union(BUTTONS);

/// On-board LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    Red,
    Blue,
    Green,
}

impl Led {
    /// Every LED
    pub const ALL: [Led; 3] = [Led::Red, Led::Blue, Led::Green];

    /// Pin driving this LED
    pub const fn mask(self) -> PinMask {
        match self {
            Led::Red => RED_LED,
            Led::Blue => BLUE_LED,
            Led::Green => GREEN_LED,
        }
    }
}

/// User switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Sw1,
    Sw2,
}

impl Button {
    /// Every switch
    pub const ALL: [Button; 2] = [Button::Sw1, Button::Sw2];

    /// Pin reading this switch
    pub const fn mask(self) -> PinMask {
        match self {
            Button::Sw1 => SW1,
            Button::Sw2 => SW2,
        }
    }

    /// LED toggled by a press of this switch
    pub const fn led(self) -> Led {
        match self {
            Button::Sw1 => Led::Blue,
            Button::Sw2 => Led::Red,
        }
    }
}
