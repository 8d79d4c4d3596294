//! GPIO port abstractions
//!
//! A [`GpioPort`] is a handle owning one port's register block. Chip HALs
//! implement the two raw accessors; everything above them is expressed in
//! terms of [`PinMask`] so that each write names the pins it affects.

use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};

use crate::pins::PinMask;

/// Value that opens the commit register of a locked port
pub const UNLOCK_KEY: u32 = 0x4C4F_434B;

/// Number of registers in [`GpioRegister`]
pub const REGISTER_COUNT: usize = 16;

/// Logical registers of a GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioRegister {
    /// Pin levels (all pins visible)
    Data,
    /// Direction: 1 = output
    Dir,
    /// Interrupt sense: 1 = level, 0 = edge
    Is,
    /// Interrupt both edges: 1 = both, 0 = controlled by `Iev`
    Ibe,
    /// Interrupt event: 1 = rising edge / high level, 0 = falling edge / low level
    Iev,
    /// Interrupt mask: 1 = interrupt forwarded to the controller
    Im,
    /// Raw interrupt status
    Ris,
    /// Masked interrupt status (`Ris & Im`)
    Mis,
    /// Interrupt clear, write 1 to clear
    Icr,
    /// Alternate function select
    Afsel,
    /// Pull-up enable
    Pur,
    /// Digital enable
    Den,
    /// Commit lock
    Lock,
    /// Commit register, gates writes to protected pins
    Cr,
    /// Analog mode select
    Amsel,
    /// Port control (alternate function mux)
    Pctl,
}

impl GpioRegister {
    /// Every register, in address order
    pub const ALL: [GpioRegister; REGISTER_COUNT] = [
        GpioRegister::Data,
        GpioRegister::Dir,
        GpioRegister::Is,
        GpioRegister::Ibe,
        GpioRegister::Iev,
        GpioRegister::Im,
        GpioRegister::Ris,
        GpioRegister::Mis,
        GpioRegister::Icr,
        GpioRegister::Afsel,
        GpioRegister::Pur,
        GpioRegister::Den,
        GpioRegister::Lock,
        GpioRegister::Cr,
        GpioRegister::Amsel,
        GpioRegister::Pctl,
    ];

    /// Byte offset from the port base address
    pub const fn offset(self) -> usize {
        match self {
            GpioRegister::Data => 0x3FC,
            GpioRegister::Dir => 0x400,
            GpioRegister::Is => 0x404,
            GpioRegister::Ibe => 0x408,
            GpioRegister::Iev => 0x40C,
            GpioRegister::Im => 0x410,
            GpioRegister::Ris => 0x414,
            GpioRegister::Mis => 0x418,
            GpioRegister::Icr => 0x41C,
            GpioRegister::Afsel => 0x420,
            GpioRegister::Pur => 0x510,
            GpioRegister::Den => 0x51C,
            GpioRegister::Lock => 0x520,
            GpioRegister::Cr => 0x524,
            GpioRegister::Amsel => 0x528,
            GpioRegister::Pctl => 0x52C,
        }
    }

    /// Position in [`GpioRegister::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// GPIO port register block
///
/// Implementations only provide raw 32-bit access. The provided methods
/// build the pin-level operations on top and may be overridden where the
/// hardware offers a better primitive (for example an address-masked data
/// window that makes single-bit writes atomic).
pub trait GpioPort {
    /// Read a register
    fn read(&self, reg: GpioRegister) -> u32;

    /// Write a register
    fn write(&mut self, reg: GpioRegister, value: u32);

    /// Set the bits for `pins`, leaving other pins untouched
    fn set_pins(&mut self, reg: GpioRegister, pins: PinMask) {
        let value = self.read(reg);
        self.write(reg, value | pins.register_bits());
    }

    /// Clear the bits for `pins`, leaving other pins untouched
    fn clear_pins(&mut self, reg: GpioRegister, pins: PinMask) {
        let value = self.read(reg);
        self.write(reg, value & !pins.register_bits());
    }

    /// Set or clear the bits for `pins`
    fn assign_pins(&mut self, reg: GpioRegister, pins: PinMask, set: bool) {
        if set {
            self.set_pins(reg, pins);
        } else {
            self.clear_pins(reg, pins);
        }
    }

    /// Which of `pins` currently read as 1 in `reg`
    fn pins_set(&self, reg: GpioRegister, pins: PinMask) -> PinMask {
        PinMask::from_register(self.read(reg)) & pins
    }

    /// Which of `pins` are at a high level
    fn read_data(&self, pins: PinMask) -> PinMask {
        self.pins_set(GpioRegister::Data, pins)
    }

    /// Drive `pins` to the levels given in `levels`
    ///
    /// The default read-modify-write runs inside a critical section so an
    /// interrupt handler cannot change the data register between the read
    /// and the write.
    fn write_data(&mut self, pins: PinMask, levels: PinMask) {
        critical_section::with(|_| {
            let value = self.read(GpioRegister::Data);
            let value = (value & !pins.register_bits()) | (levels & pins).register_bits();
            self.write(GpioRegister::Data, value);
        });
    }

    /// Invert the output level of `pins`
    ///
    /// Must be atomic with respect to interrupt preemption: a handler that
    /// preempts the toggle and changes other pins must not lose its change.
    /// The default achieves this with a critical section.
    fn toggle_pins(&mut self, pins: PinMask) {
        critical_section::with(|_| {
            let value = self.read(GpioRegister::Data);
            self.write(GpioRegister::Data, value ^ pins.register_bits());
        });
    }

    /// Pending interrupts that are forwarded to the controller
    fn interrupt_status(&self) -> PinMask {
        PinMask::from_register(self.read(GpioRegister::Mis))
    }

    /// Pending interrupts, masked or not
    fn raw_interrupt_status(&self) -> PinMask {
        PinMask::from_register(self.read(GpioRegister::Ris))
    }

    /// Clear the pending flags for exactly `pins`
    ///
    /// The clear register is write-1-to-clear, so this is a plain write and
    /// never disturbs the flags of other pins.
    fn clear_interrupts(&mut self, pins: PinMask) {
        self.write(GpioRegister::Icr, pins.register_bits());
    }

    /// Allow configuration writes to the protected `pins`
    ///
    /// Opens the lock, sets the commit bits and locks the port again.
    fn unlock_commit(&mut self, pins: PinMask) {
        self.write(GpioRegister::Lock, UNLOCK_KEY);
        self.set_pins(GpioRegister::Cr, pins);
        self.write(GpioRegister::Lock, 0);
    }
}

/// Digital pin (or pin group) on a borrowed port
///
/// Implements the `embedded-hal` digital traits so that board code can
/// drive individual LEDs without touching register bits. For a group of
/// pins, "high" means every pin in the group is high.
pub struct PortPin<'a, G> {
    port: &'a mut G,
    pins: PinMask,
}

impl<'a, G: GpioPort> PortPin<'a, G> {
    /// Wrap `pins` of `port`
    pub fn new(port: &'a mut G, pins: PinMask) -> Self {
        Self { port, pins }
    }

    /// Pins controlled by this handle
    pub fn pins(&self) -> PinMask {
        self.pins
    }
}

impl<G: GpioPort> ErrorType for PortPin<'_, G> {
    type Error = core::convert::Infallible;
}

impl<G: GpioPort> OutputPin for PortPin<'_, G> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.port.write_data(self.pins, PinMask::NONE);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.port.write_data(self.pins, self.pins);
        Ok(())
    }
}

impl<G: GpioPort> StatefulOutputPin for PortPin<'_, G> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.read_data(self.pins) == self.pins)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.read_data(self.pins).is_empty())
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.port.toggle_pins(self.pins);
        Ok(())
    }
}

impl<G: GpioPort> InputPin for PortPin<'_, G> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.read_data(self.pins) == self.pins)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.port.read_data(self.pins).is_empty())
    }
}
