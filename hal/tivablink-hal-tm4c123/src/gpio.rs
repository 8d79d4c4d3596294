//! GPIO ports for TM4C123
//!
//! Ports are accessed through the APB aperture. The data register has an
//! address-masked window: address bits [9:2] select which pins a read or
//! write affects, so a write through `base + (mask << 2)` changes only
//! the pins in `mask`. Data writes and toggles use that window instead of
//! a read-modify-write of the whole register.

use core::ptr::{read_volatile, write_volatile};

use tivablink_hal::gpio::{GpioPort, GpioRegister};
use tivablink_hal::pins::PinMask;
use tivablink_hal::sysctl::Port;

/// APB base address of a GPIO port
pub const fn apb_base(port: Port) -> usize {
    match port {
        Port::A => 0x4000_4000,
        Port::B => 0x4000_5000,
        Port::C => 0x4000_6000,
        Port::D => 0x4000_7000,
        Port::E => 0x4002_4000,
        Port::F => 0x4002_5000,
    }
}

/// Handle to one GPIO port's register block
pub struct Tm4cGpio {
    base: usize,
}

impl Tm4cGpio {
    /// Create a handle for `port`
    ///
    /// # Safety
    ///
    /// The port clock must be enabled before any register is accessed, and
    /// handles that coexist (for example one per interrupt handler) must
    /// only modify disjoint pins.
    pub const unsafe fn steal(port: Port) -> Self {
        Self {
            base: apb_base(port),
        }
    }

    fn register(&self, reg: GpioRegister) -> *mut u32 {
        (self.base + reg.offset()) as *mut u32
    }

    fn masked_data(&self, pins: PinMask) -> *mut u32 {
        (self.base + ((pins.bits() as usize) << 2)) as *mut u32
    }
}

impl GpioPort for Tm4cGpio {
    fn read(&self, reg: GpioRegister) -> u32 {
        // SAFETY: the address is inside this port's register block
        unsafe { read_volatile(self.register(reg)) }
    }

    fn write(&mut self, reg: GpioRegister, value: u32) {
        // SAFETY: the address is inside this port's register block
        unsafe { write_volatile(self.register(reg), value) }
    }

    fn read_data(&self, pins: PinMask) -> PinMask {
        // SAFETY: masked data window of this port
        PinMask::from_register(unsafe { read_volatile(self.masked_data(pins)) })
    }

    fn write_data(&mut self, pins: PinMask, levels: PinMask) {
        // SAFETY: masked data window of this port
        unsafe { write_volatile(self.masked_data(pins), levels.register_bits()) }
    }

    /// Toggle through the masked window
    ///
    /// Only `pins` are read and written. A handler that preempts between
    /// the read and the write and changes other pins keeps its change, so
    /// no critical section is needed as long as preempting handlers never
    /// toggle the same pins.
    fn toggle_pins(&mut self, pins: PinMask) {
        let addr = self.masked_data(pins);
        // SAFETY: masked data window of this port
        unsafe {
            let current = read_volatile(addr);
            write_volatile(addr, !current & pins.register_bits());
        }
    }
}
