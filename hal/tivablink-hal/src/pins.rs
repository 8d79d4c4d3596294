//! Pin masks
//!
//! Every GPIO register on the port holds one bit per pin. Register
//! accessors take a [`PinMask`] rather than a raw integer so that the
//! bits touched by a write are always spelled out by name.

use core::ops::{BitAnd, BitOr, Not};

/// Number of pins on a GPIO port
pub const PINS_PER_PORT: u8 = 8;

/// A set of pins on one GPIO port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMask(u8);

impl PinMask {
    /// No pins
    pub const NONE: PinMask = PinMask(0);

    /// Every pin on the port
    pub const ALL: PinMask = PinMask(0xFF);

    /// Mask for a single pin number (0-7)
    ///
    /// Pin numbers above 7 wrap into the 8-bit range.
    pub const fn pin(n: u8) -> Self {
        Self(1 << (n % PINS_PER_PORT))
    }

    /// Build a mask from raw register bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Build a mask from the low byte of a 32-bit register value
    pub const fn from_register(value: u32) -> Self {
        Self((value & 0xFF) as u8)
    }

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Bits widened to a register value
    pub const fn register_bits(self) -> u32 {
        self.0 as u32
    }

    /// Union of two masks
    pub const fn union(self, other: PinMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Pins present in both masks
    pub const fn intersection(self, other: PinMask) -> Self {
        Self(self.0 & other.0)
    }

    /// Check whether every pin of `other` is in this mask
    pub const fn contains(self, other: PinMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether the masks share any pin
    pub const fn intersects(self, other: PinMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Check whether the mask is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of pins in the mask
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for PinMask {
    type Output = PinMask;

    fn bitor(self, rhs: PinMask) -> PinMask {
        self.union(rhs)
    }
}

impl BitAnd for PinMask {
    type Output = PinMask;

    fn bitand(self, rhs: PinMask) -> PinMask {
        self.intersection(rhs)
    }
}

impl Not for PinMask {
    type Output = PinMask;

    fn not(self) -> PinMask {
        Self(!self.0)
    }
}
