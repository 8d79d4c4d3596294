//! Interrupt controller abstractions

/// Number of priority bits implemented by the controller
pub const PRIORITY_BITS: u8 = 3;

/// Lowest priority level (highest number)
pub const LOWEST_PRIORITY: u8 = (1 << PRIORITY_BITS) - 1;

/// Device interrupt line number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqNumber(pub u16);

/// Interrupt priority level
///
/// Lower levels preempt higher ones. The controller only implements the
/// top [`PRIORITY_BITS`] of each 8-bit priority field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    /// Highest priority
    pub const HIGHEST: Priority = Priority(0);

    /// Lowest priority
    pub const LOWEST: Priority = Priority(LOWEST_PRIORITY);

    /// Create a priority level, `None` if it is not implemented
    pub const fn new(level: u8) -> Option<Self> {
        if level > LOWEST_PRIORITY {
            None
        } else {
            Some(Self(level))
        }
    }

    /// Decode a raw 8-bit priority field
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw >> (8 - PRIORITY_BITS))
    }

    /// Logical level (0 = highest)
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Value written to the 8-bit priority field
    pub const fn raw(self) -> u8 {
        self.0 << (8 - PRIORITY_BITS)
    }

    /// Check whether an interrupt at this level preempts one at `other`
    pub const fn preempts(self, other: Priority) -> bool {
        self.0 < other.0
    }
}

/// Nested vectored interrupt controller
pub trait InterruptController {
    /// Set the priority of an interrupt line
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority);

    /// Current priority of an interrupt line
    fn priority(&self, irq: IrqNumber) -> Priority;

    /// Enable an interrupt line
    fn enable(&mut self, irq: IrqNumber);

    /// Check whether an interrupt line is enabled
    fn is_enabled(&self, irq: IrqNumber) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_encoding() {
        let p = Priority::new(3).unwrap();
        assert_eq!(p.raw(), 0x60);
        assert_eq!(Priority::from_raw(0x60), p);
        assert_eq!(Priority::from_raw(0x7F), p);
        assert_eq!(Priority::LOWEST.raw(), 0xE0);
    }

    #[test]
    fn test_priority_range() {
        assert!(Priority::new(7).is_some());
        assert!(Priority::new(8).is_none());
    }

    #[test]
    fn test_preemption_order() {
        assert!(Priority::HIGHEST.preempts(Priority::new(3).unwrap()));
        assert!(!Priority::new(3).unwrap().preempts(Priority::new(3).unwrap()));
    }
}
