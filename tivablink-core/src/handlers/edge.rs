//! Switch edge handler

use tivablink_hal::gpio::GpioPort;
use tivablink_hal::pins::PinMask;

use crate::board::Button;

/// What one run of the edge handler serviced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeReport {
    /// Switches whose pending flag was serviced
    pub buttons: PinMask,
    /// LEDs that were toggled
    pub leds: PinMask,
}

impl EdgeReport {
    /// Check whether `button` was serviced
    pub fn serviced(&self, button: Button) -> bool {
        self.buttons.contains(button.mask())
    }

    /// Check whether nothing was pending
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Combine with the report of a later run
    pub fn merge(self, other: EdgeReport) -> Self {
        Self {
            buttons: self.buttons | other.buttons,
            leds: self.leds | other.leds,
        }
    }
}

/// Service pending switch interrupts
///
/// For each switch with a pending flag: toggle its LED, then clear that
/// switch's flag alone. A flag raised by the other switch in between is
/// left pending and is either serviced by the next check or re-enters the
/// handler.
pub fn on_button_edge<G: GpioPort>(port: &mut G) -> EdgeReport {
    let mut report = EdgeReport::default();

    for button in Button::ALL {
        let pin = button.mask();
        if port.interrupt_status().contains(pin) {
            let led = button.led().mask();
            port.toggle_pins(led);
            port.clear_interrupts(pin);

            report.buttons = report.buttons | pin;
            report.leds = report.leds | led;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BLUE_LED, GREEN_LED, RED_LED, SW1, SW2};
    use tivablink_hal::gpio::GpioRegister;

    /// Data latch plus write-1-to-clear status
    struct MockPort {
        data: u32,
        mis: u32,
        clears: heapless::Vec<u32, 4>,
    }

    impl MockPort {
        fn pending(mis: PinMask) -> Self {
            Self {
                data: 0,
                mis: mis.register_bits(),
                clears: heapless::Vec::new(),
            }
        }
    }

    impl GpioPort for MockPort {
        fn read(&self, reg: GpioRegister) -> u32 {
            match reg {
                GpioRegister::Data => self.data,
                GpioRegister::Mis | GpioRegister::Ris => self.mis,
                _ => 0,
            }
        }

        fn write(&mut self, reg: GpioRegister, value: u32) {
            match reg {
                GpioRegister::Data => self.data = value,
                GpioRegister::Icr => {
                    self.mis &= !value;
                    self.clears.push(value).unwrap();
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_sw1_toggles_blue() {
        let mut port = MockPort::pending(SW1);
        let report = on_button_edge(&mut port);

        assert_eq!(port.data, BLUE_LED.register_bits());
        assert_eq!(port.mis, 0);
        assert!(report.serviced(Button::Sw1));
        assert!(!report.serviced(Button::Sw2));
        assert_eq!(report.leds, BLUE_LED);
    }

    #[test]
    fn test_sw2_toggles_red() {
        let mut port = MockPort::pending(SW2);
        let report = on_button_edge(&mut port);

        assert_eq!(port.data, RED_LED.register_bits());
        assert_eq!(port.mis, 0);
        assert_eq!(report.buttons, SW2);
    }

    #[test]
    fn test_both_pending_cleared_individually() {
        let mut port = MockPort::pending(SW1 | SW2);
        let report = on_button_edge(&mut port);

        assert_eq!(port.data, (RED_LED | BLUE_LED).register_bits());
        assert_eq!(port.mis, 0);
        // One write per switch, never a blanket clear
        assert_eq!(port.clears.len(), 2);
        for clear in &port.clears {
            assert_eq!(clear.count_ones(), 1);
        }
        assert_eq!(report.leds, RED_LED | BLUE_LED);
        assert!(!report.leds.contains(GREEN_LED));
    }

    #[test]
    fn test_nothing_pending() {
        let mut port = MockPort::pending(PinMask::NONE);
        let report = on_button_edge(&mut port);

        assert!(report.is_empty());
        assert_eq!(port.data, 0);
        assert!(port.clears.is_empty());
    }

    #[test]
    fn test_merge_reports() {
        let a = EdgeReport {
            buttons: SW1,
            leds: BLUE_LED,
        };
        let b = EdgeReport {
            buttons: SW2,
            leds: RED_LED,
        };
        let merged = a.merge(b);
        assert!(merged.serviced(Button::Sw1));
        assert!(merged.serviced(Button::Sw2));
        assert_eq!(merged.leds, RED_LED | BLUE_LED);
    }
}
