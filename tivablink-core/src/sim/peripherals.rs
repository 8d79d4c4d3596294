//! Simulated system control, timer and interrupt controller

use core::cell::Cell;

use tivablink_hal::nvic::{InterruptController, IrqNumber, Priority};
use tivablink_hal::sysctl::{Port, SystemControl};
use tivablink_hal::timer::{ClockSource, CountdownTimer, MAX_RELOAD};

use super::{SimBus, SimEvent};

/// Polls of the ready register before a freshly clocked port reports ready
pub const READY_DELAY_POLLS: u32 = 2;

/// Interrupt lines modelled by [`SimNvic`]
pub const SIM_IRQ_LINES: usize = 64;

/// Simulated system control block
pub struct SimSysCtl<'a> {
    bus: &'a SimBus,
    polls: Cell<u32>,
}

impl<'a> SimSysCtl<'a> {
    pub fn new(bus: &'a SimBus) -> Self {
        Self {
            bus,
            polls: Cell::new(0),
        }
    }
}

impl SystemControl for SimSysCtl<'_> {
    fn enable_gpio_clock(&mut self, port: Port) {
        self.bus.enable_gpio_clock(port);
        self.polls.set(0);
    }

    fn gpio_ready(&self, port: Port) -> bool {
        if !self.bus.gpio_clock_enabled(port) {
            return false;
        }
        let polls = self.polls.get();
        if polls >= READY_DELAY_POLLS {
            return true;
        }
        self.polls.set(polls + 1);
        false
    }
}

/// Simulated SysTick
///
/// Time only passes through [`SimTimer::advance`]. Each wrap with the
/// interrupt enabled adds one pending handler run; handlers are assumed to
/// finish before the next wrap, so wraps never coalesce.
pub struct SimTimer<'a> {
    bus: &'a SimBus,
    running: bool,
    interrupt: bool,
    source: ClockSource,
    reload: u32,
    current: u32,
    pending: u64,
}

impl<'a> SimTimer<'a> {
    pub fn new(bus: &'a SimBus) -> Self {
        Self {
            bus,
            running: false,
            interrupt: false,
            source: ClockSource::External,
            reload: 0,
            current: 0,
            pending: 0,
        }
    }

    /// Current count
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Selected clock source
    pub fn source(&self) -> ClockSource {
        self.source
    }

    /// Count `ticks` clock cycles, returning the number of wraps to zero
    ///
    /// The counter loads the reload value on the tick after it reads zero
    /// and wraps when it counts from 1 to 0, so one period is
    /// `reload + 1` ticks. A reload of zero never wraps.
    pub fn advance(&mut self, ticks: u64) -> u64 {
        if !self.running || self.reload == 0 {
            return 0;
        }

        let period = self.reload as u64 + 1;
        let until_wrap = if self.current == 0 {
            period
        } else {
            self.current as u64
        };

        let (wraps, remaining) = if ticks < until_wrap {
            (0, until_wrap - ticks)
        } else {
            let over = ticks - until_wrap;
            (1 + over / period, period - over % period)
        };

        self.current = if remaining == period {
            0
        } else {
            remaining as u32
        };
        if self.interrupt {
            self.pending += wraps;
        }
        wraps
    }

    /// Take the handler runs requested since the last call
    pub fn take_pending(&mut self) -> u64 {
        core::mem::take(&mut self.pending)
    }
}

impl CountdownTimer for SimTimer<'_> {
    fn disable(&mut self) {
        self.bus.record(SimEvent::TimerDisable);
        self.running = false;
        self.interrupt = false;
    }

    fn set_reload(&mut self, reload: u32) {
        self.bus.record(SimEvent::TimerReload(reload));
        self.reload = reload & MAX_RELOAD;
    }

    fn reload(&self) -> u32 {
        self.reload
    }

    fn clear_current(&mut self) {
        self.bus.record(SimEvent::TimerClear);
        self.current = 0;
    }

    fn enable(&mut self, source: ClockSource, interrupt: bool) {
        self.bus.record(SimEvent::TimerEnable { source, interrupt });
        self.source = source;
        self.interrupt = interrupt;
        self.running = true;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn interrupt_enabled(&self) -> bool {
        self.interrupt
    }
}

/// Simulated NVIC
///
/// Lines at or above [`SIM_IRQ_LINES`] are ignored.
pub struct SimNvic<'a> {
    bus: &'a SimBus,
    enabled: u64,
    priorities: [Priority; SIM_IRQ_LINES],
}

impl<'a> SimNvic<'a> {
    pub fn new(bus: &'a SimBus) -> Self {
        Self {
            bus,
            enabled: 0,
            priorities: [Priority::HIGHEST; SIM_IRQ_LINES],
        }
    }

    fn line(irq: IrqNumber) -> Option<usize> {
        let n = irq.0 as usize;
        (n < SIM_IRQ_LINES).then_some(n)
    }
}

impl InterruptController for SimNvic<'_> {
    fn set_priority(&mut self, irq: IrqNumber, priority: Priority) {
        if let Some(n) = Self::line(irq) {
            self.bus.record(SimEvent::Priority(irq, priority));
            self.priorities[n] = priority;
        }
    }

    fn priority(&self, irq: IrqNumber) -> Priority {
        Self::line(irq)
            .map(|n| self.priorities[n])
            .unwrap_or(Priority::HIGHEST)
    }

    fn enable(&mut self, irq: IrqNumber) {
        if let Some(n) = Self::line(irq) {
            self.bus.record(SimEvent::IrqEnable(irq));
            self.enabled |= 1 << n;
        }
    }

    fn is_enabled(&self, irq: IrqNumber) -> bool {
        Self::line(irq).is_some_and(|n| self.enabled & (1 << n) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running_timer(bus: &SimBus, reload: u32) -> SimTimer<'_> {
        let mut timer = SimTimer::new(bus);
        timer.set_reload(reload);
        timer.clear_current();
        timer.enable(ClockSource::Core, true);
        timer
    }

    #[test]
    fn test_ready_after_delay() {
        let bus = SimBus::new();
        let mut sysctl = SimSysCtl::new(&bus);

        assert!(!sysctl.gpio_ready(Port::F));
        sysctl.enable_gpio(Port::F);
        assert!(sysctl.gpio_ready(Port::F));
        assert!(!sysctl.gpio_ready(Port::A));
    }

    #[test]
    fn test_timer_period_is_reload_plus_one() {
        let bus = SimBus::new();
        let mut timer = running_timer(&bus, 9);

        assert_eq!(timer.advance(9), 0);
        assert_eq!(timer.advance(1), 1);
        assert_eq!(timer.current(), 0);
        assert_eq!(timer.advance(25), 2);
        assert_eq!(timer.current(), 5);
        assert_eq!(timer.take_pending(), 3);
        assert_eq!(timer.take_pending(), 0);
    }

    #[test]
    fn test_stopped_timer_never_wraps() {
        let bus = SimBus::new();
        let mut timer = running_timer(&bus, 9);
        timer.disable();
        assert_eq!(timer.advance(1_000), 0);

        let mut timer = running_timer(&bus, 0);
        assert_eq!(timer.advance(1_000), 0);
    }

    #[test]
    fn test_wraps_without_interrupt_are_not_pending() {
        let bus = SimBus::new();
        let mut timer = running_timer(&bus, 9);
        timer.enable(ClockSource::Core, false);
        assert_eq!(timer.advance(20), 2);
        assert_eq!(timer.take_pending(), 0);
    }

    #[test]
    fn test_nvic_lines() {
        let bus = SimBus::new();
        let mut nvic = SimNvic::new(&bus);
        let irq = IrqNumber(30);
        let p = Priority::new(3).unwrap();

        nvic.set_priority(irq, p);
        nvic.enable(irq);
        assert_eq!(nvic.priority(irq), p);
        assert!(nvic.is_enabled(irq));
        assert!(!nvic.is_enabled(IrqNumber(31)));

        nvic.enable(IrqNumber(200));
        assert!(!nvic.is_enabled(IrqNumber(200)));
    }

    proptest! {
        #[test]
        fn prop_wraps_match_elapsed_periods(reload in 1u32..10_000, ticks in 0u64..1_000_000) {
            let bus = SimBus::new();
            let mut timer = running_timer(&bus, reload);
            let wraps = timer.advance(ticks);
            prop_assert_eq!(wraps, ticks / (reload as u64 + 1));
        }

        #[test]
        fn prop_split_advance_is_consistent(reload in 1u32..1_000, a in 0u64..10_000, b in 0u64..10_000) {
            let bus = SimBus::new();
            let mut split = running_timer(&bus, reload);
            let mut whole = running_timer(&bus, reload);
            let wraps = split.advance(a) + split.advance(b);
            prop_assert_eq!(wraps, whole.advance(a + b));
            prop_assert_eq!(split.current(), whole.current());
        }
    }
}
