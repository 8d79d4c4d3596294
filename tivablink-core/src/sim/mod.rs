//! Simulated board for host tests
//!
//! A register-level stand-in for the LaunchPad: every HAL trait is
//! implemented by a simulated peripheral, and [`SimBoard`] plays the role
//! of the interrupt controller by running the handlers whenever their
//! interrupt would be taken on hardware.
//!
//! ```text
//! ┌──────────┐ press/release ┌──────────┐  MIS != 0   ┌───────────────┐
//! │   test   │──────────────►│ SimPort  │────────────►│ on_button_edge│
//! └──────────┘               └──────────┘             └───────────────┘
//!      │ advance             ┌──────────┐  wraps      ┌────────────────┐
//!      └────────────────────►│ SimTimer │────────────►│ on_timer_expiry│
//!                            └──────────┘             └────────────────┘
//! ```
//!
//! All peripherals share a [`SimBus`], which holds the clock gates and an
//! ordered log of every register write.

mod peripherals;
mod port;

pub use peripherals::{SimNvic, SimSysCtl, SimTimer, READY_DELAY_POLLS, SIM_IRQ_LINES};
pub use port::SimPort;

use core::cell::{Cell, RefCell};

use heapless::Vec;
use tivablink_hal::gpio::{GpioPort, GpioRegister};
use tivablink_hal::nvic::{InterruptController, IrqNumber, Priority};
use tivablink_hal::pins::PinMask;
use tivablink_hal::sysctl::Port;
use tivablink_hal::timer::ClockSource;

use crate::board::{Button, Led, LEDS, PORT_IRQ};
use crate::config::{BlinkConfig, ConfigError};
use crate::handlers::{on_button_edge, on_timer_expiry, EdgeReport};
use crate::init::{init_board, ReloadValue};

/// Entries kept in the event log; later events are dropped
pub const LOG_CAPACITY: usize = 64;

/// Back-to-back edge handler runs before the dispatcher gives up
pub const MAX_EDGE_RUNS: u32 = 8;

/// Observable hardware event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// GPIO port clock gated on
    GpioClock(Port),
    /// Register write on a clocked port
    PortWrite(GpioRegister, u32),
    /// Access to a port whose clock is off
    BusFault(GpioRegister),
    /// Interrupt priority set
    Priority(IrqNumber, Priority),
    /// Interrupt line enabled
    IrqEnable(IrqNumber),
    TimerDisable,
    TimerClear,
    TimerReload(u32),
    TimerEnable {
        source: ClockSource,
        interrupt: bool,
    },
}

/// State shared by the simulated peripherals
#[derive(Default)]
pub struct SimBus {
    events: RefCell<Vec<SimEvent, LOG_CAPACITY>>,
    dropped: Cell<usize>,
    gpio_clocks: Cell<u32>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the event log
    pub fn record(&self, event: SimEvent) {
        if self.events.borrow_mut().push(event).is_err() {
            self.dropped.set(self.dropped.get() + 1);
        }
    }

    /// Copy of the event log
    pub fn events(&self) -> Vec<SimEvent, LOG_CAPACITY> {
        self.events.borrow().clone()
    }

    /// Events that did not fit the log
    pub fn dropped(&self) -> usize {
        self.dropped.get()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
        self.dropped.set(0);
    }

    /// Index of the first event matching `pred`
    pub fn position(&self, pred: impl Fn(&SimEvent) -> bool) -> Option<usize> {
        self.events.borrow().iter().position(pred)
    }

    /// Index of the last event matching `pred`
    pub fn last_position(&self, pred: impl Fn(&SimEvent) -> bool) -> Option<usize> {
        self.events.borrow().iter().rposition(pred)
    }

    /// Number of events matching `pred`
    pub fn count(&self, pred: impl Fn(&SimEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|&e| pred(e)).count()
    }

    /// Gate a port clock on
    pub fn enable_gpio_clock(&self, port: Port) {
        self.gpio_clocks.set(self.gpio_clocks.get() | port.mask());
        self.record(SimEvent::GpioClock(port));
    }

    pub fn gpio_clock_enabled(&self, port: Port) -> bool {
        self.gpio_clocks.get() & port.mask() != 0
    }
}

/// Dispatcher failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// The edge handler returned with its interrupt still pending
    /// [`MAX_EDGE_RUNS`] times in a row
    InterruptStorm,
}

/// Handler runs performed by one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub timer_runs: u64,
    pub edge_runs: u32,
    /// Everything serviced by the edge handler runs
    pub edges: EdgeReport,
}

/// LaunchPad with simulated peripherals
pub struct SimBoard<'a> {
    pub sysctl: SimSysCtl<'a>,
    pub port: SimPort<'a>,
    pub nvic: SimNvic<'a>,
    pub timer: SimTimer<'a>,
    /// Priority of the timer exception (SysTick resets to the highest)
    pub timer_priority: Priority,
}

impl<'a> SimBoard<'a> {
    /// Board straight out of reset
    pub fn new(bus: &'a SimBus) -> Self {
        Self {
            sysctl: SimSysCtl::new(bus),
            port: SimPort::port_f(bus),
            nvic: SimNvic::new(bus),
            timer: SimTimer::new(bus),
            timer_priority: Priority::HIGHEST,
        }
    }

    /// Run the board initializer
    pub fn init(&mut self, config: &BlinkConfig) -> Result<ReloadValue, ConfigError> {
        init_board(
            &mut self.sysctl,
            &mut self.port,
            &mut self.nvic,
            &mut self.timer,
            config,
        )
    }

    /// Push a switch down and take any resulting interrupts
    pub fn press(&mut self, button: Button) -> Result<Dispatch, SimError> {
        self.port.press(button.mask());
        self.dispatch()
    }

    /// Let a switch go and take any resulting interrupts
    pub fn release(&mut self, button: Button) -> Result<Dispatch, SimError> {
        self.port.release(button.mask());
        self.dispatch()
    }

    /// Let `ticks` core clock cycles pass and take any resulting interrupts
    pub fn advance(&mut self, ticks: u64) -> Result<Dispatch, SimError> {
        self.timer.advance(ticks);
        self.dispatch()
    }

    /// Take every pending interrupt using the board handlers
    pub fn dispatch(&mut self) -> Result<Dispatch, SimError> {
        self.dispatch_with(on_button_edge)
    }

    /// Take every pending interrupt, servicing the port with `edge`
    ///
    /// Pending interrupts are taken in priority order; the timer wins a
    /// tie. The port handler is re-entered for as long as its interrupt
    /// stays pending, as tail-chaining would on hardware.
    pub fn dispatch_with<F>(&mut self, mut edge: F) -> Result<Dispatch, SimError>
    where
        F: FnMut(&mut SimPort<'a>) -> EdgeReport,
    {
        let mut dispatch = Dispatch::default();
        let port_priority = self.nvic.priority(PORT_IRQ);

        if port_priority.preempts(self.timer_priority) {
            self.run_edges(&mut edge, &mut dispatch)?;
            self.run_timer(&mut dispatch);
        } else {
            self.run_timer(&mut dispatch);
            self.run_edges(&mut edge, &mut dispatch)?;
        }

        Ok(dispatch)
    }

    fn run_timer(&mut self, dispatch: &mut Dispatch) {
        let runs = self.timer.take_pending();
        for _ in 0..runs {
            on_timer_expiry(&mut self.port);
        }
        dispatch.timer_runs += runs;
    }

    fn run_edges<F>(&mut self, edge: &mut F, dispatch: &mut Dispatch) -> Result<(), SimError>
    where
        F: FnMut(&mut SimPort<'a>) -> EdgeReport,
    {
        while self.nvic.is_enabled(PORT_IRQ) && !self.port.interrupt_status().is_empty() {
            if dispatch.edge_runs == MAX_EDGE_RUNS {
                return Err(SimError::InterruptStorm);
            }
            let report = edge(&mut self.port);
            dispatch.edges = dispatch.edges.merge(report);
            dispatch.edge_runs += 1;
        }
        Ok(())
    }

    /// Check whether an LED is lit
    pub fn led_is_on(&self, led: Led) -> bool {
        self.port.read_data(led.mask()) == led.mask()
    }

    /// Every lit LED
    pub fn leds(&self) -> PinMask {
        self.port.read_data(LEDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BLUE_LED, BUTTONS, GREEN_LED, RED_LED};
    use proptest::prelude::*;
    use tivablink_hal::timer::CountdownTimer;

    /// Ticks in 0.5 s at the default clock
    const HALF_SECOND: u64 = 8_000_000;

    fn started(bus: &SimBus) -> SimBoard<'_> {
        let mut board = SimBoard::new(bus);
        board.init(&BlinkConfig::DEFAULT).unwrap();
        board
    }

    #[test]
    fn test_green_blinks_every_half_second() {
        let bus = SimBus::new();
        let mut board = started(&bus);
        assert_eq!(board.leds(), PinMask::NONE);

        let d = board.advance(HALF_SECOND - 1).unwrap();
        assert_eq!(d.timer_runs, 0);
        assert!(!board.led_is_on(Led::Green));

        let d = board.advance(1).unwrap();
        assert_eq!(d.timer_runs, 1);
        assert_eq!(board.leds(), GREEN_LED);

        board.advance(HALF_SECOND).unwrap();
        assert_eq!(board.leds(), PinMask::NONE);

        // Full one-second period
        let d = board.advance(2 * HALF_SECOND).unwrap();
        assert_eq!(d.timer_runs, 2);
        assert_eq!(board.leds(), PinMask::NONE);
    }

    #[test]
    fn test_sw1_press_toggles_blue_once() {
        let bus = SimBus::new();
        let mut board = started(&bus);

        let d = board.press(Button::Sw1).unwrap();
        assert_eq!(d.edge_runs, 1);
        assert!(d.edges.serviced(Button::Sw1));
        assert!(!d.edges.serviced(Button::Sw2));
        assert_eq!(board.leds(), BLUE_LED);
        assert!(board.port.raw_interrupt_status().is_empty());

        // Releasing is a rising edge
        let d = board.release(Button::Sw1).unwrap();
        assert_eq!(d.edge_runs, 0);
        assert_eq!(board.leds(), BLUE_LED);
    }

    #[test]
    fn test_sw2_press_toggles_red() {
        let bus = SimBus::new();
        let mut board = started(&bus);

        board.press(Button::Sw2).unwrap();
        assert_eq!(board.leds(), RED_LED);
        board.release(Button::Sw2).unwrap();
        board.press(Button::Sw2).unwrap();
        assert_eq!(board.leds(), PinMask::NONE);
    }

    #[test]
    fn test_simultaneous_presses_toggle_both() {
        let bus = SimBus::new();
        let mut board = started(&bus);

        board.port.press(BUTTONS);
        assert_eq!(board.port.interrupt_status(), BUTTONS);

        let d = board.dispatch().unwrap();
        assert_eq!(d.edge_runs, 1);
        assert_eq!(d.edges.buttons, BUTTONS);
        assert_eq!(board.leds(), RED_LED | BLUE_LED);
        assert!(board.port.raw_interrupt_status().is_empty());
    }

    #[test]
    fn test_unstarted_timer_never_toggles() {
        let bus = SimBus::new();
        let mut board = SimBoard::new(&bus);
        let config = BlinkConfig {
            toggle_period_ms: 0,
            ..BlinkConfig::DEFAULT
        };

        assert_eq!(board.init(&config), Err(ConfigError::ZeroPeriod));
        assert!(bus.events().is_empty());

        let priority = BlinkConfig::DEFAULT.port_priority().unwrap();
        crate::init::init_port(&mut board.sysctl, &mut board.port, &mut board.nvic, priority);

        let d = board.advance(100 * HALF_SECOND).unwrap();
        assert_eq!(d.timer_runs, 0);
        assert!(!board.timer.is_running());
        assert_eq!(board.leds(), PinMask::NONE);
    }

    #[test]
    fn test_handler_that_never_clears_is_a_storm() {
        let bus = SimBus::new();
        let mut board = started(&bus);
        board.port.press(Button::Sw1.mask());

        let result = board.dispatch_with(|_| EdgeReport::default());
        assert_eq!(result, Err(SimError::InterruptStorm));
    }

    #[test]
    fn test_nothing_dispatched_before_init() {
        let bus = SimBus::new();
        let mut board = SimBoard::new(&bus);
        board.port.raise(Button::Sw1.mask());

        bus.enable_gpio_clock(Port::F);
        let d = board.dispatch().unwrap();
        assert_eq!(d, Dispatch::default());
    }

    #[test]
    fn test_higher_priority_port_runs_first() {
        let bus = SimBus::new();
        let mut board = started(&bus);
        board.timer_priority = Priority::LOWEST;
        board.port.press(Button::Sw1.mask());
        board.timer.advance(HALF_SECOND);
        bus.clear_events();

        let d = board.dispatch().unwrap();
        assert_eq!(d.edge_runs, 1);
        assert_eq!(d.timer_runs, 1);

        let clear = bus.position(|e| matches!(e, SimEvent::PortWrite(GpioRegister::Icr, _)));
        let last_data = bus.last_position(|e| matches!(e, SimEvent::PortWrite(GpioRegister::Data, _)));
        assert!(clear < last_data);
        assert_eq!(board.leds(), BLUE_LED | GREEN_LED);
    }

    #[test]
    fn test_event_log_overflow_is_counted() {
        let bus = SimBus::new();
        for _ in 0..LOG_CAPACITY + 3 {
            bus.record(SimEvent::TimerClear);
        }
        assert_eq!(bus.events().len(), LOG_CAPACITY);
        assert_eq!(bus.dropped(), 3);

        bus.clear_events();
        assert!(bus.events().is_empty());
        assert_eq!(bus.dropped(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Action {
        Press(Button),
        Release(Button),
        Tick,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            prop_oneof![Just(Button::Sw1), Just(Button::Sw2)].prop_map(Action::Press),
            prop_oneof![Just(Button::Sw1), Just(Button::Sw2)].prop_map(Action::Release),
            Just(Action::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_each_led_counts_its_own_presses(actions in prop::collection::vec(action(), 0..40)) {
            let bus = SimBus::new();
            let mut board = started(&bus);
            let mut held = [false; 2];
            let mut presses = [0u32; 2];
            let mut ticks = 0u32;

            for a in actions {
                match a {
                    Action::Press(b) => {
                        let i = b as usize;
                        if !held[i] {
                            presses[i] += 1;
                        }
                        held[i] = true;
                        board.press(b).unwrap();
                    }
                    Action::Release(b) => {
                        held[b as usize] = false;
                        board.release(b).unwrap();
                    }
                    Action::Tick => {
                        ticks += board.advance(HALF_SECOND).unwrap().timer_runs as u32;
                    }
                }
                prop_assert!(board.port.raw_interrupt_status().is_empty());
            }

            for button in Button::ALL {
                let toggled = presses[button as usize] % 2 == 1;
                prop_assert_eq!(board.led_is_on(button.led()), toggled);
            }
            prop_assert_eq!(board.led_is_on(Led::Green), ticks % 2 == 1);
        }
    }
}
