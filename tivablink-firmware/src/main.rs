//! tivablink - interrupt-driven blinker for the EK-TM4C123GXL LaunchPad
//!
//! Start-up configures Port F and SysTick, then the core sleeps. All
//! behavior lives in two interrupt handlers:
//!
//! - SysTick toggles the green LED every `toggle_period_ms`
//! - Port F toggles the blue LED on each SW1 press and the red LED on
//!   each SW2 press
//!
//! Board values come from board.toml, validated by build.rs.

#![no_std]
#![no_main]

use cortex_m::asm;
use cortex_m_rt::{entry, exception, interrupt};
use defmt::*;
use embedded_hal::digital::StatefulOutputPin;
use {defmt_rtt as _, panic_probe as _};

use tivablink_core::board::{LEDS, PORT};
use tivablink_core::handlers::{on_button_edge, on_timer_expiry};
use tivablink_core::init::init_board;
use tivablink_hal::gpio::PortPin;
use tivablink_hal_tm4c123::{Tm4cGpio, Tm4cNvic, Tm4cSysCtl, Tm4cSysTick, PIOSC_HZ};

use crate::vectors::interrupt;

mod vectors;

mod board_config {
    use tivablink_core::config::BlinkConfig;

    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

/// Main entry point
#[entry]
fn main() -> ! {
    info!("tivablink starting...");

    let config = board_config::BOARD_CONFIG;
    info!(
        "Config: core clock {=u32} Hz, toggle every {=u32} ms, port priority {=u8}",
        config.core_clock_hz, config.toggle_period_ms, config.port_priority
    );
    // The clock tree is left at its reset setting
    if config.core_clock_hz != PIOSC_HZ {
        warn!("core_hz differs from the {=u32} Hz reset clock", PIOSC_HZ);
    }

    let cp = unwrap!(cortex_m::Peripherals::take());
    let mut nvic = Tm4cNvic::new(cp.NVIC);
    let mut timer = Tm4cSysTick::new(cp.SYST);

    // SAFETY: nothing else touches system control, and the port handlers
    // only start once init_board has enabled their interrupts
    let mut sysctl = unsafe { Tm4cSysCtl::steal() };
    let mut port = unsafe { Tm4cGpio::steal(PORT) };

    let reload = match init_board(&mut sysctl, &mut port, &mut nvic, &mut timer, &config) {
        Ok(reload) => reload,
        Err(e) => defmt::panic!("Invalid board configuration: {}", e),
    };
    info!("Port F and SysTick initialized");
    debug!("SysTick reload {=u32} ticks", reload.period());

    // Output latches reset low, so every LED starts dark
    let mut leds = PortPin::new(&mut port, LEDS);
    if !matches!(leds.is_set_low(), Ok(true)) {
        warn!("LEDs lit at start-up");
    }

    info!("Entering idle loop");
    loop {
        asm::wfi();
    }
}

#[exception]
fn SysTick() {
    // SAFETY: the toggle goes through the masked data window and only
    // writes the green LED bit
    let mut port = unsafe { Tm4cGpio::steal(PORT) };
    let pins = on_timer_expiry(&mut port);
    trace!("Timer expiry: toggled {}", pins);
}

#[interrupt]
fn GPIOF() {
    // SAFETY: writes only the switch LEDs and the switch interrupt flags
    let mut port = unsafe { Tm4cGpio::steal(PORT) };
    let report = on_button_edge(&mut port);
    debug!("Switch edge: buttons={}, leds toggled={}", report.buttons, report.leds);
}
