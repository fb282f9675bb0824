//! Watchdog: IWDG with a 2 s timeout, fed every pass until a simulated hang

use appfw_core::Application;
use appfw_hal::gpio::GpioPin;
use appfw_hal::watchdog::{Watchdog, WatchdogConfig};
use appfw_hal::{DelayNs, HalResult};
use log::{info, warn};

use crate::led::{state_label, Led};

/// Loop count at which feeding stops
pub const HANG_AFTER: u32 = 20;
/// Loop count past which the reset evidently did not happen
pub const RESET_EXPECTED_BY: u32 = 25;

const PASS_MS: u32 = 500;

pub struct WatchdogDemo<W, P, D> {
    watchdog: W,
    led: Led<P>,
    delay: D,
    loop_counter: u32,
    simulate_hang: bool,
    last_feed: u32,
}

impl<W: Watchdog, P: GpioPin, D: DelayNs> WatchdogDemo<W, P, D> {
    pub fn new(watchdog: W, led: P, delay: D) -> Self {
        Self {
            watchdog,
            led: Led::new(led),
            delay,
            loop_counter: 0,
            simulate_hang: false,
            last_feed: 0,
        }
    }

    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    pub fn is_hanging(&self) -> bool {
        self.simulate_hang
    }

    pub fn led(&self) -> &Led<P> {
        &self.led
    }

    fn init(&mut self) -> HalResult<()> {
        self.led.init()?;
        self.watchdog.start(&WatchdogConfig::default())
    }
}

impl<W: Watchdog, P: GpioPin, D: DelayNs> Application for WatchdogDemo<W, P, D> {
    fn setup(&mut self) {
        info!("Watchdog Setup");
        let config = WatchdogConfig::default();
        match self.init() {
            Ok(()) => {
                info!("Watchdog: IWDG started, timeout = {} ms", config.timeout_ms());
                info!("Watchdog: Feeding every {} ms", PASS_MS);
            }
            Err(err) => warn!("Watchdog: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        match self.led.toggle() {
            Ok(on) => info!("Watchdog: Loop #{}, LED = {}", self.loop_counter, state_label(on)),
            Err(err) => warn!("Watchdog: {}", err),
        }

        if self.loop_counter >= HANG_AFTER && !self.simulate_hang {
            self.simulate_hang = true;
            info!("Watchdog: Simulating system hang");
            info!("Watchdog: System should reset in about 2 seconds");
        }

        if self.simulate_hang {
            info!(
                "Watchdog: NOT feeding ({} loops since last feed)",
                self.loop_counter.wrapping_sub(self.last_feed)
            );
        } else {
            match self.watchdog.feed() {
                Ok(()) => self.last_feed = self.loop_counter,
                Err(err) => warn!("Watchdog: feed failed: {}", err),
            }
        }

        self.loop_counter = self.loop_counter.wrapping_add(1);
        if self.loop_counter > RESET_EXPECTED_BY {
            warn!("Watchdog: ERROR - watchdog did not reset the system");
            self.simulate_hang = false;
            self.loop_counter = 0;
        }

        self.delay.delay_ms(PASS_MS);
    }
}
