//! GPIO Polling: PA3 button (active low) toggles the LED on each press

use appfw_core::Application;
use appfw_hal::gpio::{GpioPin, Level, PinMode};
use appfw_hal::{DelayNs, HalResult};
use log::{info, warn};

use crate::led::{state_label, Led};

const POLL_MS: u32 = 50;

pub struct GpioPolling<P, D> {
    button: P,
    led: Led<P>,
    delay: D,
    last_level: Level,
}

impl<P: GpioPin, D: DelayNs> GpioPolling<P, D> {
    pub fn new(button: P, led: P, delay: D) -> Self {
        Self {
            button,
            led: Led::new(led),
            delay,
            last_level: Level::High,
        }
    }

    pub fn led(&self) -> &Led<P> {
        &self.led
    }

    fn init(&mut self) -> HalResult<()> {
        self.button.set_mode(PinMode::InputPullUp)?;
        self.led.init()
    }

    fn poll(&mut self) -> HalResult<()> {
        let level = self.button.read()?;
        if self.last_level == Level::High && level == Level::Low {
            let on = self.led.toggle()?;
            info!("GPIO Polling: Button pressed, LED {}", state_label(on));
        }
        self.last_level = level;
        Ok(())
    }
}

impl<P: GpioPin, D: DelayNs> Application for GpioPolling<P, D> {
    fn setup(&mut self) {
        info!("GPIO Polling Setup");
        if let Err(err) = self.init() {
            warn!("GPIO Polling: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if let Err(err) = self.poll() {
            warn!("GPIO Polling: {}", err);
        }
        self.delay.delay_ms(POLL_MS);
    }
}
