//! GPIO Interrupt: PA4 falling edge on EXTI4 toggles the LED

use appfw_core::Application;
use appfw_hal::gpio::{Edge, GpioPin, GpioPinInterrupt, PinMode};
use appfw_hal::{DelayNs, HalResult, IrqFlag};
use log::{info, warn};

use crate::led::{state_label, Led};

const POLL_MS: u32 = 10;
const DEBOUNCE_MS: u32 = 200;

static BUTTON_PRESSED: IrqFlag = IrqFlag::new();

/// EXTI4 handler
pub fn on_button_edge() {
    BUTTON_PRESSED.set();
}

pub struct GpioInterruptDemo<P, D> {
    button: P,
    led: Led<P>,
    delay: D,
}

impl<P: GpioPinInterrupt, D: DelayNs> GpioInterruptDemo<P, D> {
    pub fn new(button: P, led: P, delay: D) -> Self {
        Self {
            button,
            led: Led::new(led),
            delay,
        }
    }

    pub fn led(&self) -> &Led<P> {
        &self.led
    }

    fn init(&mut self) -> HalResult<()> {
        BUTTON_PRESSED.clear();
        self.button.set_mode(PinMode::InputPullUp)?;
        self.led.init()?;
        self.button.enable_interrupt(Edge::Falling, on_button_edge)
    }
}

impl<P: GpioPinInterrupt, D: DelayNs> Application for GpioInterruptDemo<P, D> {
    fn setup(&mut self) {
        info!("GPIO Interrupt Setup");
        if let Err(err) = self.init() {
            warn!("GPIO Interrupt: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if BUTTON_PRESSED.take() {
            match self.led.toggle() {
                Ok(on) => info!("GPIO Interrupt: Button pressed, LED {}", state_label(on)),
                Err(err) => warn!("GPIO Interrupt: {}", err),
            }
            self.delay.delay_ms(DEBOUNCE_MS);
        }

        self.delay.delay_ms(POLL_MS);
    }
}
