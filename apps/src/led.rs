//! Active-low LED on a GPIO output

use appfw_hal::gpio::{GpioPin, PinMode};
use appfw_hal::HalResult;

/// LED wired between VCC and the pin: driving the pin low lights it
pub struct Led<P> {
    pin: P,
    on: bool,
}

impl<P: GpioPin> Led<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    /// Configure the pin as push-pull output and switch the LED off
    pub fn init(&mut self) -> HalResult<()> {
        self.pin.set_mode(PinMode::Output)?;
        self.off()
    }

    pub fn on(&mut self) -> HalResult<()> {
        self.set(true)
    }

    pub fn off(&mut self) -> HalResult<()> {
        self.set(false)
    }

    pub fn set(&mut self, on: bool) -> HalResult<()> {
        if on {
            self.pin.set_low()?;
        } else {
            self.pin.set_high()?;
        }
        self.on = on;
        Ok(())
    }

    /// Toggle, returning the new state
    pub fn toggle(&mut self) -> HalResult<bool> {
        self.set(!self.on)?;
        Ok(self.on)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

/// "ON"/"OFF" for log lines
pub fn state_label(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}
