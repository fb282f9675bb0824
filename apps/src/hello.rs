//! Hello World: two LEDs cycling through four blink patterns

use appfw_core::Application;
use appfw_hal::gpio::GpioPin;
use appfw_hal::{DelayNs, HalResult};
use log::{info, warn};

use crate::led::Led;

/// Steps shown per pattern before moving to the next one
pub const STEPS_PER_PATTERN: u32 = 16;

const STEP_MS: u32 = 250;

/// Blink pattern shown on the LED pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// LEDs take turns
    Alternating,
    /// Both LEDs blink together
    Together,
    /// First LED blinks at twice the rate of the second
    FastSlow,
    /// On, gap, on, gap across the pair
    Chase,
}

impl Pattern {
    pub fn from_counter(counter: u32) -> Self {
        match counter % 4 {
            0 => Pattern::Alternating,
            1 => Pattern::Together,
            2 => Pattern::FastSlow,
            _ => Pattern::Chase,
        }
    }

    /// LED states `(first, second)` at `step`
    pub fn leds(self, step: u32) -> (bool, bool) {
        match self {
            Pattern::Alternating => (step % 2 == 0, step % 2 != 0),
            Pattern::Together => (step % 2 == 0, step % 2 == 0),
            Pattern::FastSlow => (step % 4 < 2, step % 8 < 4),
            Pattern::Chase => (step % 4 == 0, step % 4 == 2),
        }
    }
}

/// Two-LED blinker on PA1/PA2
pub struct HelloWorld<P, D> {
    first: Led<P>,
    second: Led<P>,
    delay: D,
    pattern_counter: u32,
    step: u32,
}

impl<P: GpioPin, D: DelayNs> HelloWorld<P, D> {
    pub fn new(first: P, second: P, delay: D) -> Self {
        Self {
            first: Led::new(first),
            second: Led::new(second),
            delay,
            pattern_counter: 0,
            step: 0,
        }
    }

    pub fn pattern(&self) -> Pattern {
        Pattern::from_counter(self.pattern_counter)
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn leds(&self) -> (&Led<P>, &Led<P>) {
        (&self.first, &self.second)
    }

    fn init(&mut self) -> HalResult<()> {
        self.first.init()?;
        self.second.init()
    }

    fn show(&mut self) -> HalResult<()> {
        let (first, second) = self.pattern().leds(self.step);
        self.first.set(first)?;
        self.second.set(second)
    }
}

impl<P: GpioPin, D: DelayNs> Application for HelloWorld<P, D> {
    fn setup(&mut self) {
        info!("Hello setup - GPIO Blinking");
        if let Err(err) = self.init() {
            warn!("Hello: LED init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if let Err(err) = self.show() {
            warn!("Hello: LED update failed: {}", err);
        }

        self.step += 1;
        if self.step >= STEPS_PER_PATTERN {
            self.step = 0;
            self.pattern_counter = self.pattern_counter.wrapping_add(1);
            info!("Pattern changed to {}", self.pattern_counter % 4);
        }

        self.delay.delay_ms(STEP_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_slow_rates() {
        let first: Vec<bool> = (0..8).map(|s| Pattern::FastSlow.leds(s).0).collect();
        let second: Vec<bool> = (0..8).map(|s| Pattern::FastSlow.leds(s).1).collect();
        assert_eq!(first, [true, true, false, false, true, true, false, false]);
        assert_eq!(second, [true, true, true, true, false, false, false, false]);
    }

    #[test]
    fn chase_has_gaps() {
        let states: Vec<_> = (0..4).map(|s| Pattern::Chase.leds(s)).collect();
        assert_eq!(
            states,
            [(true, false), (false, false), (false, true), (false, false)]
        );
    }

    #[test]
    fn patterns_cycle() {
        assert_eq!(Pattern::from_counter(4), Pattern::Alternating);
        assert_eq!(Pattern::from_counter(7), Pattern::Chase);
    }
}
