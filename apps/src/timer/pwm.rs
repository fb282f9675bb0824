//! Timer PWM: two 1 kHz channels ramping their duty cycle up and down

use appfw_core::Application;
use appfw_hal::timer::PwmChannel;
use appfw_hal::{DelayNs, HalResult};
use log::{info, warn};

/// Compare value for 100 % duty (TIM3 period 999)
pub const MAX_DUTY: u16 = 999;

const PWM_HZ: u32 = 1_000;
const STEP: i32 = 10;
const PASSES_PER_STEP: u32 = 5;
const PASS_MS: u32 = 10;

/// Triangle ramp between 0 and [`MAX_DUTY`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ramp {
    duty: i32,
    direction: i32,
}

impl Ramp {
    pub const fn rising(duty: u16) -> Self {
        Self {
            duty: duty as i32,
            direction: 1,
        }
    }

    pub const fn falling(duty: u16) -> Self {
        Self {
            duty: duty as i32,
            direction: -1,
        }
    }

    /// Advance one step, reversing at either end
    pub fn step(&mut self) -> u16 {
        self.duty += self.direction * STEP;
        let max = i32::from(MAX_DUTY);
        if self.duty >= max {
            self.duty = max;
            self.direction = -1;
        } else if self.duty <= 0 {
            self.duty = 0;
            self.direction = 1;
        }
        self.duty()
    }

    pub fn duty(&self) -> u16 {
        self.duty as u16
    }

    /// Duty as whole percent
    pub fn percent(&self) -> u32 {
        u32::from(self.duty()) * 100 / u32::from(MAX_DUTY)
    }
}

pub struct TimerPwm<C, D> {
    ch1: C,
    ch2: C,
    delay: D,
    ramp1: Ramp,
    ramp2: Ramp,
    passes: u32,
}

impl<C: PwmChannel, D: DelayNs> TimerPwm<C, D> {
    pub fn new(ch1: C, ch2: C, delay: D) -> Self {
        Self {
            ch1,
            ch2,
            delay,
            ramp1: Ramp::rising(0),
            ramp2: Ramp::falling(500),
            passes: 0,
        }
    }

    pub fn ramps(&self) -> (Ramp, Ramp) {
        (self.ramp1, self.ramp2)
    }

    fn init(&mut self) -> HalResult<()> {
        for (channel, duty) in [(&mut self.ch1, 250), (&mut self.ch2, 500)] {
            channel.set_frequency(PWM_HZ)?;
            channel.set_duty(duty)?;
            channel.enable()?;
        }
        Ok(())
    }

    fn update(&mut self) -> HalResult<()> {
        let duty1 = self.ramp1.step();
        let duty2 = self.ramp2.step();
        self.ch1.set_duty(duty1)?;
        self.ch2.set_duty(duty2)
    }
}

impl<C: PwmChannel, D: DelayNs> Application for TimerPwm<C, D> {
    fn setup(&mut self) {
        info!("Timer PWM Setup");
        match self.init() {
            Ok(()) => {
                info!("Timer PWM: TIM3 configured for 1kHz PWM on PA6 and PA7");
                info!("Timer PWM: CH1 = 25% duty cycle, CH2 = 50% duty cycle");
            }
            Err(err) => warn!("Timer PWM: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        self.passes += 1;
        if self.passes >= PASSES_PER_STEP {
            self.passes = 0;
            match self.update() {
                Ok(()) => info!(
                    "Timer PWM: CH1 = {}%, CH2 = {}%",
                    self.ramp1.percent(),
                    self.ramp2.percent()
                ),
                Err(err) => warn!("Timer PWM: {}", err),
            }
        }

        self.delay.delay_ms(PASS_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reverses_at_ends() {
        let mut ramp = Ramp::falling(20);
        assert_eq!(ramp.step(), 10);
        assert_eq!(ramp.step(), 0);
        assert_eq!(ramp.step(), 10);

        let mut ramp = Ramp::rising(990);
        assert_eq!(ramp.step(), MAX_DUTY);
        assert_eq!(ramp.step(), 989);
    }

    #[test]
    fn percent_of_full_scale() {
        assert_eq!(Ramp::rising(MAX_DUTY).percent(), 100);
        assert_eq!(Ramp::rising(500).percent(), 50);
    }
}
