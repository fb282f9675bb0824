//! Timer and PWM abstraction

use crate::error::HalResult;
use crate::interrupt::Handler;

/// Timer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    OneShot,
    Periodic,
}

/// Time base: `update rate = clock / ((prescaler + 1) * (period + 1))`
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub prescaler: u16,
    pub period: u16,
    pub mode: TimerMode,
}

impl TimerConfig {
    /// Update events per second for a given input clock
    pub fn update_hz(&self, clock_hz: u32) -> u32 {
        let divider = (u32::from(self.prescaler) + 1) * (u32::from(self.period) + 1);
        clock_hz / divider
    }

    /// Period of one update event in microseconds
    pub fn period_us(&self, clock_hz: u32) -> u64 {
        let divider = (u64::from(self.prescaler) + 1) * (u64::from(self.period) + 1);
        divider * 1_000_000 / u64::from(clock_hz.max(1))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        // 1 Hz from a 36 MHz timer clock
        Self {
            prescaler: 36_000 - 1,
            period: 1_000 - 1,
            mode: TimerMode::Periodic,
        }
    }
}

/// Timer trait
pub trait Timer {
    /// Program the time base
    fn configure(&mut self, config: &TimerConfig) -> HalResult<()>;

    /// Start counting
    fn start(&mut self) -> HalResult<()>;

    /// Stop timer
    fn stop(&mut self) -> HalResult<()>;

    /// Get current counter value
    fn counter(&self) -> u32;

    /// Enable the update interrupt, dispatching to `handler`
    fn listen(&mut self, handler: Handler) -> HalResult<()>;

    /// Disable interrupt
    fn unlisten(&mut self) -> HalResult<()>;
}

/// PWM output channel
pub trait PwmChannel {
    /// Set compare value, `0..=max_duty()`
    fn set_duty(&mut self, duty: u16) -> HalResult<()>;

    fn duty(&self) -> u16;

    /// Auto-reload value; a duty equal to it is fully on
    fn max_duty(&self) -> u16;

    /// Set frequency in Hz
    fn set_frequency(&mut self, freq_hz: u32) -> HalResult<()>;

    /// Enable PWM output
    fn enable(&mut self) -> HalResult<()>;

    /// Disable PWM output
    fn disable(&mut self) -> HalResult<()>;
}
