//! Real-time clock and backup domain

use core::fmt;

use crate::error::HalResult;
use crate::interrupt::Handler;

/// RTC configuration
#[derive(Debug, Clone)]
pub struct RtcConfig {
    /// Divider applied to the RTC clock; 32767 gives 1 Hz from a 32.768 kHz LSE
    pub prescaler: u32,
    /// Counter value written on first configuration
    pub start_seconds: u32,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            prescaler: 32_767,
            start_seconds: 0,
        }
    }
}

/// Seconds counter with second and alarm interrupts
pub trait Rtc {
    /// Start the LSE, select it as RTC clock and program the prescaler
    fn configure(&mut self, config: &RtcConfig) -> HalResult<()>;

    /// Wait for the register synchronisation flag after a reset
    fn wait_for_sync(&mut self) -> HalResult<()>;

    /// Seconds counter
    fn counter(&self) -> u32;

    fn set_counter(&mut self, seconds: u32) -> HalResult<()>;

    /// Fire the alarm interrupt when the counter reaches `seconds`
    fn set_alarm(&mut self, seconds: u32) -> HalResult<()>;

    /// Enable the once-per-second interrupt
    fn listen_second(&mut self, handler: Handler) -> HalResult<()>;

    /// Enable the alarm interrupt
    fn listen_alarm(&mut self, handler: Handler) -> HalResult<()>;
}

/// Battery-backed data registers that survive a system reset
pub trait BackupRegisters {
    /// Enable write access to the backup domain
    fn enable_access(&mut self) -> HalResult<()>;

    /// Reset the whole backup domain
    fn reset_domain(&mut self) -> HalResult<()>;

    /// Read data register `index` (1-based, DR1..)
    fn read_register(&self, index: u8) -> HalResult<u16>;

    fn write_register(&mut self, index: u8, value: u16) -> HalResult<()>;
}

/// Time of day split from a seconds counter, wrapping every 24 hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    pub const fn from_seconds(total: u32) -> Self {
        Self {
            hours: ((total / 3600) % 24) as u8,
            minutes: ((total / 60) % 60) as u8,
            seconds: (total % 60) as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
