//! Independent watchdog (IWDG)

use crate::error::HalResult;

/// LSI clock feeding the independent watchdog
pub const LSI_HZ: u32 = 40_000;

/// Watchdog prescaler and reload value
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// LSI divider: 4, 8, ..., 256
    pub prescaler: u16,
    /// Down-counter reload, at most 0xFFF
    pub reload: u16,
}

impl WatchdogConfig {
    /// Timeout in milliseconds at [`LSI_HZ`]
    pub fn timeout_ms(&self) -> u32 {
        u32::from(self.prescaler) * (u32::from(self.reload) + 1) * 1_000 / LSI_HZ
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        // 2 s
        Self {
            prescaler: 64,
            reload: 1_249,
        }
    }
}

/// Independent watchdog; cannot be stopped once started
pub trait Watchdog {
    /// Program prescaler and reload, then enable
    fn start(&mut self, config: &WatchdogConfig) -> HalResult<()>;

    /// Reload the down-counter
    fn feed(&mut self) -> HalResult<()>;
}
