//! Embedded flash and the independent watchdog

use std::sync::Arc;

use appfw_hal::flash::{Flash, ERASED_WORD};
use appfw_hal::watchdog::{Watchdog, WatchdogConfig};
use appfw_hal::{HalError, HalResult};
use log::debug;

use super::{Event, SimState, Simulation};

/// Start of the code flash in the memory map
pub const FLASH_BASE: u32 = 0x0800_0000;

/// 128 KiB part
pub const FLASH_SIZE: u32 = 128 * 1024;

const PAGE_SIZE: u32 = 1_024;

#[derive(Debug)]
pub(crate) struct FlashState {
    words: Vec<u32>,
    pub(crate) locked: bool,
}

impl Default for FlashState {
    fn default() -> Self {
        Self {
            words: vec![ERASED_WORD; (FLASH_SIZE / 4) as usize],
            locked: true,
        }
    }
}

impl FlashState {
    fn word_index(address: u32) -> HalResult<usize> {
        let offset = address
            .checked_sub(FLASH_BASE)
            .filter(|offset| *offset < FLASH_SIZE && offset % 4 == 0)
            .ok_or(HalError::InvalidParameter)?;
        Ok((offset / 4) as usize)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct WatchdogState {
    timeout_ms: u64,
    last_feed_ms: u64,
}

pub(crate) fn collect(state: &mut SimState, now_ms: u64, events: &mut Vec<Event>) {
    if let Some(watchdog) = state.watchdog {
        if now_ms.saturating_sub(watchdog.last_feed_ms) > watchdog.timeout_ms {
            state.watchdog = None;
            events.push(Event::WatchdogExpired);
        }
    }
}

/// Handle to the flash controller
pub struct SimFlash {
    sim: Arc<Simulation>,
}

impl SimFlash {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }
}

impl Flash for SimFlash {
    const PAGE_SIZE: u32 = PAGE_SIZE;

    fn unlock(&mut self) -> HalResult<()> {
        self.sim.lock().flash.locked = false;
        Ok(())
    }

    fn lock(&mut self) -> HalResult<()> {
        self.sim.lock().flash.locked = true;
        Ok(())
    }

    fn is_locked(&self) -> bool {
        self.sim.lock().flash.locked
    }

    fn erase_page(&mut self, address: u32) -> HalResult<()> {
        let first = FlashState::word_index(address & !(PAGE_SIZE - 1))?;
        let mut state = self.sim.lock();
        if state.flash.locked {
            return Err(HalError::Locked);
        }
        let words = (PAGE_SIZE / 4) as usize;
        state.flash.words[first..first + words].fill(ERASED_WORD);
        debug!("Flash page {:#010X} erased", address & !(PAGE_SIZE - 1));
        Ok(())
    }

    fn program_word(&mut self, address: u32, word: u32) -> HalResult<()> {
        let index = FlashState::word_index(address)?;
        let mut state = self.sim.lock();
        if state.flash.locked {
            return Err(HalError::Locked);
        }
        // Programming can only clear bits; the controller refuses a
        // non-erased target
        if state.flash.words[index] != ERASED_WORD {
            return Err(HalError::HardwareError);
        }
        state.flash.words[index] = word;
        Ok(())
    }

    fn read_word(&self, address: u32) -> HalResult<u32> {
        let index = FlashState::word_index(address)?;
        Ok(self.sim.lock().flash.words[index])
    }
}

/// Handle to the IWDG
pub struct SimWatchdog {
    sim: Arc<Simulation>,
}

impl SimWatchdog {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }

    pub fn is_running(&self) -> bool {
        self.sim.lock().watchdog.is_some()
    }
}

impl Watchdog for SimWatchdog {
    fn start(&mut self, config: &WatchdogConfig) -> HalResult<()> {
        if !config.prescaler.is_power_of_two() || !(4..=256).contains(&config.prescaler) {
            return Err(HalError::InvalidParameter);
        }
        if config.reload > 0x0FFF {
            return Err(HalError::InvalidParameter);
        }
        let now_ms = self.sim.now_ms();
        let timeout_ms = u64::from(config.timeout_ms());
        self.sim.lock().watchdog = Some(WatchdogState {
            timeout_ms,
            last_feed_ms: now_ms,
        });
        debug!("IWDG started, timeout {} ms", timeout_ms);
        Ok(())
    }

    fn feed(&mut self) -> HalResult<()> {
        let now_ms = self.sim.now_ms();
        let mut state = self.sim.lock();
        let watchdog = state.watchdog.as_mut().ok_or(HalError::ConfigurationError)?;
        watchdog.last_feed_ms = now_ms;
        Ok(())
    }
}
