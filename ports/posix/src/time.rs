//! Clock tick service for the simulated board
//!
//! A dedicated thread advances the [`Simulation`] clock in real time, which
//! is what fires timer, RTC and scripted-input handlers while the
//! foreground loop is busy or sleeping in a delay. Uses monotonic time to
//! avoid drift.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::error::PortError;
use crate::sim::Simulation;

/// Default tick rate in Hz
pub const DEFAULT_TICKS_PER_SEC: u32 = 100;

/// Nanoseconds per second
const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Clock tick configuration
#[derive(Debug, Clone, Copy)]
pub struct ClockTick {
    rate_hz: u32,
}

impl ClockTick {
    /// Rates are clamped to 1..=10 kHz
    pub fn new(rate_hz: u32) -> Self {
        Self {
            rate_hz: rate_hz.clamp(1, 10_000),
        }
    }

    /// Tick period as a Duration
    pub fn period(&self) -> Duration {
        Duration::from_nanos(NSEC_PER_SEC / u64::from(self.rate_hz))
    }
}

impl Default for ClockTick {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_SEC)
    }
}

/// Ticker thread; stopped and joined on drop
pub struct Ticker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn the ticker for `sim` at `tick` rate
    pub fn start(sim: Arc<Simulation>, tick: ClockTick) -> Result<Self, PortError> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = tick.period();

        let handle = thread::Builder::new()
            .name("appfw-ticker".into())
            .spawn(move || ticker_thread(&sim, &flag, period))?;

        debug!("Ticker started, period {:?}", period);
        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("Ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleeps until the next absolute tick time rather than for a relative
/// duration, then moves the simulated clock to the elapsed time.
fn ticker_thread(sim: &Simulation, running: &AtomicBool, period: Duration) {
    let start = Instant::now();
    let base = sim.now();
    let mut next_tick = start;

    while running.load(Ordering::Relaxed) {
        next_tick += period;

        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        }

        sim.advance_to(base + start.elapsed());
    }
}
