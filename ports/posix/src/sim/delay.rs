//! Blocking delays on the simulated clock

use std::sync::Arc;
use std::time::Duration;

use appfw_hal::DelayNs;

use super::Simulation;

/// Delay provider; sleeps in real time, or moves the clock in fast mode
pub struct SimDelay {
    sim: Arc<Simulation>,
}

impl SimDelay {
    pub(crate) fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sim.wait(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        self.sim.wait(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sim.wait(Duration::from_millis(u64::from(ms)));
    }
}
