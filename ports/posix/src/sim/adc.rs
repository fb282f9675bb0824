//! ADC1 with a slowly sweeping input on every channel

use std::sync::Arc;

use appfw_hal::adc::{AdcChannel, AdcConfig, AdcDma, AdcInterrupt};
use appfw_hal::{HalError, HalResult};
use log::debug;

use super::{Event, SimState, Simulation};

/// Interval between two circular DMA buffer wraps
const DMA_ROUND_MS: u64 = 100;

/// Full sweep 0 -> 4095 -> 0 in a little over eight seconds
const SWEEP_MS: u64 = 8_190;

/// Input seen on `channel` at `now_ms`: a triangle wave, phase-shifted per
/// channel so the three ADC demos report different values
pub fn sample(channel: u8, now_ms: u64) -> u16 {
    let phase = (now_ms + u64::from(channel) * 1_400) % SWEEP_MS;
    let half = SWEEP_MS / 2;
    let value = if phase <= half { phase } else { SWEEP_MS - phase };
    u16::try_from(value).unwrap_or(u16::MAX).min(0x0FFF)
}

#[derive(Debug, Clone, Copy)]
struct DmaRound {
    channel: u8,
    samples: usize,
    next_ms: u64,
}

#[derive(Debug, Default)]
pub(crate) struct AdcState {
    config: Option<AdcConfig>,
    calibrated: bool,
    ready: bool,
    last: u16,
    dma: Option<DmaRound>,
}

pub(crate) fn collect(state: &mut SimState, now_ms: u64, events: &mut Vec<Event>) {
    let Some(round) = state.adc.dma.as_mut() else {
        return;
    };
    if now_ms < round.next_ms {
        return;
    }
    round.next_ms = now_ms + DMA_ROUND_MS;

    let channel = round.channel;
    let buffer = (0u64..).take(round.samples).map(|i| sample(channel, now_ms + i)).collect();
    events.push(Event::AdcRound(buffer));
}

/// Handle to one regular channel of ADC1
pub struct SimAdc {
    sim: Arc<Simulation>,
    channel: u8,
}

impl SimAdc {
    pub(crate) fn new(sim: Arc<Simulation>, channel: u8) -> Self {
        Self { sim, channel }
    }

    pub fn is_calibrated(&self) -> bool {
        self.sim.lock().adc.calibrated
    }
}

impl AdcChannel for SimAdc {
    fn configure(&mut self, config: &AdcConfig) -> HalResult<()> {
        if self.channel > 7 {
            return Err(HalError::InvalidParameter);
        }
        self.sim.lock().adc.config = Some(config.clone());
        debug!("ADC1 channel {} configured", self.channel);
        Ok(())
    }

    fn calibrate(&mut self) -> HalResult<()> {
        let mut state = self.sim.lock();
        if state.adc.config.is_none() {
            return Err(HalError::ConfigurationError);
        }
        state.adc.calibrated = true;
        Ok(())
    }

    fn start_conversion(&mut self) -> HalResult<()> {
        let value = sample(self.channel, self.sim.now_ms());
        {
            let mut state = self.sim.lock();
            if state.adc.config.is_none() {
                return Err(HalError::ConfigurationError);
            }
            state.adc.last = value;
            state.adc.ready = true;
        }

        // Conversion time is far below the clock resolution
        if let Some(handler) = self.sim.vectors.adc_eoc.handler() {
            self.sim.lock().adc.ready = false;
            handler(value);
        }
        Ok(())
    }

    fn is_conversion_complete(&self) -> bool {
        self.sim.lock().adc.ready
    }

    fn read_raw(&mut self) -> HalResult<u16> {
        let mut state = self.sim.lock();
        state.adc.ready = false;
        Ok(state.adc.last)
    }

    fn channel_number(&self) -> u8 {
        self.channel
    }
}

impl AdcInterrupt for SimAdc {
    fn listen_end_of_conversion(&mut self, handler: fn(u16)) -> HalResult<()> {
        self.sim.vectors.adc_eoc.attach(handler);
        Ok(())
    }

    fn unlisten_end_of_conversion(&mut self) -> HalResult<()> {
        self.sim.vectors.adc_eoc.detach();
        Ok(())
    }
}

impl AdcDma for SimAdc {
    fn start_circular(&mut self, samples: usize, on_complete: fn(&[u16])) -> HalResult<()> {
        if samples == 0 {
            return Err(HalError::InvalidParameter);
        }
        self.sim.vectors.adc_dma.attach(on_complete);
        let next_ms = self.sim.now_ms() + DMA_ROUND_MS;
        self.sim.lock().adc.dma = Some(DmaRound {
            channel: self.channel,
            samples,
            next_ms,
        });
        Ok(())
    }

    fn stop_circular(&mut self) -> HalResult<()> {
        self.sim.lock().adc.dma = None;
        self.sim.vectors.adc_dma.detach();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimConfig;
    use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
    use std::time::Duration;

    static ROUNDS: AtomicUsize = AtomicUsize::new(0);
    static LAST_LEN: AtomicUsize = AtomicUsize::new(0);
    static EOC_VALUE: AtomicU16 = AtomicU16::new(u16::MAX);

    fn on_round(buffer: &[u16]) {
        ROUNDS.fetch_add(1, Ordering::SeqCst);
        LAST_LEN.store(buffer.len(), Ordering::SeqCst);
    }

    fn on_eoc(value: u16) {
        EOC_VALUE.store(value, Ordering::SeqCst);
    }

    #[test]
    fn sweep_stays_in_range() {
        assert_eq!(sample(0, 0), 0);
        assert_eq!(sample(0, 4_095), 4_095);
        assert_eq!(sample(0, 8_190), 0);
        assert!((0..20_000).step_by(97).all(|t| sample(2, t) <= 0x0FFF));
        assert_ne!(sample(0, 100), sample(1, 100));
    }

    #[test]
    fn polling_conversion_needs_configuration() {
        let sim = Arc::new(Simulation::new(SimConfig::default()));
        let mut adc = SimAdc::new(Arc::clone(&sim), 0);
        assert_eq!(adc.start_conversion(), Err(HalError::ConfigurationError));

        adc.configure(&AdcConfig::default()).unwrap();
        adc.calibrate().unwrap();
        assert!(adc.is_calibrated());

        sim.advance_to(Duration::from_millis(1_000));
        assert_eq!(adc.convert().unwrap(), 1_000);
        assert!(!adc.is_conversion_complete());
    }

    #[test]
    fn end_of_conversion_goes_to_handler() {
        let sim = Arc::new(Simulation::new(SimConfig::default()));
        let mut adc = SimAdc::new(Arc::clone(&sim), 1);
        adc.configure(&AdcConfig::default()).unwrap();
        adc.listen_end_of_conversion(on_eoc).unwrap();

        adc.start_conversion().unwrap();
        assert_eq!(EOC_VALUE.load(Ordering::SeqCst), sample(1, 0));
        assert!(!adc.is_conversion_complete());
    }

    #[test]
    fn circular_dma_delivers_rounds() {
        let sim = Arc::new(Simulation::new(SimConfig::default()));
        let mut adc = SimAdc::new(Arc::clone(&sim), 2);
        adc.configure(&AdcConfig::default()).unwrap();
        adc.start_circular(10, on_round).unwrap();

        sim.advance_to(Duration::from_millis(100));
        sim.advance_to(Duration::from_millis(200));
        assert_eq!(ROUNDS.load(Ordering::SeqCst), 2);
        assert_eq!(LAST_LEN.load(Ordering::SeqCst), 10);

        adc.stop_circular().unwrap();
        sim.advance_to(Duration::from_millis(500));
        assert_eq!(ROUNDS.load(Ordering::SeqCst), 2);
    }
}
