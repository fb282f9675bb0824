//! ADC DMA: continuous conversion into a circular buffer, averaged on
//! every transfer-complete interrupt

use appfw_core::Application;
use appfw_hal::adc::{AdcConfig, AdcDma};
use appfw_hal::{DelayNs, HalResult, IrqCell, IrqFlag};
use log::{info, warn};

use super::{init_channel, SAMPLE_PERIOD_MS};

/// Samples per DMA round
pub const ADC_BUFFER_SIZE: usize = 10;

static DMA_COMPLETE: IrqFlag = IrqFlag::new();
static SAMPLES: IrqCell<[u16; ADC_BUFFER_SIZE]> = IrqCell::new([0; ADC_BUFFER_SIZE]);

/// DMA1 channel 1 transfer-complete handler
pub fn on_dma_complete(buffer: &[u16]) {
    let mut samples = [0u16; ADC_BUFFER_SIZE];
    for (slot, value) in samples.iter_mut().zip(buffer) {
        *slot = *value;
    }
    SAMPLES.set(samples);
    DMA_COMPLETE.set();
}

/// Integer mean, 0 for an empty slice
pub fn average(samples: &[u16]) -> u16 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
    (sum / samples.len() as u32) as u16
}

pub struct AdcDmaDemo<A, D> {
    adc: A,
    delay: D,
    last_average: Option<u16>,
}

impl<A: AdcDma, D: DelayNs> AdcDmaDemo<A, D> {
    pub fn new(adc: A, delay: D) -> Self {
        Self {
            adc,
            delay,
            last_average: None,
        }
    }

    pub fn last_average(&self) -> Option<u16> {
        self.last_average
    }

    fn init(&mut self) -> HalResult<()> {
        DMA_COMPLETE.clear();
        let config = AdcConfig {
            continuous: true,
            ..AdcConfig::default()
        };
        init_channel(&mut self.adc, &config)?;
        self.adc.start_circular(ADC_BUFFER_SIZE, on_dma_complete)
    }
}

impl<A: AdcDma, D: DelayNs> Application for AdcDmaDemo<A, D> {
    fn setup(&mut self) {
        info!("ADC DMA Setup");
        if let Err(err) = self.init() {
            warn!("ADC DMA: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if DMA_COMPLETE.take() {
            let value = average(&SAMPLES.get());
            info!("ADC DMA Average: {}", value);
            self.last_average = Some(value);
        }

        self.delay.delay_ms(SAMPLE_PERIOD_MS);
    }
}
