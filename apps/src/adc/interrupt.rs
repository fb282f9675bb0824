//! ADC Interrupt: conversion result delivered by the EOC interrupt

use appfw_core::Application;
use appfw_hal::adc::{AdcConfig, AdcInterrupt};
use appfw_hal::{DelayNs, HalResult, IrqCell, IrqFlag};
use log::{info, warn};

use super::{init_channel, SAMPLE_PERIOD_MS};

/// Spins allowed while waiting for the EOC interrupt
const EOC_SPIN_LIMIT: u32 = 1_000_000;

static CONVERSION_COMPLETE: IrqFlag = IrqFlag::new();
static LAST_VALUE: IrqCell<u16> = IrqCell::new(0);

/// ADC1_2 end-of-conversion handler
pub fn on_end_of_conversion(value: u16) {
    LAST_VALUE.set(value);
    CONVERSION_COMPLETE.set();
}

pub struct AdcInterruptDemo<A, D> {
    adc: A,
    delay: D,
}

impl<A: AdcInterrupt, D: DelayNs> AdcInterruptDemo<A, D> {
    pub fn new(adc: A, delay: D) -> Self {
        Self { adc, delay }
    }

    fn init(&mut self) -> HalResult<()> {
        CONVERSION_COMPLETE.clear();
        self.adc.listen_end_of_conversion(on_end_of_conversion)?;
        init_channel(&mut self.adc, &AdcConfig::default())
    }

    fn wait_for_conversion() -> bool {
        for _ in 0..EOC_SPIN_LIMIT {
            if CONVERSION_COMPLETE.take() {
                return true;
            }
            core::hint::spin_loop();
        }
        false
    }
}

impl<A: AdcInterrupt, D: DelayNs> Application for AdcInterruptDemo<A, D> {
    fn setup(&mut self) {
        info!("ADC Interrupt Setup");
        if let Err(err) = self.init() {
            warn!("ADC Interrupt: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        match self.adc.start_conversion() {
            Ok(()) if Self::wait_for_conversion() => {
                info!("ADC Interrupt Value: {}", LAST_VALUE.get());
            }
            Ok(()) => warn!("ADC Interrupt: no end-of-conversion interrupt"),
            Err(err) => warn!("ADC Interrupt: start failed: {}", err),
        }

        self.delay.delay_ms(SAMPLE_PERIOD_MS);
    }
}

/// Last value delivered by the interrupt
pub fn last_value() -> u16 {
    LAST_VALUE.get()
}
