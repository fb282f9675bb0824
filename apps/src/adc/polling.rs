//! ADC Polling: software-started conversion, busy-waiting on EOC

use appfw_core::Application;
use appfw_hal::adc::{AdcChannel, AdcConfig};
use appfw_hal::DelayNs;
use log::{info, warn};

use super::{init_channel, SAMPLE_PERIOD_MS};

pub struct AdcPolling<A, D> {
    adc: A,
    delay: D,
    last_value: Option<u16>,
}

impl<A: AdcChannel, D: DelayNs> AdcPolling<A, D> {
    pub fn new(adc: A, delay: D) -> Self {
        Self {
            adc,
            delay,
            last_value: None,
        }
    }

    pub fn last_value(&self) -> Option<u16> {
        self.last_value
    }
}

impl<A: AdcChannel, D: DelayNs> Application for AdcPolling<A, D> {
    fn setup(&mut self) {
        info!("ADC Polling Setup");
        if let Err(err) = init_channel(&mut self.adc, &AdcConfig::default()) {
            warn!("ADC Polling: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        match self.adc.convert() {
            Ok(value) => {
                info!("ADC Value: {}", value);
                self.last_value = Some(value);
            }
            Err(err) => warn!("ADC Polling: conversion failed: {}", err),
        }

        self.delay.delay_ms(SAMPLE_PERIOD_MS);
    }
}
