//! I2C Polling: write a byte, read it back, compare

use appfw_core::Application;
use appfw_hal::i2c::I2cMaster;
use appfw_hal::DelayNs;
use log::{info, warn};

use super::{init_bus, EEPROM, TEST_REGISTER};

const WRITE_CYCLE_MS: u32 = 10;
const PERIOD_MS: u32 = 2_000;

/// Outcome of one write/read-back round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrip {
    Verified,
    Mismatch(u8),
    ReadFailed,
    WriteFailed,
}

pub struct I2cPolling<I, D> {
    i2c: I,
    delay: D,
    test_data: u8,
    last_round: Option<RoundTrip>,
}

impl<I: I2cMaster, D: DelayNs> I2cPolling<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            test_data: 0x55,
            last_round: None,
        }
    }

    pub fn test_data(&self) -> u8 {
        self.test_data
    }

    pub fn last_round(&self) -> Option<RoundTrip> {
        self.last_round
    }

    fn round_trip(&mut self) -> RoundTrip {
        let data = self.test_data;
        if self.i2c.write_register(EEPROM, TEST_REGISTER, data).is_err() {
            info!("I2C Polling: Write failed");
            return RoundTrip::WriteFailed;
        }
        info!("I2C Polling: Write successful, data = 0x{:02X}", data);

        self.delay.delay_ms(WRITE_CYCLE_MS);

        match self.i2c.read_register(EEPROM, TEST_REGISTER) {
            Ok(read) => {
                info!("I2C Polling: Read successful, data = 0x{:02X}", read);
                if read == data {
                    info!("I2C Polling: Data verification successful!");
                    RoundTrip::Verified
                } else {
                    info!("I2C Polling: Data verification failed!");
                    RoundTrip::Mismatch(read)
                }
            }
            Err(_) => {
                info!("I2C Polling: Read failed");
                RoundTrip::ReadFailed
            }
        }
    }
}

impl<I: I2cMaster, D: DelayNs> Application for I2cPolling<I, D> {
    fn setup(&mut self) {
        info!("I2C Polling Setup");
        if let Err(err) = init_bus(&mut self.i2c) {
            warn!("I2C Polling: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        self.last_round = Some(self.round_trip());
        self.test_data = self.test_data.wrapping_add(1);
        self.delay.delay_ms(PERIOD_MS);
    }
}
