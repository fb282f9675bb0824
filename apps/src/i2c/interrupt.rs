//! I2C Interrupt: alternating register write and read, each run by the
//! event interrupt and reported back to the loop

use appfw_core::Application;
use appfw_hal::i2c::{I2cEvent, I2cInterrupt};
use appfw_hal::{DelayNs, IrqCell, IrqFlag};
use log::{info, warn};

use super::{init_bus, EEPROM, TEST_REGISTER};

const PERIOD_MS: u32 = 1_000;

static IN_FLIGHT: IrqFlag = IrqFlag::new();
static COMPLETED: IrqCell<Option<I2cEvent>> = IrqCell::new(None);

/// I2C1 event/error handler
pub fn on_i2c_event(event: I2cEvent) {
    COMPLETED.set(Some(event));
    IN_FLIGHT.clear();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Read,
}

pub struct I2cInterruptDemo<I, D> {
    i2c: I,
    delay: D,
    test_data: u8,
    next: Operation,
    last_event: Option<I2cEvent>,
}

impl<I: I2cInterrupt, D: DelayNs> I2cInterruptDemo<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            test_data: 0xAA,
            next: Operation::Write,
            last_event: None,
        }
    }

    pub fn test_data(&self) -> u8 {
        self.test_data
    }

    pub fn next_operation(&self) -> Operation {
        self.next
    }

    pub fn last_event(&self) -> Option<I2cEvent> {
        self.last_event
    }

    fn start_next(&mut self) {
        IN_FLIGHT.set();
        let started = match self.next {
            Operation::Write => {
                info!("I2C Interrupt: Writing data 0x{:02X}", self.test_data);
                self.next = Operation::Read;
                self.i2c
                    .start_write(EEPROM, TEST_REGISTER, self.test_data, on_i2c_event)
            }
            Operation::Read => {
                info!("I2C Interrupt: Reading data");
                self.next = Operation::Write;
                self.test_data = self.test_data.wrapping_add(1);
                self.i2c.start_read(EEPROM, TEST_REGISTER, on_i2c_event)
            }
        };
        if let Err(err) = started {
            IN_FLIGHT.clear();
            warn!("I2C Interrupt: start failed: {}", err);
        }
    }
}

impl<I: I2cInterrupt, D: DelayNs> Application for I2cInterruptDemo<I, D> {
    fn setup(&mut self) {
        info!("I2C Interrupt Setup");
        IN_FLIGHT.clear();
        COMPLETED.set(None);
        if let Err(err) = init_bus(&mut self.i2c) {
            warn!("I2C Interrupt: init failed: {}", err);
        }
    }

    fn tick(&mut self) {
        if !IN_FLIGHT.is_set() {
            self.start_next();
        }

        if let Some(event) = COMPLETED.replace(None) {
            match event {
                I2cEvent::Read(value) => {
                    info!("I2C Interrupt: Read complete, data = 0x{:02X}", value)
                }
                I2cEvent::Written => info!("I2C Interrupt: Write complete"),
                I2cEvent::Nack => info!("I2C Interrupt: NACK received"),
            }
            self.last_event = Some(event);
        }

        self.delay.delay_ms(PERIOD_MS);
    }
}
