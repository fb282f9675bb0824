//! SPI Interrupt: alternating 8-byte write and read moved by RXNE/TXE
//! interrupts; each completion is reported on the following pass

use appfw_core::Application;
use appfw_hal::spi::{SpiInterrupt, DUMMY_BYTE};
use appfw_hal::{DelayNs, IrqFlag};
use log::{info, warn};

use super::{init_bus, RxBuffer};
use crate::hex::HexBytes;

const LEN: usize = 8;
const PERIOD_MS: u32 = 100;

static TRANSFER_COMPLETE: IrqFlag = IrqFlag::raised();
static RECEIVED: RxBuffer = RxBuffer::new();

/// SPI1 transfer-complete handler
pub fn on_transfer_complete(rx: &[u8]) {
    RECEIVED.store(rx);
    TRANSFER_COMPLETE.set();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Read,
}

pub struct SpiInterruptDemo<S, D> {
    spi: S,
    delay: D,
    test_data: [u8; LEN],
    loop_counter: u32,
    next: Operation,
    pending: Option<Operation>,
}

impl<S: SpiInterrupt, D: DelayNs> SpiInterruptDemo<S, D> {
    pub fn new(spi: S, delay: D) -> Self {
        Self {
            spi,
            delay,
            test_data: [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x11, 0x22],
            loop_counter: 0,
            next: Operation::Write,
            pending: None,
        }
    }

    pub fn test_data(&self) -> &[u8; LEN] {
        &self.test_data
    }

    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    pub fn next_operation(&self) -> Operation {
        self.next
    }

    fn report(done: Operation) {
        match done {
            Operation::Write => info!("SPI Interrupt: Write completed"),
            Operation::Read => {
                let (bytes, len) = RECEIVED.load();
                info!("SPI Interrupt: Received data: {}", HexBytes(&bytes[..len]));
            }
        }
    }

    fn start(&mut self, op: Operation) {
        let tx = match op {
            Operation::Write => self.test_data,
            Operation::Read => [DUMMY_BYTE; LEN],
        };
        TRANSFER_COMPLETE.clear();
        match self.spi.start_transfer(&tx, on_transfer_complete) {
            Ok(()) => self.pending = Some(op),
            Err(err) => {
                TRANSFER_COMPLETE.set();
                warn!("SPI Interrupt: start failed: {}", err);
            }
        }
    }
}

impl<S: SpiInterrupt, D: DelayNs> Application for SpiInterruptDemo<S, D> {
    fn setup(&mut self) {
        info!("SPI Interrupt Setup");
        TRANSFER_COMPLETE.set();
        match init_bus(&mut self.spi) {
            Ok(()) => info!("SPI Interrupt: SPI1 configured as master with interrupts"),
            Err(err) => warn!("SPI Interrupt: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        if TRANSFER_COMPLETE.is_set() {
            if let Some(done) = self.pending.take() {
                Self::report(done);
            }

            info!("SPI Interrupt: Loop #{}", self.loop_counter);
            match self.next {
                Operation::Write => {
                    info!("SPI Interrupt: Writing data: {}", HexBytes(&self.test_data));
                    self.start(Operation::Write);
                    self.next = Operation::Read;
                }
                Operation::Read => {
                    info!("SPI Interrupt: Reading {} bytes", LEN);
                    self.start(Operation::Read);
                    self.next = Operation::Write;
                    self.loop_counter = self.loop_counter.wrapping_add(1);
                    for byte in self.test_data.iter_mut() {
                        *byte = byte.wrapping_add(1);
                    }
                }
            }
        }

        self.delay.delay_ms(PERIOD_MS);
    }
}
