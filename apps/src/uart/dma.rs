//! UART DMA: reception tracked through the DMA counter, replies sent by DMA

use core::fmt::Write as _;

use appfw_core::Application;
use appfw_hal::uart::UartDma;
use appfw_hal::{DelayNs, HalResult, IrqFlag};
use heapless::String;
use log::{info, warn};

use super::{init_port, MessageSchedule, PASS_MS};

/// DMA receive buffer length; reception restarts once it is full
pub const DMA_BUFFER_SIZE: usize = 64;

static TX_COMPLETE: IrqFlag = IrqFlag::raised();
static RX_COMPLETE: IrqFlag = IrqFlag::new();

/// DMA1 channel 4 (USART1 TX) transfer-complete handler
pub fn on_tx_complete() {
    TX_COMPLETE.set();
}

/// DMA1 channel 5 (USART1 RX) transfer-complete handler
pub fn on_rx_complete() {
    RX_COMPLETE.set();
}

pub struct UartDmaDemo<U, D> {
    uart: U,
    delay: D,
    last_rx_count: usize,
    schedule: MessageSchedule,
    message_counter: u32,
}

impl<U: UartDma, D: DelayNs> UartDmaDemo<U, D> {
    pub fn new(uart: U, delay: D) -> Self {
        Self {
            uart,
            delay,
            last_rx_count: 0,
            schedule: MessageSchedule::new(),
            message_counter: 0,
        }
    }

    pub fn last_rx_count(&self) -> usize {
        self.last_rx_count
    }

    pub fn message_counter(&self) -> u32 {
        self.message_counter
    }

    fn init(&mut self) -> HalResult<()> {
        TX_COMPLETE.set();
        RX_COMPLETE.clear();
        init_port(&mut self.uart)?;
        self.uart.start_rx_dma(DMA_BUFFER_SIZE, on_rx_complete)
    }

    fn send(&mut self, text: &str) -> HalResult<()> {
        let bytes = text.as_bytes();
        let len = bytes.len().min(DMA_BUFFER_SIZE - 1);
        TX_COMPLETE.clear();
        let started = self.uart.start_tx_dma(&bytes[..len], on_tx_complete);
        if started.is_err() {
            TX_COMPLETE.set();
        }
        started
    }

    fn service_rx(&mut self) -> HalResult<()> {
        let current = self.uart.rx_dma_count();
        if current == self.last_rx_count {
            return Ok(());
        }

        for index in self.last_rx_count..current {
            let byte = self.uart.rx_dma_byte(index % DMA_BUFFER_SIZE).unwrap_or(0);
            let shown = if (32..=126).contains(&byte) {
                byte as char
            } else {
                '?'
            };
            info!("UART DMA: Received char: '{}' (0x{:02X})", shown, byte);
        }

        if TX_COMPLETE.is_set() {
            let mut reply: String<64> = String::new();
            let _ = write!(
                reply,
                "Echo: Received {} chars\r\n",
                current.saturating_sub(self.last_rx_count)
            );
            self.send(&reply)?;
        }

        self.last_rx_count = current;
        if current >= DMA_BUFFER_SIZE {
            self.uart.restart_rx_dma()?;
            RX_COMPLETE.clear();
            self.last_rx_count = 0;
            info!("UART DMA: RX buffer reset");
        }
        Ok(())
    }

    fn service_periodic(&mut self) -> HalResult<()> {
        if self.schedule.is_due(self.message_counter) && TX_COMPLETE.is_set() {
            let mut message: String<64> = String::new();
            let _ = write!(message, "UART DMA Message #{}\r\n", self.message_counter);
            self.send(&message)?;
            info!("UART DMA: Sent message #{}", self.message_counter);
            self.schedule.mark_sent(self.message_counter);
        }
        Ok(())
    }
}

impl<U: UartDma, D: DelayNs> Application for UartDmaDemo<U, D> {
    fn setup(&mut self) {
        info!("UART DMA Setup");
        match self.init() {
            Ok(()) => info!("UART DMA: USART1 configured at 9600 baud with DMA"),
            Err(err) => warn!("UART DMA: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        if let Err(err) = self.service_rx() {
            warn!("UART DMA: {}", err);
        }
        if let Err(err) = self.service_periodic() {
            warn!("UART DMA: {}", err);
        }
        self.message_counter = self.message_counter.wrapping_add(1);
        self.delay.delay_ms(PASS_MS);
    }
}
