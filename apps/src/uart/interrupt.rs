//! UART Interrupt: RXNE fills a receive ring, TXE drains a transmit ring

use core::fmt::Write as _;

use appfw_core::Application;
use appfw_hal::uart::UartInterrupt;
use appfw_hal::{DelayNs, HalResult, IrqFlag, IrqRing};
use heapless::String;
use log::{info, warn};

use super::{as_text, init_port, LineAssembler, MessageSchedule, PASS_MS};

/// Ring sizes; one slot is kept free like a head/tail ring
pub const RX_BUFFER_SIZE: usize = 128;
pub const TX_BUFFER_SIZE: usize = 128;

static RX: IrqRing<RX_BUFFER_SIZE> = IrqRing::new();
static TX: IrqRing<TX_BUFFER_SIZE> = IrqRing::new();
static TX_BUSY: IrqFlag = IrqFlag::new();

/// USART1 RXNE handler
pub fn on_rx(byte: u8) {
    // Full ring: byte is lost
    let _ = RX.push(byte);
}

/// USART1 TXE handler: next byte to send, `None` ends the burst
pub fn on_tx_empty() -> Option<u8> {
    let next = TX.pop();
    if next.is_none() {
        TX_BUSY.clear();
    }
    next
}

pub struct UartInterruptDemo<U, D> {
    uart: U,
    delay: D,
    assembler: LineAssembler,
    schedule: MessageSchedule,
    message_counter: u32,
}

impl<U: UartInterrupt, D: DelayNs> UartInterruptDemo<U, D> {
    pub fn new(uart: U, delay: D) -> Self {
        Self {
            uart,
            delay,
            assembler: LineAssembler::new(),
            schedule: MessageSchedule::new(),
            message_counter: 0,
        }
    }

    pub fn message_counter(&self) -> u32 {
        self.message_counter
    }

    fn init(&mut self) -> HalResult<()> {
        RX.clear();
        TX.clear();
        TX_BUSY.clear();
        init_port(&mut self.uart)?;
        self.uart.listen_tx_empty(on_tx_empty)?;
        self.uart.listen_rx(on_rx)
    }

    fn kick(&mut self) -> HalResult<()> {
        if !TX_BUSY.is_set() {
            TX_BUSY.set();
            self.uart.enable_tx_interrupt()?;
        }
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> HalResult<()> {
        if !TX.push(byte) {
            // Let the handler drain, then retry once
            self.kick()?;
            if !TX.push(byte) {
                warn!("UART Interrupt: TX ring full, byte dropped");
            }
        }
        self.kick()
    }

    fn send(&mut self, data: &[u8]) -> HalResult<()> {
        data.iter().try_for_each(|&byte| self.send_byte(byte))
    }

    fn service(&mut self) -> HalResult<()> {
        while let Some(byte) = RX.pop() {
            self.send_byte(byte)?;
            if let Some(line) = self.assembler.feed(byte) {
                info!("UART Interrupt: Received: '{}'", as_text(&line));
                self.send(b"Echo: ")?;
                self.send(&line)?;
                self.send(b"\r\n")?;
            }
        }

        if self.schedule.is_due(self.message_counter) {
            let mut message: String<64> = String::new();
            let _ = write!(message, "UART Interrupt Message #{}\r\n", self.message_counter);
            self.send(message.as_bytes())?;
            info!("UART Interrupt: Sent message #{}", self.message_counter);
            self.schedule.mark_sent(self.message_counter);
        }
        Ok(())
    }
}

impl<U: UartInterrupt, D: DelayNs> Application for UartInterruptDemo<U, D> {
    fn setup(&mut self) {
        info!("UART Interrupt Setup");
        match self.init() {
            Ok(()) => info!("UART Interrupt: USART1 configured at 9600 baud with interrupts"),
            Err(err) => warn!("UART Interrupt: init failed: {}", err),
        }
    }

    fn tick(&mut self) {
        if let Err(err) = self.service() {
            warn!("UART Interrupt: {}", err);
        }
        self.message_counter = self.message_counter.wrapping_add(1);
        self.delay.delay_ms(PASS_MS);
    }
}
