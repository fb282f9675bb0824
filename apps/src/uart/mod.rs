//! UART echo demos on USART1 at 9600 baud
//!
//! All three echo each received byte, collect bytes into a line until CR
//! or LF, answer a completed line with `Echo: <line>`, and send a numbered
//! message every [`MESSAGE_INTERVAL`] passes.

pub mod dma;
pub mod interrupt;
pub mod polling;

pub use dma::UartDmaDemo;
pub use interrupt::UartInterruptDemo;
pub use polling::UartPolling;

use appfw_hal::uart::{UartConfig, UartPort};
use appfw_hal::HalResult;
use heapless::Vec;

/// Longest line kept; further bytes are dropped until CR/LF
pub const LINE_CAPACITY: usize = 63;

/// Passes between periodic messages (5 s at 100 ms per pass)
pub const MESSAGE_INTERVAL: u32 = 50;

const BAUD_RATE: u32 = 9_600;
const PASS_MS: u32 = 100;

fn init_port<U: UartPort>(uart: &mut U) -> HalResult<()> {
    uart.configure(&UartConfig::default().with_baud_rate(BAUD_RATE))
}

/// Collects received bytes into lines
#[derive(Debug, Default)]
pub struct LineAssembler {
    line: Vec<u8, LINE_CAPACITY>,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self { line: Vec::new() }
    }

    /// Feed one byte; returns the finished line on CR/LF after a non-empty line
    pub fn feed(&mut self, byte: u8) -> Option<Vec<u8, LINE_CAPACITY>> {
        if byte == b'\r' || byte == b'\n' {
            if self.line.is_empty() {
                None
            } else {
                Some(core::mem::take(&mut self.line))
            }
        } else {
            // Full line: drop the byte
            let _ = self.line.push(byte);
            None
        }
    }

    pub fn pending(&self) -> &[u8] {
        &self.line
    }
}

/// Line bytes as text for log records
pub fn as_text(line: &[u8]) -> &str {
    core::str::from_utf8(line).unwrap_or("<non-utf8>")
}

/// Schedules the periodic message: first pass, then every interval
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageSchedule {
    last_sent: Option<u32>,
}

impl MessageSchedule {
    pub const fn new() -> Self {
        Self { last_sent: None }
    }

    pub fn is_due(&self, pass: u32) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => pass.wrapping_sub(last) >= MESSAGE_INTERVAL,
        }
    }

    pub fn mark_sent(&mut self, pass: u32) {
        self.last_sent = Some(pass);
    }
}
