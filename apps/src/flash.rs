//! Flash: erase, program and verify one page in the upper half of flash

use appfw_core::Application;
use appfw_hal::flash::{Flash, ERASED_WORD};
use appfw_hal::{DelayNs, HalError, HalResult};
use log::{info, warn};

use crate::hex::HexWords;

/// Start of the test page (64 KiB into flash, clear of the image)
pub const TEST_ADDRESS: u32 = 0x0801_0000;
/// Words programmed per pass
pub const TEST_WORDS: usize = 64;

/// Pattern repeated over the test area; each pass adds the loop counter
pub const TEST_PATTERN: [u32; 16] = [
    0xDEAD_BEEF,
    0xCAFE_BABE,
    0x1234_5678,
    0x8765_4321,
    0xAABB_CCDD,
    0x1122_3344,
    0x5566_7788,
    0x99AA_BBCC,
    0xFEDC_BA98,
    0x1357_9BDF,
    0x2468_ACE0,
    0x369C_F258,
    0x147A_D036,
    0x258B_E147,
    0x369C_F258,
    0x47AE_036B,
];

const PARTIAL_START: usize = 10;
const PARTIAL_LEN: usize = 6;
const PASS_MS: u32 = 5_000;

/// Test data for pass `loop_counter`
pub fn test_data(loop_counter: u32) -> [u32; TEST_WORDS] {
    let mut data = [0; TEST_WORDS];
    for (i, word) in data.iter_mut().enumerate() {
        *word = TEST_PATTERN[i % TEST_PATTERN.len()].wrapping_add(loop_counter);
    }
    data
}

/// Outcome of one erase/program/verify pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassResult {
    Passed,
    /// Word at this index was not erased
    EraseFailed(usize),
    /// Word at this index read back wrong
    VerifyFailed(usize),
    Error(HalError),
}

pub struct FlashDemo<F, D> {
    flash: F,
    delay: D,
    loop_counter: u32,
    last_result: Option<PassResult>,
}

impl<F: Flash, D: DelayNs> FlashDemo<F, D> {
    pub fn new(flash: F, delay: D) -> Self {
        Self {
            flash,
            delay,
            loop_counter: 0,
            last_result: None,
        }
    }

    pub fn loop_counter(&self) -> u32 {
        self.loop_counter
    }

    pub fn last_result(&self) -> Option<PassResult> {
        self.last_result
    }

    pub fn flash(&self) -> &F {
        &self.flash
    }

    fn run_pass(&mut self) -> HalResult<PassResult> {
        let mut readback = [0u32; TEST_WORDS];

        info!("Flash: Erasing page at 0x{:08X}", TEST_ADDRESS);
        self.flash.erase(TEST_ADDRESS)?;
        self.flash.read(TEST_ADDRESS, &mut readback)?;
        if let Some(index) = readback.iter().position(|&word| word != ERASED_WORD) {
            warn!(
                "Flash: Erase verification failed at word {} (0x{:08X})",
                index, readback[index]
            );
            return Ok(PassResult::EraseFailed(index));
        }
        info!("Flash: Erase verified");

        let data = test_data(self.loop_counter);
        info!("Flash: Programming {} words", TEST_WORDS);
        self.flash.program(TEST_ADDRESS, &data)?;

        self.flash.read(TEST_ADDRESS, &mut readback)?;
        if let Some(index) = (0..TEST_WORDS).find(|&i| readback[i] != data[i]) {
            warn!(
                "Flash: Verification failed at word {}: expected 0x{:08X}, got 0x{:08X}",
                index, data[index], readback[index]
            );
            return Ok(PassResult::VerifyFailed(index));
        }
        info!("Flash: Program verified");
        info!("Flash: First 8 words: {}", HexWords(&readback[..8]));

        let mut partial = [0u32; PARTIAL_LEN];
        let partial_address = TEST_ADDRESS + (PARTIAL_START as u32) * 4;
        self.flash.read(partial_address, &mut partial)?;
        let expected = &data[PARTIAL_START..PARTIAL_START + PARTIAL_LEN];
        if partial[..] != *expected {
            warn!("Flash: Partial read mismatch: {}", HexWords(&partial));
            return Ok(PassResult::VerifyFailed(PARTIAL_START));
        }
        info!(
            "Flash: Partial read words {}-{} OK",
            PARTIAL_START,
            PARTIAL_START + PARTIAL_LEN - 1
        );

        Ok(PassResult::Passed)
    }
}

impl<F: Flash, D: DelayNs> Application for FlashDemo<F, D> {
    fn setup(&mut self) {
        info!("Flash Setup");
        info!("Flash: Test address = 0x{:08X}", TEST_ADDRESS);
        info!("Flash: Test data size = {} bytes", TEST_WORDS * 4);
    }

    fn tick(&mut self) {
        info!("Flash: Test #{}", self.loop_counter);
        let result = self.run_pass().unwrap_or_else(PassResult::Error);
        match result {
            PassResult::Passed => info!("Flash: Test #{} passed", self.loop_counter),
            PassResult::Error(err) => warn!("Flash: {}", err),
            _ => {}
        }
        self.last_result = Some(result);
        self.loop_counter = self.loop_counter.wrapping_add(1);
        self.delay.delay_ms(PASS_MS);
    }
}
