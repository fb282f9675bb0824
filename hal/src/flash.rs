//! Embedded flash programming

use crate::error::HalResult;

/// Value of an erased flash word
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Page-erasable, word-programmable flash
///
/// Erase and program require the controller to be unlocked first and
/// return [`HalError::Locked`](crate::HalError::Locked) otherwise.
pub trait Flash {
    /// Erase granularity in bytes
    const PAGE_SIZE: u32;

    fn unlock(&mut self) -> HalResult<()>;

    fn lock(&mut self) -> HalResult<()>;

    fn is_locked(&self) -> bool;

    /// Erase the page containing `address`
    fn erase_page(&mut self, address: u32) -> HalResult<()>;

    /// Program one 32-bit word at a word-aligned `address`
    fn program_word(&mut self, address: u32, word: u32) -> HalResult<()>;

    fn read_word(&self, address: u32) -> HalResult<u32>;

    /// Read consecutive words starting at `address`
    fn read(&self, address: u32, buffer: &mut [u32]) -> HalResult<()> {
        for (offset, word) in (0u32..).zip(buffer.iter_mut()) {
            *word = self.read_word(address + offset * 4)?;
        }
        Ok(())
    }

    /// Unlock, program consecutive words, lock again
    ///
    /// Stops at the first failing word; the controller is locked either way.
    fn program(&mut self, address: u32, words: &[u32]) -> HalResult<()> {
        self.unlock()?;
        let result = (0u32..)
            .zip(words.iter())
            .try_for_each(|(offset, &word)| self.program_word(address + offset * 4, word));
        self.lock()?;
        result
    }

    /// Unlock, erase one page, lock again
    fn erase(&mut self, address: u32) -> HalResult<()> {
        self.unlock()?;
        let result = self.erase_page(address);
        self.lock()?;
        result
    }
}
