//! Hex dumps for log lines

use core::fmt;

/// Formats bytes as `0x01 0x02 ...`
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "0x{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Formats words as `0xDEADBEEF 0xCAFEBABE ...`
pub struct HexWords<'a>(pub &'a [u32]);

impl fmt::Display for HexWords<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "0x{:08X}", word)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_and_words() {
        assert_eq!(HexBytes(&[0x01, 0xAB]).to_string(), "0x01 0xAB");
        assert_eq!(HexWords(&[0xDEAD_BEEF]).to_string(), "0xDEADBEEF");
        assert_eq!(HexBytes(&[]).to_string(), "");
    }
}
