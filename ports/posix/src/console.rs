//! Platform console on stdout

use std::fmt;
use std::io::{self, Write};

/// `fmt::Write` sink for the boot listing
#[derive(Debug)]
pub struct HostConsole {
    out: io::Stdout,
}

impl HostConsole {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for HostConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for HostConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut out = self.out.lock();
        out.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        out.flush().map_err(|_| fmt::Error)
    }
}
