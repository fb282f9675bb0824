//! Host port errors

use thiserror::Error;

/// Failures while setting up or running the host image
#[derive(Debug, Error)]
pub enum PortError {
    #[error("unknown application {0:?}; use --list to see the registered names")]
    UnknownApp(String),

    #[error("application index {index} out of range, {count} registered")]
    AppIndex { index: usize, count: usize },

    #[error("failed to install the Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("console write failed")]
    Console(#[from] std::fmt::Error),

    #[error("ticker thread: {0}")]
    Io(#[from] std::io::Error),
}
