#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # appfw core
//!
//! Registration and selection of the applications that share one firmware
//! image. Every peripheral demo exposes a `setup`/`tick` pair; the registry
//! keeps them in registration order, the selector remembers which one is
//! active, and [`AppContext`] bundles both so that a dispatcher can own them
//! for the lifetime of the program.

use core::fmt;

pub mod application;
pub mod context;
pub mod macros;
pub mod registry;
pub mod selector;

pub use application::*;
pub use context::*;
pub use registry::*;
pub use selector::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum number of applications one image can register
pub const MAX_APPS: usize = 32;

/// Result type used by the feedback-returning registry and selector calls
pub type AppResult<T> = Result<T, AppError>;

/// Errors reported by the `try_*` variants of registration and selection.
///
/// The plain operations never report these; they drop or ignore the request
/// and leave state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// Registry is at capacity
    RegistryFull,
    /// Selection index outside `[0, count)`
    IndexOutOfRange { index: usize, count: usize },
    /// No application has been registered
    EmptyRegistry,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RegistryFull => write!(f, "Application registry is full"),
            AppError::IndexOutOfRange { index, count } => {
                write!(f, "Application index {} out of range (count {})", index, count)
            }
            AppError::EmptyRegistry => write!(f, "No applications registered"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AppError {}

#[cfg(feature = "defmt")]
impl defmt::Format for AppError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AppError::RegistryFull => defmt::write!(fmt, "RegistryFull"),
            AppError::IndexOutOfRange { index, count } => {
                defmt::write!(fmt, "IndexOutOfRange({=usize}/{=usize})", index, count)
            }
            AppError::EmptyRegistry => defmt::write!(fmt, "EmptyRegistry"),
        }
    }
}
