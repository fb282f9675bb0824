//! # Peripheral demos
//!
//! Twenty small applications, one per peripheral and access style
//! (polling, interrupt, DMA), each implementing
//! [`Application`](appfw_core::Application). They are written against the
//! `appfw-hal` traits and obtain their peripherals from a [`Board`].
//!
//! Interrupt-driven demos keep the state they share with their handlers in
//! module statics and expose the handler functions (`on_*`) that they bind
//! to the peripheral during `setup`.
//!
//! Output goes through `log::info!`, one record per line.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

pub mod adc;
pub mod board;
pub mod catalog;
pub mod flash;
pub mod gpio;
pub mod hello;
pub mod hex;
pub mod i2c;
pub mod led;
pub mod rtc;
pub mod spi;
pub mod timer;
pub mod uart;
pub mod watchdog;

pub use board::Board;
pub use catalog::{Catalog, APP_NAMES};
