//! Host port for the appfw demos.
//!
//! Runs the firmware image on a POSIX host: [`SimBoard`] implements every
//! HAL trait over a shared [`Simulation`], a [`Ticker`] thread moves the
//! simulated clock in real time so timers, the RTC and scripted inputs fire
//! the demos' handlers, and [`scheduler`] drives the dispatcher until Ctrl-C,
//! an iteration limit or a simulated watchdog reset.

pub mod console;
pub mod error;
pub mod scheduler;
pub mod sim;
pub mod time;

pub use console::HostConsole;
pub use error::PortError;
pub use sim::{SimBoard, SimConfig, Simulation};
pub use time::Ticker;

use appfw_apps::APP_NAMES;

/// Resolve a `--app` argument: a registration index or a display name
/// (case-insensitive).
pub fn resolve_app(arg: &str) -> Result<usize, PortError> {
    let arg = arg.trim();
    if let Ok(index) = arg.parse::<usize>() {
        return if index < APP_NAMES.len() {
            Ok(index)
        } else {
            Err(PortError::AppIndex {
                index,
                count: APP_NAMES.len(),
            })
        };
    }

    APP_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(arg))
        .ok_or_else(|| PortError::UnknownApp(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_index_and_name() {
        assert_eq!(resolve_app("0").unwrap(), 0);
        assert_eq!(resolve_app(" 19 ").unwrap(), 19);
        assert_eq!(resolve_app("uart dma").unwrap(), 16);
        assert_eq!(resolve_app("RTC").unwrap(), 17);
    }

    #[test]
    fn rejects_out_of_range_and_negative() {
        assert!(matches!(
            resolve_app("20"),
            Err(PortError::AppIndex { index: 20, count: 20 })
        ));
        assert!(matches!(resolve_app("-1"), Err(PortError::UnknownApp(_))));
        assert!(matches!(resolve_app("Blinky"), Err(PortError::UnknownApp(_))));
    }
}
