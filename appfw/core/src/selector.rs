//! Selection of the active application

use crate::{AppError, AppResult};

/// Index of the currently selected application
///
/// Starts at 0 so that a freshly booted image runs the first registered
/// application. Requests outside `[0, count)` leave the selection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppSelector {
    current: usize,
}

impl AppSelector {
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Select `index` if it is below `count`, reporting a rejected request
    pub fn try_select(&mut self, index: usize, count: usize) -> AppResult<()> {
        if index < count {
            self.current = index;
            log::debug!("selected app {}", index);
            Ok(())
        } else {
            log::debug!("ignoring selection {} (count {})", index, count);
            Err(AppError::IndexOutOfRange { index, count })
        }
    }

    /// Select `index` if it is below `count`; otherwise do nothing
    pub fn select(&mut self, index: usize, count: usize) {
        let _ = self.try_select(index, count);
    }

    /// Currently selected index
    pub const fn current(&self) -> usize {
        self.current
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AppSelector {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "AppSelector({=usize})", self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first() {
        assert_eq!(AppSelector::new().current(), 0);
        assert_eq!(AppSelector::default(), AppSelector::new());
    }

    #[test]
    fn rejects_out_of_range() {
        let mut selector = AppSelector::new();
        selector.select(2, 3);
        assert_eq!(selector.current(), 2);

        assert_eq!(
            selector.try_select(3, 3),
            Err(AppError::IndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(selector.current(), 2);
    }

    #[test]
    fn nothing_is_selectable_when_empty() {
        let mut selector = AppSelector::new();
        assert!(selector.try_select(0, 0).is_err());
        assert_eq!(selector.current(), 0);
    }
}
