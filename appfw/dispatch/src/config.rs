//! Dispatcher configuration

/// Configuration for the dispatcher.
///
/// Changing `default_index` and restarting is the only way to run a
/// different application; there is no reselection once the loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Application selected during boot, ignored when out of range
    pub default_index: usize,
    /// Print the application listing during boot
    pub list_on_boot: bool,
    /// Called instead of a tick when nothing is registered
    pub idle_hook: Option<fn()>,
}

impl DispatcherConfig {
    pub const fn new() -> Self {
        Self {
            default_index: 0,
            list_on_boot: true,
            idle_hook: None,
        }
    }

    /// Creates a new dispatcher configuration builder.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::default()
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ergonomic dispatcher configuration construction.
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    /// Sets the application selected at boot.
    pub fn default_index(mut self, index: usize) -> Self {
        self.config.default_index = index;
        self
    }

    /// Enables or disables the boot listing.
    pub fn list_on_boot(mut self, enabled: bool) -> Self {
        self.config.list_on_boot = enabled;
        self
    }

    /// Sets the idle hook.
    pub fn idle_hook(mut self, hook: fn()) -> Self {
        self.config.idle_hook = Some(hook);
        self
    }

    /// Builds the dispatcher configuration.
    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() {}

    #[test]
    fn builder_overrides_defaults() {
        let config = DispatcherConfig::builder()
            .default_index(3)
            .list_on_boot(false)
            .idle_hook(idle)
            .build();

        assert_eq!(config.default_index, 3);
        assert!(!config.list_on_boot);
        assert!(config.idle_hook.is_some());
    }

    #[test]
    fn defaults_select_first_and_list() {
        let config = DispatcherConfig::default();
        assert_eq!(config.default_index, 0);
        assert!(config.list_on_boot);
        assert!(config.idle_hook.is_none());
    }
}
