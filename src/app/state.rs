//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use crate::config::AppConfig;
use crate::core::navigator::Navigator;
use crate::ui::canvas::Canvas;

use super::input::KeyFilter;

/// Top-level application state.
pub struct AppState {
    /// Menu engine; paints into its canvas on every visible transition.
    pub navigator: Navigator<Canvas>,
    /// Key bindings and device settings.
    pub config: AppConfig,
    /// Debounce applied before keys reach the navigator.
    pub key_filter: KeyFilter,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set by the reboot action; reported on exit.
    pub reboot_requested: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(navigator: Navigator<Canvas>, config: AppConfig) -> Self {
        let key_filter = KeyFilter::new(
            config.settings.wheel_debounce,
            config.settings.button_debounce,
        );
        Self {
            navigator,
            config,
            key_filter,
            should_quit: false,
            reboot_requested: false,
            status_message: None,
        }
    }

    /// Re-read debounce thresholds after the settings changed.
    pub fn sync_key_filter(&mut self) {
        let s = &self.config.settings;
        self.key_filter
            .set_thresholds(s.wheel_debounce, s.button_debounce);
    }
}
