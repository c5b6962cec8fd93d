//! Leaf actions of the stock menu.
//!
//! Callbacks only enqueue an [`AppCommand`]; the event loop applies it once
//! the key that triggered it has been fully handled, so no callback ever
//! re-enters the navigator.

use tokio::sync::mpsc::UnboundedSender;

use crate::core::menu::ActionRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Quit,
    Reboot,
    FileBrowser,
    ToggleBacklight,
    BacklightTimer,
    Contrast,
    WheelDebounce,
    ButtonDebounce,
    ToggleClicker,
    ResetSettings,
    SaveSettings,
    LoadSettings,
}

impl AppCommand {
    /// Action name used in menu files.
    pub fn action_name(self) -> &'static str {
        match self {
            AppCommand::Quit => "quit",
            AppCommand::Reboot => "reboot",
            AppCommand::FileBrowser => "file_browser",
            AppCommand::ToggleBacklight => "toggle_backlight",
            AppCommand::BacklightTimer => "backlight_timer",
            AppCommand::Contrast => "contrast",
            AppCommand::WheelDebounce => "wheel_debounce",
            AppCommand::ButtonDebounce => "button_debounce",
            AppCommand::ToggleClicker => "toggle_clicker",
            AppCommand::ResetSettings => "reset_settings",
            AppCommand::SaveSettings => "save_settings",
            AppCommand::LoadSettings => "load_settings",
        }
    }

    pub const ALL: &[AppCommand] = &[
        AppCommand::Quit,
        AppCommand::Reboot,
        AppCommand::FileBrowser,
        AppCommand::ToggleBacklight,
        AppCommand::BacklightTimer,
        AppCommand::Contrast,
        AppCommand::WheelDebounce,
        AppCommand::ButtonDebounce,
        AppCommand::ToggleClicker,
        AppCommand::ResetSettings,
        AppCommand::SaveSettings,
        AppCommand::LoadSettings,
    ];
}

/// Registry with one callback per [`AppCommand`], each sending its command
/// on `tx`.
pub fn stock_registry(tx: &UnboundedSender<AppCommand>) -> ActionRegistry {
    let mut actions = ActionRegistry::new();
    for &command in AppCommand::ALL {
        let tx = tx.clone();
        actions.register(command.action_name(), move || {
            if tx.send(command).is_err() {
                tracing::debug!(?command, "event loop gone; dropping command");
            }
        });
    }
    actions
}
