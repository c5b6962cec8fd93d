//! Input handling: maps key events and queued commands to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::{AppConfig, DeviceSettings};
use crate::core::navigator::Transition;

use super::actions::AppCommand;
use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let Some(command) = state.config.match_key(key) else {
        return;
    };
    let Some(nav_key) = command.nav_key() else {
        state.should_quit = true;
        return;
    };
    if !state.key_filter.admit(nav_key) {
        tracing::trace!(?nav_key, "debounced");
        return;
    }

    state.status_message = None;
    let transition = state.navigator.apply(nav_key);
    if let Transition::Rejected(err) = transition {
        state.status_message = Some(format!("Can't open: {err}"));
    }
    tracing::trace!(redrawn = transition.redrawn(), "key handled");
}

/// Apply a command queued by a leaf action.
pub fn apply_command(state: &mut AppState, command: AppCommand) {
    tracing::debug!(?command, "applying command");
    let settings = &mut state.config.settings;

    let message = match command {
        AppCommand::Quit => {
            state.should_quit = true;
            return;
        }
        AppCommand::Reboot => {
            state.reboot_requested = true;
            state.should_quit = true;
            return;
        }
        AppCommand::FileBrowser => "File browser is not available on this host".to_string(),
        AppCommand::ToggleBacklight => {
            settings.backlight = !settings.backlight;
            format!("Backlight: {}", on_off(settings.backlight))
        }
        AppCommand::BacklightTimer => {
            settings.cycle_backlight_timer();
            match settings.backlight_timer {
                0 => "Backlight timer: always on".to_string(),
                secs => format!("Backlight timer: {secs}s"),
            }
        }
        AppCommand::Contrast => {
            settings.cycle_contrast();
            format!("Contrast: {}", settings.contrast)
        }
        AppCommand::WheelDebounce => {
            settings.cycle_wheel_debounce();
            let msg = format!("Wheel debounce: {}", settings.wheel_debounce);
            state.sync_key_filter();
            msg
        }
        AppCommand::ButtonDebounce => {
            settings.cycle_button_debounce();
            let msg = format!("Button debounce: {}", settings.button_debounce);
            state.sync_key_filter();
            msg
        }
        AppCommand::ToggleClicker => {
            settings.clicker = !settings.clicker;
            format!("Clicker: {}", on_off(settings.clicker))
        }
        AppCommand::ResetSettings => {
            *settings = DeviceSettings::default();
            state.sync_key_filter();
            "Settings reset".to_string()
        }
        AppCommand::SaveSettings => match state.config.save() {
            Ok(()) => "Settings saved".to_string(),
            Err(err) => {
                tracing::warn!("saving settings failed: {err:#}");
                format!("Save failed: {err}")
            }
        },
        AppCommand::LoadSettings => {
            state.config = AppConfig::load();
            state.sync_key_filter();
            "Settings loaded".to_string()
        }
    };

    state.status_message = Some(message);
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::stock_registry;
    use crate::core::catalog::STOCK_MENU;
    use crate::core::menu::MenuTree;
    use crate::core::navigator::Navigator;
    use crate::core::render::RowMetrics;
    use crate::ui::canvas::Canvas;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn setup() -> (AppState, UnboundedReceiver<AppCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tree = MenuTree::parse(STOCK_MENU, &stock_registry(&tx)).unwrap();
        let navigator = Navigator::new(tree, Canvas::new(20, 5)).with_metrics(RowMetrics::TERMINAL);
        (AppState::new(navigator, AppConfig::default()), rx)
    }

    fn press(state: &mut AppState, code: KeyCode, times: usize) {
        for _ in 0..times {
            handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    #[test]
    fn keys_drive_the_navigator_and_paint_the_canvas() {
        let (mut state, _rx) = setup();
        press(&mut state, KeyCode::Down, 3);
        press(&mut state, KeyCode::Enter, 1);

        assert_eq!(state.navigator.header(), "Settings");
        let canvas = state.navigator.renderer();
        assert_eq!(canvas.header(), "Settings");
        assert_eq!(canvas.row_text(0), " About");
        assert_eq!(canvas.row_text(4), " Backlight");

        press(&mut state, KeyCode::Esc, 1);
        assert_eq!(state.navigator.current().selected_index, 3);
        assert_eq!(state.navigator.renderer().row_text(3), " Settings");
    }

    #[test]
    fn leaf_actions_arrive_as_commands() {
        let (mut state, mut rx) = setup();
        press(&mut state, KeyCode::Down, 5);
        press(&mut state, KeyCode::Enter, 1);
        assert_eq!(rx.try_recv(), Ok(AppCommand::Quit));
        assert!(!state.should_quit);

        apply_command(&mut state, AppCommand::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn quit_binding_and_ctrl_c_stop_the_loop() {
        let (mut state, _rx) = setup();
        press(&mut state, KeyCode::Char('q'), 1);
        assert!(state.should_quit);

        let (mut state, _rx) = setup();
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn wheel_debounce_command_slows_scrolling() {
        let (mut state, _rx) = setup();
        apply_command(&mut state, AppCommand::WheelDebounce);
        assert_eq!(state.config.settings.wheel_debounce, 2);
        assert_eq!(state.status_message.as_deref(), Some("Wheel debounce: 2"));

        press(&mut state, KeyCode::Down, 3);
        assert_eq!(state.navigator.current().selected_index, 1);
        press(&mut state, KeyCode::Down, 1);
        assert_eq!(state.navigator.current().selected_index, 2);
    }

    #[test]
    fn toggles_and_reset_update_settings() {
        let (mut state, _rx) = setup();
        apply_command(&mut state, AppCommand::ToggleBacklight);
        assert!(!state.config.settings.backlight);
        assert_eq!(state.status_message.as_deref(), Some("Backlight: off"));

        apply_command(&mut state, AppCommand::ButtonDebounce);
        apply_command(&mut state, AppCommand::ResetSettings);
        assert_eq!(state.config.settings, DeviceSettings::default());
        press(&mut state, KeyCode::Down, 1);
        assert_eq!(state.navigator.current().selected_index, 1);
    }

    #[test]
    fn overflowing_history_is_reported_in_the_status_bar() {
        let mut text = String::new();
        for level in 0..6 {
            text.push_str(&format!("[m{level}]\nNext = link m{}\nend\n", level + 1));
        }
        text.push_str("[m6]\nBottom = value\nend\n");
        let (tx, _rx) = mpsc::unbounded_channel();
        let tree = MenuTree::parse(&text, &stock_registry(&tx)).unwrap();
        let navigator = Navigator::new(tree, Canvas::new(20, 5)).with_metrics(RowMetrics::TERMINAL);
        let mut state = AppState::new(navigator, AppConfig::default());

        press(&mut state, KeyCode::Enter, 5);
        assert!(state.status_message.is_none());
        let deepest = state.navigator.current();
        assert_eq!(state.navigator.header(), "Next");

        press(&mut state, KeyCode::Enter, 1);
        let status = state.status_message.as_deref().unwrap_or_default();
        assert!(status.contains("menu history is full"), "{status}");
        assert_eq!(state.navigator.current(), deepest);
        assert_eq!(state.navigator.history().len(), 5);
    }

    #[test]
    fn reboot_requests_exit() {
        let (mut state, _rx) = setup();
        apply_command(&mut state, AppCommand::Reboot);
        assert!(state.reboot_requested && state.should_quit);
    }

    #[test]
    fn next_key_clears_status_message() {
        let (mut state, _rx) = setup();
        apply_command(&mut state, AppCommand::FileBrowser);
        assert!(state.status_message.is_some());
        press(&mut state, KeyCode::Down, 1);
        assert!(state.status_message.is_none());
    }
}
