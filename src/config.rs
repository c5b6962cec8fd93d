//! User configuration — keybindings, device settings and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/menu-nav/config.toml` (default `~/.config/menu-nav/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::navigator::NavKey;

// ───────────────────────────────────────── commands ──────────

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveUp,
    MoveDown,
    Activate,
    Back,
    Quit,
}

impl Command {
    pub const ALL: &[Command] = &[
        Command::MoveUp,
        Command::MoveDown,
        Command::Activate,
        Command::Back,
        Command::Quit,
    ];

    /// The navigator key this command drives, if any.
    pub fn nav_key(self) -> Option<NavKey> {
        match self {
            Command::MoveUp => Some(NavKey::Up),
            Command::MoveDown => Some(NavKey::Down),
            Command::Activate => Some(NavKey::Activate),
            Command::Back => Some(NavKey::Back),
            Command::Quit => None,
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            Command::MoveUp => "move_up",
            Command::MoveDown => "move_down",
            Command::Activate => "activate",
            Command::Back => "back",
            Command::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Config-file spelling, e.g. `"Ctrl+c"`, `"Up"`, `"q"`.
    fn to_config_string(&self) -> String {
        let mut s = self.modifier_prefix();
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// Short label for the status bar.
    pub fn display(&self) -> String {
        let arrow = match self.code {
            KeyCode::Up => "↑",
            KeyCode::Down => "↓",
            KeyCode::Left => "←",
            KeyCode::Right => "→",
            _ => return self.to_config_string(),
        };
        let mut s = self.modifier_prefix();
        s.push_str(arrow);
        s
    }

    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" | "bksp" => KeyCode::Backspace,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            // Keep the original case of single characters.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── device settings ───

/// Settings the stock menu's leaf actions change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
    pub backlight: bool,
    /// Seconds; 0 keeps the backlight on.
    pub backlight_timer: u32,
    pub contrast: u8,
    /// Scroll events needed per step (1 = every event).
    pub wheel_debounce: u8,
    /// Button presses needed per activation (1 = every press).
    pub button_debounce: u8,
    pub clicker: bool,
}

impl DeviceSettings {
    pub const BACKLIGHT_TIMERS: &[u32] = &[0, 2, 5, 10, 20, 30, 60];
    pub const CONTRAST_STEPS: &[u8] = &[48, 64, 80, 96, 112];
    pub const MAX_DEBOUNCE: u8 = 5;

    pub fn cycle_backlight_timer(&mut self) {
        self.backlight_timer = next_in(Self::BACKLIGHT_TIMERS, self.backlight_timer);
    }

    pub fn cycle_contrast(&mut self) {
        self.contrast = next_in(Self::CONTRAST_STEPS, self.contrast);
    }

    pub fn cycle_wheel_debounce(&mut self) {
        self.wheel_debounce = self.wheel_debounce % Self::MAX_DEBOUNCE + 1;
    }

    pub fn cycle_button_debounce(&mut self) {
        self.button_debounce = self.button_debounce % Self::MAX_DEBOUNCE + 1;
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            backlight: true,
            backlight_timer: 10,
            contrast: 96,
            wheel_debounce: 1,
            button_debounce: 1,
            clicker: true,
        }
    }
}

/// Value after `current` in `steps`, wrapping; unknown values restart the cycle.
fn next_in<T: Copy + PartialEq>(steps: &[T], current: T) -> T {
    let idx = steps.iter().position(|s| *s == current);
    match idx {
        Some(i) => steps[(i + 1) % steps.len()],
        None => steps[0],
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — keybindings and device settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Command, Vec<KeyBind>>,
    pub settings: DeviceSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            settings: DeviceSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Command, Vec<KeyBind>> {
        use Command::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(
            Activate,
            vec![
                KeyBind::new(Enter, n),
                KeyBind::new(Right, n),
                KeyBind::new(Char('l'), n),
            ],
        );
        m.insert(
            Back,
            vec![
                KeyBind::new(Esc, n),
                KeyBind::new(Left, n),
                KeyBind::new(Char('h'), n),
                KeyBind::new(Char('m'), n),
            ],
        );
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the command bound to a key event.  When several bindings match,
    /// the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Command> {
        let mut best: Option<(Command, u32)> = None;
        for (&command, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, count)| mc > count) {
                    best = Some((command, mc));
                }
            }
        }
        best.map(|(command, _)| command)
    }

    fn short_binding(&self, command: Command) -> String {
        match self.bindings.get(&command) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: move | {}: select | {}: back | {}: quit",
            self.short_binding(Command::MoveUp),
            self.short_binding(Command::MoveDown),
            self.short_binding(Command::Activate),
            self.short_binding(Command::Back),
            self.short_binding(Command::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::debug!("no config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        tracing::info!("saved config to {}", path.display());
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();
        let settings = &mut config.settings;

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "backlight" => settings.backlight = value == "true",
                "backlight_timer" => {
                    if let Ok(v) = value.parse() {
                        settings.backlight_timer = v;
                    }
                }
                "contrast" => {
                    if let Ok(v) = value.parse() {
                        settings.contrast = v;
                    }
                }
                "wheel_debounce" => {
                    if let Ok(v) = value.parse::<u8>() {
                        settings.wheel_debounce = v.clamp(1, DeviceSettings::MAX_DEBOUNCE);
                    }
                }
                "button_debounce" => {
                    if let Ok(v) = value.parse::<u8>() {
                        settings.button_debounce = v.clamp(1, DeviceSettings::MAX_DEBOUNCE);
                    }
                }
                "clicker" => settings.clicker = value == "true",
                _ => {
                    let Some(command) = Command::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(command, parsed);
                    }
                }
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let s = &self.settings;
        let mut lines = vec![
            "# menu-nav configuration".to_string(),
            String::new(),
            "# Device settings".to_string(),
            format!("backlight = {}", s.backlight),
            format!("backlight_timer = {}", s.backlight_timer),
            format!("contrast = {}", s.contrast),
            format!("wheel_debounce = {}", s.wheel_debounce),
            format!("button_debounce = {}", s.button_debounce),
            format!("clicker = {}", s.clicker),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: command = Key1, Key2, ...".to_string(),
            String::new(),
        ];

        for &command in Command::ALL {
            if let Some(binds) = self.bindings.get(&command) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", command.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// `$XDG_CONFIG_HOME/menu-nav/config.toml`.
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}
