//! Stock menu shipped with the device firmware.

/// Action names the stock menu binds.  The host must register all of them
/// before parsing [`STOCK_MENU`].
pub const STOCK_ACTIONS: &[&str] = &[
    "file_browser",
    "quit",
    "reboot",
    "toggle_backlight",
    "backlight_timer",
    "contrast",
    "wheel_debounce",
    "button_debounce",
    "toggle_clicker",
    "reset_settings",
    "save_settings",
    "load_settings",
];

pub const STOCK_MENU: &str = "\
title = Podzilla
root = main

[main]
Playlists = link
Browse = link browse
Extras = link extras
Settings = link settings
File Browser = action file_browser
Quit Podzilla = action quit
Reboot iPod = link reboot
end

[browse]
Artists = value
Albums = value
Songs = value
Genres = value
Composers = value
end

[extras]
Clock = link
Contacts = link
Calendar = link
Notes = link
Games = link
end

[settings]
About = link
Shuffle = value
Repeat = value
EQ -Off = value
Backlight = action toggle_backlight
Backlight Timer = action backlight_timer
Contrast = action contrast
Wheel Debounce = action wheel_debounce
Button Debounce = action button_debounce
Alarms = link
Contacts = link
Clicker = action toggle_clicker
Language = link
Legal = link
Reset All Settings = link reset
Save Settings = action save_settings
Load Settings = action load_settings
end

[reset]
Cancel = back
Absolutely = action reset_settings
end

[reboot]
Cancel = back
Absolutely = action reboot
end
";
