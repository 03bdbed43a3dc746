// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The wire-level ANSI constants the renderers emit. Kept separate from a
//! full decorative styling layer (colors, box glyphs) — these are
//! mechanical cursor/erase/SGR sequences the render path itself depends
//! on, not a styling API.

/// Hide the text cursor (`ESC[?25l`).
pub const HIDE_CURSOR: &str = "\x1b[?25l";
/// Show the text cursor (`ESC[?25h`).
pub const SHOW_CURSOR: &str = "\x1b[?25h";
/// Move the cursor up `n` rows (`ESC[<n>A`).
pub fn cursor_up(n: u16) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}A")
    }
}
/// Carriage return to column 0.
pub const CARRIAGE_RETURN: &str = "\r";
/// Erase from cursor to end of the current line (`ESC[K`).
pub const ERASE_LINE: &str = "\x1b[K";
/// Erase from cursor to end of display (`ESC[J`).
pub const ERASE_BELOW: &str = "\x1b[J";

/// SGR reset (`ESC[0m`).
pub const SGR_RESET: &str = "\x1b[0m";
/// SGR bold.
pub const SGR_BOLD: &str = "\x1b[1m";
/// SGR dim.
pub const SGR_DIM: &str = "\x1b[2m";
/// SGR strikethrough.
pub const SGR_STRIKETHROUGH: &str = "\x1b[9m";
/// SGR inverse video on.
pub const SGR_INVERSE_ON: &str = "\x1b[7m";
/// SGR inverse video off.
pub const SGR_INVERSE_OFF: &str = "\x1b[27m";

/// Bright-palette foreground colors (`ESC[90m..96m`), used sparingly for
/// phase glyphs: green submit, red cancel/error, yellow validation error,
/// cyan stream markers.
pub const SGR_FG_GRAY: &str = "\x1b[90m";
pub const SGR_FG_RED: &str = "\x1b[91m";
pub const SGR_FG_GREEN: &str = "\x1b[92m";
pub const SGR_FG_YELLOW: &str = "\x1b[93m";
pub const SGR_FG_CYAN: &str = "\x1b[96m";

/// Enable bracketed paste mode (`ESC[?2004h`).
pub const BRACKETED_PASTE_ENABLE: &str = "\x1b[?2004h";
/// Disable bracketed paste mode (`ESC[?2004l`).
pub const BRACKETED_PASTE_DISABLE: &str = "\x1b[?2004l";

/// Request xterm `modifyOtherKeys` level 2 reporting (`ESC[>4;2m`).
pub const MODIFY_OTHER_KEYS_ENABLE: &str = "\x1b[>4;2m";
/// Reset `modifyOtherKeys` reporting (`ESC[>4m`).
pub const MODIFY_OTHER_KEYS_DISABLE: &str = "\x1b[>4m";

/// ConEmu / Windows Terminal progress reporting, OSC 9;4. Every variant is
/// terminated with ST (`ESC\`) rather than BEL.
pub mod osc94 {
    /// Clear the taskbar progress indicator.
    pub fn clear() -> String {
        "\x1b]9;4;0\x1b\\".to_string()
    }

    /// Set a determinate percentage (0..=100).
    pub fn set(percent: u8) -> String {
        format!("\x1b]9;4;1;{percent}\x1b\\")
    }

    /// Indeterminate ("busy") progress.
    pub fn indeterminate() -> String {
        "\x1b]9;4;3\x1b\\".to_string()
    }
}
