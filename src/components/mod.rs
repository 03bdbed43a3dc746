// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! Component kernels: the concrete prompts (`text`, `confirm`, `select`,
//! ...) built on top of `crate::engine`. Each module exposes one
//! `PromptComponent` implementation plus a thin async function wrapping
//! `PromptEngine::run` in the public signature callers actually use.

pub mod autocomplete;
pub mod confirm;
pub mod line_editor;
pub mod multiselect;
pub mod select;
pub mod text;
pub mod textarea;

pub(crate) mod glyphs {
    //! Shared decorative glyphs. Colors/box-drawing beyond these are out
    //! of this crate's scope; callers that want themed rendering wrap a
    //! component's frame or use the `render_xxx` hooks the engine exposes.
    use crate::core::ansi::sgr;

    pub const SUBMIT: &str = "\u{25c7}"; // ◇
    pub const CANCEL: &str = "\u{25a0}"; // ■
    pub const ERROR: &str = "\u{25b2}"; // ▲ (renderer stop codes ≥2)
    pub const ACTIVE_RADIO: &str = "\u{25cf}"; // ●
    pub const INACTIVE_RADIO: &str = "\u{25cb}"; // ○
    pub const CHECKED_BOX: &str = "\u{25c9}"; // ◉
    pub const UNCHECKED_BOX: &str = "\u{25cb}"; // ○
    pub const BAR: &str = "\u{2502}"; // │
    pub const BULLET: &str = "\u{25cf}"; // ● (password mask)

    pub fn dim(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_DIM, sgr::SGR_RESET)
    }

    pub fn strikethrough_dim(s: &str) -> String {
        format!("{}{}{s}{}", sgr::SGR_DIM, sgr::SGR_STRIKETHROUGH, sgr::SGR_RESET)
    }

    pub fn inverse(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_INVERSE_ON, sgr::SGR_INVERSE_OFF)
    }

    pub fn green(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_FG_GREEN, sgr::SGR_RESET)
    }

    pub fn red(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_FG_RED, sgr::SGR_RESET)
    }

    pub fn yellow(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_FG_YELLOW, sgr::SGR_RESET)
    }

    pub fn gray(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_FG_GRAY, sgr::SGR_RESET)
    }

    pub fn cyan(s: &str) -> String {
        format!("{}{s}{}", sgr::SGR_FG_CYAN, sgr::SGR_RESET)
    }
}
