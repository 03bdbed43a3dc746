// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Progress`: the same ticker-and-clear lifecycle as
//! [`crate::renderers::spinner::Spinner`], plus a filled/unfilled bar of
//! a fixed width and OSC 9;4 percent reporting that only fires when the
//! integer percent actually changes, to keep the sequence traffic down on
//! fast-advancing bars.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::components::glyphs;
use crate::core::ansi::sgr;
use crate::core::tty::TtyAdapter;
use crate::engine::render::physical_lines;

/// Which glyph fills the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    Light,
    Heavy,
    Block,
}

impl ProgressStyle {
    fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            ProgressStyle::Light => ("\u{2501}", "\u{2500}"), // ━ filled, ─ unfilled
            ProgressStyle::Heavy => ("\u{2588}", "\u{2591}"), // █ filled, ░ unfilled
            ProgressStyle::Block => ("\u{25a0}", "\u{25a1}"), // ■ filled, □ unfilled
        }
    }
}

pub struct ProgressOptions {
    pub style: ProgressStyle,
    pub max: u64,
    pub size: usize,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self { style: ProgressStyle::Block, max: 100, size: 40 }
    }
}

struct Shared {
    style: ProgressStyle,
    max: u64,
    size: usize,
    value: u64,
    message: String,
    last_percent: Option<u8>,
    last_physical_lines: usize,
}

impl Shared {
    fn percent(&self) -> u8 {
        if self.max == 0 {
            0
        } else {
            ((self.value.min(self.max) * 100) / self.max) as u8
        }
    }

    fn render(&self) -> String {
        let (filled_glyph, empty_glyph) = self.style.glyphs();
        let percent = self.percent();
        let filled = if self.max == 0 { 0 } else { (self.size as u64 * self.value.min(self.max) / self.max) as usize };
        let filled = filled.min(self.size);
        let bar: String = filled_glyph.repeat(filled) + &empty_glyph.repeat(self.size - filled);
        format!("{}\n{bar} {percent:>3}% {}", glyphs::BAR, self.message)
    }
}

pub struct Progress {
    shared: Arc<Mutex<Shared>>,
}

impl Progress {
    /// Start the bar at `0 / max` and write the first frame. Emits OSC
    /// 9;4 "set 0".
    pub async fn start(opts: ProgressOptions) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            style: opts.style,
            max: opts.max,
            size: opts.size,
            value: 0,
            message: String::new(),
            last_percent: None,
            last_physical_lines: 0,
        }));

        let writer = TtyAdapter::output_only();
        let mut guard = shared.lock().await;
        let frame = guard.render();
        guard.last_physical_lines = physical_lines(&frame, writer.width());
        guard.last_percent = Some(guard.percent());
        let _ = writer.write(&frame);
        let _ = writer.write(&sgr::osc94::set(guard.percent()));
        drop(guard);

        Self { shared }
    }

    /// Advance `value` by `step` (clamped to `[0, max]`), optionally
    /// updating the message, and repaint.
    pub async fn advance(&self, step: i64, message: Option<String>) {
        let writer = TtyAdapter::output_only();
        let mut guard = self.shared.lock().await;
        let current = guard.value as i64;
        let next = (current + step).clamp(0, guard.max as i64);
        guard.value = next as u64;
        if let Some(msg) = message {
            guard.message = msg;
        }
        self.repaint(&writer, &mut guard).await;
    }

    /// Update the message without changing `value`.
    pub async fn message(&self, message: impl Into<String>) {
        let writer = TtyAdapter::output_only();
        let mut guard = self.shared.lock().await;
        guard.message = message.into();
        self.repaint(&writer, &mut guard).await;
    }

    async fn repaint(&self, writer: &crate::core::tty::OutputOnly, guard: &mut Shared) {
        clear_prior(writer, guard.last_physical_lines);
        let frame = guard.render();
        guard.last_physical_lines = physical_lines(&frame, writer.width());
        let _ = writer.write(&frame);

        let percent = guard.percent();
        if guard.last_percent != Some(percent) {
            guard.last_percent = Some(percent);
            let _ = writer.write(&sgr::osc94::set(percent));
        }
    }

    /// Stop, clear the block, write a final line prefixed by the glyph
    /// matching `code`, and emit the OSC 9;4 "clear" sequence.
    pub async fn stop(self, final_message: &str, code: u8) {
        let writer = TtyAdapter::output_only();
        let guard = self.shared.lock().await;
        clear_prior(&writer, guard.last_physical_lines);
        drop(guard);

        let glyph = match code {
            0 => glyphs::green(glyphs::SUBMIT),
            1 => glyphs::red(glyphs::CANCEL),
            2 => glyphs::yellow(glyphs::ERROR),
            _ => glyphs::red(glyphs::ERROR),
        };
        let _ = writer.write(&format!("{glyph} {final_message}\n"));
        let _ = writer.write(&sgr::osc94::clear());
    }
}

fn clear_prior(writer: &crate::core::tty::OutputOnly, prior_lines: usize) {
    if prior_lines == 0 {
        return;
    }
    let mut out = String::new();
    out.push_str(&sgr::cursor_up((prior_lines.saturating_sub(1)) as u16));
    out.push_str(sgr::CARRIAGE_RETURN);
    out.push_str(sgr::ERASE_BELOW);
    let _ = writer.write(&out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shared(value: u64, max: u64, size: usize) -> Shared {
        Shared { style: ProgressStyle::Block, max, size, value, message: String::new(), last_percent: None, last_physical_lines: 0 }
    }

    #[test]
    fn percent_rounds_down() {
        assert_eq!(shared(33, 100, 40).percent(), 33);
        assert_eq!(shared(1, 3, 40).percent(), 33);
    }

    #[test]
    fn percent_clamps_to_max() {
        assert_eq!(shared(999, 100, 40).percent(), 100);
    }

    #[test]
    fn zero_max_never_divides_by_zero() {
        assert_eq!(shared(0, 0, 40).percent(), 0);
        let s = shared(0, 0, 40);
        assert!(s.render().contains("0%"));
    }

    #[test]
    fn render_fills_proportionally() {
        let s = shared(20, 100, 10);
        let line = s.render();
        let bar_line = line.lines().next_back().unwrap();
        assert!(bar_line.starts_with("\u{25a0}\u{25a0}"));
    }

    #[test]
    fn render_full_bar_has_no_empty_glyph() {
        let s = shared(100, 100, 10);
        let bar_line = s.render().lines().next_back().unwrap();
        assert!(!bar_line.contains('\u{25a1}'));
    }
}
