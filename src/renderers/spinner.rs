// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Spinner`: a background ticker that repaints a two-line block (a bar
//! line and a frame+message line) at a fixed delay: a `tokio::spawn`ed
//! loop holding an `Arc<Mutex<_>>` over render state, reading an
//! `AbortHandle` to know when `stop` fired instead of a channel, and a
//! braille-dot frame table for the default indicator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::interval;

use crate::components::glyphs;
use crate::core::ansi::sgr;
use crate::core::tty::TtyAdapter;
use crate::engine::render::physical_lines;

/// Which frame table a spinner cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerIndicator {
    /// Braille dot frames, no elapsed timer.
    Dots,
    /// A single rotating bar glyph plus an `mm:ss` elapsed timer.
    Timer,
}

const DOTS_FRAMES: [&str; 10] = ["\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}", "\u{2827}", "\u{2807}", "\u{280f}"];
const TIMER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const DEFAULT_DELAY: Duration = Duration::from_millis(80);

pub struct SpinnerOptions {
    pub indicator: SpinnerIndicator,
    /// Overrides the built-in frame table for `indicator`.
    pub frames: Option<Vec<String>>,
    pub delay: Duration,
}

impl Default for SpinnerOptions {
    fn default() -> Self {
        Self { indicator: SpinnerIndicator::Dots, frames: None, delay: DEFAULT_DELAY }
    }
}

struct Shared {
    frames: Vec<String>,
    frame_index: usize,
    message: String,
    show_timer: bool,
    start: Instant,
    last_physical_lines: usize,
}

impl Shared {
    fn render_tick(&self) -> String {
        let frame = &self.frames[self.frame_index % self.frames.len()];
        let timer = if self.show_timer {
            let secs = self.start.elapsed().as_secs();
            format!(" ({:02}:{:02})", secs / 60, secs % 60)
        } else {
            String::new()
        };
        format!("{}\n{frame} {}{timer}", glyphs::BAR, self.message)
    }
}

/// A running spinner. Dropping it without calling [`Spinner::stop`] leaves
/// the ticker running (and the block on screen) until the process exits —
/// always call `stop` to tear it down cleanly.
pub struct Spinner {
    shared: Arc<Mutex<Shared>>,
    abort_handle: Option<AbortHandle>,
}

impl Spinner {
    /// Start the ticker and write the first frame.
    pub async fn start(message: impl Into<String>, opts: SpinnerOptions) -> Self {
        let frames = opts.frames.unwrap_or_else(|| match opts.indicator {
            SpinnerIndicator::Dots => DOTS_FRAMES.iter().map(|s| s.to_string()).collect(),
            SpinnerIndicator::Timer => TIMER_FRAMES.iter().map(|s| s.to_string()).collect(),
        });

        let shared = Arc::new(Mutex::new(Shared {
            frames,
            frame_index: 0,
            message: message.into(),
            show_timer: opts.indicator == SpinnerIndicator::Timer,
            start: Instant::now(),
            last_physical_lines: 0,
        }));

        {
            let writer = TtyAdapter::output_only();
            let mut guard = shared.lock().await;
            let frame = guard.render_tick();
            guard.last_physical_lines = physical_lines(&frame, writer.width());
            let _ = writer.write(&frame);
            let _ = writer.write(&sgr::osc94::indeterminate());
        }

        let tick_shared = Arc::clone(&shared);
        let delay = opts.delay;
        let join_handle = tokio::spawn(async move {
            let mut ticker = interval(delay);
            ticker.tick().await; // first tick fires immediately; skip it, the initial frame is already on screen
            loop {
                ticker.tick().await;
                let writer = TtyAdapter::output_only();
                let mut guard = tick_shared.lock().await;
                guard.frame_index += 1;
                clear_prior(&writer, guard.last_physical_lines);
                let frame = guard.render_tick();
                guard.last_physical_lines = physical_lines(&frame, writer.width());
                let _ = writer.write(&frame);
            }
        });

        Self { shared, abort_handle: Some(join_handle.abort_handle()) }
    }

    /// Update the displayed message. Trailing `.` characters are stripped
    /// so a caller passing `"Loading..."` doesn't end up with the frame's
    /// own punctuation doubled up.
    pub async fn message(&self, message: impl Into<String>) {
        let mut guard = self.shared.lock().await;
        guard.message = message.into().trim_end_matches('.').to_string();
    }

    /// Stop the ticker, clear the block, and write a final line prefixed
    /// by the glyph matching `code` (`0` success, `1` cancel, `>=2`
    /// error). Emits the OSC 9;4 "clear" sequence.
    pub async fn stop(mut self, final_message: &str, code: u8) {
        if let Some(handle) = self.abort_handle.take() {
            handle.abort();
        }
        let writer = TtyAdapter::output_only();
        let guard = self.shared.lock().await;
        clear_prior(&writer, guard.last_physical_lines);
        drop(guard);

        let glyph = state_glyph(code);
        let _ = writer.write(&format!("{glyph} {final_message}\n"));
        let _ = writer.write(&sgr::osc94::clear());
    }

    pub fn is_cancelled_code(code: u8) -> bool {
        code == 1
    }
}

fn state_glyph(code: u8) -> String {
    match code {
        0 => glyphs::green(glyphs::SUBMIT),
        1 => glyphs::red(glyphs::CANCEL),
        2 => glyphs::yellow(glyphs::ERROR),
        _ => glyphs::red(glyphs::ERROR),
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

    #[test]
    fn render_tick_cycles_through_frames() {
        let shared = Shared {
            frames: vec!["a".into(), "b".into()],
            frame_index: 1,
            message: "loading".into(),
            show_timer: false,
            start: Instant::now(),
            last_physical_lines: 0,
        };
        assert_eq!(shared.render_tick(), format!("{}\nb loading", glyphs::BAR));
    }

    #[test]
    fn state_glyph_maps_exit_codes() {
        assert!(state_glyph(0).contains(glyphs::SUBMIT));
        assert!(state_glyph(1).contains(glyphs::CANCEL));
        assert!(state_glyph(2).contains(glyphs::ERROR));
        assert!(state_glyph(5).contains(glyphs::ERROR));
    }

    #[test]
    fn is_cancelled_code_only_true_for_one() {
        assert!(!Spinner::is_cancelled_code(0));
        assert!(Spinner::is_cancelled_code(1));
        assert!(!Spinner::is_cancelled_code(2));
    }

    #[test]
    fn message_strips_trailing_dots() {
        // Exercised via the public async setter in an integration test;
        // here we check the trim logic in isolation.
        assert_eq!("Loading...".trim_end_matches('.'), "Loading");
    }
}
