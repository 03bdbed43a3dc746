// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Stream`: an append-only log region. Unlike [`crate::renderers::spinner`]
//! and [`crate::renderers::progress`], there is no ticker — every write is
//! driven by the caller (`write_line`, `pipe`) and the only repaint happens
//! once, on `stop`, which rewrites every accumulated line dimmed with a
//! gray bar prefix instead of the cyan one used while live.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::components::glyphs;
use crate::core::ansi::sgr;
use crate::core::tty::TtyAdapter;

pub struct StreamOptions {
    /// Prefix each line with an elapsed `mm:ss` timer measured from `start`.
    pub show_timer: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self { show_timer: false }
    }
}

pub struct Stream {
    title: String,
    lines: Vec<String>,
    start: std::time::Instant,
    show_timer: bool,
}

impl Stream {
    /// Print the active header and start accumulating lines.
    pub async fn start(title: impl Into<String>, opts: StreamOptions) -> Self {
        let title = title.into();
        let writer = TtyAdapter::output_only();
        let header = format!("{} {title}", glyphs::cyan(glyphs::BAR));
        let _ = writer.write(&format!("{header}\n"));

        Self { title, lines: Vec::new(), start: std::time::Instant::now(), show_timer: opts.show_timer }
    }

    /// Append one line, prefixed with a cyan bar, and print it immediately.
    pub async fn write_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        let writer = TtyAdapter::output_only();
        let prefix = self.timer_prefix();
        let _ = writer.write(&format!("{}{} {line}\n", prefix, glyphs::cyan(glyphs::BAR)));
        self.lines.push(line);
    }

    /// Forward a reader line-by-line through [`Self::write_line`] until EOF.
    pub async fn pipe(&mut self, reader: impl AsyncRead + Unpin) {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            self.write_line(line).await;
        }
    }

    fn timer_prefix(&self) -> String {
        if !self.show_timer {
            return String::new();
        }
        let secs = self.start.elapsed().as_secs();
        format!("({:02}:{:02}) ", secs / 60, secs % 60)
    }

    /// Repaint every accumulated line dimmed with a gray bar, move the
    /// cursor back up over the header and all prior lines to do so, and
    /// end with a final state line. An empty `final_message` means no
    /// message line is written at all, not a blank one.
    pub async fn stop(self, final_message: &str, code: u8) {
        let writer = TtyAdapter::output_only();

        let rows_written = self.lines.len() + 1; // header + every line
        let mut out = String::new();
        out.push_str(&sgr::cursor_up(rows_written as u16));
        out.push_str(sgr::CARRIAGE_RETURN);
        out.push_str(sgr::ERASE_BELOW);

        out.push_str(&glyphs::gray(&format!("{} {}", glyphs::BAR, self.title)));
        out.push('\n');
        for line in &self.lines {
            out.push_str(&glyphs::dim(&format!("{} {line}", glyphs::gray(glyphs::BAR))));
            out.push('\n');
        }

        let state_glyph = match code {
            0 => glyphs::green(glyphs::SUBMIT),
            1 => glyphs::red(glyphs::CANCEL),
            2 => glyphs::yellow(glyphs::ERROR),
            _ => glyphs::red(glyphs::ERROR),
        };
        if final_message.is_empty() {
            out.push_str(&format!("{state_glyph}\n"));
        } else {
            out.push_str(&format!("{state_glyph} {final_message}\n"));
        }

        let _ = writer.write(&out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn timer_prefix_empty_when_disabled() {
        let stream = Stream { title: "t".into(), lines: vec![], start: std::time::Instant::now(), show_timer: false };
        assert_eq!(stream.timer_prefix(), "");
    }

    #[test]
    fn timer_prefix_formats_mm_ss() {
        let stream = Stream { title: "t".into(), lines: vec![], start: std::time::Instant::now(), show_timer: true };
        let prefix = stream.timer_prefix();
        assert!(prefix.starts_with("(00:0"));
    }
}
