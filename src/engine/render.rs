// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! Diff-aware frame rendering: measuring how many on-screen rows a frame
//! occupies (accounting for soft wrap at the current terminal width) and
//! emitting the minimal ANSI to clear the previous frame and write the
//! next one.
//!
//! This module knows nothing about what a frame's *text* looks like —
//! that's each component kernel's job (`crate::components`). It only
//! knows how to measure and clear.

use crate::core::ansi::sgr;
use crate::core::ansi::width::visible_width;

/// Tracks what was last written so the next write can clear exactly that
/// much screen space.
#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
    prev_frame: String,
    prev_physical_lines: usize,
}

/// How many on-screen rows `frame` occupies at `term_width` columns. Each
/// logical line (split on `\n`) contributes `ceil(visible_width / width)`
/// rows; an empty logical line still counts as one row.
pub fn physical_lines(frame: &str, term_width: u16) -> usize {
    let width = term_width.max(1) as usize;
    frame
        .split('\n')
        .map(|line| {
            let w = visible_width(line);
            if w == 0 {
                1
            } else {
                w.div_ceil(width)
            }
        })
        .sum()
}

/// Diff `frame` against whatever was last written and return the ANSI text
/// to emit, or `None` if there is nothing to do.
///
/// `is_initial` picks between the two clearing strategies §4.3 describes:
/// hide the cursor and write the frame outright on the very first render,
/// or move up by the prior frame's physical-line count, return to column
/// 0, and erase to the end of the display on every render after that.
///
/// `force` bypasses the "frame text unchanged" short-circuit. A terminal
/// resize needs this: the same text can occupy a different number of rows
/// at the new width, so the clear math must be redone even though nothing
/// in the frame itself changed.
pub fn diff(metrics: &mut FrameMetrics, frame: &str, term_width: u16, is_initial: bool, force: bool) -> Option<String> {
    if !force && !is_initial && frame == metrics.prev_frame {
        tracing::trace!("render diff: frame unchanged, skipping write");
        return None;
    }

    let mut out = String::new();
    if is_initial {
        out.push_str(sgr::HIDE_CURSOR);
    } else {
        out.push_str(&sgr::cursor_up(metrics.prev_physical_lines.saturating_sub(1) as u16));
        out.push_str(sgr::CARRIAGE_RETURN);
        out.push_str(sgr::ERASE_BELOW);
    }
    out.push_str(frame);

    metrics.prev_physical_lines = physical_lines(frame, term_width);
    metrics.prev_frame = frame.to_string();
    tracing::trace!(
        physical_lines = metrics.prev_physical_lines,
        is_initial,
        force,
        "render diff: emitting frame"
    );
    Some(out)
}

/// The final write on a terminal phase: one more render, then a trailing
/// newline and cursor restore.
pub fn finalize(metrics: &mut FrameMetrics, frame: &str, term_width: u16) -> String {
    let mut out = diff(metrics, frame, term_width, false, true).unwrap_or_default();
    out.push_str("\r\n");
    out.push_str(sgr::SHOW_CURSOR);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn physical_lines_counts_soft_wrap() {
        assert_eq!(physical_lines("abcdefgh", 4), 2);
        assert_eq!(physical_lines("abcd", 4), 1);
    }

    #[test]
    fn physical_lines_counts_empty_line_as_one_row() {
        assert_eq!(physical_lines("a\n\nb", 80), 3);
    }

    #[test]
    fn physical_lines_handles_width_one() {
        assert_eq!(physical_lines("abc", 1), 3);
    }

    #[test]
    fn first_diff_hides_cursor_and_writes_frame() {
        let mut metrics = FrameMetrics::default();
        let out = diff(&mut metrics, "hello", 80, true, false).unwrap();
        assert_eq!(out, format!("{}hello", sgr::HIDE_CURSOR));
        assert_eq!(metrics.prev_physical_lines, 1);
    }

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut metrics = FrameMetrics::default();
        diff(&mut metrics, "hello", 80, true, false);
        assert_eq!(diff(&mut metrics, "hello", 80, false, false), None);
    }

    #[test]
    fn changed_frame_clears_prior_rows() {
        let mut metrics = FrameMetrics::default();
        diff(&mut metrics, "a\nb\nc", 80, true, false);
        let out = diff(&mut metrics, "x", 80, false, false).unwrap();
        assert_eq!(out, format!("{}{}{}x", sgr::cursor_up(2), sgr::CARRIAGE_RETURN, sgr::ERASE_BELOW));
    }

    #[test]
    fn forced_diff_rewrites_unchanged_text_on_resize() {
        let mut metrics = FrameMetrics::default();
        diff(&mut metrics, "hello", 80, true, false);
        let out = diff(&mut metrics, "hello", 40, false, true);
        assert!(out.is_some());
    }
}
