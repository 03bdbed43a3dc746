// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Textarea`: a multi-line editor whose buffer stores pasted runs as a
//! single Private-Use-Area sentinel rune each, so cursor motion and
//! deletion treat an entire pasted block as one indivisible unit while the
//! full text (newlines included) is kept out-of-band until `resolve`
//! substitutes it back in at submit time.
//!
//! The sentinel has to live *inside* a plain `Vec<char>` for the rest of
//! the editing logic (left/right/home/end/up/down) to stay as simple as
//! it is in [`crate::components::line_editor`], rather than reaching for
//! a rope or piece-table representation.

use std::collections::HashMap;

use crate::components::glyphs;
use crate::core::ansi::sgr;
use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

const PUA_START: u32 = 0xE000;
const PUA_END: u32 = 0xF8FF;
const PUA_CAPACITY: u32 = PUA_END - PUA_START + 1;

fn id_to_sentinel(id: u32) -> char {
    debug_assert!(id >= 1 && id <= PUA_CAPACITY, "paste id {id} outside representable PUA range");
    char::from_u32(PUA_START + (id - 1) % PUA_CAPACITY).expect("PUA code point is always a valid char")
}

fn is_sentinel(c: char) -> bool {
    (PUA_START..=PUA_END).contains(&(c as u32))
}

fn sentinel_to_id(c: char) -> u32 {
    c as u32 - PUA_START + 1
}

/// The rune buffer plus its out-of-band paste store. See the module docs
/// for why pastes are encoded as sentinel runes rather than a separate
/// token type.
#[derive(Debug, Clone, Default)]
pub struct TextareaBuffer {
    runes: Vec<char>,
    cursor: usize,
    pastes: HashMap<u32, String>,
    next_paste_id: u32,
}

impl TextareaBuffer {
    pub fn new(initial: &str) -> Self {
        let runes: Vec<char> = initial.chars().collect();
        let cursor = runes.len();
        Self { runes, cursor, pastes: HashMap::new(), next_paste_id: 1 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pastes_len(&self) -> usize {
        self.pastes.len()
    }

    /// The submitted/validated string: every sentinel substituted with its
    /// stored paste text, including embedded newlines. Never contains a
    /// Private-Use-Area rune.
    pub fn resolve(&self) -> String {
        let mut out = String::new();
        for &r in &self.runes {
            if is_sentinel(r) {
                if let Some(text) = self.pastes.get(&sentinel_to_id(r)) {
                    out.push_str(text);
                }
            } else {
                out.push(r);
            }
        }
        out
    }

    fn line_bounds(&self, pos: usize) -> (usize, usize) {
        let start = self.runes[..pos].iter().rposition(|&c| c == '\n').map(|i| i + 1).unwrap_or(0);
        let end = self.runes[pos..].iter().position(|&c| c == '\n').map(|i| pos + i).unwrap_or(self.runes.len());
        (start, end)
    }

    /// Half-open `[start, end)` bounds for every visual line in the
    /// buffer, in order. Used by both editing (home/end/up/down) and
    /// rendering.
    fn lines(&self) -> Vec<(usize, usize)> {
        let mut bounds = Vec::new();
        let mut start = 0;
        for (i, &c) in self.runes.iter().enumerate() {
            if c == '\n' {
                bounds.push((start, i));
                start = i + 1;
            }
        }
        bounds.push((start, self.runes.len()));
        bounds
    }

    fn insert_char(&mut self, c: char) {
        self.runes.insert(self.cursor, c);
        self.cursor += 1;
    }

    fn insert_paste(&mut self, content: String) {
        let id = self.next_paste_id;
        self.next_paste_id += 1;
        self.pastes.insert(id, content);
        self.runes.insert(self.cursor, id_to_sentinel(id));
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let removed = self.runes.remove(self.cursor - 1);
        self.cursor -= 1;
        if is_sentinel(removed) {
            self.pastes.remove(&sentinel_to_id(removed));
        }
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.runes.len() {
            return false;
        }
        let removed = self.runes.remove(self.cursor);
        if is_sentinel(removed) {
            self.pastes.remove(&sentinel_to_id(removed));
        }
        true
    }

    fn left(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    fn right(&mut self) -> bool {
        if self.cursor < self.runes.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn home(&mut self) -> bool {
        let (start, _) = self.line_bounds(self.cursor);
        let changed = self.cursor != start;
        self.cursor = start;
        changed
    }

    fn end(&mut self) -> bool {
        let (_, end) = self.line_bounds(self.cursor);
        let changed = self.cursor != end;
        self.cursor = end;
        changed
    }

    fn move_vertical(&mut self, up: bool) -> bool {
        let lines = self.lines();
        let current = lines.iter().position(|&(s, e)| self.cursor >= s && self.cursor <= e);
        let Some(idx) = current else { return false };
        let column = self.cursor - lines[idx].0;

        let target_idx = if up {
            if idx == 0 {
                return false;
            }
            idx - 1
        } else {
            if idx + 1 >= lines.len() {
                return false;
            }
            idx + 1
        };

        let (start, end) = lines[target_idx];
        self.cursor = (start + column).min(end);
        true
    }
}

pub struct TextareaOptions {
    pub message: String,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    pub initial: Option<String>,
    pub validate: Option<Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>>,
}

impl TextareaOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), placeholder: None, default: None, initial: None, validate: None }
    }
}

pub struct TextareaKernel {
    buffer: TextareaBuffer,
    message: String,
    placeholder: Option<String>,
    default: Option<String>,
    cached_resolved: String,
}

impl TextareaKernel {
    fn render_lines(&self, phase: Phase) -> Vec<String> {
        let bar = if phase.is_terminal() { glyphs::gray(glyphs::BAR) } else { glyphs::BAR.to_string() };
        let interactive = matches!(phase, Phase::Initial | Phase::Active | Phase::Error);

        self.buffer
            .lines()
            .iter()
            .map(|&(start, end)| {
                let mut line = String::new();
                for (idx, &r) in self.buffer.runes[start..end].iter().enumerate() {
                    let pos = start + idx;
                    let text = if is_sentinel(r) {
                        glyphs::dim(&format!("[Text {}]", sentinel_to_id(r)))
                    } else {
                        r.to_string()
                    };
                    if interactive && pos == self.buffer.cursor {
                        line.push_str(&glyphs::inverse(&text));
                    } else {
                        line.push_str(&text);
                    }
                }
                if interactive && self.buffer.cursor == end {
                    line.push_str(&glyphs::inverse(" "));
                }
                format!("{bar} {line}")
            })
            .collect()
    }
}

impl PromptComponent for TextareaKernel {
    type Value = String;

    fn zero_value() -> Self::Value {
        String::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value> {
        let changed = match key.name {
            KeyName::Left => self.buffer.left(),
            KeyName::Right => self.buffer.right(),
            KeyName::Backspace => self.buffer.backspace(),
            KeyName::Delete => self.buffer.delete(),
            KeyName::Home => self.buffer.home(),
            KeyName::End => self.buffer.end(),
            KeyName::Up => self.buffer.move_vertical(true),
            KeyName::Down => self.buffer.move_vertical(false),
            KeyName::Tab => {
                self.buffer.insert_char('\t');
                true
            }
            KeyName::Char(c) if (' '..='~').contains(&c) => {
                self.buffer.insert_char(c);
                true
            }
            _ => false,
        };
        if changed {
            self.cached_resolved = self.buffer.resolve();
            KeyOutcome::Changed
        } else {
            KeyOutcome::Unchanged
        }
    }

    fn handle_paste(&mut self, content: String) -> KeyOutcome<Self::Value> {
        self.buffer.insert_paste(content);
        self.cached_resolved = self.buffer.resolve();
        KeyOutcome::Changed
    }

    /// `Shift+Return` (and its `LF`/`ESC+CR` decoder fallbacks) inserts a
    /// literal newline instead of submitting; plain `Return` falls through
    /// to the engine's ordinary validate-then-submit path.
    fn handle_return(&mut self, shift: bool) -> Option<KeyOutcome<Self::Value>> {
        if !shift {
            return None;
        }
        self.buffer.insert_char('\n');
        self.cached_resolved = self.buffer.resolve();
        Some(KeyOutcome::Changed)
    }

    fn current_value(&self) -> Option<Self::Value> {
        Some(if self.buffer.runes.is_empty() { self.default.clone().unwrap_or_default() } else { self.buffer.resolve() })
    }

    fn user_input_snapshot(&self) -> Option<&str> {
        Some(&self.cached_resolved)
    }

    fn render(&self, phase: Phase, error_message: Option<&str>) -> String {
        let glyph = match phase {
            Phase::Submit => glyphs::green(glyphs::SUBMIT),
            Phase::Cancel => glyphs::red(glyphs::CANCEL),
            _ => glyphs::SUBMIT.to_string(),
        };

        let mut out = format!("{glyph} {}", self.message);

        if self.buffer.runes.is_empty() {
            let bar = if phase.is_terminal() { glyphs::gray(glyphs::BAR) } else { glyphs::BAR.to_string() };
            let placeholder = self
                .placeholder
                .as_deref()
                .map(glyphs::dim)
                .unwrap_or_else(|| glyphs::inverse(" "));
            out.push_str(&format!("\n{bar} {placeholder}"));
        } else {
            let body = match phase {
                Phase::Submit => self
                    .buffer
                    .lines()
                    .iter()
                    .map(|&(start, end)| {
                        let text: String = self.buffer.runes[start..end]
                            .iter()
                            .map(|&r| if is_sentinel(r) { format!("[Text {}]", sentinel_to_id(r)) } else { r.to_string() })
                            .collect();
                        format!("{} {}", glyphs::gray(glyphs::BAR), glyphs::dim(&text))
                    })
                    .collect::<Vec<_>>(),
                Phase::Cancel => self
                    .buffer
                    .lines()
                    .iter()
                    .map(|&(start, end)| {
                        let text: String = self.buffer.runes[start..end]
                            .iter()
                            .map(|&r| if is_sentinel(r) { format!("[Text {}]", sentinel_to_id(r)) } else { r.to_string() })
                            .collect();
                        format!("{} {}", glyphs::gray(glyphs::BAR), glyphs::strikethrough_dim(&text))
                    })
                    .collect::<Vec<_>>(),
                _ => self.render_lines(phase),
            };
            for line in body {
                out.push('\n');
                out.push_str(&line);
            }
        }

        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }

    /// Requests bracketed paste mode so the key decoder's paste
    /// accumulator is actually active for the duration of this prompt.
    fn enter_sequence(&self) -> &str {
        sgr::BRACKETED_PASTE_ENABLE
    }

    fn exit_sequence(&self) -> &str {
        sgr::BRACKETED_PASTE_DISABLE
    }
}

pub fn build_options(opts: TextareaOptions) -> EngineOptions<TextareaKernel> {
    let buffer = TextareaBuffer::new(opts.initial.as_deref().unwrap_or(""));
    let cached_resolved = buffer.resolve();
    let kernel = TextareaKernel { buffer, message: opts.message, placeholder: opts.placeholder, default: opts.default, cached_resolved };
    let mut options = EngineOptions::new(kernel);
    if let Some(validate) = opts.validate {
        options.validate = Some(Box::new(move |v: &String| validate(v)));
    }
    options
}

/// A multi-line text prompt. `return` submits the resolved text;
/// `Shift+Return` inserts a literal newline. Pasted blocks are kept
/// atomic (one cursor cell, one backspace) until submit, when they are
/// resolved back into their original text.
pub async fn textarea(opts: TextareaOptions) -> Result<String, PromptError> {
    PromptEngine::new(build_options(opts)).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolve_round_trips_a_single_paste() {
        let mut buf = TextareaBuffer::new("");
        buf.insert_paste("hello\nworld".to_string());
        assert_eq!(buf.resolve(), "hello\nworld");
        assert_eq!(buf.runes.len(), 1);
    }

    #[test]
    fn resolve_never_contains_a_pua_rune() {
        let mut buf = TextareaBuffer::new("a");
        buf.insert_paste("pasted".to_string());
        buf.insert_char('b');
        let resolved = buf.resolve();
        assert!(resolved.chars().all(|c| !is_sentinel(c)));
        assert_eq!(resolved, "apastedb");
    }

    #[test]
    fn backspace_over_sentinel_removes_the_whole_paste_and_its_entry() {
        let mut buf = TextareaBuffer::new("");
        buf.insert_paste("pasted".to_string());
        assert_eq!(buf.pastes_len(), 1);
        buf.backspace();
        assert_eq!(buf.resolve(), "");
        assert_eq!(buf.pastes_len(), 0);
    }

    #[test]
    fn left_right_step_over_a_sentinel_as_one_cell() {
        let mut buf = TextareaBuffer::new("a");
        buf.left();
        buf.insert_paste("xyz".to_string()); // buffer: [sentinel, 'a'], cursor after sentinel
        assert_eq!(buf.cursor(), 1);
        buf.left();
        assert_eq!(buf.cursor(), 0);
        buf.right();
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn home_end_operate_on_the_current_visual_line_only() {
        let mut buf = TextareaBuffer::new("ab\ncde");
        buf.home();
        assert_eq!(buf.cursor(), 4); // last line starts after "ab\n"
        buf.end();
        assert_eq!(buf.cursor(), 6);
    }

    #[test]
    fn up_down_preserve_column_clamped_to_line_length() {
        let mut buf = TextareaBuffer::new("abcdef\nxy");
        buf.cursor = 9; // end of "xy"
        buf.move_vertical(true);
        assert_eq!(buf.cursor(), 6); // clamped to end of "abcdef"
        buf.move_vertical(false);
        assert_eq!(buf.cursor(), 9);
    }

    #[test]
    fn shift_return_inserts_newline_instead_of_submitting() {
        let mut kernel = TextareaKernel {
            buffer: TextareaBuffer::new("ab"),
            message: "m".into(),
            placeholder: None,
            default: None,
            cached_resolved: "ab".into(),
        };
        let outcome = kernel.handle_return(true);
        assert!(outcome.is_some());
        assert_eq!(kernel.buffer.resolve(), "ab\n");
    }

    #[test]
    fn plain_return_falls_through_to_default_submit_handling() {
        let mut kernel = TextareaKernel {
            buffer: TextareaBuffer::new("ab"),
            message: "m".into(),
            placeholder: None,
            default: None,
            cached_resolved: "ab".into(),
        };
        assert!(kernel.handle_return(false).is_none());
    }

    #[test]
    fn empty_paste_then_backspace_round_trips_to_empty_with_no_pastes_left() {
        let mut buf = TextareaBuffer::new("");
        buf.insert_paste("pasted".to_string());
        buf.backspace();
        assert_eq!(buf.resolve(), "");
        assert_eq!(buf.pastes_len(), 0);
    }
}
