// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Text` and `Password`: a single-line [`LineEditor`] with a message
//! header, optional placeholder, and optional default substituted only
//! when the user submits an empty buffer. `Password` is the same kernel
//! with `masked: true`, rendering bullets instead of the typed characters.

use crate::components::glyphs;
use crate::components::line_editor::LineEditor;
use crate::core::key_decoder::KeyEvent;
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

/// Options shared by [`text`] and [`password`].
pub struct TextOptions {
    pub message: String,
    pub placeholder: Option<String>,
    /// Substituted for the submitted value only when the buffer is empty
    /// at `return`.
    pub default: Option<String>,
    /// Pre-fills the editable buffer.
    pub initial: Option<String>,
    pub validate: Option<Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>>,
}

impl TextOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), placeholder: None, default: None, initial: None, validate: None }
    }
}

pub struct TextKernel {
    editor: LineEditor,
    message: String,
    placeholder: Option<String>,
    default: Option<String>,
    masked: bool,
    /// Mirrors `editor.text()`; exists only so `user_input_snapshot` can
    /// hand out a borrow instead of an owned `String`.
    cached_text: String,
}

impl TextKernel {
    fn displayed_value(&self) -> String {
        if self.masked {
            glyphs::BULLET.repeat(self.editor.len())
        } else {
            self.editor.text()
        }
    }

    fn render_line(&self, phase: Phase) -> String {
        let chars: Vec<char> = self.displayed_value().chars().collect();
        match phase {
            Phase::Initial | Phase::Active | Phase::Error => {
                if chars.is_empty() {
                    if let Some(placeholder) = &self.placeholder {
                        return glyphs::dim(placeholder);
                    }
                    return glyphs::inverse(" ");
                }
                let cursor = self.editor.cursor().min(chars.len());
                let mut out = String::new();
                out.push_str(&chars[..cursor].iter().collect::<String>());
                if cursor < chars.len() {
                    out.push_str(&glyphs::inverse(&chars[cursor].to_string()));
                    out.push_str(&chars[cursor + 1..].iter().collect::<String>());
                } else {
                    out.push_str(&glyphs::inverse(" "));
                }
                out
            }
            Phase::Submit => glyphs::dim(&self.displayed_value()),
            Phase::Cancel => glyphs::strikethrough_dim(&self.displayed_value()),
        }
    }
}

impl PromptComponent for TextKernel {
    type Value = String;

    fn zero_value() -> Self::Value {
        String::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value> {
        if self.editor.apply(key) {
            self.cached_text = self.editor.text();
            KeyOutcome::Changed
        } else {
            KeyOutcome::Unchanged
        }
    }

    fn handle_paste(&mut self, content: String) -> KeyOutcome<Self::Value> {
        self.editor.paste(&content);
        self.cached_text = self.editor.text();
        KeyOutcome::Changed
    }

    fn current_value(&self) -> Option<Self::Value> {
        Some(if self.editor.is_empty() {
            self.default.clone().unwrap_or_default()
        } else {
            self.editor.text()
        })
    }

    fn user_input_snapshot(&self) -> Option<&str> {
        Some(&self.cached_text)
    }

    fn render(&self, phase: Phase, error_message: Option<&str>) -> String {
        let glyph = match phase {
            Phase::Submit => glyphs::green(glyphs::SUBMIT),
            Phase::Cancel => glyphs::red(glyphs::CANCEL),
            _ => glyphs::SUBMIT.to_string(),
        };
        let bar = if phase.is_terminal() { glyphs::gray(glyphs::BAR) } else { glyphs::BAR.to_string() };
        let mut out = format!("{glyph} {}\n{bar} {}", self.message, self.render_line(phase));
        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }
}

pub fn build_options(opts: TextOptions, masked: bool) -> EngineOptions<TextKernel> {
    let editor = LineEditor::new(opts.initial.as_deref().unwrap_or(""));
    let cached_text = editor.text();
    let kernel = TextKernel {
        editor,
        message: opts.message,
        placeholder: opts.placeholder,
        default: opts.default,
        masked,
        cached_text,
    };
    let mut options = EngineOptions::new(kernel);
    if let Some(validate) = opts.validate {
        options.validate = Some(Box::new(move |v: &String| validate(v)));
    }
    options
}

/// A single-line text prompt. Returns the typed value, or `opts.default`
/// when the user submits with an empty buffer, or `""` on cancel.
pub async fn text(opts: TextOptions) -> Result<String, PromptError> {
    let options = build_options(opts, false);
    PromptEngine::new(options).run().await
}

/// Same editing behavior as [`text`], rendered with `●` bullets instead of
/// the typed characters.
pub async fn password(opts: TextOptions) -> Result<String, PromptError> {
    PromptEngine::new(build_options(opts, true)).run().await
}
