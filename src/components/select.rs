// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Select<T>`: a single-cursor list with wrap-around navigation. The
//! initial cursor position is resolved by string-form equality of the
//! value payload, which is why `T` only needs [`ToString`] here rather
//! than `PartialEq` — callers with non-comparable value types (closures,
//! trait objects) can still use the component as long as they can name a
//! string form for their options.

use crate::components::glyphs;
use crate::core::ansi::width::truncate;
use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

/// One selectable row: the value returned on submit, its display label,
/// and an optional hint shown only while the row is active.
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
    pub hint: String,
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self { value, label: label.into(), hint: String::new() }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }
}

pub struct SelectOptions<T> {
    pub message: String,
    pub options: Vec<SelectOption<T>>,
    /// Pre-positions the cursor at the first option whose string form
    /// matches; ignored if no option matches.
    pub initial: Option<T>,
}

impl<T> SelectOptions<T> {
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Self {
        Self { message: message.into(), options, initial: None }
    }
}

pub struct SelectKernel<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    cursor: usize,
}

impl<T: Clone + Send + Default> PromptComponent for SelectKernel<T> {
    type Value = T;

    fn zero_value() -> Self::Value {
        T::default()
    }

    fn vim_aliases(&self) -> bool {
        true
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value> {
        if self.options.is_empty() {
            return KeyOutcome::Unchanged;
        }
        let n = self.options.len();
        match key.name {
            KeyName::Up | KeyName::Left | KeyName::Char('k') | KeyName::Char('h') => {
                self.cursor = (self.cursor + n - 1) % n;
                KeyOutcome::Commit(self.options[self.cursor].value.clone())
            }
            KeyName::Down | KeyName::Right | KeyName::Char('j') | KeyName::Char('l') => {
                self.cursor = (self.cursor + 1) % n;
                KeyOutcome::Commit(self.options[self.cursor].value.clone())
            }
            _ => KeyOutcome::Unchanged,
        }
    }

    fn current_value(&self) -> Option<Self::Value> {
        self.options.get(self.cursor).map(|o| o.value.clone())
    }

    fn render(&self, phase: Phase, error_message: Option<&str>) -> String {
        let glyph = match phase {
            Phase::Submit => glyphs::green(glyphs::SUBMIT),
            Phase::Cancel => glyphs::red(glyphs::CANCEL),
            _ => glyphs::SUBMIT.to_string(),
        };
        let bar = if phase.is_terminal() { glyphs::gray(glyphs::BAR) } else { glyphs::BAR.to_string() };

        let mut out = format!("{glyph} {}", self.message);

        match phase {
            Phase::Submit | Phase::Cancel => {
                let label = self.options.get(self.cursor).map(|o| o.label.as_str()).unwrap_or("");
                let rendered = if phase == Phase::Submit { glyphs::dim(label) } else { glyphs::strikethrough_dim(label) };
                out.push_str(&format!("\n{bar} {rendered}"));
            }
            _ => {
                for (i, option) in self.options.iter().enumerate() {
                    let row = if i == self.cursor {
                        let hint = if option.hint.is_empty() { String::new() } else { format!(" {}", glyphs::dim(&truncate(&option.hint, 40))) };
                        format!("{} {}{hint}", glyphs::green(glyphs::ACTIVE_RADIO), option.label)
                    } else {
                        glyphs::dim(&format!("{} {}", glyphs::INACTIVE_RADIO, option.label))
                    };
                    out.push_str(&format!("\n{bar} {row}"));
                }
                if self.options.is_empty() {
                    out.push_str(&format!("\n{bar} {}", glyphs::dim("(no options)")));
                }
            }
        }

        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }
}

pub fn build_options<T: Clone + Send + Default + ToString>(opts: SelectOptions<T>) -> EngineOptions<SelectKernel<T>> {
    let mut cursor = 0;
    if let Some(initial) = &opts.initial {
        let target = initial.to_string();
        if let Some(idx) = opts.options.iter().position(|o| o.value.to_string() == target) {
            cursor = idx;
        }
    }
    let kernel = SelectKernel { message: opts.message, options: opts.options, cursor };
    EngineOptions::new(kernel)
}

/// A single-choice list prompt. Navigation wraps around both ends;
/// `return` submits the option under the cursor. Cancel returns
/// `T::default()`.
pub async fn select<T: Clone + Send + Default + ToString + 'static>(opts: SelectOptions<T>) -> Result<T, PromptError> {
    PromptEngine::new(build_options(opts)).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(name: KeyName) -> KeyEvent {
        KeyEvent { name, shift: false, alt: false, ctrl: false }
    }

    fn colors() -> Vec<SelectOption<&'static str>> {
        vec![
            SelectOption::new("red", "Red"),
            SelectOption::new("blue", "Blue"),
            SelectOption::new("green", "Green"),
        ]
    }

    #[test]
    fn down_wraps_past_the_last_option() {
        let mut k = SelectKernel { message: "pick".into(), options: colors(), cursor: 2 };
        k.handle_key(key(KeyName::Down));
        assert_eq!(k.cursor, 0);
    }

    #[test]
    fn up_wraps_before_the_first_option() {
        let mut k = SelectKernel { message: "pick".into(), options: colors(), cursor: 0 };
        k.handle_key(key(KeyName::Up));
        assert_eq!(k.cursor, 2);
    }

    #[test]
    fn empty_options_is_a_navigation_no_op() {
        let mut k: SelectKernel<&'static str> = SelectKernel { message: "pick".into(), options: vec![], cursor: 0 };
        k.handle_key(key(KeyName::Down));
        assert_eq!(k.current_value(), None);
    }

    #[test]
    fn current_value_tracks_the_cursor() {
        let k = SelectKernel { message: "pick".into(), options: colors(), cursor: 1 };
        assert_eq!(k.current_value(), Some("blue"));
    }
}
