// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `MultiSelect<T>`: the same cursor navigation as [`crate::components::select`]
//! plus a `space`-toggled selection set. Submission order follows
//! insertion order, not list order, so the caller sees selections in the
//! order the user actually made them.

pub use crate::components::select::SelectOption;

use crate::components::glyphs;
use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

pub struct MultiSelectOptions<T> {
    pub message: String,
    pub options: Vec<SelectOption<T>>,
    /// Pre-marks every option whose string form matches an entry here.
    pub initial: Vec<T>,
    /// Further `space` toggles past this many selections are silently
    /// ignored.
    pub max_items: Option<usize>,
}

impl<T> MultiSelectOptions<T> {
    pub fn new(message: impl Into<String>, options: Vec<SelectOption<T>>) -> Self {
        Self { message: message.into(), options, initial: Vec::new(), max_items: None }
    }
}

pub struct MultiSelectKernel<T> {
    message: String,
    options: Vec<SelectOption<T>>,
    cursor: usize,
    /// Indices currently selected, in the order they were toggled on.
    /// Re-toggling an index off removes it from here; toggling it back on
    /// appends it at the end, matching the "insertion order" submission
    /// contract rather than a fixed position.
    selected: Vec<usize>,
    max_items: Option<usize>,
}

impl<T> MultiSelectKernel<T> {
    fn is_selected(&self, idx: usize) -> bool {
        self.selected.contains(&idx)
    }

    fn toggle(&mut self, idx: usize) {
        if let Some(pos) = self.selected.iter().position(|&i| i == idx) {
            self.selected.remove(pos);
            return;
        }
        if let Some(max) = self.max_items {
            if self.selected.len() >= max {
                return;
            }
        }
        self.selected.push(idx);
    }
}

impl<T: Clone + Send> PromptComponent for MultiSelectKernel<T> {
    type Value = Vec<T>;

    fn zero_value() -> Self::Value {
        Vec::new()
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
                KeyOutcome::Changed
            }
            KeyName::Down | KeyName::Right | KeyName::Char('j') | KeyName::Char('l') => {
                self.cursor = (self.cursor + 1) % n;
                KeyOutcome::Changed
            }
            KeyName::Char(' ') => {
                self.toggle(self.cursor);
                KeyOutcome::Commit(self.current_values())
            }
            _ => KeyOutcome::Unchanged,
        }
    }

    fn current_value(&self) -> Option<Self::Value> {
        Some(self.current_values())
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
                let labels: Vec<&str> =
                    self.selected.iter().filter_map(|&i| self.options.get(i)).map(|o| o.label.as_str()).collect();
                let joined = labels.join(", ");
                let rendered = if phase == Phase::Submit { glyphs::dim(&joined) } else { glyphs::strikethrough_dim(&joined) };
                out.push_str(&format!("\n{bar} {rendered}"));
            }
            _ => {
                if self.options.is_empty() {
                    out.push_str(&format!("\n{bar} {}", glyphs::dim("(no options)")));
                }
                for (i, option) in self.options.iter().enumerate() {
                    let checkbox = if self.is_selected(i) { glyphs::CHECKED_BOX } else { glyphs::UNCHECKED_BOX };
                    let row = if i == self.cursor {
                        format!("{} {}", glyphs::green(checkbox), option.label)
                    } else {
                        glyphs::dim(&format!("{checkbox} {}", option.label))
                    };
                    out.push_str(&format!("\n{bar} {row}"));
                }
            }
        }

        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }
}

impl<T: Clone> MultiSelectKernel<T> {
    fn current_values(&self) -> Vec<T> {
        self.selected.iter().filter_map(|&i| self.options.get(i)).map(|o| o.value.clone()).collect()
    }
}

pub fn build_options<T: Clone + Send + ToString>(opts: MultiSelectOptions<T>) -> EngineOptions<MultiSelectKernel<T>> {
    let targets: Vec<String> = opts.initial.iter().map(|v| v.to_string()).collect();
    let selected: Vec<usize> = opts
        .options
        .iter()
        .enumerate()
        .filter(|(_, o)| targets.iter().any(|t| *t == o.value.to_string()))
        .map(|(i, _)| i)
        .collect();

    let kernel =
        MultiSelectKernel { message: opts.message, options: opts.options, cursor: 0, selected, max_items: opts.max_items };
    EngineOptions::new(kernel)
}

/// A multi-choice list prompt. `space` toggles the option under the
/// cursor; `return` submits every selected value in the order it was
/// toggled on. Cancel returns an empty list.
pub async fn multiselect<T: Clone + Send + ToString + 'static>(
    opts: MultiSelectOptions<T>,
) -> Result<Vec<T>, PromptError> {
    PromptEngine::new(build_options(opts)).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(name: KeyName) -> KeyEvent {
        KeyEvent { name, shift: false, alt: false, ctrl: false }
    }

    fn letters() -> Vec<SelectOption<&'static str>> {
        vec![SelectOption::new("a", "A"), SelectOption::new("b", "B"), SelectOption::new("c", "C")]
    }

    #[test]
    fn toggle_order_is_preserved_on_submit() {
        let mut k = MultiSelectKernel { message: "pick".into(), options: letters(), cursor: 0, selected: vec![], max_items: None };
        k.handle_key(key(KeyName::Char(' '))); // select a (idx 0)
        k.handle_key(key(KeyName::Down));
        k.handle_key(key(KeyName::Char(' '))); // select b (idx 1)
        assert_eq!(k.current_value(), Some(vec!["a", "b"]));
    }

    #[test]
    fn toggling_off_removes_from_selection() {
        let mut k = MultiSelectKernel { message: "pick".into(), options: letters(), cursor: 0, selected: vec![], max_items: None };
        k.handle_key(key(KeyName::Char(' ')));
        k.handle_key(key(KeyName::Char(' ')));
        assert_eq!(k.current_value(), Some(vec![]));
    }

    #[test]
    fn max_items_silently_ignores_further_selections() {
        let mut k = MultiSelectKernel { message: "pick".into(), options: letters(), cursor: 0, selected: vec![], max_items: Some(1) };
        k.handle_key(key(KeyName::Char(' ')));
        k.handle_key(key(KeyName::Down));
        k.handle_key(key(KeyName::Char(' ')));
        assert_eq!(k.current_value(), Some(vec!["a"]));
    }

    #[test]
    fn empty_options_is_a_navigation_no_op() {
        let mut k: MultiSelectKernel<&'static str> =
            MultiSelectKernel { message: "pick".into(), options: vec![], cursor: 0, selected: vec![], max_items: None };
        k.handle_key(key(KeyName::Down));
        assert_eq!(k.current_value(), Some(vec![]));
    }
}
