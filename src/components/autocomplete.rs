// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Autocomplete`: a [`LineEditor`] with a suggestion list recomputed on
//! every edit. `up`/`down` move the highlighted suggestion (not the text
//! cursor); `tab` replaces the buffer with the highlighted suggestion so a
//! following `return` submits it.

use crate::components::glyphs;
use crate::components::line_editor::LineEditor;
use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

const DEFAULT_MAX_RESULTS: usize = 5;

pub struct AutocompleteOptions {
    pub message: String,
    pub placeholder: Option<String>,
    pub default: Option<String>,
    pub initial: Option<String>,
    pub validate: Option<Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>>,
    /// Called with the current buffer contents after every edit; returns
    /// candidate completions in ranked order.
    pub suggest: Box<dyn Fn(&str) -> Vec<String> + Send + Sync>,
    pub max_results: usize,
}

impl AutocompleteOptions {
    pub fn new(message: impl Into<String>, suggest: impl Fn(&str) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            placeholder: None,
            default: None,
            initial: None,
            validate: None,
            suggest: Box::new(suggest),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

pub struct AutocompleteKernel {
    editor: LineEditor,
    message: String,
    placeholder: Option<String>,
    default: Option<String>,
    suggest: Box<dyn Fn(&str) -> Vec<String> + Send + Sync>,
    max_results: usize,
    suggestions: Vec<String>,
    suggestion_cursor: usize,
    cached_text: String,
}

impl AutocompleteKernel {
    fn recompute_suggestions(&mut self) {
        self.suggestions = (self.suggest)(&self.editor.text());
        self.suggestions.truncate(self.max_results);
        if self.suggestions.is_empty() {
            self.suggestion_cursor = 0;
        } else if self.suggestion_cursor >= self.suggestions.len() {
            self.suggestion_cursor = self.suggestions.len() - 1;
        }
    }
}

impl PromptComponent for AutocompleteKernel {
    type Value = String;

    fn zero_value() -> Self::Value {
        String::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value> {
        match key.name {
            KeyName::Up if !self.suggestions.is_empty() => {
                let n = self.suggestions.len();
                self.suggestion_cursor = (self.suggestion_cursor + n - 1) % n;
                KeyOutcome::Changed
            }
            KeyName::Down if !self.suggestions.is_empty() => {
                let n = self.suggestions.len();
                self.suggestion_cursor = (self.suggestion_cursor + 1) % n;
                KeyOutcome::Changed
            }
            KeyName::Tab => {
                if let Some(chosen) = self.suggestions.get(self.suggestion_cursor).cloned() {
                    self.editor = LineEditor::new(&chosen);
                    self.cached_text = self.editor.text();
                    self.recompute_suggestions();
                    KeyOutcome::Changed
                } else {
                    KeyOutcome::Unchanged
                }
            }
            _ => {
                if self.editor.apply(key) {
                    self.cached_text = self.editor.text();
                    self.recompute_suggestions();
                    KeyOutcome::Changed
                } else {
                    KeyOutcome::Unchanged
                }
            }
        }
    }

    fn handle_paste(&mut self, content: String) -> KeyOutcome<Self::Value> {
        self.editor.paste(&content);
        self.cached_text = self.editor.text();
        self.recompute_suggestions();
        KeyOutcome::Changed
    }

    fn current_value(&self) -> Option<Self::Value> {
        Some(if self.editor.is_empty() { self.default.clone().unwrap_or_default() } else { self.editor.text() })
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

        let chars: Vec<char> = self.editor.text().chars().collect();
        let editor_line = match phase {
            Phase::Submit => glyphs::dim(&self.editor.text()),
            Phase::Cancel => glyphs::strikethrough_dim(&self.editor.text()),
            _ => {
                if chars.is_empty() {
                    if let Some(placeholder) = &self.placeholder {
                        glyphs::dim(placeholder)
                    } else {
                        glyphs::inverse(" ")
                    }
                } else {
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
            }
        };

        let mut out = format!("{glyph} {}\n{bar} {editor_line}", self.message);

        if phase == Phase::Active || phase == Phase::Initial {
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                let row = if i == self.suggestion_cursor {
                    format!("{} {suggestion}", glyphs::green(glyphs::ACTIVE_RADIO))
                } else {
                    glyphs::dim(&format!("{} {suggestion}", glyphs::INACTIVE_RADIO))
                };
                out.push_str(&format!("\n{bar} {row}"));
            }
        }

        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }
}

pub fn build_options(opts: AutocompleteOptions) -> EngineOptions<AutocompleteKernel> {
    let mut kernel = AutocompleteKernel {
        editor: LineEditor::new(opts.initial.as_deref().unwrap_or("")),
        message: opts.message,
        placeholder: opts.placeholder,
        default: opts.default,
        suggest: opts.suggest,
        max_results: if opts.max_results == 0 { DEFAULT_MAX_RESULTS } else { opts.max_results },
        suggestions: Vec::new(),
        suggestion_cursor: 0,
        cached_text: String::new(),
    };
    kernel.cached_text = kernel.editor.text();
    kernel.recompute_suggestions();

    let mut options = EngineOptions::new(kernel);
    if let Some(validate) = opts.validate {
        options.validate = Some(Box::new(move |v: &String| validate(v)));
    }
    options
}

/// A single-line text prompt with a live suggestion list. `tab` commits
/// the highlighted suggestion into the buffer; `return` submits the
/// buffer (or `opts.default` if empty).
pub async fn autocomplete(opts: AutocompleteOptions) -> Result<String, PromptError> {
    PromptEngine::new(build_options(opts)).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(name: KeyName) -> KeyEvent {
        KeyEvent { name, shift: false, alt: false, ctrl: false }
    }

    fn kernel_with(text: &str, suggest: fn(&str) -> Vec<String>) -> AutocompleteKernel {
        let mut k = AutocompleteKernel {
            editor: LineEditor::new(text),
            message: "pick".into(),
            placeholder: None,
            default: None,
            suggest: Box::new(suggest),
            max_results: DEFAULT_MAX_RESULTS,
            suggestions: Vec::new(),
            suggestion_cursor: 0,
            cached_text: text.to_string(),
        };
        k.recompute_suggestions();
        k
    }

    #[test]
    fn typing_recomputes_and_clamps_suggestions() {
        let mut k = kernel_with("", |_| vec!["apple".into(), "apricot".into()]);
        k.handle_key(key(KeyName::Char('a')));
        assert_eq!(k.suggestions, vec!["apple", "apricot"]);
    }

    #[test]
    fn tab_commits_highlighted_suggestion() {
        let mut k = kernel_with("ap", |_| vec!["apple".into(), "apricot".into()]);
        k.handle_key(key(KeyName::Down));
        k.handle_key(key(KeyName::Tab));
        assert_eq!(k.editor.text(), "apricot");
    }

    #[test]
    fn max_results_truncates_the_list() {
        let mut k = kernel_with("", |_| vec!["a".into(), "b".into(), "c".into()]);
        k.max_results = 2;
        k.recompute_suggestions();
        assert_eq!(k.suggestions.len(), 2);
    }

    #[test]
    fn up_down_wrap_the_suggestion_cursor() {
        let mut k = kernel_with("", |_| vec!["a".into(), "b".into()]);
        k.handle_key(key(KeyName::Up));
        assert_eq!(k.suggestion_cursor, 1);
        k.handle_key(key(KeyName::Down));
        assert_eq!(k.suggestion_cursor, 0);
    }
}
