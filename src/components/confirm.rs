// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `Confirm`: a two-state boolean toggle. `left`/`right` flip the active
//! option; `y`/`n` submit immediately without requiring `return`. This is
//! the one kernel that uses [`KeyOutcome::Submit`] — every other kernel
//! treats `y`/`n` as ordinary characters.

use crate::components::glyphs;
use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::engine::prompt::{EngineOptions, KeyOutcome, PromptComponent, PromptEngine};
use crate::engine::Phase;
use crate::error::PromptError;

pub struct ConfirmOptions {
    pub message: String,
    /// Label for the `true` option. Defaults to `"Yes"`.
    pub active: String,
    /// Label for the `false` option. Defaults to `"No"`.
    pub inactive: String,
    pub initial: bool,
}

impl ConfirmOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), active: "Yes".to_string(), inactive: "No".to_string(), initial: true }
    }
}

pub struct ConfirmKernel {
    message: String,
    active_label: String,
    inactive_label: String,
    value: bool,
}

impl PromptComponent for ConfirmKernel {
    type Value = bool;

    fn zero_value() -> Self::Value {
        false
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value> {
        match key.name {
            KeyName::Left | KeyName::Right => {
                self.value = !self.value;
                KeyOutcome::Commit(self.value)
            }
            KeyName::Char('y') => {
                self.value = true;
                KeyOutcome::Submit(true)
            }
            KeyName::Char('n') => {
                self.value = false;
                KeyOutcome::Submit(false)
            }
            _ => KeyOutcome::Unchanged,
        }
    }

    fn current_value(&self) -> Option<Self::Value> {
        Some(self.value)
    }

    fn render(&self, phase: Phase, error_message: Option<&str>) -> String {
        let glyph = match phase {
            Phase::Submit => glyphs::green(glyphs::SUBMIT),
            Phase::Cancel => glyphs::red(glyphs::CANCEL),
            _ => glyphs::SUBMIT.to_string(),
        };
        let bar = if phase.is_terminal() { glyphs::gray(glyphs::BAR) } else { glyphs::BAR.to_string() };

        let chosen_label = if self.value { &self.active_label } else { &self.inactive_label };
        let options_line = match phase {
            Phase::Submit => glyphs::dim(chosen_label),
            Phase::Cancel => glyphs::strikethrough_dim(chosen_label),
            _ => {
                let render_option = |label: &str, is_active: bool| -> String {
                    if is_active {
                        format!("{} {label}", glyphs::green(glyphs::ACTIVE_RADIO))
                    } else {
                        glyphs::dim(&format!("{} {label}", glyphs::INACTIVE_RADIO))
                    }
                };
                format!(
                    "{}  {}",
                    render_option(&self.active_label, self.value),
                    render_option(&self.inactive_label, !self.value)
                )
            }
        };

        let mut out = format!("{glyph} {}\n{bar} {options_line}", self.message);
        if let Some(message) = error_message {
            out.push_str(&format!("\n\u{2514} {}", glyphs::yellow(message)));
        }
        out
    }
}

pub fn build_options(opts: ConfirmOptions) -> EngineOptions<ConfirmKernel> {
    let kernel = ConfirmKernel {
        message: opts.message,
        active_label: opts.active,
        inactive_label: opts.inactive,
        value: opts.initial,
    };
    EngineOptions::new(kernel)
}

/// A yes/no confirmation. `y`/`n` submit immediately; `left`/`right` toggle
/// the active option for a subsequent `return`.
pub async fn confirm(opts: ConfirmOptions) -> Result<bool, PromptError> {
    PromptEngine::new(build_options(opts)).run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::prompt::KeyOutcome;
    use pretty_assertions::assert_eq;

    fn key(name: KeyName) -> KeyEvent {
        KeyEvent { name, shift: false, alt: false, ctrl: false }
    }

    fn kernel(initial: bool) -> ConfirmKernel {
        ConfirmKernel {
            message: "Continue?".to_string(),
            active_label: "Yes".to_string(),
            inactive_label: "No".to_string(),
            value: initial,
        }
    }

    #[test]
    fn y_submits_true_regardless_of_current_toggle() {
        let mut k = kernel(false);
        assert!(matches!(k.handle_key(key(KeyName::Char('y'))), KeyOutcome::Submit(true)));
        assert_eq!(k.current_value(), Some(true));
    }

    #[test]
    fn n_submits_false_regardless_of_current_toggle() {
        let mut k = kernel(true);
        assert!(matches!(k.handle_key(key(KeyName::Char('n'))), KeyOutcome::Submit(false)));
        assert_eq!(k.current_value(), Some(false));
    }

    #[test]
    fn left_right_flip_the_active_option() {
        let mut k = kernel(true);
        k.handle_key(key(KeyName::Left));
        assert_eq!(k.current_value(), Some(false));
        k.handle_key(key(KeyName::Right));
        assert_eq!(k.current_value(), Some(true));
    }
}
