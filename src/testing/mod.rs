// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! An in-memory harness for driving a [`PromptComponent`] headlessly: no
//! TTY is opened, no raw mode is toggled, and no reader thread runs.
//! [`drive`] replays a deterministic list of synthetic key/paste/resize
//! events through the exact same per-event dispatch
//! ([`crate::engine::prompt::apply_key`]/
//! [`crate::engine::prompt::apply_paste`]) and diff renderer
//! ([`crate::engine::render::diff`]) that [`PromptEngine::run`] uses, and
//! records every frame along the way, the way the corpus's `StdoutMock`
//! records writes for assertion instead of a real terminal.
//!
//! This is what this crate's own component tests run end-to-end scenarios
//! through; it is exported for downstream consumers that want to test
//! their own `validate` closures or subscriber wiring without a pty.

use crate::engine::events::{EngineEvent, Subscribers};
use crate::engine::prompt::{apply_key, apply_paste, EngineOptions, PromptComponent};
use crate::engine::render;
use crate::engine::state::{Phase, PromptState};
use crate::core::key_decoder::{KeyEvent, KeyName};

/// One synthetic input, injected in the order given to [`drive`].
#[derive(Debug, Clone)]
pub enum TestEvent {
    Key(KeyEvent),
    Paste(String),
    /// A terminal width change; later frames are measured and cleared
    /// against the new width.
    Resize(u16),
}

impl TestEvent {
    /// An unmodified printable character.
    pub fn char(c: char) -> Self {
        TestEvent::Key(KeyEvent { name: KeyName::Char(c), shift: false, alt: false, ctrl: false })
    }

    /// An unmodified named key (`return`, arrows, `tab`, ...).
    pub fn key(name: KeyName) -> Self {
        TestEvent::Key(KeyEvent { name, shift: false, alt: false, ctrl: false })
    }

    /// The same named key with `shift` set, e.g. `Shift+Return`.
    pub fn shift_key(name: KeyName) -> Self {
        TestEvent::Key(KeyEvent { name, shift: true, alt: false, ctrl: false })
    }

    /// `Ctrl+C`, the in-band cancel trigger every component shares.
    pub fn ctrl_c() -> Self {
        TestEvent::Key(KeyEvent { name: KeyName::Char('c'), shift: false, alt: false, ctrl: true })
    }

    /// A string typed one character at a time, e.g. to simulate a paste
    /// that arrives as individual keystrokes rather than a bracketed block.
    pub fn typed(s: &str) -> Vec<Self> {
        s.chars().map(TestEvent::char).collect()
    }
}

/// The result of [`drive`]: the submitted or zero value, the final phase,
/// and every frame produced along the way.
pub struct HarnessRun<V> {
    pub value: V,
    pub phase: Phase,
    /// The exact ANSI text written at each step (initial render, one per
    /// event that produced output, and the final write). This is what a
    /// real terminal would have received.
    pub emitted_frames: Vec<String>,
    /// The component's own `render` output at each step, before the diff
    /// renderer's cursor-movement wrapper — convenient for substring
    /// assertions that don't want to match against clear sequences too.
    pub component_frames: Vec<String>,
}

impl<V> HarnessRun<V> {
    /// Whether any recorded component frame contains `needle`.
    pub fn any_frame_contains(&self, needle: &str) -> bool {
        self.component_frames.iter().any(|frame| frame.contains(needle))
    }
}

/// Drive `options.component` through `events` at the default 80-column
/// width. Stops early if a terminal phase (`submit`/`cancel`) is reached
/// before `events` is exhausted; remaining events are simply never
/// applied, matching how a real prompt stops reading once it returns.
pub fn drive<C: PromptComponent>(options: EngineOptions<C>, events: Vec<TestEvent>) -> HarnessRun<C::Value> {
    drive_at_width(options, events, 80)
}

/// Same as [`drive`] but at an explicit terminal width, for boundary
/// cases like width `1` or mid-run [`TestEvent::Resize`].
pub fn drive_at_width<C: PromptComponent>(
    options: EngineOptions<C>,
    events: Vec<TestEvent>,
    width: u16,
) -> HarnessRun<C::Value> {
    let EngineOptions { component, validate, mut subscribers } = options;
    let mut state = PromptState::new(component);
    let mut width = width.max(1);

    let mut emitted = Vec::new();
    let mut component_frames = Vec::new();

    let first_frame = state.component.render(state.phase, None);
    component_frames.push(first_frame.clone());
    if let Some(out) = render::diff(&mut state.frame, &first_frame, width, true, false) {
        emitted.push(out);
    }
    state.phase = Phase::Active;

    for event in events {
        if state.phase.is_terminal() {
            break;
        }

        let mut resized = false;
        match event {
            TestEvent::Key(key) => apply_key(&mut state, key, &validate, &mut subscribers),
            TestEvent::Paste(content) => apply_paste(&mut state, content, &mut subscribers),
            TestEvent::Resize(cols) => {
                width = cols.max(1);
                resized = true;
            }
        }

        let frame = state.component.render(state.phase, state.error_message.as_deref());
        component_frames.push(frame.clone());
        if let Some(out) = render::diff(&mut state.frame, &frame, width, false, resized) {
            emitted.push(out);
        }
    }

    let final_frame = state.component.render(state.phase, state.error_message.as_deref());
    component_frames.push(final_frame.clone());
    emitted.push(render::finalize(&mut state.frame, &final_frame, width));

    let value = match state.phase {
        Phase::Submit => state.component.current_value().unwrap_or_else(C::zero_value),
        _ => C::zero_value(),
    };

    subscribers.fire(&EngineEvent::Finalize);
    match state.phase {
        Phase::Submit => subscribers.fire(&EngineEvent::Submit(value.clone())),
        _ => subscribers.fire(&EngineEvent::Cancel(value.clone())),
    }

    HarnessRun { value, phase: state.phase, emitted_frames: emitted, component_frames }
}

/// A context already resolved at drive time: [`PromptEngine::run_cancellable`]
/// returns the zero value immediately with no render at all when this is
/// the case, so this harness doesn't need to model it — a caller testing
/// that codepath can assert directly against `C::zero_value()`.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::confirm::ConfirmOptions;
    use crate::components::select::{SelectOption, SelectOptions};
    use crate::components::text::TextOptions;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_submit_scenario() {
        let options = crate::components::text::build_options(TextOptions::new("Your name:"), false);
        let run = drive(options, vec![TestEvent::char('h'), TestEvent::char('i'), TestEvent::key(KeyName::Return)]);
        assert_eq!(run.value, "hi");
        assert_eq!(run.phase, Phase::Submit);
        assert!(run.any_frame_contains("Your name:"));
        assert!(run.any_frame_contains(crate::components::glyphs::SUBMIT));
    }

    #[test]
    fn text_cancel_via_escape_scenario() {
        let options = crate::components::text::build_options(TextOptions::new("Your name:"), false);
        let run = drive(options, vec![TestEvent::char('a'), TestEvent::key(KeyName::Escape)]);
        assert_eq!(run.value, "");
        assert_eq!(run.phase, Phase::Cancel);
        assert!(run.any_frame_contains(crate::components::glyphs::CANCEL));
    }

    #[test]
    fn confirm_on_y_scenario() {
        let options = crate::components::confirm::build_options(ConfirmOptions::new("Sure?"));
        let run = drive(options, vec![TestEvent::char('y')]);
        assert!(run.value);
        assert_eq!(run.phase, Phase::Submit);
    }

    #[test]
    fn confirm_on_n_with_default_initial_returns_false() {
        let options = crate::components::confirm::build_options(ConfirmOptions::new("Sure?"));
        let run = drive(options, vec![TestEvent::char('n')]);
        assert!(!run.value);
        assert_eq!(run.phase, Phase::Submit);
    }

    #[test]
    fn confirm_on_y_with_initial_false_still_returns_true() {
        let mut opts = ConfirmOptions::new("Sure?");
        opts.initial = false;
        let run = drive(crate::components::confirm::build_options(opts), vec![TestEvent::char('y')]);
        assert!(run.value);
        assert_eq!(run.phase, Phase::Submit);
    }

    #[test]
    fn select_with_initial_scenario() {
        let options = vec![
            SelectOption::new("red", "Red"),
            SelectOption::new("blue", "Blue"),
            SelectOption::new("green", "Green"),
        ];
        let mut opts = SelectOptions::new("Color:", options);
        opts.initial = Some("blue".to_string());
        let run = drive(crate::components::select::build_options(opts), vec![TestEvent::key(KeyName::Return)]);
        assert_eq!(run.value, "blue");
    }

    #[test]
    fn paste_burst_of_300_characters_does_not_deadlock() {
        let options = crate::components::text::build_options(TextOptions::new("Paste:"), false);
        let mut events: Vec<TestEvent> = (0..300).map(|_| TestEvent::char('x')).collect();
        events.push(TestEvent::key(KeyName::Return));
        let run = drive(options, events);
        assert_eq!(run.value.len(), 300);
        assert_eq!(run.phase, Phase::Submit);
    }

    #[test]
    fn already_terminal_phase_stops_applying_further_events() {
        let options = crate::components::confirm::build_options(ConfirmOptions::new("Sure?"));
        let run = drive(options, vec![TestEvent::char('y'), TestEvent::char('n')]);
        assert!(run.value, "the second event (n) must never apply once submit already fired");
    }
}
