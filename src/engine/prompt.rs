// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The shared prompt engine: owns the single event loop, drives a
//! component kernel's edits, runs the diff renderer, and returns a typed
//! value once the prompt reaches `submit` or `cancel`.
//!
//! Each component kernel (`crate::components::*`) implements
//! [`PromptComponent`] and otherwise knows nothing about TTYs, ANSI, or
//! the event queue; this module is the only place those are wired
//! together.

use std::future::Future;

use crate::core::key_decoder::{KeyEvent, KeyName};
use crate::core::tty::{SessionEvent, TtyAdapter};
use crate::engine::events::{Direction, EngineEvent, Subscribers};
use crate::engine::render;
use crate::engine::state::{Phase, PromptState};
use crate::error::PromptError;

/// What applying one keypress did to a component kernel, from the
/// engine's point of view.
pub enum KeyOutcome<V> {
    /// Nothing changed; no re-render is forced (one may still happen if
    /// the phase itself changed around the call).
    Unchanged,
    /// Internal state changed but there is nothing yet to submit.
    Changed,
    /// The component's current value changed. Reported to subscribers as
    /// [`EngineEvent::Value`]; submitted only when `return` is pressed
    /// and validation passes.
    Commit(V),
    /// Submit `v` immediately, bypassing validation entirely. Only
    /// [`crate::components::confirm::Confirm`]'s `y`/`n` shortcut uses
    /// this — every other kernel treats `y`/`n` as ordinary characters.
    Submit(V),
}

/// The contract a component kernel implements to ride on the shared
/// engine. The engine owns the event loop, the diff renderer, and the
/// phase machine; the kernel owns its own buffer/cursor/selection state
/// and how it renders at each phase.
pub trait PromptComponent: Send {
    /// The type returned to the caller on submit or cancel.
    type Value: Clone + Send + 'static;

    /// The value returned on cancellation: the "zero" of the caller's
    /// expected type (empty string, `false`, empty list, ...).
    fn zero_value() -> Self::Value;

    /// Whether unmodified `h`/`j`/`k`/`l` should additionally be
    /// interpreted as left/down/up/right. Line-editor-backed components
    /// (`Text`, `Password`, `Autocomplete`) must leave this `false` so
    /// typing those letters inserts them; `Select`/`MultiSelect` opt in.
    fn vim_aliases(&self) -> bool {
        false
    }

    /// Apply one decoded key.
    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome<Self::Value>;

    /// Apply a bracketed-paste payload. Default: ignored (every kernel
    /// except the line editor family and textarea).
    fn handle_paste(&mut self, _content: String) -> KeyOutcome<Self::Value> {
        KeyOutcome::Unchanged
    }

    /// Intercept a `return` keypress before the engine applies its default
    /// submit-or-validate handling. Returning `Some` consumes the key
    /// entirely (the engine applies the outcome and does not touch
    /// `phase`); returning `None` falls through to the ordinary
    /// `current_value` + `validate` submit path. Only
    /// [`crate::components::textarea`] overrides this, to turn
    /// `Shift+Return` into a literal newline insertion instead of a
    /// submit.
    fn handle_return(&mut self, _shift: bool) -> Option<KeyOutcome<Self::Value>> {
        None
    }

    /// The value `return` would submit right now, or `None` if there is
    /// nothing to submit yet (an empty options list, for instance — the
    /// engine then treats `return` as a no-op rather than indexing an
    /// empty collection).
    fn current_value(&self) -> Option<Self::Value>;

    /// A line editor's buffer contents, for components backed by one.
    /// Used only to fire [`EngineEvent::UserInput`]; has no effect on
    /// submission.
    fn user_input_snapshot(&self) -> Option<&str> {
        None
    }

    /// Produce the complete frame for the current phase. `error_message`
    /// is `Some` only while `phase == Phase::Error`.
    fn render(&self, phase: Phase, error_message: Option<&str>) -> String;

    /// Written once before the first render (e.g. textarea's bracketed
    /// paste enable sequence).
    fn enter_sequence(&self) -> &str {
        ""
    }

    /// Written once after the final render.
    fn exit_sequence(&self) -> &str {
        ""
    }
}

/// Construction options for a [`PromptEngine`] run.
pub struct EngineOptions<C: PromptComponent> {
    pub component: C,
    /// Runs only against a value `return` would actually submit — never
    /// against `C::zero_value()` on cancel.
    pub validate: Option<Box<dyn Fn(&C::Value) -> Result<(), String> + Send + Sync>>,
    pub subscribers: Subscribers<C::Value>,
}

impl<C: PromptComponent> EngineOptions<C> {
    pub fn new(component: C) -> Self {
        Self { component, validate: None, subscribers: Subscribers::new() }
    }
}

pub struct PromptEngine<C: PromptComponent> {
    options: EngineOptions<C>,
}

impl<C: PromptComponent + 'static> PromptEngine<C> {
    pub fn new(options: EngineOptions<C>) -> Self {
        Self { options }
    }

    /// Run to completion with no external cancellation source beyond the
    /// in-band triggers (`Ctrl+C`, `Esc`, `SIGINT`).
    pub async fn run(self) -> Result<C::Value, PromptError> {
        self.run_cancellable(std::future::pending()).await
    }

    /// Run to completion, additionally honoring `cancel`. `cancel` is
    /// polled once before the TTY is even opened — if it is already
    /// resolved, the prompt returns the zero value immediately with no
    /// render at all, matching the "context already done" testable
    /// property.
    pub async fn run_cancellable(self, cancel: impl Future<Output = ()> + Send) -> Result<C::Value, PromptError> {
        tokio::pin!(cancel);

        let already_canceled = tokio::select! {
            biased;
            _ = &mut cancel => true,
            () = std::future::ready(()) => false,
        };
        if already_canceled {
            return Ok(C::zero_value());
        }

        let EngineOptions { component, validate, mut subscribers } = self.options;
        let mut session = TtyAdapter::open()?;

        let mut state = PromptState::new(component);

        if !state.component.enter_sequence().is_empty() {
            let _ = session.write(state.component.enter_sequence());
        }

        let mut width = session.width();
        let frame = state.component.render(state.phase, None);
        if let Some(out) = render::diff(&mut state.frame, &frame, width, true, false) {
            let _ = session.write(&out);
        }
        state.phase = Phase::Active;

        loop {
            let mut resized = false;

            tokio::select! {
                biased;
                _ = &mut cancel => {
                    state.phase = Phase::Cancel;
                }
                event = session.recv() => {
                    match event {
                        Some(SessionEvent::Key(key)) => apply_key(&mut state, key, &validate, &mut subscribers),
                        Some(SessionEvent::Paste(content)) => apply_paste(&mut state, content, &mut subscribers),
                        Some(SessionEvent::Resize(cols)) => {
                            width = cols.max(1);
                            resized = true;
                        }
                        Some(SessionEvent::Interrupt) => state.phase = Phase::Cancel,
                        None => break,
                    }
                }
            }

            let frame = state.component.render(state.phase, state.error_message.as_deref());
            if let Some(out) = render::diff(&mut state.frame, &frame, width, false, resized) {
                let _ = session.write(&out);
            }

            if state.phase.is_terminal() {
                break;
            }
        }

        let final_frame = state.component.render(state.phase, state.error_message.as_deref());
        let out = render::finalize(&mut state.frame, &final_frame, width);
        let _ = session.write(&out);
        if !state.component.exit_sequence().is_empty() {
            let _ = session.write(state.component.exit_sequence());
        }

        let result = match state.phase {
            Phase::Submit => state.component.current_value().unwrap_or_else(C::zero_value),
            _ => C::zero_value(),
        };

        subscribers.fire(&EngineEvent::Finalize);
        match state.phase {
            Phase::Submit => subscribers.fire(&EngineEvent::Submit(result.clone())),
            _ => subscribers.fire(&EngineEvent::Cancel(result.clone())),
        }

        Ok(result)
    }
}

fn is_cancel_trigger(key: &KeyEvent) -> bool {
    matches!(key.name, KeyName::Escape) || (key.ctrl && matches!(key.name, KeyName::Char('c')))
}

fn movement_direction(key: &KeyEvent, vim_aliases: bool) -> Option<Direction> {
    match key.name {
        KeyName::Up => Some(Direction::Up),
        KeyName::Down => Some(Direction::Down),
        KeyName::Left => Some(Direction::Left),
        KeyName::Right => Some(Direction::Right),
        KeyName::Char('k') if vim_aliases => Some(Direction::Up),
        KeyName::Char('j') if vim_aliases => Some(Direction::Down),
        KeyName::Char('h') if vim_aliases => Some(Direction::Left),
        KeyName::Char('l') if vim_aliases => Some(Direction::Right),
        _ => None,
    }
}

pub(crate) fn apply_key<C: PromptComponent>(
    state: &mut PromptState<C>,
    key: KeyEvent,
    validate: &Option<Box<dyn Fn(&C::Value) -> Result<(), String> + Send + Sync>>,
    subscribers: &mut Subscribers<C::Value>,
) {
    let is_return = matches!(key.name, KeyName::Return);

    // A component may intercept `return` as a content edit rather than a
    // submit attempt (textarea's Shift+Return inserting a literal newline).
    // That counts as "any other key" for the purposes of clearing a showing
    // validation error, even though `key.name` is literally `Return`.
    if is_return {
        if let Some(outcome) = state.component.handle_return(key.shift) {
            if state.phase == Phase::Error {
                state.phase = Phase::Active;
                state.error_message = None;
            }
            if let Some(direction) = movement_direction(&key, state.component.vim_aliases()) {
                subscribers.fire(&EngineEvent::Cursor(direction));
            }
            subscribers.fire(&EngineEvent::Key(key));
            apply_outcome(state, outcome, subscribers);
            return;
        }
    }

    if state.phase == Phase::Error && !is_return && !is_cancel_trigger(&key) {
        state.phase = Phase::Active;
        state.error_message = None;
    }

    if is_cancel_trigger(&key) {
        state.phase = Phase::Cancel;
        return;
    }

    if let Some(direction) = movement_direction(&key, state.component.vim_aliases()) {
        subscribers.fire(&EngineEvent::Cursor(direction));
    }

    subscribers.fire(&EngineEvent::Key(key));

    if is_return {
        if let Some(value) = state.component.current_value() {
            let outcome = validate.as_ref().map(|f| f(&value));
            match outcome {
                None | Some(Ok(())) => state.phase = Phase::Submit,
                Some(Err(message)) => {
                    state.phase = Phase::Error;
                    state.error_message = Some(message);
                }
            }
        }
        return;
    }

    let outcome = state.component.handle_key(key);
    apply_outcome(state, outcome, subscribers);
}

fn apply_outcome<C: PromptComponent>(
    state: &mut PromptState<C>,
    outcome: KeyOutcome<C::Value>,
    subscribers: &mut Subscribers<C::Value>,
) {
    match outcome {
        KeyOutcome::Unchanged => {}
        KeyOutcome::Changed => {
            if let Some(input) = state.component.user_input_snapshot() {
                subscribers.fire(&EngineEvent::UserInput(input.to_string()));
            }
        }
        KeyOutcome::Commit(value) => {
            subscribers.fire(&EngineEvent::Value(value));
        }
        KeyOutcome::Submit(value) => {
            state.phase = Phase::Submit;
            subscribers.fire(&EngineEvent::Value(value));
        }
    }
}

pub(crate) fn apply_paste<C: PromptComponent>(
    state: &mut PromptState<C>,
    content: String,
    subscribers: &mut Subscribers<C::Value>,
) {
    let outcome = state.component.handle_paste(content);
    apply_outcome(state, outcome, subscribers);
}
