// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The public subscriber surface: a tagged union of engine lifecycle
//! events plus an `on(event, handler)`-style registry a host application
//! can use to observe a running prompt without reaching into its
//! component state.
//!
//! A stringly-typed event name with an untyped argument list (the pattern
//! this replaces) pushes the type-checking work to runtime; a closed sum
//! type lets every handler pattern-match exhaustively instead.

use crate::core::key_decoder::KeyEvent;

/// A cursor-movement direction, reported whenever an arrow key (or, for
/// components that opt into vim-style aliases, `h`/`j`/`k`/`l`) is
/// pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// One engine-level occurrence, parameterized over the component's
/// committed value type.
#[derive(Debug, Clone)]
pub enum EngineEvent<V> {
    Cursor(Direction),
    Key(KeyEvent),
    /// A component committed a new value (not yet submitted).
    Value(V),
    /// A line-editor-backed component's buffer contents changed.
    UserInput(String),
    Submit(V),
    Cancel(V),
    Finalize,
}

type Handler<V> = Box<dyn FnMut(&EngineEvent<V>) + Send>;

/// Registry of subscriber closures. Handlers registered before
/// [`crate::engine::prompt::PromptEngine::run`] starts run synchronously,
/// in registration order, as each event occurs during the loop — there is
/// no separate "pre-sub" staging table to migrate, because `run` takes
/// ownership of this registry before opening the TTY session and wiring
/// the reader thread, so every handler is already live before the first
/// keypress can arrive.
pub struct Subscribers<V> {
    handlers: Vec<Handler<V>>,
}

impl<V> Subscribers<V> {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Register a handler. Call this before handing the options to
    /// [`crate::engine::prompt::PromptEngine::new`].
    pub fn on(&mut self, handler: impl FnMut(&EngineEvent<V>) + Send + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub(crate) fn fire(&mut self, event: &EngineEvent<V>) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }
}

impl<V> Default for Subscribers<V> {
    fn default() -> Self {
        Self::new()
    }
}
