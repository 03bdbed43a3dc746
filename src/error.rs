// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can surface from the public API *before* a prompt's event
/// loop starts running.
///
/// Once a prompt is active, validation failures, cancellation, and I/O
/// errors are all folded into the typed return value (see
/// [`crate::engine::state::Phase`]) rather than propagated as `Err` — this
/// mirrors the rest of the crate's "best effort once running" policy.
/// `PromptError` only covers the one thing that can go wrong up front:
/// there's no controlling terminal to open.
#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    /// No controlling TTY was found when opening a [`crate::core::tty::Session`].
    #[error("no controlling terminal is available")]
    #[diagnostic(code(prompts::terminal_unavailable))]
    TerminalUnavailable,

    /// An I/O error occurred while opening or configuring the terminal.
    #[error(transparent)]
    #[diagnostic(code(prompts::io))]
    Io(#[from] std::io::Error),
}
