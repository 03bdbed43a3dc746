// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! `prompts` is a small, dependency-light toolkit for building interactive
//! terminal prompts: a raw-mode keyboard decoder, a diff-aware ANSI
//! renderer, a single-threaded event loop, and a set of component kernels
//! (line editor, confirm, select, multiselect, autocomplete, textarea,
//! spinner, progress, stream) built on top of it.
//!
//! # Why a hand-rolled key decoder
//!
//! Most terminal UI crates lean on a library (crossterm, termion) to turn
//! bytes into key events. This crate decodes the byte stream itself: VT/CSI
//! sequences, the Kitty keyboard protocol (`CSI keycode;mod u`), xterm's
//! `modifyOtherKeys` encoding (`ESC[27;mod;keycode~`), and bracketed paste
//! (`ESC[200~...ESC[201~`). Doing this in the open is what lets prompts
//! disambiguate a lone `ESC` keypress from the first byte of a CSI sequence,
//! and what lets the textarea component treat an entire pasted block as one
//! atomic edit instead of a few hundred synthetic keystrokes.
//!
//! # Layout
//!
//! - [`core`]: TTY access, the key decoder, ANSI width/truncation, and the
//!   non-blocking event queue.
//! - [`engine`]: the single event loop (`PromptEngine`), its state machine,
//!   and the diff renderer.
//! - [`components`]: the widget kernels that ride on the engine (Text,
//!   Password, Confirm, Select, MultiSelect, Autocomplete, Textarea).
//! - [`renderers`]: Spinner, Progress, and Stream — timed renderers that
//!   don't use the event loop at all.
//! - [`testing`]: an in-memory reader/writer harness for driving prompts
//!   headlessly, used by this crate's own tests and available to
//!   downstream consumers.

pub mod core;
pub mod engine;
pub mod components;
pub mod renderers;
pub mod testing;

mod error;
mod logging;

pub use error::PromptError;
pub use logging::{init_tracing, LoggingConfig};

// Re-export the pieces most consumers reach for first.
pub use core::ansi::width::{scan_token, truncate as truncate_str, visible_width, wrap_hard, Token};
pub use core::key_decoder::{KeyDecoder, KeyEvent, KeyName};
pub use core::tty::{Session, TtyAdapter};
pub use engine::prompt::{EngineOptions, PromptEngine};
pub use engine::state::Phase;

pub use components::autocomplete::{autocomplete, AutocompleteOptions};
pub use components::confirm::{confirm, ConfirmOptions};
pub use components::multiselect::{multiselect, MultiSelectOptions, SelectOption};
pub use components::select::{select, SelectOptions};
pub use components::text::{password, text, TextOptions};
pub use components::textarea::{textarea, TextareaOptions};

pub use renderers::progress::{Progress, ProgressOptions, ProgressStyle};
pub use renderers::spinner::{Spinner, SpinnerIndicator, SpinnerOptions};
pub use renderers::stream::{Stream, StreamOptions};
