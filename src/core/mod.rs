// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The protocol-level layer: opening the TTY, decoding raw bytes into
//! [`KeyEvent`](key_decoder::KeyEvent)s, and measuring/truncating ANSI
//! text. The non-blocking event queue itself lives in [`crate::core::tty`]
//! (an unbounded `tokio::sync::mpsc` channel carrying `SessionEvent`s from
//! the reader/decoder/signal threads into the engine loop) rather than as
//! a separate generic abstraction.

pub mod ansi;
pub mod key_decoder;
pub mod tty;
