// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! Timed renderers: [`spinner::Spinner`], [`progress::Progress`], and
//! [`stream::Stream`]. Unlike `crate::components`, none of these ride on
//! the [`crate::engine::prompt::PromptEngine`] event loop — they own a
//! background ticker (or, for `Stream`, simply append on demand) and write
//! directly through [`crate::core::tty::TtyAdapter::output_only`], the
//! same non-interactive writer helpers that never read input use.
//!
//! This is a usage contract rather than a lock this crate enforces: a
//! timed renderer and an interactive prompt must not write to stdout at
//! the same time.

pub mod progress;
pub mod spinner;
pub mod stream;
