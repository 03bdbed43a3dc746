// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! Opt-in `tracing` setup.
//!
//! The engine and its components emit `tracing` events at `trace`/`debug`
//! for decode steps, render diffs, and swallowed I/O errors (see
//! [`crate::PromptError`] for what *is* surfaced). Nothing in this crate
//! calls [`init_tracing`] on its own — a host application decides whether
//! and where to subscribe, the same way the terminal libraries this crate
//! is modeled on leave `tracing_subscriber::registry().init()` to the
//! binary, not the library.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for [`init_tracing`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level filter, used when `RUST_LOG` is unset.
    pub default_level: LevelFilter,
    /// Write human-readable logs to stderr.
    pub display_to_stderr: bool,
    /// Optional rolling-file sink: `(directory, file_name_prefix)`.
    pub file_sink: Option<(String, String)>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: LevelFilter::INFO,
            display_to_stderr: true,
            file_sink: None,
        }
    }
}

/// Initialize a global `tracing` subscriber from `config`.
///
/// Returns a [`WorkerGuard`] when a file sink is configured; the caller must
/// keep it alive for the duration of the process, otherwise buffered log
/// lines are dropped on exit (the same contract `tracing-appender`'s
/// non-blocking writer always has).
pub fn init_tracing(config: LoggingConfig) -> miette::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);

    let mut guard = None;

    match config.file_sink {
        Some((dir, prefix)) => {
            let appender = tracing_appender::rolling::daily(dir, prefix);
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            let file_layer = fmt::layer().with_ansi(false).with_writer(non_blocking);
            if config.display_to_stderr {
                registry
                    .with(file_layer)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .try_init()
                    .map_err(|e| miette::miette!("failed to init tracing: {e}"))?;
            } else {
                registry
                    .with(file_layer)
                    .try_init()
                    .map_err(|e| miette::miette!("failed to init tracing: {e}"))?;
            }
        }
        None => {
            if config.display_to_stderr {
                registry
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .try_init()
                    .map_err(|e| miette::miette!("failed to init tracing: {e}"))?;
            }
        }
    }

    Ok(guard)
}
