// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The terminal boundary: raw-mode toggle, a blocking byte source, a width
//! query, and process-signal handling, all behind a process-wide singleton
//! so a second prompt started while one is already running never steals
//! keypresses from the first.
//!
//! Raw mode and cursor/size queries go through `crossterm`; byte-by-byte
//! decoding is this crate's own [`KeyDecoder`], not crossterm's event
//! reader — crossterm's event types don't carry the xterm
//! `modifyOtherKeys` / Kitty modifier encodings this crate needs. The
//! first [`TtyAdapter::open`] call also requests `modifyOtherKeys` level 2
//! reporting (`ESC[>4;2m`); the session that brings `raw_mode_refs` back
//! to zero resets it (`ESC[>4m`) before leaving raw mode.

use crate::core::key_decoder::{DecodedEvent, KeyDecoder, KeyEvent};
use crate::error::PromptError;
use crossterm::terminal;
use crossterm::tty::IsTty;
use signal_hook::consts::{SIGINT, SIGTERM, SIGWINCH};
use signal_hook::iterator::Signals;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use tokio::sync::mpsc as tokio_mpsc;

const DEFAULT_WIDTH: u16 = 80;
const SHARED_CHANNEL_CAPACITY: usize = 10;

/// An event delivered to the owner of an open [`Session`].
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Key(KeyEvent),
    Paste(String),
    Resize(u16),
    /// `Ctrl+C` at the OS signal level (`SIGINT`), distinct from the
    /// in-band `KeyEvent{name: Char('c'), ctrl: true}` the decoder also
    /// reports — callers typically treat both as a cancel trigger.
    Interrupt,
}

struct SharedState {
    raw_mode_refs: usize,
    current_id: Option<u64>,
    current_tx: Option<tokio_mpsc::UnboundedSender<SessionEvent>>,
    width: Arc<AtomicU16>,
}

static SHARED: OnceLock<Mutex<SharedState>> = OnceLock::new();
static READER_STARTED: OnceLock<()> = OnceLock::new();
static SIGNALS_STARTED: OnceLock<()> = OnceLock::new();
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn shared() -> &'static Mutex<SharedState> {
    SHARED.get_or_init(|| {
        Mutex::new(SharedState {
            raw_mode_refs: 0,
            current_id: None,
            current_tx: None,
            width: Arc::new(AtomicU16::new(width_from_query(terminal::size()))),
        })
    })
}

/// Pulled out of [`TtyAdapter::open`] so the 80-column fallback is testable
/// without a real terminal.
fn width_from_query(result: Result<(u16, u16), std::io::Error>) -> u16 {
    match result {
        Ok((cols, _)) if cols > 0 => cols,
        _ => DEFAULT_WIDTH,
    }
}

fn query_width() -> u16 {
    width_from_query(terminal::size())
}

/// Entry point for opening an interactive session or a non-interactive
/// output-only writer.
pub struct TtyAdapter;

impl TtyAdapter {
    /// Open an interactive session: enables raw mode (first caller only),
    /// starts the shared reader/decoder thread and signal handlers (first
    /// call only), and registers this session as the current consumer of
    /// decoded events — displacing whatever session was previously
    /// current.
    pub fn open() -> Result<Session, PromptError> {
        if !std::io::stdin().is_tty() {
            return Err(PromptError::TerminalUnavailable);
        }

        ensure_reader_thread();
        ensure_signal_handlers();

        let (tx, rx) = tokio_mpsc::unbounded_channel();
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed) + 1;

        let width = {
            let mut state = shared().lock().expect("tty shared state poisoned");
            if state.raw_mode_refs == 0 {
                terminal::enable_raw_mode().map_err(|_| PromptError::TerminalUnavailable)?;
                let mut out = std::io::stdout();
                let _ = out.write_all(crate::core::ansi::sgr::MODIFY_OTHER_KEYS_ENABLE.as_bytes());
                let _ = out.flush();
            }
            state.raw_mode_refs += 1;
            state.current_id = Some(id);
            state.current_tx = Some(tx);
            state.width.store(query_width(), Ordering::Relaxed);
            Arc::clone(&state.width)
        };

        Ok(Session { rx, width, id })
    }

    /// A writer-only handle for non-interactive helpers (intro/outro/
    /// message/spinner-without-input). Never toggles raw mode, never
    /// starts the reader thread.
    pub fn output_only() -> OutputOnly {
        OutputOnly
    }
}

/// An open interactive terminal session. Dropping it releases its claim on
/// raw mode (disabling it once the last session closes) and, if it was
/// still the registered consumer, stops decoded events from being
/// delivered anywhere until the next [`TtyAdapter::open`].
pub struct Session {
    rx: tokio_mpsc::UnboundedReceiver<SessionEvent>,
    width: Arc<AtomicU16>,
    id: u64,
}

impl Session {
    /// Await the next decoded event. Returns `None` once the shared reader
    /// thread has hit EOF on the input stream and this is the last event.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Current terminal width in columns, refreshed on `Resize` events and
    /// at session open. Defaults to 80 when the query fails.
    pub fn width(&self) -> u16 {
        self.width.load(Ordering::Relaxed).max(1)
    }

    /// Write raw bytes (typically ANSI-laden text) to the terminal.
    pub fn write(&self, text: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout();
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let mut state = shared().lock().expect("tty shared state poisoned");
        if state.current_id == Some(self.id) {
            state.current_id = None;
            state.current_tx = None;
        }
        state.raw_mode_refs = state.raw_mode_refs.saturating_sub(1);
        if state.raw_mode_refs == 0 {
            let mut out = std::io::stdout();
            let _ = out.write_all(crate::core::ansi::sgr::MODIFY_OTHER_KEYS_DISABLE.as_bytes());
            let _ = out.flush();
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// A writer that never touches raw mode. See [`TtyAdapter::output_only`].
pub struct OutputOnly;

impl OutputOnly {
    pub fn write(&self, text: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    pub fn width(&self) -> u16 {
        query_width()
    }
}

fn ensure_reader_thread() {
    READER_STARTED.get_or_init(|| {
        let (byte_tx, byte_rx) = sync_channel::<char>(SHARED_CHANNEL_CAPACITY);
        thread::Builder::new()
            .name("prompts-tty-reader".into())
            .spawn(move || reader_loop(byte_tx))
            .expect("failed to spawn tty reader thread");
        thread::Builder::new()
            .name("prompts-tty-decoder".into())
            .spawn(move || decode_loop(byte_rx))
            .expect("failed to spawn tty decoder thread");
    });
}

/// Blocking byte source: reads one UTF-8 char at a time from stdin and
/// forwards it on a small bounded channel. This is the only thread that
/// ever reads the raw file descriptor.
fn reader_loop(tx: SyncSender<char>) {
    let mut stdin = std::io::stdin();
    loop {
        match read_char(&mut stdin) {
            Ok(Some(c)) => {
                if tx.send(c).is_err() {
                    tracing::trace!("tty reader: decoder channel closed, stopping");
                    return;
                }
            }
            Ok(None) => {
                tracing::debug!("tty reader: stdin hit EOF");
                return;
            }
            Err(error) => {
                tracing::debug!(%error, "tty reader: swallowed I/O error, stopping");
                return;
            }
        }
    }
}

fn read_char(reader: &mut impl Read) -> std::io::Result<Option<char>> {
    let mut buf = [0u8; 4];
    let mut len = 0usize;
    loop {
        let mut byte = [0u8; 1];
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => {
                buf[len] = byte[0];
                len += 1;
                match std::str::from_utf8(&buf[..len]) {
                    Ok(s) => return Ok(s.chars().next()),
                    Err(e) if e.error_len().is_none() && len < 4 => continue,
                    Err(_) => return Ok(Some(char::REPLACEMENT_CHARACTER)),
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Runs the [`KeyDecoder`] state machine and forwards whatever it produces
/// to the currently registered session, if any. Applies the ESC lookahead
/// timeout by switching to a bounded `recv_timeout` only while a lone ESC
/// is pending.
fn decode_loop(rx: std::sync::mpsc::Receiver<char>) {
    let mut decoder = KeyDecoder::new();
    loop {
        let received = if decoder.is_escape_pending() {
            match rx.recv_timeout(KeyDecoder::lookahead_window()) {
                Ok(c) => Some(c),
                Err(RecvTimeoutError::Timeout) => {
                    if let Some(event) = decoder.timeout() {
                        dispatch(event);
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => return,
            }
        } else {
            match rx.recv() {
                Ok(c) => Some(c),
                Err(_) => return,
            }
        };

        if let Some(c) = received {
            for event in decoder.feed(c) {
                dispatch(event);
            }
        }
    }
}

fn dispatch(event: DecodedEvent) {
    let state = shared().lock().expect("tty shared state poisoned");
    let Some(tx) = state.current_tx.as_ref() else {
        tracing::trace!(?event, "decoded event with no active session, dropping");
        return;
    };
    let mapped = match event {
        DecodedEvent::Key(key) => {
            tracing::trace!(?key, "decoded key event");
            SessionEvent::Key(key)
        }
        DecodedEvent::Paste(content) => {
            tracing::debug!(len = content.len(), "decoded bracketed paste");
            SessionEvent::Paste(content)
        }
    };
    if tx.send(mapped).is_err() {
        tracing::trace!("dispatch: session channel closed");
    }
}

fn ensure_signal_handlers() {
    SIGNALS_STARTED.get_or_init(|| {
        let mut signals =
            Signals::new([SIGWINCH, SIGINT, SIGTERM]).expect("failed to register signal handlers");
        thread::Builder::new()
            .name("prompts-tty-signals".into())
            .spawn(move || {
                for signal in signals.forever() {
                    handle_signal(signal);
                }
            })
            .expect("failed to spawn tty signal thread");
    });
}

static RESTORED: AtomicBool = AtomicBool::new(false);

fn handle_signal(signal: i32) {
    match signal {
        SIGWINCH => {
            let cols = query_width();
            let state = shared().lock().expect("tty shared state poisoned");
            state.width.store(cols, Ordering::Relaxed);
            if let Some(tx) = state.current_tx.as_ref() {
                let _ = tx.send(SessionEvent::Resize(cols));
            }
        }
        SIGINT => {
            // Raw mode clears ISIG, so a Ctrl+C keypress normally arrives as
            // the decoder's in-band ETX byte (mapped to a cancel trigger),
            // not this signal. This handler exists for the terminals/paths
            // where an OS-level SIGINT reaches the process anyway: if a
            // prompt is active, hand it off as a graceful cancel; if
            // nothing is listening, there is no engine loop left to restore
            // the terminal on exit, so do it here before re-raising.
            let state = shared().lock().expect("tty shared state poisoned");
            if let Some(tx) = state.current_tx.as_ref() {
                let _ = tx.send(SessionEvent::Interrupt);
            } else {
                drop(state);
                restore_terminal_once();
                signal_hook::low_level::emulate_default_handler(signal).ok();
            }
        }
        SIGTERM => {
            restore_terminal_once();
            signal_hook::low_level::emulate_default_handler(signal).ok();
        }
        _ => {}
    }
}

/// Restore cooking mode and show the cursor exactly once, regardless of
/// which exit path triggers it. Called from the `SIGTERM` handler; normal
/// returns restore terminal state through [`Session`]'s `Drop` instead.
fn restore_terminal_once() {
    if RESTORED.swap(true, Ordering::SeqCst) {
        return;
    }
    let _ = terminal::disable_raw_mode();
    let mut out = std::io::stdout();
    let _ = out.write_all(crate::core::ansi::sgr::SHOW_CURSOR.as_bytes());
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn width_falls_back_to_80_when_query_fails() {
        let err = std::io::Error::other("no tty");
        assert_eq!(width_from_query(Err(err)), DEFAULT_WIDTH);
    }

    #[test]
    fn width_falls_back_to_80_when_query_reports_zero() {
        assert_eq!(width_from_query(Ok((0, 24))), DEFAULT_WIDTH);
    }

    #[test]
    fn width_passes_through_real_query() {
        assert_eq!(width_from_query(Ok((120, 40))), 120);
    }

    #[test]
    fn read_char_decodes_multi_byte_utf8() {
        let bytes = "\u{4e2d}".as_bytes().to_vec();
        let mut cursor = std::io::Cursor::new(bytes);
        assert_eq!(read_char(&mut cursor).unwrap(), Some('\u{4e2d}'));
    }

    #[test]
    fn read_char_returns_none_at_eof() {
        let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
        assert_eq!(read_char(&mut cursor).unwrap(), None);
    }
}
