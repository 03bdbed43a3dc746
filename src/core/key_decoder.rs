// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! Byte-stream to [`KeyEvent`] decoding: control bytes, CSI arrow/function
//! keys, xterm `modifyOtherKeys` (`ESC[27;mod;keycode~`), Kitty keyboard
//! protocol (`ESC[keycode;modifier u`), and bracketed paste
//! (`ESC[200~ … ESC[201~`).
//!
//! The decoder itself is a pure state machine: it consumes one `char` at a
//! time via [`KeyDecoder::feed`] and never blocks or sleeps. The ESC
//! lead-in ambiguity — a lone `Escape` keypress looks identical to the
//! first byte of a CSI sequence until the *next* byte arrives — is
//! resolved by the caller (`crate::core::tty`), which reads with a short
//! poll timeout and calls [`KeyDecoder::timeout`] when nothing further
//! showed up within [`KeyDecoder::lookahead_window`].

use std::time::{Duration, Instant};

/// How long the reader should wait for a byte after ESC before concluding
/// it was a lone `Escape` rather than a CSI/SS3 lead-in.
const ESC_LOOKAHEAD_WINDOW: Duration = Duration::from_millis(10);

/// Terminals sometimes flush a stale ESC byte on attach. A lone ESC that
/// times out within this window of decoder construction is swallowed
/// rather than reported.
const INITIAL_ESC_SUPPRESS_WINDOW: Duration = Duration::from_millis(100);

/// Bracketed paste accumulation cap. Past this many bytes, further input
/// bytes are dropped but the terminator is still scanned for.
const PASTE_CAP_BYTES: usize = 10 * 1024 * 1024;

const PASTE_TERMINATOR: [char; 6] = ['\u{1b}', '[', '2', '0', '1', '~'];

/// The semantic identity of a key, independent of its modifier bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyName {
    /// A printable character, already lowercase-folded by the caller if it
    /// wants case-insensitive dispatch; the decoder passes through whatever
    /// byte it read.
    Char(char),
    Return,
    Escape,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// A single decoded keypress, with the modifier bits the source sequence
/// carried (or `false` when the terminal didn't report any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub name: KeyName,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl KeyEvent {
    fn simple(name: KeyName) -> Self {
        Self { name, shift: false, alt: false, ctrl: false }
    }

    fn ret(shift: bool) -> Self {
        Self { name: KeyName::Return, shift, alt: false, ctrl: false }
    }

    fn escape() -> Self {
        Self::simple(KeyName::Escape)
    }
}

/// What [`KeyDecoder::feed`] or [`KeyDecoder::timeout`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    Key(KeyEvent),
    /// A complete bracketed-paste payload, with the `ESC[200~`/`ESC[201~`
    /// wrapper already stripped.
    Paste(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Ground,
    Escape,
    Csi,
    Osc,
    Paste,
}

/// Stateful rune-stream decoder. One instance per TTY session; feed it
/// every byte the reader thread reads, in order.
pub struct KeyDecoder {
    mode: Mode,
    csi_params: String,
    osc_esc_pending: bool,
    paste_buf: String,
    paste_term_progress: usize,
    escape_seen_at: Option<Instant>,
    session_start: Instant,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self {
            mode: Mode::Ground,
            csi_params: String::new(),
            osc_esc_pending: false,
            paste_buf: String::new(),
            paste_term_progress: 0,
            escape_seen_at: None,
            session_start: Instant::now(),
        }
    }

    /// The window a reader should wait for a follow-up byte after seeing a
    /// lone ESC before calling [`KeyDecoder::timeout`].
    pub fn lookahead_window() -> Duration {
        ESC_LOOKAHEAD_WINDOW
    }

    /// Whether the decoder is currently holding a lone ESC pending the
    /// lookahead window, i.e. whether a reader should apply a timeout to
    /// its next read instead of blocking indefinitely.
    pub fn is_escape_pending(&self) -> bool {
        self.mode == Mode::Escape
    }

    /// Feed one decoded character into the state machine. Usually produces
    /// zero or one event; an ESC that turns out not to be a lead-in
    /// produces two (the lone `Escape`, then whatever `c` decodes to on
    /// its own).
    pub fn feed(&mut self, c: char) -> Vec<DecodedEvent> {
        let entry_mode = self.mode;
        let events = match self.mode {
            Mode::Ground => self.feed_ground(c),
            Mode::Escape => self.feed_escape(c),
            Mode::Csi => self.feed_csi(c),
            Mode::Osc => self.feed_osc(c),
            Mode::Paste => self.feed_paste(c),
        };
        if self.mode != entry_mode {
            tracing::trace!(from = ?entry_mode, to = ?self.mode, "key decoder: mode transition");
        }
        events
    }

    /// Call when the reader's lookahead window elapsed with no further
    /// byte available. Only has an effect while a lone ESC is pending.
    pub fn timeout(&mut self) -> Option<DecodedEvent> {
        if self.mode != Mode::Escape {
            return None;
        }
        self.mode = Mode::Ground;
        let seen_at = self.escape_seen_at.take().unwrap_or_else(Instant::now);
        if seen_at.duration_since(self.session_start) < INITIAL_ESC_SUPPRESS_WINDOW {
            tracing::trace!("key decoder: lone ESC timeout suppressed (initial window)");
            return None;
        }
        tracing::trace!("key decoder: lone ESC timeout, emitting Escape key");
        Some(DecodedEvent::Key(KeyEvent::escape()))
    }

    fn feed_ground(&mut self, c: char) -> Vec<DecodedEvent> {
        match c {
            '\u{03}' => vec![DecodedEvent::Key(KeyEvent {
                name: KeyName::Char('c'),
                shift: false,
                alt: false,
                ctrl: true,
            })],
            '\r' => vec![DecodedEvent::Key(KeyEvent::ret(false))],
            '\n' => vec![DecodedEvent::Key(KeyEvent::ret(true))],
            '\u{08}' | '\u{7f}' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Backspace))],
            '\t' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Tab))],
            '\u{1b}' => {
                self.mode = Mode::Escape;
                self.escape_seen_at = Some(Instant::now());
                vec![]
            }
            c if (' '..='~').contains(&c) => {
                vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Char(c)))]
            }
            _ => vec![],
        }
    }

    fn feed_escape(&mut self, c: char) -> Vec<DecodedEvent> {
        self.mode = Mode::Ground;
        self.escape_seen_at = None;
        match c {
            '[' => {
                self.mode = Mode::Csi;
                self.csi_params.clear();
                vec![]
            }
            ']' => {
                self.mode = Mode::Osc;
                self.osc_esc_pending = false;
                vec![]
            }
            '\r' | '\n' => vec![DecodedEvent::Key(KeyEvent::ret(true))],
            _ => {
                let mut events = vec![DecodedEvent::Key(KeyEvent::escape())];
                events.extend(self.feed_ground(c));
                events
            }
        }
    }

    fn feed_csi(&mut self, c: char) -> Vec<DecodedEvent> {
        if c.is_ascii_digit() || c == ';' || c == ':' {
            self.csi_params.push(c);
            return vec![];
        }
        self.mode = Mode::Ground;
        let params = std::mem::take(&mut self.csi_params);
        self.decode_csi_final(&params, c)
    }

    fn decode_csi_final(&mut self, params: &str, final_byte: char) -> Vec<DecodedEvent> {
        match final_byte {
            'A' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Up))],
            'B' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Down))],
            'C' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Right))],
            'D' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Left))],
            'H' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Home))],
            'F' => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::End))],
            '~' => self.decode_csi_tilde(params),
            'u' => vec![DecodedEvent::Key(Self::decode_modified_from_kitty(params))],
            _ => vec![],
        }
    }

    fn decode_csi_tilde(&mut self, params: &str) -> Vec<DecodedEvent> {
        let nums = parse_params(params);
        match nums.as_slice() {
            [1] | [7] => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Home))],
            [4] | [8] => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::End))],
            [3] => vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Delete))],
            [200] => {
                self.mode = Mode::Paste;
                self.paste_buf.clear();
                self.paste_term_progress = 0;
                vec![]
            }
            [27, modifier, keycode, ..] => {
                vec![DecodedEvent::Key(Self::decode_modified(*keycode, *modifier))]
            }
            _ => vec![],
        }
    }

    fn decode_modified_from_kitty(params: &str) -> KeyEvent {
        let nums = parse_params(params);
        match nums.as_slice() {
            [keycode] => Self::decode_modified(*keycode, 1),
            [keycode, modifier, ..] => Self::decode_modified(*keycode, *modifier),
            _ => KeyEvent::escape(),
        }
    }

    /// `modifier - 1` is a bitmask: bit 0 shift, bit 1 alt, bit 2 ctrl.
    /// Shared by the xterm `modifyOtherKeys` and Kitty encodings.
    fn decode_modified(keycode: i64, modifier: i64) -> KeyEvent {
        let bits = (modifier - 1).max(0);
        let shift = bits & 0b001 != 0;
        let alt = bits & 0b010 != 0;
        let ctrl = bits & 0b100 != 0;
        if keycode == 13 {
            KeyEvent { name: KeyName::Return, shift, alt, ctrl }
        } else if (32..=126).contains(&keycode) {
            KeyEvent { name: KeyName::Char(keycode as u8 as char), shift, alt, ctrl }
        } else {
            KeyEvent { name: KeyName::Escape, shift, alt, ctrl }
        }
    }

    fn feed_osc(&mut self, c: char) -> Vec<DecodedEvent> {
        if self.osc_esc_pending {
            self.osc_esc_pending = false;
            if c == '\\' {
                self.mode = Mode::Ground;
            }
            return vec![];
        }
        if c == '\u{07}' {
            self.mode = Mode::Ground;
            return vec![];
        }
        if c == '\u{1b}' {
            self.osc_esc_pending = true;
        }
        vec![]
    }

    fn feed_paste(&mut self, c: char) -> Vec<DecodedEvent> {
        let expected = PASTE_TERMINATOR[self.paste_term_progress];
        if c == expected {
            self.paste_term_progress += 1;
            if self.paste_term_progress == PASTE_TERMINATOR.len() {
                self.paste_term_progress = 0;
                self.mode = Mode::Ground;
                let content = std::mem::take(&mut self.paste_buf);
                return vec![DecodedEvent::Paste(content)];
            }
            return vec![];
        }

        if self.paste_term_progress > 0 {
            for held in PASTE_TERMINATOR[..self.paste_term_progress].to_vec() {
                self.push_paste_char(held);
            }
            self.paste_term_progress = 0;
        }

        if c == PASTE_TERMINATOR[0] {
            self.paste_term_progress = 1;
        } else {
            self.push_paste_char(c);
        }
        vec![]
    }

    fn push_paste_char(&mut self, c: char) {
        if self.paste_buf.len() + c.len_utf8() <= PASTE_CAP_BYTES {
            self.paste_buf.push(c);
        }
    }
}

fn parse_params(params: &str) -> Vec<i64> {
    params
        .split(|c| c == ';' || c == ':')
        .filter_map(|p| p.parse::<i64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn feed_all(decoder: &mut KeyDecoder, s: &str) -> Vec<DecodedEvent> {
        s.chars().flat_map(|c| decoder.feed(c)).collect()
    }

    #[test_case("a", KeyName::Char('a') ; "lowercase letter")]
    #[test_case(" ", KeyName::Char(' ') ; "space")]
    #[test_case("\t", KeyName::Tab ; "tab")]
    fn ground_control_and_printable(input: &str, expected: KeyName) {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, input);
        assert_eq!(events, vec![DecodedEvent::Key(KeyEvent::simple(expected))]);
    }

    #[test]
    fn ctrl_c_reports_char_c_with_ctrl() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\u{03}");
        assert_eq!(
            events,
            vec![DecodedEvent::Key(KeyEvent { name: KeyName::Char('c'), shift: false, alt: false, ctrl: true })]
        );
    }

    #[test]
    fn backspace_and_delete_both_map_to_backspace_key() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(feed_all(&mut decoder, "\u{08}"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Backspace))]);
        assert_eq!(feed_all(&mut decoder, "\u{7f}"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Backspace))]);
    }

    #[test]
    fn arrow_keys() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(feed_all(&mut decoder, "\x1b[A"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Up))]);
        assert_eq!(feed_all(&mut decoder, "\x1b[B"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Down))]);
        assert_eq!(feed_all(&mut decoder, "\x1b[C"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Right))]);
        assert_eq!(feed_all(&mut decoder, "\x1b[D"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Left))]);
    }

    #[test]
    fn vt220_home_end_delete() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(feed_all(&mut decoder, "\x1b[1~"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Home))]);
        assert_eq!(feed_all(&mut decoder, "\x1b[4~"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::End))]);
        assert_eq!(feed_all(&mut decoder, "\x1b[3~"), vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Delete))]);
    }

    #[test]
    fn xterm_modify_other_keys_shift_return() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\x1b[27;2;13~");
        assert_eq!(events, vec![DecodedEvent::Key(KeyEvent::ret(true))]);
    }

    #[test]
    fn kitty_unmodified_and_modified_return() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(feed_all(&mut decoder, "\x1b[13u"), vec![DecodedEvent::Key(KeyEvent::ret(false))]);

        let mut decoder = KeyDecoder::new();
        assert_eq!(feed_all(&mut decoder, "\x1b[13;2u"), vec![DecodedEvent::Key(KeyEvent::ret(true))]);
    }

    #[test]
    fn bracketed_paste_round_trip() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\x1b[200~hi\x1b[201~");
        assert_eq!(events, vec![DecodedEvent::Paste("hi".to_string())]);
    }

    #[test]
    fn bracketed_paste_with_embedded_newline() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\x1b[200~a\nb\x1b[201~");
        assert_eq!(events, vec![DecodedEvent::Paste("a\nb".to_string())]);
    }

    #[test]
    fn lone_escape_after_suppression_window_elapses() {
        let mut decoder = KeyDecoder::new();
        decoder.session_start -= Duration::from_millis(200);
        feed_all(&mut decoder, "\u{1b}");
        assert_eq!(decoder.timeout(), Some(DecodedEvent::Key(KeyEvent::escape())));
    }

    #[test]
    fn initial_escape_within_window_is_suppressed() {
        let mut decoder = KeyDecoder::new();
        feed_all(&mut decoder, "\u{1b}");
        assert_eq!(decoder.timeout(), None);
    }

    #[test]
    fn escape_followed_by_non_leadin_emits_both() {
        let mut decoder = KeyDecoder::new();
        decoder.session_start -= Duration::from_millis(200);
        let events = feed_all(&mut decoder, "\u{1b}a");
        assert_eq!(
            events,
            vec![
                DecodedEvent::Key(KeyEvent::escape()),
                DecodedEvent::Key(KeyEvent::simple(KeyName::Char('a'))),
            ]
        );
    }

    #[test]
    fn osc_sequence_terminated_by_bel_is_ignored() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\x1b]0;title\u{07}a");
        assert_eq!(events, vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Char('a')))]);
    }

    #[test]
    fn osc_sequence_terminated_by_st_is_ignored() {
        let mut decoder = KeyDecoder::new();
        let events = feed_all(&mut decoder, "\x1b]0;title\x1b\\a");
        assert_eq!(events, vec![DecodedEvent::Key(KeyEvent::simple(KeyName::Char('a')))]);
    }
}
