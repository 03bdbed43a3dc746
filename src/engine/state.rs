// Copyright (c) 2026 The Prompts Authors. Licensed under Apache License, Version 2.0.

//! The prompt lifecycle phases and the per-run state every component
//! kernel is driven through.

use crate::engine::render::FrameMetrics;

/// Where a running prompt is in its lifecycle.
///
/// ```text
/// initial ──first render──▶ active ──return & valid──▶ submit
///    │                        │──return & invalid──▶ error ──any other key──▶ active
///    │                        │──ctrl-c / esc / interrupt──▶ cancel
///    └───already-canceled, before start──────────────────────▶ cancel (immediate)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    Active,
    Error,
    Submit,
    Cancel,
}

impl Phase {
    /// `Submit` and `Cancel` end the event loop; every other phase keeps
    /// it running.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Submit | Phase::Cancel)
    }
}

/// Per-run state owned exclusively by the event loop. `C` is the
/// component kernel (line editor, select cursor, textarea buffer, ...);
/// everything here beyond `component` is the generic bookkeeping every
/// kernel shares.
pub struct PromptState<C> {
    pub phase: Phase,
    pub component: C,
    /// Set while `phase == Phase::Error`; cleared by any key that isn't
    /// `return` or a cancel trigger.
    pub error_message: Option<String>,
    pub(crate) frame: FrameMetrics,
}

impl<C> PromptState<C> {
    pub(crate) fn new(component: C) -> Self {
        Self { phase: Phase::Initial, component, error_message: None, frame: FrameMetrics::default() }
    }
}
