//! Per-frame input signals.
//!
//! The host samples input once per frame and the scheduler publishes it
//! before any engine ticks. Engines hold a [`FrameSignals`] handle and read
//! it during their tick.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Input sampled by the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// The primary action (fire) is held.
    pub primary_action: bool,
    /// The game is paused.
    pub paused: bool,
}

impl FrameInput {
    /// Input with the primary action held.
    #[must_use]
    pub fn firing() -> Self {
        Self {
            primary_action: true,
            paused: false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Snapshot {
    frame: u64,
    delta: f32,
    input: FrameInput,
}

/// Read side of the current frame's input, shared by every engine.
#[derive(Debug, Clone, Default)]
pub struct FrameSignals {
    current: Rc<Cell<Snapshot>>,
}

impl FrameSignals {
    /// Create a new handle reading frame 0, zero delta and no input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the primary action is held this frame.
    #[must_use]
    pub fn primary_action(&self) -> bool {
        self.current.get().input.primary_action
    }

    /// Returns `true` if the game is paused this frame.
    #[must_use]
    pub fn paused(&self) -> bool {
        self.current.get().input.paused
    }

    /// The whole input sample.
    #[must_use]
    pub fn input(&self) -> FrameInput {
        self.current.get().input
    }

    /// Seconds elapsed since the previous frame.
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.current.get().delta
    }

    /// Current frame number; 0 before the first frame.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.current.get().frame
    }

    /// Replace the current sample. Called by the scheduler at frame start;
    /// exposed for tests that drive engines directly.
    pub fn publish(&self, frame: u64, delta: f32, input: FrameInput) {
        self.current.set(Snapshot {
            frame,
            delta,
            input,
        });
    }
}
