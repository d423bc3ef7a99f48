//! Ghost playback state machine
//!
//! GhostPlayback owns a copy of one recorded lap and walks a cursor through
//! it, one sample per simulation tick. Each tick splits into two phases,
//! matching the force/integrate split of the car physics:
//!
//! - compute_forces runs before integration. It writes the sample under the
//!   cursor into the car's CarForces, refreshes opacity from the fade curve,
//!   and reports the one-shot started/fading-out edges.
//! - advance runs after integration. It steps the cursor and reports the
//!   one-shot ended edge when the final sample has been consumed.
//!
//! The component never touches the event bus itself. Systems forward the
//! returned edges, which keeps the state machine testable as plain data.

use bevy::prelude::*;

use crate::car::CarForces;
use crate::constants::FADE_TICKS;
use crate::ghost::fade::{fade_alpha, in_fade_out_window};
use crate::ghost::recording::RecordedLap;

/// One-shot edges reported by a playback tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickEdges {
    /// First forces tick after a start
    pub started: bool,
    /// Cursor entered the trailing fade-out window
    pub fading_out: bool,
}

/// Replay playback state for one ghost car
#[derive(Component, Debug, Clone)]
pub struct GhostPlayback {
    /// Private copy of the assigned lap, immune to later mutation or reuse
    /// of the caller's buffer
    lap: RecordedLap,
    /// Whether a usable lap is assigned
    has_replay: bool,
    /// Whether playback is running
    started: bool,
    /// Next sample to play. Clamps at lap.len() once the replay ends.
    cursor: usize,
    /// One-shot latches for the lifecycle edges
    started_fired: bool,
    fade_out_fired: bool,
    /// Plateau opacity for the fade curve
    base_alpha: f32,
    /// Opacity computed on the last forces tick
    opacity: f32,
}

impl GhostPlayback {
    pub fn new(base_alpha: f32) -> Self {
        Self {
            lap: RecordedLap::default(),
            has_replay: false,
            started: false,
            cursor: 0,
            started_fired: false,
            fade_out_fired: false,
            base_alpha: base_alpha.clamp(0.0, 1.0),
            opacity: 0.0,
        }
    }

    /// Assign a lap to play back, stopping any playback in progress.
    ///
    /// The lap is copied. None, empty, or invalidated laps clear the slot
    /// instead, leaving the ghost parked and invisible. Returns whether a
    /// usable lap is now assigned.
    pub fn assign(&mut self, lap: Option<&RecordedLap>) -> bool {
        self.stop();
        self.cursor = 0;
        self.started_fired = false;
        self.fade_out_fired = false;
        self.opacity = 0.0;

        match lap {
            Some(lap) if !lap.is_empty() && lap.is_valid() => {
                self.lap = lap.clone();
                self.has_replay = true;
            }
            _ => {
                self.lap = RecordedLap::default();
                self.has_replay = false;
            }
        }
        self.has_replay
    }

    /// Begin playback from the first sample. No-op while already playing,
    /// so a running replay cannot be restarted by accident. Starting with
    /// no lap assigned arms the state machine but plays nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.cursor = 0;
        self.started_fired = false;
        self.fade_out_fired = false;
        self.opacity = 0.0;
        self.started = true;
    }

    /// Halt playback and hide the ghost. No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.opacity = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.started
    }

    pub fn has_replay(&self) -> bool {
        self.has_replay
    }

    /// Cursor position, in [0, sample_count]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True once the cursor has consumed every sample of the assigned lap
    pub fn is_exhausted(&self) -> bool {
        self.has_replay && self.cursor >= self.lap.len()
    }

    pub fn lap(&self) -> &RecordedLap {
        &self.lap
    }

    /// Start pose of the assigned lap, if one is assigned
    pub fn start_pose(&self) -> Option<(Vec2, f32)> {
        self.has_replay.then(|| self.lap.start_pose())
    }

    /// Current sprite opacity, zero whenever the ghost is not playing
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn base_alpha(&self) -> f32 {
        self.base_alpha
    }

    /// Set the plateau opacity. Takes effect on the next forces tick.
    pub fn set_base_alpha(&mut self, alpha: f32) {
        self.base_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Pre-integration phase: write this tick's force sample and refresh
    /// opacity. Forces are always written, neutral when idle, so a parked
    /// ghost stays parked without help from other systems.
    pub fn compute_forces(&mut self, forces: &mut CarForces) -> TickEdges {
        forces.reset();
        let mut edges = TickEdges::default();

        if !self.started || !self.has_replay {
            self.opacity = 0.0;
            return edges;
        }

        if !self.started_fired {
            self.started_fired = true;
            edges.started = true;
        }

        forces.set(&self.lap.sample_at(self.cursor));
        self.opacity = fade_alpha(self.cursor, self.lap.len(), FADE_TICKS, self.base_alpha);

        if !self.fade_out_fired && in_fade_out_window(self.cursor, self.lap.len(), FADE_TICKS) {
            self.fade_out_fired = true;
            edges.fading_out = true;
        }

        edges
    }

    /// Post-integration phase: step the cursor. Returns true exactly once,
    /// on the tick the cursor reaches the end of the lap. The cursor stays
    /// clamped there until a restart or reassignment.
    pub fn advance(&mut self) -> bool {
        if !self.started || !self.has_replay {
            return false;
        }
        if self.cursor < self.lap.len() {
            self.cursor += 1;
            return self.cursor == self.lap.len();
        }
        false
    }
}
