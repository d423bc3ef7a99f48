//! Event type definitions for the event bus

use serde::{Deserialize, Serialize};

/// Ghost slot identifier. A session can run several ghost cars at once,
/// each bound to its own replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GhostId(pub u8);

impl std::fmt::Display for GhostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// All game events that flow through the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    // === Ghost Lifecycle Events ===
    /// A ghost began playing its replay (first forces tick after start)
    ReplayStarted { ghost: GhostId },
    /// A ghost entered the trailing fade-out window of its replay
    ReplayFadingOut { ghost: GhostId },
    /// A ghost consumed the last sample of its replay
    ReplayEnded { ghost: GhostId },

    // === Lap Events ===
    /// The player car crossed the finish line
    LapCompleted { laps: u32 },
}

impl GameEvent {
    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::ReplayStarted { .. } => "RS",
            GameEvent::ReplayFadingOut { .. } => "RF",
            GameEvent::ReplayEnded { .. } => "RE",
            GameEvent::LapCompleted { .. } => "LC",
        }
    }
}
