//! Ghost replay module - recorded laps, playback state machine, fade curve,
//! and the systems that drive ghost cars through the physics chain

mod fade;
mod playback;
mod recording;
mod systems;

pub use fade::{fade_alpha, in_fade_out_window};
pub use playback::{GhostPlayback, TickEdges};
pub use recording::{RecordedLap, load_lap, parse_lap};
pub use systems::{
    GhostCar, assign_ghost_lap, ghost_after_step, ghost_apply_opacity, ghost_compute_forces,
    place_at_replay_start, spawn_ghost_car, start_ghost, stop_ghost,
};
