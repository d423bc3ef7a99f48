//! Hotlap - a top-down time-trial racer with ghost car replays, built with Bevy
//!
//! This crate provides all game components, resources, and systems organized into modules.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod settings;
pub mod simulation;
pub mod tuning;

// Game logic modules
pub mod car;
pub mod ghost;
pub mod input;
pub mod track;
pub mod ui;

// Re-export commonly used types for convenience
pub use car::{
    AngularVelocity, Car, CarForces, ControlSource, Heading, PlayerCar, Velocity,
    apply_car_velocity, car_track_collisions, idle_car_forces, integrate_car_forces,
    live_drive_forces, place_car,
};
pub use constants::*;
pub use events::{BusEvent, EventBus, GameEvent, GhostId, update_event_bus_time};
pub use ghost::{
    GhostCar, GhostPlayback, RecordedLap, TickEdges, assign_ghost_lap, fade_alpha,
    ghost_after_step, ghost_apply_opacity, ghost_compute_forces, in_fade_out_window, load_lap,
    parse_lap, place_at_replay_start, spawn_ghost_car, start_ghost, stop_ghost,
};
pub use helpers::*;
pub use input::{DriverInput, capture_input};
pub use settings::{CurrentSettings, InitSettings, SETTINGS_FILE, save_settings_system};
pub use simulation::{HeadlessAppBuilder, step_ticks};
pub use track::{
    LapProgress, Track, TrackDatabase, TrackDef, advance_progress, spawn_track,
    update_lap_progress,
};
pub use tuning::{
    CarTuning, HANDLING_TUNING_FILE, HandlingTuning, apply_global_tuning,
    load_global_tuning_system, load_handling_tuning_from_file,
};
pub use ui::{
    HudFlash, HudStatusText, drain_ghost_events, spawn_hud, update_hud_flash, update_hud_status,
};
