//! Headless App Builder
//!
//! Provides a reusable builder for creating headless Bevy apps.
//! Used by the replay runner and the system tests.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use std::time::Duration;

use crate::events::EventBus;
use crate::input::DriverInput;
use crate::track::{Track, TrackDef};
use crate::tuning::CarTuning;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    track: Option<TrackDef>,
    fps: f32,
}

impl HeadlessAppBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            track: None,
            fps: 60.0,
        }
    }

    /// Set the track to simulate on (default: first built-in track)
    pub fn with_track(mut self, track: TrackDef) -> Self {
        self.track = Some(track);
        self
    }

    /// Set the target FPS (default: 60)
    pub fn with_fps(mut self, fps: f32) -> Self {
        self.fps = fps;
        self
    }

    /// Build the app with minimal plugins and common resources
    ///
    /// The returned app has:
    /// - MinimalPlugins with ScheduleRunnerPlugin
    /// - TransformPlugin
    /// - A fixed 60 Hz timestep
    /// - Track, EventBus, DriverInput, and CarTuning resources
    ///
    /// Callers should add:
    /// - Startup/Update/FixedUpdate systems
    /// - Any additional resources
    pub fn build(self) -> App {
        let mut app = App::new();

        app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f32(1.0 / self.fps),
        )));

        // Transform plugin for GlobalTransform propagation
        app.add_plugins(bevy::transform::TransformPlugin);

        // Fixed timestep
        app.insert_resource(Time::<Fixed>::from_duration(Duration::from_secs_f32(
            1.0 / 60.0,
        )));

        // Common game resources
        let track = self
            .track
            .map(|def| Track::from_def(&def))
            .unwrap_or_default();
        app.insert_resource(track);
        app.insert_resource(EventBus::new());
        app.init_resource::<DriverInput>();
        app.init_resource::<CarTuning>();

        app
    }
}

/// Advance a headless app by whole simulation ticks.
///
/// Drives the three clocks forward by one fixed delta per tick and runs the
/// Update and FixedUpdate schedules manually, so a tick here is exactly one
/// physics step regardless of wall time.
pub fn step_ticks(app: &mut App, ticks: u32) {
    let fixed_dt = Duration::from_secs_f32(1.0 / 60.0);

    for _ in 0..ticks {
        app.world_mut()
            .resource_mut::<Time<Virtual>>()
            .advance_by(fixed_dt);
        app.world_mut()
            .resource_mut::<Time<Real>>()
            .advance_by(fixed_dt);
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(fixed_dt);

        app.world_mut().run_schedule(Update);
        app.world_mut().run_schedule(FixedUpdate);
    }
}
