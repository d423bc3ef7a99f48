//! Replay Runner
//!
//! Drives a ghost car through a recorded lap in a headless simulation and
//! prints the lifecycle events it emits along the way.
//!
//! Usage:
//!   cargo run --bin run-replay recordings/best.lap
//!   cargo run --bin run-replay --demo
//!   cargo run --bin run-replay --demo --track oval

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};
use std::path::Path;

use hotlap::car::{
    AngularVelocity, CarForces, Heading, Velocity, apply_car_velocity, car_track_collisions,
    idle_car_forces, integrate_car_forces,
};
use hotlap::constants::*;
use hotlap::events::{EventBus, GameEvent, GhostId};
use hotlap::ghost::{
    GhostCar, GhostPlayback, RecordedLap, assign_ghost_lap, ghost_after_step,
    ghost_compute_forces, load_lap, spawn_ghost_car, start_ghost,
};
use hotlap::helpers::angle_delta;
use hotlap::simulation::{HeadlessAppBuilder, step_ticks};
use hotlap::track::{LapProgress, Track, TrackDatabase, update_lap_progress};

/// Synthesize a lap that follows an ellipse around the track's infield.
/// Stands in for a real recording when none is at hand.
fn synth_demo_lap(track: &Track, ticks: usize) -> RecordedLap {
    let dt = 1.0 / 60.0;
    let (start, _) = track.start_pose();
    let rx = start.x.abs().max(1.0);
    let ry = (track.island_half_extents.y + track.half_extents.y) * 0.5 * 0.97;

    let point = |t: f32| Vec2::new(rx * t.cos(), ry * t.sin());

    let mut samples = Vec::with_capacity(ticks);
    let mut prev_heading = track.start_pose().1;
    for i in 0..ticks {
        let t0 = PI + TAU * i as f32 / ticks as f32;
        let t1 = PI + TAU * (i + 1) as f32 / ticks as f32;
        let step = point(t1) - point(t0);
        let velocity = step / dt;
        let heading = step.y.atan2(step.x);
        samples.push(CarForces {
            velocity_x: velocity.x,
            velocity_y: velocity.y,
            angular_velocity: angle_delta(prev_heading, heading) / dt,
        });
        prev_heading = heading;
    }

    RecordedLap::from_samples(&track.name, start, track.start_pose().1, samples)
}

/// Human-readable line for an event
fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::ReplayStarted { ghost } => format!("{} replay started", ghost),
        GameEvent::ReplayFadingOut { ghost } => format!("{} entered fade-out window", ghost),
        GameEvent::ReplayEnded { ghost } => format!("{} replay ended", ghost),
        GameEvent::LapCompleted { laps } => format!("lap {} completed", laps),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Replay Runner");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  {} <file.lap>              Play back a recorded lap", args[0]);
        eprintln!("  {} --demo                  Play back a synthesized demo lap", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --track <name>   Track to run on (default: first in {})", TRACKS_FILE);
        std::process::exit(1);
    }

    // Parse options
    let mut lap_path: Option<String> = None;
    let mut track_name: Option<String> = None;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--demo" => {
                demo = true;
                i += 1;
            }
            "--track" if i + 1 < args.len() => {
                track_name = Some(args[i + 1].clone());
                i += 2;
            }
            other => {
                lap_path = Some(other.to_string());
                i += 1;
            }
        }
    }

    let track_db = TrackDatabase::load_from_file(TRACKS_FILE);
    let track_def = match &track_name {
        Some(name) => match track_db.get(name) {
            Some(def) => def.clone(),
            None => {
                eprintln!("ERROR: track '{}' not found", name);
                eprintln!("Available tracks:");
                for def in &track_db.tracks {
                    eprintln!("  {}", def.name);
                }
                std::process::exit(1);
            }
        },
        None => match track_db.first() {
            Some(def) => def.clone(),
            None => {
                eprintln!("ERROR: no tracks available");
                std::process::exit(1);
            }
        },
    };
    let track = Track::from_def(&track_def);

    let lap = if demo {
        synth_demo_lap(&track, 900)
    } else {
        let path = lap_path.unwrap_or_default();
        match load_lap(Path::new(&path)) {
            Ok(lap) => lap,
            Err(e) => {
                eprintln!("Failed to load lap: {}", e);
                std::process::exit(1);
            }
        }
    };

    println!("Replay Runner");
    println!("=============");
    println!("Track:    {}", track.name);
    println!("Lap:      {}", lap.id());
    println!("Samples:  {} ({:.1}s)", lap.len(), lap.duration_secs());
    println!();

    // Headless app with the full per-tick car chain
    let mut app = HeadlessAppBuilder::new().with_track(track_def).build();
    app.add_systems(
        FixedUpdate,
        (
            idle_car_forces,
            ghost_compute_forces,
            integrate_car_forces,
            apply_car_velocity,
            car_track_collisions,
            update_lap_progress,
            ghost_after_step,
        )
            .chain(),
    );

    app.add_systems(Startup, |mut commands: Commands, track: Res<Track>| {
        spawn_ghost_car(&mut commands, GhostId(0), &track, DEFAULT_GHOST_ALPHA);
    });

    // Hand the lap to the ghost once it exists
    let assigned_lap = lap.clone();
    app.add_systems(
        PostStartup,
        move |track: Res<Track>,
              mut ghosts: Query<
            (
                &mut GhostPlayback,
                &mut Transform,
                &mut Heading,
                &mut Velocity,
                &mut AngularVelocity,
                &mut LapProgress,
            ),
            With<GhostCar>,
        >| {
            let Ok((mut playback, mut transform, mut heading, mut velocity, mut angular, mut progress)) =
                ghosts.single_mut()
            else {
                return;
            };
            if assign_ghost_lap(
                &track,
                Some(&assigned_lap),
                &mut playback,
                &mut transform,
                &mut heading,
                &mut velocity,
                &mut angular,
                &mut progress,
            ) {
                start_ghost(
                    &track,
                    &mut playback,
                    &mut transform,
                    &mut heading,
                    &mut velocity,
                    &mut angular,
                    &mut progress,
                );
            }
        },
    );

    // Initialize app
    app.finish();
    app.cleanup();
    app.update();

    // Run until the replay reports its end, with headroom past the last sample
    let tick_cap = lap.len() as u32 + 120;
    let mut tick = 0u32;
    let mut ended = false;

    while tick < tick_cap && !ended {
        step_ticks(&mut app, 1);
        tick += 1;

        let mut bus = app.world_mut().resource_mut::<EventBus>();
        for bus_event in bus.drain() {
            println!(
                "  tick {:>5} ({:>6.2}s) | {} | {}",
                tick,
                tick as f32 / 60.0,
                bus_event.event.type_code(),
                describe(&bus_event.event)
            );
            if matches!(bus_event.event, GameEvent::ReplayEnded { .. }) {
                ended = true;
            }
        }
    }

    println!();
    println!("=== Summary ===");
    if !ended {
        println!("Tick cap reached before the replay ended");
    }

    let mut ghosts = app
        .world_mut()
        .query_filtered::<(&GhostPlayback, &LapProgress), With<GhostCar>>();
    if let Some((playback, progress)) = ghosts.iter(app.world()).next() {
        println!("Cursor:   {}/{}", playback.cursor(), playback.lap().len());
        println!("Laps:     {} (arrived: {})", progress.laps, progress.arrived);
    }
    println!("Ticks:    {} ({:.2}s)", tick, tick as f32 / 60.0);
}
