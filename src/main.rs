//! Hotlap - top-down time-trial racer with ghost car replays

use bevy::{camera::ScalingMode, prelude::*};

use hotlap::{
    AngularVelocity, Car, CarForces, CarTuning, ControlSource, CurrentSettings, DriverInput,
    EventBus, GhostCar, GhostId, GhostPlayback, Heading, LapProgress, PlayerCar, RecordedLap,
    Track, TrackDatabase, Velocity, car, constants::*, ghost, input, load_lap, place_car,
    save_settings_system, spawn_ghost_car, spawn_hud, spawn_track, track, tuning, ui,
    update_event_bus_time,
};

/// Recorded lap handed from main() to the startup systems
#[derive(Resource, Default)]
struct PendingGhostLap(Option<RecordedLap>);

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --ghost <path> (lap recording to race against)
    let ghost_file = args
        .iter()
        .position(|a| a == "--ghost")
        .and_then(|i| args.get(i + 1).cloned());

    // Check for --track <name> override
    let track_override = args
        .iter()
        .position(|a| a == "--track")
        .and_then(|i| args.get(i + 1).cloned());

    // Load persistent settings (uses defaults if file doesn't exist)
    let current_settings = CurrentSettings::default();

    // Save settings on first run to ensure file exists
    if let Err(e) = current_settings.settings.save() {
        warn!("Failed to save initial settings: {}", e);
    }

    let loaded_viewport_index = current_settings.settings.viewport_index;
    let ghost_alpha = current_settings.settings.ghost_alpha.clamp(0.0, 1.0);

    // Load track database from file
    let track_db = TrackDatabase::load_from_file(TRACKS_FILE);

    // Command-line track override wins, then saved settings, then first track
    let track_name = track_override.unwrap_or_else(|| current_settings.settings.track.clone());
    let track = track_db
        .get(&track_name)
        .or_else(|| track_db.first())
        .map(Track::from_def)
        .unwrap_or_default();

    // Load the ghost lap up front; a bad path degrades to a session with
    // no ghost rather than aborting
    let pending_lap = match ghost_file {
        Some(path) => match load_lap(std::path::Path::new(&path)) {
            Ok(lap) => {
                info!(
                    "Loaded ghost lap {} ({} samples, track {})",
                    lap.id(),
                    lap.len(),
                    lap.track()
                );
                Some(lap)
            }
            Err(e) => {
                warn!("Failed to load ghost lap: {}", e);
                None
            }
        },
        None => None,
    };

    // Use loaded viewport preset (clamped to valid range)
    let viewport_index = loaded_viewport_index.min(VIEWPORT_PRESETS.len() - 1);
    let (viewport_width, viewport_height, _) = VIEWPORT_PRESETS[viewport_index];

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                // Use loaded viewport preset for initial size
                // Set scale_factor_override to 1.0 for consistent behavior on HiDPI displays
                resolution: bevy::window::WindowResolution::new(
                    viewport_width as u32,
                    viewport_height as u32,
                )
                .with_scale_factor_override(1.0),
                title: "Hotlap".into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(track_db)
        .insert_resource(track)
        .insert_resource(current_settings)
        .insert_resource(PendingGhostLap(pending_lap))
        .insert_resource(GhostBaseAlpha(ghost_alpha))
        .insert_resource(EventBus::new())
        .init_resource::<DriverInput>()
        .init_resource::<CarTuning>()
        .add_systems(Startup, (tuning::load_global_tuning_system, setup).chain())
        // Runs after setup's spawns have been applied
        .add_systems(PostStartup, arm_starting_ghost)
        .add_systems(
            Update,
            (
                input::capture_input,
                update_event_bus_time,
                restart_controls,
                toggle_ghost_controls,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                ghost::ghost_apply_opacity,
                ui::update_hud_status,
                ui::drain_ghost_events,
                ui::update_hud_flash,
                save_settings_system,
            ),
        )
        .add_systems(
            FixedUpdate,
            (
                car::idle_car_forces,
                car::live_drive_forces,
                ghost::ghost_compute_forces,
                car::integrate_car_forces,
                car::apply_car_velocity,
                car::car_track_collisions,
                track::update_lap_progress,
                ghost::ghost_after_step,
            )
                .chain(),
        )
        .run();
}

/// Plateau opacity for the session's ghost, from settings
#[derive(Resource)]
struct GhostBaseAlpha(f32);

/// Setup the game world
fn setup(mut commands: Commands, track: Res<Track>, base_alpha: Res<GhostBaseAlpha>) {
    // Camera - orthographic, shows the entire track plus a margin
    // FixedVertical ensures the full track height is always visible regardless of window size
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: track.half_extents.y * 2.0 + CAMERA_MARGIN,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));

    spawn_track(&mut commands, &track);

    // Player car at the track's start pose
    let (start, heading) = track.start_pose();
    commands.spawn((
        Sprite::from_color(PLAYER_CAR_COLOR, CAR_SIZE),
        Transform {
            translation: Vec3::new(start.x, start.y, 2.0),
            rotation: Quat::from_rotation_z(heading),
            ..default()
        },
        Car,
        PlayerCar,
        ControlSource::Live,
        CarForces::default(),
        Velocity::default(),
        AngularVelocity::default(),
        Heading(heading),
        LapProgress::default(),
    ));

    // One ghost slot; more can race at once but the shell drives a single rival
    spawn_ghost_car(&mut commands, GhostId(0), &track, base_alpha.0);

    spawn_hud(&mut commands, &track);
}

/// Hand the lap loaded in main() to the ghost and start it rolling
fn arm_starting_ghost(
    mut pending: ResMut<PendingGhostLap>,
    track: Res<Track>,
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
    >,
) {
    let Some(lap) = pending.0.take() else {
        return;
    };

    let Ok((mut playback, mut transform, mut heading, mut velocity, mut angular, mut progress)) =
        ghosts.single_mut()
    else {
        return;
    };

    if ghost::assign_ghost_lap(
        &track,
        Some(&lap),
        &mut playback,
        &mut transform,
        &mut heading,
        &mut velocity,
        &mut angular,
        &mut progress,
    ) {
        ghost::start_ghost(
            &track,
            &mut playback,
            &mut transform,
            &mut heading,
            &mut velocity,
            &mut angular,
            &mut progress,
        );
    }
}

/// R / Start: put the player back on the grid and rerun the ghost
#[allow(clippy::type_complexity)]
fn restart_controls(
    mut input: ResMut<DriverInput>,
    track: Res<Track>,
    mut player: Query<
        (
            &mut Transform,
            &mut Heading,
            &mut Velocity,
            &mut AngularVelocity,
            &mut LapProgress,
        ),
        (With<PlayerCar>, Without<GhostCar>),
    >,
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
    >,
) {
    if !input.restart_pressed {
        return;
    }
    input.restart_pressed = false;

    let (start, angle) = track.start_pose();
    if let Ok((mut transform, mut heading, mut velocity, mut angular, mut progress)) =
        player.single_mut()
    {
        place_car(
            &mut transform,
            &mut heading,
            &mut velocity,
            &mut angular,
            start,
            angle,
        );
        progress.reset();
    }

    for (mut playback, mut transform, mut heading, mut velocity, mut angular, mut progress) in
        &mut ghosts
    {
        ghost::stop_ghost(&mut playback, &mut velocity, &mut angular);
        if playback.has_replay() {
            ghost::start_ghost(
                &track,
                &mut playback,
                &mut transform,
                &mut heading,
                &mut velocity,
                &mut angular,
                &mut progress,
            );
        }
    }
}

/// G / North: pause or resume ghost playback
fn toggle_ghost_controls(
    mut input: ResMut<DriverInput>,
    track: Res<Track>,
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
    >,
) {
    if !input.ghost_toggle_pressed {
        return;
    }
    input.ghost_toggle_pressed = false;

    for (mut playback, mut transform, mut heading, mut velocity, mut angular, mut progress) in
        &mut ghosts
    {
        if playback.is_playing() {
            ghost::stop_ghost(&mut playback, &mut velocity, &mut angular);
        } else if playback.has_replay() {
            ghost::start_ghost(
                &track,
                &mut playback,
                &mut transform,
                &mut heading,
                &mut velocity,
                &mut angular,
                &mut progress,
            );
        }
    }
}
