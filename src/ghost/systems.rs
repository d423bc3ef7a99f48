//! Ghost car systems and orchestration
//!
//! Ghost cars bracket the physics chain: ghost_compute_forces runs before
//! integration to feed the replay sample in, ghost_after_step runs after it
//! to step the cursor. Both forward the playback edges to the event bus.

use bevy::prelude::*;

use crate::car::{
    AngularVelocity, Car, CarForces, ControlSource, Heading, Velocity, place_car,
};
use crate::constants::*;
use crate::events::{EventBus, GameEvent, GhostId};
use crate::ghost::playback::GhostPlayback;
use crate::ghost::recording::RecordedLap;
use crate::track::{LapProgress, Track};

/// Marker plus slot id for ghost cars
#[derive(Component)]
pub struct GhostCar(pub GhostId);

/// Spawn a ghost car parked at the track start, invisible until a replay
/// plays. Returns the new entity.
pub fn spawn_ghost_car(
    commands: &mut Commands,
    slot: GhostId,
    track: &Track,
    base_alpha: f32,
) -> Entity {
    let (position, angle) = track.start_pose();
    let base = GHOST_CAR_COLOR.to_srgba();

    commands
        .spawn((
            Sprite::from_color(
                Color::srgba(base.red, base.green, base.blue, 0.0),
                CAR_SIZE,
            ),
            Transform {
                // Ghosts render above the track but below the player car
                translation: Vec3::new(position.x, position.y, 1.5),
                rotation: Quat::from_rotation_z(angle),
                ..default()
            },
            Car,
            GhostCar(slot),
            ControlSource::Replay,
            CarForces::default(),
            Velocity::default(),
            AngularVelocity::default(),
            Heading(angle),
            LapProgress::default(),
            GhostPlayback::new(base_alpha),
        ))
        .id()
}

/// Pre-physics force source for ghost cars.
/// Forwards the one-shot started/fading-out edges to the event bus.
pub fn ghost_compute_forces(
    mut bus: ResMut<EventBus>,
    mut ghosts: Query<(&GhostCar, &mut GhostPlayback, &mut CarForces)>,
) {
    for (ghost, mut playback, mut forces) in &mut ghosts {
        let edges = playback.compute_forces(&mut forces);
        if edges.started {
            bus.emit(GameEvent::ReplayStarted { ghost: ghost.0 });
        }
        if edges.fading_out {
            bus.emit(GameEvent::ReplayFadingOut { ghost: ghost.0 });
        }
    }
}

/// Post-physics cursor step. Fires ReplayEnded exactly once per run, on
/// the tick the final sample is consumed.
pub fn ghost_after_step(
    mut bus: ResMut<EventBus>,
    mut ghosts: Query<(&GhostCar, &mut GhostPlayback)>,
) {
    for (ghost, mut playback) in &mut ghosts {
        if playback.advance() {
            bus.emit(GameEvent::ReplayEnded { ghost: ghost.0 });
        }
    }
}

/// Copy playback opacity into the ghost sprite each frame
pub fn ghost_apply_opacity(mut ghosts: Query<(&GhostPlayback, &mut Sprite), With<GhostCar>>) {
    for (playback, mut sprite) in &mut ghosts {
        let base = sprite.color.to_srgba();
        sprite.color = Color::srgba(base.red, base.green, base.blue, playback.opacity());
    }
}

/// Park a ghost at its replay's start pose, falling back to the track
/// start when no replay is assigned, and clear its lap bookkeeping.
#[allow(clippy::too_many_arguments)]
pub fn place_at_replay_start(
    track: &Track,
    playback: &GhostPlayback,
    transform: &mut Transform,
    heading: &mut Heading,
    velocity: &mut Velocity,
    angular: &mut AngularVelocity,
    progress: &mut LapProgress,
) {
    let (position, angle) = playback.start_pose().unwrap_or_else(|| track.start_pose());
    place_car(transform, heading, velocity, angular, position, angle);
    progress.reset();
}

/// Begin playback from the replay's start pose. No-op while playing.
#[allow(clippy::too_many_arguments)]
pub fn start_ghost(
    track: &Track,
    playback: &mut GhostPlayback,
    transform: &mut Transform,
    heading: &mut Heading,
    velocity: &mut Velocity,
    angular: &mut AngularVelocity,
    progress: &mut LapProgress,
) {
    if playback.is_playing() {
        return;
    }
    place_at_replay_start(track, playback, transform, heading, velocity, angular, progress);
    playback.start();
}

/// Halt playback and bring the ghost to rest where it stands
pub fn stop_ghost(
    playback: &mut GhostPlayback,
    velocity: &mut Velocity,
    angular: &mut AngularVelocity,
) {
    playback.stop();
    velocity.0 = Vec2::ZERO;
    angular.0 = 0.0;
}

/// Swap the ghost onto a new lap and park it at that lap's start.
/// Returns whether a usable lap is now assigned.
#[allow(clippy::too_many_arguments)]
pub fn assign_ghost_lap(
    track: &Track,
    lap: Option<&RecordedLap>,
    playback: &mut GhostPlayback,
    transform: &mut Transform,
    heading: &mut Heading,
    velocity: &mut Velocity,
    angular: &mut AngularVelocity,
    progress: &mut LapProgress,
) -> bool {
    let assigned = playback.assign(lap);
    place_at_replay_start(track, playback, transform, heading, velocity, angular, progress);
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::{apply_car_velocity, car_track_collisions, idle_car_forces, integrate_car_forces};
    use crate::simulation::{HeadlessAppBuilder, step_ticks};
    use crate::track::{TrackDef, update_lap_progress};

    fn open_track() -> TrackDef {
        TrackDef {
            name: "test-arena".to_string(),
            half_width: 2000.0,
            half_height: 1200.0,
            island_half_width: 0.0,
            island_half_height: 0.0,
            start: [-650.0, 0.0],
            start_heading: 0.0,
            gates: Vec::new(),
            gate_radius: DEFAULT_GATE_RADIUS,
        }
    }

    fn build_app(track: TrackDef) -> App {
        let mut app = HeadlessAppBuilder::new().with_track(track).build();
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
        app.finish();
        app.cleanup();
        app
    }

    fn straight_lap(samples: usize, speed: f32) -> RecordedLap {
        let forces = vec![
            CarForces {
                velocity_x: speed,
                velocity_y: 0.0,
                angular_velocity: 0.0,
            };
            samples
        ];
        RecordedLap::from_samples("test-arena", Vec2::new(-650.0, 0.0), 0.0, forces)
    }

    fn spawn_test_ghost(app: &mut App, slot: GhostId, playback: GhostPlayback) -> Entity {
        let (position, angle) = playback
            .start_pose()
            .unwrap_or((Vec2::new(-650.0, 0.0), 0.0));
        app.world_mut()
            .spawn((
                Car,
                GhostCar(slot),
                ControlSource::Replay,
                CarForces::default(),
                Velocity::default(),
                AngularVelocity::default(),
                Heading(angle),
                LapProgress::default(),
                Transform::from_xyz(position.x, position.y, 1.5),
                playback,
            ))
            .id()
    }

    #[test]
    fn test_replay_lifecycle_through_the_bus() {
        let mut app = build_app(open_track());

        let lap = straight_lap(100, 300.0);
        let mut playback = GhostPlayback::new(0.8);
        playback.assign(Some(&lap));
        playback.start();
        let ghost = spawn_test_ghost(&mut app, GhostId(0), playback);

        step_ticks(&mut app, 120);

        let bus = app.world().resource::<EventBus>();
        let codes: Vec<&str> = bus.peek().iter().map(|e| e.event.type_code()).collect();
        assert_eq!(codes, vec!["RS", "RF", "RE"]);

        // 100 ticks at 300 px/sec moved the ghost 500 px along +X
        let transform = app.world().entity(ghost).get::<Transform>().unwrap();
        assert!((transform.translation.x - (-150.0)).abs() < 1.0);
        assert!(transform.translation.y.abs() < 1e-3);

        let playback = app.world().entity(ghost).get::<GhostPlayback>().unwrap();
        assert!(playback.is_exhausted());
        assert_eq!(playback.cursor(), 100);
        assert_eq!(playback.opacity(), 0.0);
    }

    #[test]
    fn test_two_ghosts_report_their_own_slots() {
        let mut app = build_app(open_track());

        for (slot, samples) in [(GhostId(0), 60), (GhostId(1), 90)] {
            let lap = straight_lap(samples, 200.0);
            let mut playback = GhostPlayback::new(0.5);
            playback.assign(Some(&lap));
            playback.start();
            spawn_test_ghost(&mut app, slot, playback);
        }

        step_ticks(&mut app, 100);

        let mut bus = app.world_mut().resource_mut::<EventBus>();
        let ended: Vec<GhostId> = bus
            .drain()
            .iter()
            .filter_map(|e| match &e.event {
                GameEvent::ReplayEnded { ghost } => Some(*ghost),
                _ => None,
            })
            .collect();

        // Shorter replay finishes first, both slots report exactly once
        assert_eq!(ended, vec![GhostId(0), GhostId(1)]);
    }

    #[test]
    fn test_unstarted_ghost_stays_parked() {
        let mut app = build_app(open_track());

        let lap = straight_lap(50, 300.0);
        let mut playback = GhostPlayback::new(0.8);
        playback.assign(Some(&lap));
        let ghost = spawn_test_ghost(&mut app, GhostId(0), playback);

        step_ticks(&mut app, 30);

        let transform = app.world().entity(ghost).get::<Transform>().unwrap();
        assert_eq!(transform.translation.x, -650.0);

        let bus = app.world().resource::<EventBus>();
        assert!(!bus.has_pending(), "parked ghost must stay silent");
    }

    #[test]
    fn test_ghost_arrival_sets_flag_without_lap_event() {
        let mut track = open_track();
        track.gates = vec![[0.0, 0.0]];

        let mut app = build_app(track);

        // 120 ticks at 300 px/sec carries the ghost from -650 through the
        // gate disc around the origin
        let lap = straight_lap(120, 300.0);
        let mut playback = GhostPlayback::new(0.8);
        playback.assign(Some(&lap));
        playback.start();
        let ghost = spawn_test_ghost(&mut app, GhostId(0), playback);

        step_ticks(&mut app, 130);

        let progress = app.world().entity(ghost).get::<LapProgress>().unwrap();
        assert!(progress.arrived);
        assert_eq!(progress.laps, 1);

        // Ghost gate crossings never produce LapCompleted events
        let bus = app.world().resource::<EventBus>();
        assert!(
            bus.peek()
                .iter()
                .all(|e| !matches!(e.event, GameEvent::LapCompleted { .. }))
        );
    }

    #[test]
    fn test_assign_helper_parks_at_lap_start() {
        let track = Track::from_def(&open_track());
        let lap = RecordedLap::from_samples(
            "test-arena",
            Vec2::new(200.0, 90.0),
            1.0,
            vec![CarForces::NEUTRAL; 10],
        );

        let mut playback = GhostPlayback::new(0.8);
        let mut transform = Transform::from_xyz(-650.0, 0.0, 1.5);
        let mut heading = Heading(0.0);
        let mut velocity = Velocity(Vec2::new(50.0, 0.0));
        let mut angular = AngularVelocity(0.3);
        let mut progress = LapProgress {
            next_gate: 2,
            laps: 1,
            arrived: true,
        };

        let assigned = assign_ghost_lap(
            &track,
            Some(&lap),
            &mut playback,
            &mut transform,
            &mut heading,
            &mut velocity,
            &mut angular,
            &mut progress,
        );

        assert!(assigned);
        assert_eq!(transform.translation.x, 200.0);
        assert_eq!(transform.translation.y, 90.0);
        assert_eq!(heading.0, 1.0);
        assert_eq!(velocity.0, Vec2::ZERO);
        assert_eq!(angular.0, 0.0);
        assert_eq!(progress.next_gate, 0);
        assert!(!progress.arrived);
    }

    #[test]
    fn test_assign_helper_with_no_lap_falls_back_to_track_start() {
        let track = Track::from_def(&open_track());

        let mut playback = GhostPlayback::new(0.8);
        let mut transform = Transform::from_xyz(100.0, 100.0, 1.5);
        let mut heading = Heading(2.0);
        let mut velocity = Velocity(Vec2::new(50.0, 0.0));
        let mut angular = AngularVelocity(0.3);
        let mut progress = LapProgress::default();

        let assigned = assign_ghost_lap(
            &track,
            None,
            &mut playback,
            &mut transform,
            &mut heading,
            &mut velocity,
            &mut angular,
            &mut progress,
        );

        assert!(!assigned);
        assert_eq!(transform.translation.x, -650.0);
        assert_eq!(transform.translation.y, 0.0);
        assert_eq!(heading.0, 0.0);
    }
}
