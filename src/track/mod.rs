//! Track module - active track state, lap progress, and track geometry

mod database;

pub use database::{TrackDatabase, TrackDef};

use bevy::prelude::*;

use crate::car::PlayerCar;
use crate::constants::*;
use crate::events::{EventBus, GameEvent};

/// The track currently being driven
#[derive(Resource, Debug, Clone)]
pub struct Track {
    pub name: String,
    pub half_extents: Vec2,
    pub island_half_extents: Vec2,
    pub start_position: Vec2,
    pub start_heading: f32,
    pub gates: Vec<Vec2>,
    pub gate_radius: f32,
}

impl Track {
    pub fn from_def(def: &TrackDef) -> Self {
        Self {
            name: def.name.clone(),
            half_extents: Vec2::new(def.half_width, def.half_height),
            island_half_extents: Vec2::new(def.island_half_width, def.island_half_height),
            start_position: Vec2::from_array(def.start),
            start_heading: def.start_heading,
            gates: def.gates.iter().map(|g| Vec2::from_array(*g)).collect(),
            gate_radius: def.gate_radius,
        }
    }

    pub fn has_island(&self) -> bool {
        self.island_half_extents.x > 0.0 && self.island_half_extents.y > 0.0
    }

    pub fn start_pose(&self) -> (Vec2, f32) {
        (self.start_position, self.start_heading)
    }
}

impl Default for Track {
    fn default() -> Self {
        // Matches the first built-in track
        let db = TrackDatabase::default_tracks();
        Self::from_def(&db.tracks[0])
    }
}

/// Per-car lap bookkeeping
#[derive(Component, Debug, Clone, Default)]
pub struct LapProgress {
    /// Index into the track's gate list
    pub next_gate: usize,
    /// Completed laps
    pub laps: u32,
    /// Set when the car crosses the finish gate, cleared on reset.
    /// For ghosts this marks the replay reaching the line.
    pub arrived: bool,
}

impl LapProgress {
    pub fn reset(&mut self) {
        *self = LapProgress::default();
    }
}

/// Advance lap progress for a car at the given position.
/// Returns true on the tick the car crosses the finish gate.
pub fn advance_progress(progress: &mut LapProgress, position: Vec2, track: &Track) -> bool {
    if track.gates.is_empty() {
        return false;
    }

    let gate = track.gates[progress.next_gate % track.gates.len()];
    if position.distance(gate) > track.gate_radius {
        return false;
    }

    progress.next_gate += 1;
    if progress.next_gate >= track.gates.len() {
        progress.next_gate = 0;
        progress.laps += 1;
        progress.arrived = true;
        return true;
    }
    false
}

/// Runs in FixedUpdate after pose integration to track gate crossings.
/// Only the player car emits LapCompleted events, ghosts just record arrival.
pub fn update_lap_progress(
    track: Res<Track>,
    mut bus: ResMut<EventBus>,
    mut cars: Query<(&Transform, &mut LapProgress, Option<&PlayerCar>)>,
) {
    for (transform, mut progress, player) in &mut cars {
        let crossed = advance_progress(&mut progress, transform.translation.truncate(), &track);
        if crossed && player.is_some() {
            bus.emit(GameEvent::LapCompleted {
                laps: progress.laps,
            });
        }
    }
}

/// Spawn the visual track geometry: barriers, infield island, gate markers
pub fn spawn_track(commands: &mut Commands, track: &Track) {
    let size = track.half_extents * 2.0;

    // Outer barriers
    let wall_specs = [
        // (position, size) for top, bottom, left, right
        (
            Vec2::new(0.0, track.half_extents.y - WALL_THICKNESS / 2.0),
            Vec2::new(size.x, WALL_THICKNESS),
        ),
        (
            Vec2::new(0.0, -track.half_extents.y + WALL_THICKNESS / 2.0),
            Vec2::new(size.x, WALL_THICKNESS),
        ),
        (
            Vec2::new(-track.half_extents.x + WALL_THICKNESS / 2.0, 0.0),
            Vec2::new(WALL_THICKNESS, size.y),
        ),
        (
            Vec2::new(track.half_extents.x - WALL_THICKNESS / 2.0, 0.0),
            Vec2::new(WALL_THICKNESS, size.y),
        ),
    ];

    for (pos, wall_size) in wall_specs {
        commands.spawn((
            Sprite::from_color(WALL_COLOR, wall_size),
            Transform::from_xyz(pos.x, pos.y, 0.5),
        ));
    }

    // Infield island
    if track.has_island() {
        commands.spawn((
            Sprite::from_color(INFIELD_COLOR, track.island_half_extents * 2.0),
            Transform::from_xyz(0.0, 0.0, 0.4),
        ));
    }

    // Gate markers
    for gate in &track.gates {
        commands.spawn((
            Sprite::from_color(GATE_COLOR, GATE_MARKER_SIZE),
            Transform::from_xyz(gate.x, gate.y, 0.6),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_track() -> Track {
        Track {
            name: "test".to_string(),
            half_extents: Vec2::new(900.0, 500.0),
            island_half_extents: Vec2::ZERO,
            start_position: Vec2::new(-650.0, 0.0),
            start_heading: 0.0,
            gates: vec![Vec2::new(0.0, -330.0), Vec2::new(650.0, 0.0)],
            gate_radius: 120.0,
        }
    }

    #[test]
    fn test_progress_requires_gates_in_order() {
        let track = test_track();
        let mut progress = LapProgress::default();

        // Sitting on the second gate does nothing while the first is pending
        assert!(!advance_progress(&mut progress, Vec2::new(650.0, 0.0), &track));
        assert_eq!(progress.next_gate, 0);

        assert!(!advance_progress(&mut progress, Vec2::new(10.0, -320.0), &track));
        assert_eq!(progress.next_gate, 1);

        // Crossing the final gate completes the lap
        assert!(advance_progress(&mut progress, Vec2::new(640.0, -30.0), &track));
        assert_eq!(progress.next_gate, 0);
        assert_eq!(progress.laps, 1);
        assert!(progress.arrived);
    }

    #[test]
    fn test_progress_outside_radius() {
        let track = test_track();
        let mut progress = LapProgress::default();

        assert!(!advance_progress(&mut progress, Vec2::new(0.0, 0.0), &track));
        assert_eq!(progress.next_gate, 0);
        assert_eq!(progress.laps, 0);
    }

    #[test]
    fn test_progress_without_gates() {
        let mut track = test_track();
        track.gates.clear();
        let mut progress = LapProgress::default();

        assert!(!advance_progress(&mut progress, Vec2::ZERO, &track));
        assert_eq!(progress.laps, 0);
    }

    #[test]
    fn test_track_from_def() {
        let db = TrackDatabase::default_tracks();
        let track = Track::from_def(&db.tracks[0]);
        assert_eq!(track.name, "oval");
        assert!(track.has_island());
        assert_eq!(track.gates.len(), 4);
    }
}
