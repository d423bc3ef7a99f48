//! Car-related components

use bevy::prelude::*;

/// Marker for car entities (player and ghosts alike)
#[derive(Component)]
pub struct Car;

/// Marker for the car driven by the human player
#[derive(Component)]
pub struct PlayerCar;

/// 2D velocity vector
#[derive(Component, Default)]
pub struct Velocity(pub Vec2);

/// Rotation rate around the car's vertical axis (rad/sec)
#[derive(Component, Default)]
pub struct AngularVelocity(pub f32);

/// Direction the car points, in radians. Zero is +X, positive turns
/// counter-clockwise.
#[derive(Component, Default)]
pub struct Heading(pub f32);

/// Where a car's forces come from each tick.
///
/// Every car carries exactly one source. The force systems check it and
/// only one of them writes the car's CarForces on any given tick.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlSource {
    /// Forces computed from live driver input
    Live,
    /// Forces read back from a recorded lap
    Replay,
    /// No force source, the car coasts to a stop
    Idle,
}

/// Per-tick force sample for one car.
///
/// This is both the output of the force sources and the unit stored in
/// recorded laps, so replaying a lap feeds the exact values the original
/// drive produced back into the same integration step.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct CarForces {
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub angular_velocity: f32,
}

impl CarForces {
    pub const NEUTRAL: CarForces = CarForces {
        velocity_x: 0.0,
        velocity_y: 0.0,
        angular_velocity: 0.0,
    };

    /// Zero all components
    pub fn reset(&mut self) {
        *self = CarForces::NEUTRAL;
    }

    /// Copy all components from another sample
    pub fn set(&mut self, other: &CarForces) {
        *self = *other;
    }

    pub fn is_neutral(&self) -> bool {
        *self == CarForces::NEUTRAL
    }
}
