//! Car physics systems
//!
//! Each tick a car's CarForces are written by exactly one force source
//! (live input, replay, or idle), then integrated into velocity and pose.
//! Keeping the force sample as the hand-off point is what lets a recorded
//! lap reproduce the original drive: playback feeds stored samples into
//! the same integration step the live car used.

use bevy::prelude::*;

use crate::car::components::*;
use crate::constants::*;
use crate::helpers::{move_toward, wrap_angle};
use crate::input::DriverInput;
use crate::track::Track;
use crate::tuning::CarTuning;

/// Zero the forces of cars with no active source so they coast to a stop
pub fn idle_car_forces(mut cars: Query<(&ControlSource, &mut CarForces)>) {
    for (source, mut forces) in &mut cars {
        if *source == ControlSource::Idle {
            forces.reset();
        }
    }
}

/// Runs in FixedUpdate to turn captured driver input into force samples.
/// Only cars with ControlSource::Live are driven here.
pub fn live_drive_forces(
    input: Res<DriverInput>,
    tuning: Res<CarTuning>,
    time: Res<Time>,
    mut cars: Query<(&ControlSource, &Heading, &Velocity, &mut CarForces)>,
) {
    // Handle headless mode where delta might be 0
    let dt = time.delta_secs().max(1.0 / 60.0);

    for (source, heading, velocity, mut forces) in &mut cars {
        if *source != ControlSource::Live {
            continue;
        }

        let heading_dir = Vec2::from_angle(heading.0);
        let speed = velocity.0.dot(heading_dir);

        // Brake acts as reverse once the car has stopped
        let target_speed = input.throttle * tuning.max_speed - input.brake * tuning.reverse_speed;

        let coasting = input.throttle == 0.0 && input.brake == 0.0;
        let same_direction = target_speed.signum() == speed.signum() || speed.abs() < 1.0;
        let rate = if coasting {
            tuning.drag_decel
        } else if same_direction {
            tuning.accel
        } else {
            tuning.brake_decel
        };

        let new_speed = move_toward(speed, target_speed, rate * dt);

        // Steering authority scales with speed so the car cannot pivot in place
        let authority = (new_speed.abs() / tuning.max_speed).clamp(0.0, 1.0);
        let omega = -input.steer * tuning.steer_rate * authority * new_speed.signum();

        let command = heading_dir * new_speed;
        forces.velocity_x = command.x;
        forces.velocity_y = command.y;
        forces.angular_velocity = omega;
    }
}

/// Copy each car's force sample into its velocity state
pub fn integrate_car_forces(mut cars: Query<(&CarForces, &mut Velocity, &mut AngularVelocity)>) {
    for (forces, mut velocity, mut angular) in &mut cars {
        velocity.0.x = forces.velocity_x;
        velocity.0.y = forces.velocity_y;
        angular.0 = forces.angular_velocity;
    }
}

/// Advance car pose from velocity state
pub fn apply_car_velocity(
    time: Res<Time>,
    mut cars: Query<(&mut Transform, &mut Heading, &Velocity, &AngularVelocity)>,
) {
    // Handle headless mode where delta might be 0
    let dt = time.delta_secs().max(1.0 / 60.0);

    for (mut transform, mut heading, velocity, angular) in &mut cars {
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
        heading.0 = wrap_angle(heading.0 + angular.0 * dt);
        transform.rotation = Quat::from_rotation_z(heading.0);
    }
}

/// Keep cars between the outer barriers and off the infield island.
/// Track geometry stops every car, ghosts included. Cars never collide
/// with each other, so a ghost can be driven through.
pub fn car_track_collisions(
    track: Res<Track>,
    mut cars: Query<(&mut Transform, &mut Velocity), With<Car>>,
) {
    // Treat the car as a disc the size of its long axis
    let radius = CAR_SIZE.x / 2.0;
    let bounds = track.half_extents - Vec2::splat(WALL_THICKNESS + radius);

    for (mut transform, mut velocity) in &mut cars {
        let pos = &mut transform.translation;

        if pos.x > bounds.x {
            pos.x = bounds.x;
            if velocity.0.x > 0.0 {
                velocity.0.x *= -WALL_RESTITUTION;
            }
        } else if pos.x < -bounds.x {
            pos.x = -bounds.x;
            if velocity.0.x < 0.0 {
                velocity.0.x *= -WALL_RESTITUTION;
            }
        }

        if pos.y > bounds.y {
            pos.y = bounds.y;
            if velocity.0.y > 0.0 {
                velocity.0.y *= -WALL_RESTITUTION;
            }
        } else if pos.y < -bounds.y {
            pos.y = -bounds.y;
            if velocity.0.y < 0.0 {
                velocity.0.y *= -WALL_RESTITUTION;
            }
        }

        // Infield island, centered on the track origin
        if track.has_island() {
            let island = track.island_half_extents + Vec2::splat(radius);
            if pos.x.abs() < island.x && pos.y.abs() < island.y {
                let pen_x = island.x - pos.x.abs();
                let pen_y = island.y - pos.y.abs();
                // Push out along the axis of least penetration
                if pen_x < pen_y {
                    pos.x = island.x * pos.x.signum();
                    if velocity.0.x.signum() != pos.x.signum() {
                        velocity.0.x *= -WALL_RESTITUTION;
                    }
                } else {
                    pos.y = island.y * pos.y.signum();
                    if velocity.0.y.signum() != pos.y.signum() {
                        velocity.0.y *= -WALL_RESTITUTION;
                    }
                }
            }
        }
    }
}

/// Teleport a car to a pose and bring it to rest
pub fn place_car(
    transform: &mut Transform,
    heading: &mut Heading,
    velocity: &mut Velocity,
    angular: &mut AngularVelocity,
    position: Vec2,
    angle: f32,
) {
    transform.translation.x = position.x;
    transform.translation.y = position.y;
    heading.0 = wrap_angle(angle);
    transform.rotation = Quat::from_rotation_z(heading.0);
    velocity.0 = Vec2::ZERO;
    angular.0 = 0.0;
}
