//! Input module - DriverInput resource and capture_input system

use bevy::prelude::*;

use crate::constants::*;

/// Buffered input state for the player car
#[derive(Resource, Default)]
pub struct DriverInput {
    pub steer: f32,    // -1.0 = full left, 1.0 = full right
    pub throttle: f32, // 0.0..=1.0
    pub brake: f32,    // 0.0..=1.0, doubles as reverse once stopped
    pub restart_pressed: bool,      // R / Start - accumulate until consumed
    pub ghost_toggle_pressed: bool, // G / North - accumulate until consumed
}

/// Runs in Update to capture input state before it's cleared.
/// Continuous axes are overwritten each frame, button presses accumulate
/// until a consumer system clears them.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut input: ResMut<DriverInput>,
) {
    // Steering (continuous - overwrite each frame)
    let mut steer = 0.0;

    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        steer -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        steer += 1.0;
    }

    for gamepad in &gamepads {
        if let Some(stick_x) = gamepad.get(GamepadAxis::LeftStickX) {
            if stick_x.abs() > STICK_DEADZONE {
                steer += stick_x;
            }
        }
    }

    input.steer = steer.clamp(-1.0, 1.0);

    // Throttle and brake (held)
    let throttle_held = keyboard.pressed(KeyCode::KeyW)
        || keyboard.pressed(KeyCode::ArrowUp)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::South));
    input.throttle = if throttle_held { 1.0 } else { 0.0 };

    let brake_held = keyboard.pressed(KeyCode::KeyS)
        || keyboard.pressed(KeyCode::ArrowDown)
        || gamepads.iter().any(|gp| gp.pressed(GamepadButton::East));
    input.brake = if brake_held { 1.0 } else { 0.0 };

    // Restart lap (R / Start) - accumulate until consumed
    if keyboard.just_pressed(KeyCode::KeyR)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::Start))
    {
        input.restart_pressed = true;
    }

    // Toggle ghost playback (G / North) - accumulate until consumed
    if keyboard.just_pressed(KeyCode::KeyG)
        || gamepads
            .iter()
            .any(|gp| gp.just_pressed(GamepadButton::North))
    {
        input.ghost_toggle_pressed = true;
    }
}
