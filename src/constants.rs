//! Tunable constants for hotlap
//!
//! All gameplay values are defined here for easy tweaking.

use bevy::prelude::*;

// =============================================================================
// TRACK COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.16, 0.17, 0.18); // Wet asphalt
pub const WALL_COLOR: Color = Color::srgb(0.62, 0.2, 0.16); // Barrier red
pub const INFIELD_COLOR: Color = Color::srgb(0.13, 0.2, 0.14); // Grass island
pub const GATE_COLOR: Color = Color::srgba(0.9, 0.85, 0.3, 0.2); // Faint checkpoint markers

// =============================================================================
// CAR COLORS
// =============================================================================

pub const PLAYER_CAR_COLOR: Color = Color::srgb(0.92, 0.6, 0.12);
pub const GHOST_CAR_COLOR: Color = Color::srgb(0.55, 0.8, 0.95);

// =============================================================================
// TEXT/UI COLORS
// =============================================================================

pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.9, 0.8); // Bone white/cream
pub const TEXT_SECONDARY: Color = Color::srgb(0.7, 0.65, 0.55); // Aged parchment
pub const TEXT_ACCENT: Color = Color::srgb(0.9, 0.75, 0.4); // Gold/amber

// =============================================================================
// SIZE CONSTANTS
// =============================================================================

pub const CAR_SIZE: Vec2 = Vec2::new(44.0, 24.0); // Long axis points along heading
pub const WALL_THICKNESS: f32 = 24.0;
pub const GATE_MARKER_SIZE: Vec2 = Vec2::new(18.0, 18.0);

// =============================================================================
// CAR HANDLING
// =============================================================================

pub const MAX_SPEED: f32 = 420.0; // Top forward speed (pixels/sec)
pub const REVERSE_SPEED: f32 = 140.0; // Top reverse speed
pub const ACCEL: f32 = 380.0; // Throttle acceleration (pixels/sec²)
pub const BRAKE_DECEL: f32 = 700.0; // Braking deceleration - bite harder than throttle
pub const DRAG_DECEL: f32 = 260.0; // Coasting deceleration with no input
pub const STEER_RATE: f32 = 2.6; // Steering rate at full speed (rad/sec)
pub const WALL_RESTITUTION: f32 = 0.25; // Velocity retained along the wall normal after a hit
pub const STICK_DEADZONE: f32 = 0.25; // Analog stick deadzone

// =============================================================================
// GHOST REPLAY
// =============================================================================

/// Length of the fade-in and fade-out opacity ramps, in simulation ticks
pub const FADE_TICKS: usize = 30;

/// Ghost opacity when settings carry no override
pub const DEFAULT_GHOST_ALPHA: f32 = 0.5;

// =============================================================================
// TRACK FILE
// =============================================================================

pub const TRACKS_FILE: &str = "assets/tracks.toml";
pub const DEFAULT_GATE_RADIUS: f32 = 120.0;

// =============================================================================
// VIEWPORT PRESETS (for testing different screen sizes)
// =============================================================================

/// Viewport scale presets: (width, height, label)
pub const VIEWPORT_PRESETS: &[(f32, f32, &str)] = &[
    (1280.0, 720.0, "1280x720 (720p)"),
    (1600.0, 900.0, "1600x900 (native)"),
    (1920.0, 1080.0, "1920x1080 (1080p)"),
];

/// Default viewport preset index (native)
pub const DEFAULT_VIEWPORT_INDEX: usize = 1;

/// Extra world-space margin the camera shows past the track bounds
pub const CAMERA_MARGIN: f32 = 120.0;

// =============================================================================
// HUD
// =============================================================================

pub const HUD_FLASH_SECS: f32 = 2.5; // How long flash messages stay on screen
