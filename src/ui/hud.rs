//! HUD components and systems (status line and event flash messages)

use bevy::prelude::*;

use crate::car::PlayerCar;
use crate::constants::*;
use crate::events::{EventBus, GameEvent};
use crate::ghost::{GhostCar, GhostPlayback};
use crate::track::{LapProgress, Track};

/// Status line text component (track / lap / ghost state)
#[derive(Component)]
pub struct HudStatusText;

/// Flash message text component (shows lifecycle events briefly)
#[derive(Component)]
pub struct HudFlash {
    /// Time remaining before the message fades out completely
    pub timer: f32,
}

/// Spawn the HUD text entities (called from setup)
pub fn spawn_hud(commands: &mut Commands, track: &Track) {
    let top_y = track.half_extents.y + CAMERA_MARGIN * 0.5;

    // Status line - world space, above the track
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextLayout::new_with_justify(Justify::Center),
        TextColor(TEXT_PRIMARY),
        Transform::from_xyz(0.0, top_y, 2.0),
        HudStatusText,
    ));

    // Flash message - centered over the infield, high z to render on top
    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 36.0,
            ..default()
        },
        TextLayout::new_with_justify(Justify::Center),
        TextColor(TEXT_ACCENT),
        Transform::from_xyz(0.0, 0.0, 100.0),
        HudFlash { timer: 0.0 },
    ));
}

/// Update the status line from track, lap progress, and ghost state
pub fn update_hud_status(
    track: Res<Track>,
    player_query: Query<&LapProgress, With<PlayerCar>>,
    ghost_query: Query<&GhostPlayback, With<GhostCar>>,
    mut text_query: Query<&mut Text2d, With<HudStatusText>>,
) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };

    let laps = player_query.single().map(|p| p.laps).unwrap_or(0);

    let ghost_status = match ghost_query.iter().next() {
        Some(playback) if playback.is_playing() && playback.is_exhausted() => "ghost: done",
        Some(playback) if playback.is_playing() => "ghost: running",
        Some(playback) if playback.has_replay() => "ghost: ready",
        Some(_) => "ghost: none",
        None => "ghost: none",
    };

    text.0 = format!("{}  |  lap {}  |  {}", track.name, laps, ghost_status);
}

/// Drain lifecycle events from the bus into flash messages
pub fn drain_ghost_events(
    mut bus: ResMut<EventBus>,
    mut flash_query: Query<(&mut Text2d, &mut HudFlash)>,
) {
    let Ok((mut text, mut flash)) = flash_query.single_mut() else {
        return;
    };

    for bus_event in bus.drain() {
        let message = match &bus_event.event {
            GameEvent::ReplayStarted { ghost } => format!("GHOST {} LAP STARTED", ghost),
            GameEvent::ReplayFadingOut { ghost } => format!("GHOST {} FINISHING", ghost),
            GameEvent::ReplayEnded { ghost } => format!("GHOST {} LAP COMPLETE", ghost),
            GameEvent::LapCompleted { laps } => format!("LAP {}", laps),
        };
        text.0 = message;
        flash.timer = HUD_FLASH_SECS;
    }
}

/// Fade out flash messages over time
pub fn update_hud_flash(
    time: Res<Time>,
    mut flash_query: Query<(&mut TextColor, &mut HudFlash)>,
) {
    let Ok((mut color, mut flash)) = flash_query.single_mut() else {
        return;
    };

    if flash.timer <= 0.0 {
        return;
    }

    flash.timer -= time.delta_secs();

    // Hold at full brightness, then fade over the last second
    let alpha = flash.timer.clamp(0.0, 1.0);
    let accent = TEXT_ACCENT.to_srgba();
    *color = TextColor(Color::srgba(accent.red, accent.green, accent.blue, alpha));
}
