//! Global handling tuning (loaded from config, decoupled from constants)

use bevy::log::warn;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Path to the handling tuning config
pub const HANDLING_TUNING_FILE: &str = "config/handling_tuning.json";

/// Serializable handling values stored in config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlingTuning {
    pub max_speed: f32,
    pub reverse_speed: f32,
    pub accel: f32,
    pub brake_decel: f32,
    pub drag_decel: f32,
    pub steer_rate: f32,
}

impl Default for HandlingTuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            reverse_speed: REVERSE_SPEED,
            accel: ACCEL,
            brake_decel: BRAKE_DECEL,
            drag_decel: DRAG_DECEL,
            steer_rate: STEER_RATE,
        }
    }
}

impl HandlingTuning {
    pub fn apply_to(&self, tuning: &mut CarTuning) {
        tuning.max_speed = self.max_speed;
        tuning.reverse_speed = self.reverse_speed;
        tuning.accel = self.accel;
        tuning.brake_decel = self.brake_decel;
        tuning.drag_decel = self.drag_decel;
        tuning.steer_rate = self.steer_rate;
    }
}

/// Runtime handling values used by the live force source
#[derive(Resource, Debug, Clone)]
pub struct CarTuning {
    pub max_speed: f32,
    pub reverse_speed: f32,
    pub accel: f32,
    pub brake_decel: f32,
    pub drag_decel: f32,
    pub steer_rate: f32,
}

impl Default for CarTuning {
    fn default() -> Self {
        let defaults = HandlingTuning::default();
        Self {
            max_speed: defaults.max_speed,
            reverse_speed: defaults.reverse_speed,
            accel: defaults.accel,
            brake_decel: defaults.brake_decel,
            drag_decel: defaults.drag_decel,
            steer_rate: defaults.steer_rate,
        }
    }
}

pub fn load_handling_tuning_from_file(path: &str) -> Result<HandlingTuning, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn apply_global_tuning(tuning: &mut CarTuning) -> Result<(), String> {
    match load_handling_tuning_from_file(HANDLING_TUNING_FILE) {
        Ok(handling) => {
            handling.apply_to(tuning);
            Ok(())
        }
        Err(err) => {
            HandlingTuning::default().apply_to(tuning);
            Err(err)
        }
    }
}

pub fn load_global_tuning_system(mut tuning: bevy::prelude::ResMut<CarTuning>) {
    if let Err(err) = apply_global_tuning(&mut tuning) {
        warn!("{}", err);
    }
}
