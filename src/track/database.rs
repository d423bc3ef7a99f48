//! Track database - TOML parsing and storage

use bevy::prelude::*;
use serde::Deserialize;
use std::f32::consts::FRAC_PI_2;
use std::fs;

use crate::constants::*;

/// Single track definition from the tracks file
#[derive(Debug, Clone, Deserialize)]
pub struct TrackDef {
    pub name: String,
    /// Outer barrier half extents
    pub half_width: f32,
    pub half_height: f32,
    /// Infield island half extents, zero means an open arena
    #[serde(default)]
    pub island_half_width: f32,
    #[serde(default)]
    pub island_half_height: f32,
    /// Start line position
    pub start: [f32; 2],
    /// Start heading in radians, zero points along +X
    #[serde(default)]
    pub start_heading: f32,
    /// Checkpoint gates in lap order. The last gate is the finish line.
    #[serde(default)]
    pub gates: Vec<[f32; 2]>,
    #[serde(default = "default_gate_radius")]
    pub gate_radius: f32,
}

fn default_gate_radius() -> f32 {
    DEFAULT_GATE_RADIUS
}

/// Top-level structure of the tracks file
#[derive(Debug, Deserialize)]
struct TrackFile {
    #[serde(default)]
    tracks: Vec<TrackDef>,
}

/// Database of all loaded tracks
#[derive(Resource, Default)]
pub struct TrackDatabase {
    pub tracks: Vec<TrackDef>,
}

impl TrackDatabase {
    /// Load tracks from file, returns the built-in tracks on error
    pub fn load_from_file(path: &str) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to load tracks from {}: {}, using defaults", path, e);
                return Self::default_tracks();
            }
        };

        match Self::parse(&content) {
            Ok(db) if !db.is_empty() => {
                info!("Loaded {} tracks from {}", db.len(), path);
                db
            }
            Ok(_) => {
                warn!("No tracks defined in {}, using defaults", path);
                Self::default_tracks()
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default_tracks()
            }
        }
    }

    /// Parse track definitions from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        let file: TrackFile =
            toml::from_str(content).map_err(|e| format!("Failed to parse tracks: {}", e))?;
        Ok(Self {
            tracks: file.tracks,
        })
    }

    /// Hardcoded fallback track
    pub fn default_tracks() -> Self {
        Self {
            tracks: vec![TrackDef {
                name: "oval".to_string(),
                half_width: 900.0,
                half_height: 500.0,
                island_half_width: 380.0,
                island_half_height: 180.0,
                start: [-650.0, 0.0],
                start_heading: -FRAC_PI_2,
                gates: vec![[0.0, -330.0], [650.0, 0.0], [0.0, 330.0], [-650.0, 0.0]],
                gate_radius: DEFAULT_GATE_RADIUS,
            }],
        }
    }

    /// Get a track by name
    pub fn get(&self, name: &str) -> Option<&TrackDef> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Get the first track
    pub fn first(&self) -> Option<&TrackDef> {
        self.tracks.first()
    }

    /// Get number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[tracks]]
name = "figure-eight"
half_width = 800.0
half_height = 450.0
start = [ -500.0, 100.0 ]
start_heading = 1.2
gates = [ [0.0, 0.0], [500.0, -100.0] ]

[[tracks]]
name = "sprint"
half_width = 600.0
half_height = 300.0
start = [ 0.0, 0.0 ]
"#;

    #[test]
    fn test_parse_tracks() {
        let db = TrackDatabase::parse(SAMPLE).unwrap();
        assert_eq!(db.len(), 2);

        let track = db.get("figure-eight").unwrap();
        assert_eq!(track.half_width, 800.0);
        assert_eq!(track.start, [-500.0, 100.0]);
        assert_eq!(track.gates.len(), 2);
        assert_eq!(track.gate_radius, DEFAULT_GATE_RADIUS);

        // Omitted fields fall back to defaults
        let sprint = db.get("sprint").unwrap();
        assert_eq!(sprint.start_heading, 0.0);
        assert!(sprint.gates.is_empty());
        assert_eq!(sprint.island_half_width, 0.0);
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(TrackDatabase::parse("tracks = 3").is_err());
    }

    #[test]
    fn test_default_tracks_not_empty() {
        let db = TrackDatabase::default_tracks();
        assert!(!db.is_empty());
        assert!(db.get("oval").is_some());
    }

    #[test]
    fn test_get_unknown_track() {
        let db = TrackDatabase::default_tracks();
        assert!(db.get("nurburgring").is_none());
    }
}
