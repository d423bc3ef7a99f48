//! Recorded laps
//!
//! A RecordedLap is an immutable sequence of per-tick force samples plus the
//! pose the lap started from. Laps are loaded from .lap files:
//!
//! ```text
//! # hotlap recording
//! track: oval
//! recorded: 2026-08-25T10:00:00Z
//! start: -650.0 0.0 -1.5708
//! 0.0|0.0|0.0
//! 12.5|-3.0|0.04
//! ```
//!
//! Header lines are keyed, sample lines are velocity_x|velocity_y|angular_velocity.

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use uuid::Uuid;

use crate::car::CarForces;

/// One recorded lap, fixed at creation time
#[derive(Debug, Clone)]
pub struct RecordedLap {
    /// Unique id for this lap instance
    id: String,
    /// Name of the track the lap was driven on
    track: String,
    /// When the lap was recorded
    recorded_at: DateTime<Utc>,
    /// Pose the recording started from
    start_position: Vec2,
    start_heading: f32,
    /// Per-tick force samples
    samples: Vec<CarForces>,
    /// False for empty laps and laps whose recording did not finish cleanly
    valid: bool,
}

impl Default for RecordedLap {
    fn default() -> Self {
        Self {
            id: String::new(),
            track: String::new(),
            recorded_at: DateTime::UNIX_EPOCH,
            start_position: Vec2::ZERO,
            start_heading: 0.0,
            samples: Vec::new(),
            valid: false,
        }
    }
}

impl RecordedLap {
    /// Build a lap from raw samples. The lap is valid iff it has samples.
    pub fn from_samples(
        track: &str,
        start_position: Vec2,
        start_heading: f32,
        samples: Vec<CarForces>,
    ) -> Self {
        let valid = !samples.is_empty();
        Self {
            id: Uuid::new_v4().to_string(),
            track: track.to_string(),
            recorded_at: Utc::now(),
            start_position,
            start_heading,
            samples,
            valid,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn track(&self) -> &str {
        &self.track
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn start_pose(&self) -> (Vec2, f32) {
        (self.start_position, self.start_heading)
    }

    /// Number of samples, one per simulation tick
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark the lap unusable, e.g. when the upstream recorder aborted mid-lap
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Lap length in seconds at the 60 Hz tick rate
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / 60.0
    }

    /// Sample at a cursor position. Out of range reads return the neutral
    /// sample so an exhausted replay holds its car still.
    pub fn sample_at(&self, index: usize) -> CarForces {
        self.samples.get(index).copied().unwrap_or(CarForces::NEUTRAL)
    }
}

/// Load a recorded lap from a .lap file
pub fn load_lap(path: &Path) -> Result<RecordedLap, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let reader = BufReader::new(file);
    parse_lap(reader).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Parse the .lap text format
pub fn parse_lap<R: BufRead>(reader: R) -> Result<RecordedLap, String> {
    let mut track: Option<String> = None;
    let mut recorded_at: Option<DateTime<Utc>> = None;
    let mut start: Option<(Vec2, f32)> = None;
    let mut samples = Vec::new();

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        let line = line.trim();

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(val) = line.strip_prefix("track:") {
            track = Some(val.trim().to_string());
            continue;
        }
        if let Some(val) = line.strip_prefix("recorded:") {
            recorded_at = DateTime::parse_from_rfc3339(val.trim())
                .ok()
                .map(|t| t.with_timezone(&Utc));
            continue;
        }
        if let Some(val) = line.strip_prefix("start:") {
            let parts: Vec<&str> = val.split_whitespace().collect();
            if parts.len() >= 3 {
                if let (Ok(x), Ok(y), Ok(heading)) =
                    (parts[0].parse(), parts[1].parse(), parts[2].parse())
                {
                    start = Some((Vec2::new(x, y), heading));
                }
            }
            continue;
        }

        // Force samples: velocity_x|velocity_y|angular_velocity
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() >= 3 {
            samples.push(CarForces {
                velocity_x: parts[0].parse().unwrap_or(0.0),
                velocity_y: parts[1].parse().unwrap_or(0.0),
                angular_velocity: parts[2].parse().unwrap_or(0.0),
            });
        }
    }

    let track = track.ok_or_else(|| "missing track header".to_string())?;
    let (start_position, start_heading) = start.ok_or_else(|| "missing start header".to_string())?;
    if samples.is_empty() {
        return Err("no force samples".to_string());
    }

    let mut lap = RecordedLap::from_samples(&track, start_position, start_heading, samples);
    if let Some(at) = recorded_at {
        lap.recorded_at = at;
    }
    Ok(lap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# test lap
track: oval
recorded: 2026-08-25T10:00:00Z
start: -650.0 0.0 -1.5708
0.0|0.0|0.0
12.5|-3.0|0.04
300.0|-20.0|0.0
";

    #[test]
    fn test_parse_lap_text() {
        let lap = parse_lap(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(lap.track(), "oval");
        assert_eq!(lap.len(), 3);
        assert!(lap.is_valid());

        let (pos, heading) = lap.start_pose();
        assert_eq!(pos, Vec2::new(-650.0, 0.0));
        assert!((heading + 1.5708).abs() < 1e-6);

        let sample = lap.sample_at(1);
        assert_eq!(sample.velocity_x, 12.5);
        assert_eq!(sample.angular_velocity, 0.04);
    }

    #[test]
    fn test_parse_requires_track_header() {
        let text = "start: 0 0 0\n1.0|2.0|3.0\n";
        assert!(parse_lap(Cursor::new(text)).is_err());
    }

    #[test]
    fn test_parse_requires_start_header() {
        let text = "track: oval\n1.0|2.0|3.0\n";
        assert!(parse_lap(Cursor::new(text)).is_err());
    }

    #[test]
    fn test_parse_requires_samples() {
        let text = "track: oval\nstart: 0 0 0\n";
        assert!(parse_lap(Cursor::new(text)).is_err());
    }

    #[test]
    fn test_malformed_sample_lines_skipped() {
        let text = "track: oval\nstart: 0 0 0\n1.0|2.0\n4.0|5.0|6.0\n";
        let lap = parse_lap(Cursor::new(text)).unwrap();
        assert_eq!(lap.len(), 1);
        assert_eq!(lap.sample_at(0).velocity_x, 4.0);
    }

    #[test]
    fn test_sample_out_of_range_is_neutral() {
        let lap = parse_lap(Cursor::new(SAMPLE)).unwrap();
        assert!(lap.sample_at(3).is_neutral());
        assert!(lap.sample_at(1000).is_neutral());
    }

    #[test]
    fn test_from_samples_validity() {
        let lap = RecordedLap::from_samples("oval", Vec2::ZERO, 0.0, Vec::new());
        assert!(!lap.is_valid());
        assert!(lap.is_empty());

        let lap =
            RecordedLap::from_samples("oval", Vec2::ZERO, 0.0, vec![CarForces::NEUTRAL]);
        assert!(lap.is_valid());
        assert_eq!(lap.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let mut lap =
            RecordedLap::from_samples("oval", Vec2::ZERO, 0.0, vec![CarForces::NEUTRAL]);
        lap.invalidate();
        assert!(!lap.is_valid());
    }
}
