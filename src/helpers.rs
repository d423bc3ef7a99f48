//! Utility functions for hotlap

use std::f32::consts::{PI, TAU};

/// Move a value toward a target by a maximum delta
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Wrap an angle into the (-PI, PI] range
pub fn wrap_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Smallest signed difference between two angles, in the (-PI, PI] range
pub fn angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_clamps_at_target() {
        assert_eq!(move_toward(0.0, 10.0, 4.0), 4.0);
        assert_eq!(move_toward(8.0, 10.0, 4.0), 10.0);
        assert_eq!(move_toward(10.0, 0.0, 4.0), 6.0);
    }

    #[test]
    fn test_wrap_angle_stays_in_range() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-TAU - 0.5) + 0.5).abs() < 1e-5);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn test_angle_delta_takes_short_way() {
        let d = angle_delta(3.0, -3.0);
        assert!(d.abs() < 1.0, "expected short path across PI, got {d}");
    }
}
