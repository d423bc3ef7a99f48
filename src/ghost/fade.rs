//! Replay fade curve
//!
//! Ghost opacity is a pure function of the playback cursor, so it needs no
//! timers and rewinds for free when a replay is restarted. The curve ramps
//! in over the first FADE_TICKS samples, holds the base opacity through the
//! middle, and ramps back out over the last FADE_TICKS samples:
//!
//!   index <= ramp            : base * index / ramp
//!   sample_count - index <= ramp : base * (sample_count - index) / ramp
//!   otherwise                : base
//!
//! The fade-in branch wins when both apply, so replays shorter than twice
//! the ramp fade in normally and get their tail truncated instead of the
//! two ramps stacking.

/// Opacity for a playback cursor position. `base_alpha` is the plateau
/// value, `ramp` the ramp length in ticks.
pub fn fade_alpha(index: usize, sample_count: usize, ramp: usize, base_alpha: f32) -> f32 {
    let ramp = ramp.max(1);
    let remaining = sample_count.saturating_sub(index);

    if index <= ramp {
        base_alpha * index as f32 / ramp as f32
    } else if remaining <= ramp {
        base_alpha * remaining as f32 / ramp as f32
    } else {
        base_alpha
    }
}

/// True while the cursor is inside the trailing fade-out window.
///
/// Mirrors the branch structure of fade_alpha: positions swallowed by the
/// fade-in branch never count as fading out, so a replay no longer than the
/// ramp has no fade-out window at all.
pub fn in_fade_out_window(index: usize, sample_count: usize, ramp: usize) -> bool {
    let ramp = ramp.max(1);
    index > ramp && sample_count.saturating_sub(index) <= ramp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_ramp() {
        assert_eq!(fade_alpha(0, 100, 30, 0.8), 0.0);
        assert!((fade_alpha(15, 100, 30, 0.8) - 0.4).abs() < 1e-6);
        assert!((fade_alpha(30, 100, 30, 0.8) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_plateau() {
        for index in 31..70 {
            assert_eq!(fade_alpha(index, 100, 30, 0.8), 0.8, "index {index}");
        }
    }

    #[test]
    fn test_fade_out_ramp() {
        assert!((fade_alpha(70, 100, 30, 0.8) - 0.8).abs() < 1e-6);
        assert!((fade_alpha(85, 100, 30, 0.8) - 0.4).abs() < 1e-6);
        assert_eq!(fade_alpha(100, 100, 30, 0.8), 0.0);
    }

    #[test]
    fn test_monotonic_over_full_replay() {
        let mut prev = -1.0;
        for index in 0..=30 {
            let alpha = fade_alpha(index, 100, 30, 0.8);
            assert!(alpha >= prev, "fade-in not monotonic at {index}");
            prev = alpha;
        }
        prev = 1.0;
        for index in 70..=100 {
            let alpha = fade_alpha(index, 100, 30, 0.8);
            assert!(alpha <= prev, "fade-out not monotonic at {index}");
            prev = alpha;
        }
    }

    #[test]
    fn test_short_replay_truncates_fade_out() {
        // 40 samples with a 30 tick ramp: fade-in covers 0..=30, the tail
        // picks up mid-ramp without stacking on the fade-in values
        assert!((fade_alpha(30, 40, 30, 0.8) - 0.8).abs() < 1e-6);
        assert!((fade_alpha(31, 40, 30, 0.8) - 0.8 * 9.0 / 30.0).abs() < 1e-6);
        assert_eq!(fade_alpha(40, 40, 30, 0.8), 0.0);
    }

    #[test]
    fn test_replay_shorter_than_ramp_never_fades_out() {
        for index in 0..=20 {
            assert!(!in_fade_out_window(index, 20, 30), "index {index}");
        }
    }

    #[test]
    fn test_fade_out_window_bounds() {
        assert!(!in_fade_out_window(69, 100, 30));
        assert!(in_fade_out_window(70, 100, 30));
        assert!(in_fade_out_window(100, 100, 30));
        assert!(!in_fade_out_window(30, 100, 30));
    }

    #[test]
    fn test_zero_base_alpha() {
        for index in 0..=50 {
            assert_eq!(fade_alpha(index, 50, 30, 0.0), 0.0);
        }
    }
}
