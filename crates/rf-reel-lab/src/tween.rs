//! Frame-clock tweens
//!
//! Continuous transitions (spin-up ramp, stop snap) are pure functions of
//! the driver clock. The reel polls `is_finished` on later frames instead of
//! receiving a completion callback.

use serde::{Deserialize, Serialize};

/// Easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Ease {
    /// Linear
    Linear,
    /// Quadratic ease-out (`power1.out`)
    #[default]
    EaseOutQuad,
    /// Cubic ease-out (`power2.out`)
    EaseOutCubic,
    /// Quartic ease-out (`power3.out`)
    EaseOutQuart,
    /// Sine ease-in-out
    SineInOut,
}

impl Ease {
    /// Apply the curve to a linear progress value (0.0-1.0)
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,
            Ease::EaseOutQuad => 1.0 - (1.0 - t).powi(2),
            Ease::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Ease::SineInOut => (1.0 - (t * std::f64::consts::PI).cos()) / 2.0,
        }
    }
}

/// A scalar interpolation anchored to a start time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, start_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            ease,
        }
    }

    /// Linear progress at `now_ms` (0.0-1.0)
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased value at `now_ms`
    pub fn value_at(&self, now_ms: f64) -> f64 {
        let eased = self.ease.apply(self.progress(now_ms));
        self.from + (self.to - self.from) * eased
    }

    /// Has the tween reached its target
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ease_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::EaseOutQuad,
            Ease::EaseOutCubic,
            Ease::EaseOutQuart,
            Ease::SineInOut,
        ] {
            assert_abs_diff_eq!(ease.apply(0.0), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(ease.apply(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ease_out_is_monotonic_and_front_loaded() {
        let mut prev = 0.0;
        for step in 1..=100 {
            let t = step as f64 / 100.0;
            let v = Ease::EaseOutQuad.apply(t);
            assert!(v >= prev);
            // Ease-out runs ahead of linear
            assert!(v >= t);
            prev = v;
        }
    }

    #[test]
    fn test_tween_value() {
        let tween = Tween::new(0.0, 15.0, 1000.0, 600.0, Ease::EaseOutQuad);
        assert_eq!(tween.value_at(500.0), 0.0);
        assert_abs_diff_eq!(tween.value_at(1300.0), 15.0 * 0.75, epsilon = 1e-9);
        assert_eq!(tween.value_at(1600.0), 15.0);
        assert_eq!(tween.value_at(5000.0), 15.0);
        assert!(!tween.is_finished(1599.0));
        assert!(tween.is_finished(1600.0));
        assert_eq!(tween.end_ms(), 1600.0);
    }

    #[test]
    fn test_zero_duration_is_instant() {
        let tween = Tween::new(3.0, 9.0, 0.0, 0.0, Ease::Linear);
        assert!(tween.is_finished(0.0));
        assert_eq!(tween.value_at(0.0), 9.0);
    }
}
