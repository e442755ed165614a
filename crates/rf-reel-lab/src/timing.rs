//! Spin timing profiles and stop-deadline policy

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::tween::Ease;

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum TimingProfile {
    /// Cabinet timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Studio mode (short cycles for testing)
    Studio,
    /// Custom timing
    Custom,
}

/// Detailed spin timing configuration (all durations in milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Profile type
    pub profile: TimingProfile,

    /// Spin-up ramp from rest to full speed
    pub acceleration_ms: f64,

    /// Curve of the spin-up ramp
    pub acceleration_ease: Ease,

    /// Snap-to-grid animation once a reel starts stopping
    pub stop_animation_ms: f64,

    /// Curve of the snap animation
    pub stop_ease: Ease,

    /// Time from spin start until reel 0 may stop
    pub stop_base_delay_ms: f64,

    /// Added delay per reel index
    pub stop_stagger_ms: f64,

    /// Upper bound (exclusive) of random extra delay per reel
    pub stop_jitter_ms: f64,
}

impl SpinTiming {
    /// Cabinet timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            acceleration_ms: 600.0,
            acceleration_ease: Ease::EaseOutQuad,
            stop_animation_ms: 500.0,
            stop_ease: Ease::EaseOutCubic,
            stop_base_delay_ms: 2000.0,
            stop_stagger_ms: 400.0,
            stop_jitter_ms: 400.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            acceleration_ms: 300.0,
            stop_animation_ms: 250.0,
            stop_base_delay_ms: 800.0,
            stop_stagger_ms: 150.0,
            stop_jitter_ms: 100.0,
            ..Self::normal()
        }
    }

    /// Studio mode (deterministic order, no jitter)
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            acceleration_ms: 200.0,
            stop_animation_ms: 200.0,
            stop_base_delay_ms: 500.0,
            stop_stagger_ms: 200.0,
            stop_jitter_ms: 0.0,
            ..Self::normal()
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            acceleration_ms: self.acceleration_ms * factor,
            acceleration_ease: self.acceleration_ease,
            stop_animation_ms: self.stop_animation_ms * factor,
            stop_ease: self.stop_ease,
            stop_base_delay_ms: self.stop_base_delay_ms * factor,
            stop_stagger_ms: self.stop_stagger_ms * factor,
            stop_jitter_ms: self.stop_jitter_ms * factor,
        }
    }

    /// Stop deadline for a reel given an already drawn jitter value
    pub fn stop_deadline(&self, start_ms: f64, reel_index: u8, jitter_ms: f64) -> f64 {
        start_ms + self.stop_base_delay_ms + reel_index as f64 * self.stop_stagger_ms + jitter_ms
    }

    /// Latest possible moment the last reel settles
    pub fn max_spin_duration(&self, reel_count: u8) -> f64 {
        let last = reel_count.saturating_sub(1);
        self.stop_deadline(0.0, last, self.stop_jitter_ms) + self.stop_animation_ms
    }

    /// Can jitter ever reorder adjacent deadlines
    ///
    /// Jitter is drawn from `[0, stop_jitter_ms)`, so equality with the
    /// stagger still keeps deadlines strictly increasing.
    pub fn preserves_stop_order(&self) -> bool {
        self.stop_jitter_ms <= self.stop_stagger_ms
    }

    pub fn validate(&self) -> SlotResult<()> {
        let positive = [
            ("acceleration_ms", self.acceleration_ms),
            ("stop_animation_ms", self.stop_animation_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SlotError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("stop_base_delay_ms", self.stop_base_delay_ms),
            ("stop_stagger_ms", self.stop_stagger_ms),
            ("stop_jitter_ms", self.stop_jitter_ms),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SlotError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}
