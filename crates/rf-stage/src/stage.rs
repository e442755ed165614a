//! Stage — The core enum defining all canonical reel-cycle phases
//!
//! A Stage is NOT an animation, NOT an engine event.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{RejectReason, SoundCommand, WinLine, WinOutcome};

/// Canonical game stage: the language the engine speaks to presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted, cost debited, reels spinning up
    SpinStart {
        /// Credits debited for this spin
        cost: u64,
    },

    /// Spin request refused
    SpinRejected {
        reason: RejectReason,
        /// Balance at the time of the request
        balance: u64,
    },

    /// Reel reached its stop deadline and is snapping to the grid
    ReelStopping {
        /// Which reel (0-indexed)
        reel_index: u8,
    },

    /// Reel has settled, showing final symbols
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: u8,
        /// Visible symbol IDs (top to bottom)
        #[serde(default)]
        symbols: Vec<u32>,
    },

    /// All reels stopped, wins being evaluated
    EvaluateWins,

    /// Spin complete, ready for next spin
    SpinEnd {
        outcome: WinOutcome,
        /// Total credits paid
        #[serde(default)]
        payout: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // WIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Individual winning run being highlighted
    WinLineShow { line: WinLine },

    /// Nothing matched
    NoWin,

    /// Full-width run landed (celebration)
    BigWin {
        #[serde(default)]
        payout: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // CREDIT
    // ═══════════════════════════════════════════════════════════════════════
    /// Balance changed (debit, payout or recharge)
    CreditChanged { balance: u64 },

    /// Player topped the balance back up
    Recharge { balance: u64 },

    // ═══════════════════════════════════════════════════════════════════════
    // AUDIO
    // ═══════════════════════════════════════════════════════════════════════
    /// Fire-and-forget sound cue
    Sound { command: SoundCommand },
}

impl Stage {
    /// Get stage type name (snake_case, matches serde tag)
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::SpinRejected { .. } => "spin_rejected",
            Stage::ReelStopping { .. } => "reel_stopping",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::EvaluateWins => "evaluate_wins",
            Stage::SpinEnd { .. } => "spin_end",
            Stage::WinLineShow { .. } => "win_line_show",
            Stage::NoWin => "no_win",
            Stage::BigWin { .. } => "big_win",
            Stage::CreditChanged { .. } => "credit_changed",
            Stage::Recharge { .. } => "recharge",
            Stage::Sound { .. } => "sound",
        }
    }

    /// Get category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::SpinRejected { .. }
            | Stage::ReelStopping { .. }
            | Stage::ReelStop { .. }
            | Stage::EvaluateWins
            | Stage::SpinEnd { .. } => StageCategory::SpinLifecycle,
            Stage::WinLineShow { .. } | Stage::NoWin | Stage::BigWin { .. } => {
                StageCategory::WinLifecycle
            }
            Stage::CreditChanged { .. } | Stage::Recharge { .. } => StageCategory::Credit,
            Stage::Sound { .. } => StageCategory::Audio,
        }
    }

    /// Reel index if this stage concerns a single reel
    pub fn reel_index(&self) -> Option<u8> {
        match self {
            Stage::ReelStopping { reel_index } | Stage::ReelStop { reel_index, .. } => {
                Some(*reel_index)
            }
            _ => None,
        }
    }

    /// Check if this stage closes a spin cycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::SpinEnd { .. } | Stage::SpinRejected { .. })
    }
}

/// Stage category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    SpinLifecycle,
    WinLifecycle,
    Credit,
    Audio,
}

impl StageCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SpinLifecycle => "Spin Lifecycle",
            Self::WinLifecycle => "Win Lifecycle",
            Self::Credit => "Credit",
            Self::Audio => "Audio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::SoundId;

    #[test]
    fn test_stage_serialization() {
        let stage = Stage::ReelStop {
            reel_index: 2,
            symbols: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("reel_stop"));
        assert!(json.contains("reel_index"));

        let deserialized: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, deserialized);
    }

    #[test]
    fn test_stage_category() {
        assert_eq!(
            Stage::SpinStart { cost: 2 }.category(),
            StageCategory::SpinLifecycle
        );
        assert_eq!(Stage::NoWin.category(), StageCategory::WinLifecycle);
        assert_eq!(
            Stage::CreditChanged { balance: 10 }.category(),
            StageCategory::Credit
        );
        assert_eq!(
            Stage::Sound {
                command: SoundCommand::Play {
                    sound: SoundId::ReelStop
                }
            }
            .category(),
            StageCategory::Audio
        );
    }

    #[test]
    fn test_type_name_matches_serde_tag() {
        let stage = Stage::SpinEnd {
            outcome: WinOutcome::Win,
            payout: 5,
        };
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json["type"], stage.type_name());
    }

    #[test]
    fn test_terminal_and_reel_index() {
        assert!(Stage::SpinEnd {
            outcome: WinOutcome::NoWin,
            payout: 0
        }
        .is_terminal());
        assert!(!Stage::EvaluateWins.is_terminal());
        assert_eq!(Stage::ReelStopping { reel_index: 3 }.reel_index(), Some(3));
        assert_eq!(Stage::EvaluateWins.reel_index(), None);
    }
}
