//! Stage Taxonomy — Enums for reel game elements
//!
//! These types classify spin outcomes, rejection reasons and sound cues.

use serde::{Deserialize, Serialize};

/// Overall outcome of a settled spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinOutcome {
    /// No run of two or more anywhere
    NoWin,
    /// At least one paying run
    Win,
    /// At least one full-width run
    BigWin,
}

impl WinOutcome {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NoWin => "NO WIN",
            Self::Win => "WIN",
            Self::BigWin => "BIG WIN",
        }
    }

    /// Sound that announces this outcome
    pub fn sound(&self) -> SoundId {
        match self {
            Self::NoWin => SoundId::NoWin,
            Self::Win => SoundId::Win,
            Self::BigWin => SoundId::BigWin,
        }
    }

    /// Check if anything was paid
    pub fn is_win(&self) -> bool {
        !matches!(self, Self::NoWin)
    }
}

/// Why a spin request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Balance is below the spin cost
    InsufficientCredit,
}

impl RejectReason {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::InsufficientCredit => "Insufficient credit",
        }
    }
}

/// Logical sound identifiers
///
/// The audio layer maps these to assets; the engine never loads sound files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    /// Looping reel spin bed
    SpinLoop,
    /// One reel landing
    ReelStop,
    Win,
    NoWin,
    BigWin,
}

impl SoundId {
    /// Conventional asset stem for this sound
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::SpinLoop => "spin",
            Self::ReelStop => "reel-stop",
            Self::Win => "win",
            Self::NoWin => "no-win",
            Self::BigWin => "big-win",
        }
    }
}

/// Fire-and-forget audio command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SoundCommand {
    /// Play once
    Play { sound: SoundId },
    /// Start (or restart) a loop
    Loop { sound: SoundId },
    /// Stop a running loop
    Stop { sound: SoundId },
}

impl SoundCommand {
    /// Sound this command refers to
    pub fn sound(&self) -> SoundId {
        match self {
            Self::Play { sound } | Self::Loop { sound } | Self::Stop { sound } => *sound,
        }
    }
}

/// Position of a symbol on the settled grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolPosition {
    /// Reel index (0 = leftmost)
    pub reel: u8,
    /// Index of the symbol instance on that reel (creation order)
    pub instance: u8,
}

impl SymbolPosition {
    pub fn new(reel: u8, instance: u8) -> Self {
        Self { reel, instance }
    }
}

/// A winning run on one horizontal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLine {
    /// Row index (0 = top visible row)
    pub row_index: u8,
    /// Symbol ID that won
    pub symbol_id: u32,
    /// Symbol name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    /// First reel of the run
    pub start_reel: u8,
    /// Number of matching symbols
    pub run_length: u8,
    /// Credits paid for this run
    pub payout: u64,
    /// Positions that make up this win (for highlight)
    pub positions: Vec<SymbolPosition>,
}

impl WinLine {
    /// Reel range covered by this run
    pub fn reels(&self) -> std::ops::Range<u8> {
        self.start_reel..self.start_reel + self.run_length
    }
}
