//! Paytable — run length to credit payout

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Shortest run that counts as a win
pub const MIN_RUN: u8 = 2;

/// Run length that triggers the big-win celebration
pub const BIG_WIN_RUN: u8 = 5;

/// Run-length paytable
///
/// Lengths without an entry still count as wins but pay nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayTable {
    /// Credits paid per run length
    pub pays: BTreeMap<u8, u64>,
}

impl PayTable {
    /// Create from (run length, payout) pairs
    pub fn new(pays: impl IntoIterator<Item = (u8, u64)>) -> Self {
        Self {
            pays: pays.into_iter().collect(),
        }
    }

    /// Classic five-reel table: 2→1, 3→5, 4→10, 5→30
    pub fn classic() -> Self {
        Self::new([(2, 1), (3, 5), (4, 10), (5, 30)])
    }

    /// Payout for a run of `run_length`
    pub fn payout(&self, run_length: u8) -> u64 {
        self.pays.get(&run_length).copied().unwrap_or(0)
    }

    /// Highest single-run payout
    pub fn max_payout(&self) -> u64 {
        self.pays.values().copied().max().unwrap_or(0)
    }

    pub fn validate(&self, reel_count: u8) -> SlotResult<()> {
        if self.pays.is_empty() {
            return Err(SlotError::InvalidConfig("paytable is empty".into()));
        }
        for &len in self.pays.keys() {
            if len < MIN_RUN {
                return Err(SlotError::InvalidConfig(format!(
                    "paytable entry for run length {len} (minimum is {MIN_RUN})"
                )));
            }
            if len > reel_count {
                log::warn!(
                    "Paytable entry for run length {} can never hit on {} reels",
                    len,
                    reel_count
                );
            }
        }
        Ok(())
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::classic()
    }
}
