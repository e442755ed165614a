//! Session statistics

use serde::{Deserialize, Serialize};

use rf_stage::WinOutcome;

/// Counters accumulated over a controller's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Completed (settled and evaluated) spins
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub big_wins: u64,
    /// Spin requests refused for lack of credit
    pub rejected: u64,
    pub recharges: u64,
    pub total_staked: u64,
    pub total_paid: u64,
    /// Largest single-spin payout
    pub max_payout: u64,
}

impl SessionStats {
    /// Record a settled spin
    pub fn record_spin(&mut self, cost: u64, outcome: WinOutcome, payout: u64) {
        self.total_spins += 1;
        self.total_staked += cost;
        self.total_paid += payout;
        self.max_payout = self.max_payout.max(payout);
        match outcome {
            WinOutcome::NoWin => self.losses += 1,
            WinOutcome::Win => self.wins += 1,
            WinOutcome::BigWin => {
                self.wins += 1;
                self.big_wins += 1;
            }
        }
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn record_recharge(&mut self) {
        self.recharges += 1;
    }

    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_staked > 0 {
            (self.total_paid as f64 / self.total_staked as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Share of spins with any win, percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::default();
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_record_spins() {
        let mut stats = SessionStats::default();
        stats.record_spin(2, WinOutcome::NoWin, 0);
        stats.record_spin(2, WinOutcome::Win, 5);
        stats.record_spin(2, WinOutcome::BigWin, 30);
        stats.record_spin(2, WinOutcome::NoWin, 0);
        stats.record_rejection();

        assert_eq!(stats.total_spins, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.big_wins, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.max_payout, 30);
        assert_relative_eq!(stats.hit_rate(), 50.0);
        assert_relative_eq!(stats.rtp(), 35.0 / 8.0 * 100.0);
    }
}
