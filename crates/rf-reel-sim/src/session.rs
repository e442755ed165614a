//! Session runner — drives one controller on a fixed clock

use anyhow::{Result, bail};
use rayon::prelude::*;
use serde::Serialize;

use rf_reel_lab::{GameController, SessionStats, SlotConfig, SpinRequest};
use rf_stage::StageTrace;

/// Fixed 60 Hz frame
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Spins to complete per session
    pub spins: u64,
    /// Recharge instead of ending the session when credit runs out
    pub auto_recharge: bool,
    /// Keep one stage trace per spin
    pub record_traces: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            spins: 100,
            auto_recharge: false,
            record_traces: false,
        }
    }
}

/// Outcome of one session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_index: usize,
    pub seed: Option<u64>,
    pub spins_completed: u64,
    /// Ran out of credit before completing every spin
    pub stopped_early: bool,
    pub final_balance: u64,
    /// Simulated clock at the end of the session
    pub elapsed_ms: f64,
    pub stats: SessionStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<StageTrace>,
}

/// Run one session to completion
pub fn run_session(
    config: SlotConfig,
    session_index: usize,
    options: &SessionOptions,
) -> Result<SessionReport> {
    let seed = config.seed;
    let game_id = config.game_id.clone();
    // Generous bound; a healthy spin settles well inside max_spin_duration
    let frame_budget =
        (config.timing.max_spin_duration(config.grid.reels) / FRAME_MS).ceil() as u64 * 2 + 60;

    let mut game = GameController::new(config)?;
    let mut now = 0.0;
    let mut completed = 0;
    let mut stopped_early = false;
    let mut just_recharged = false;
    let mut traces = Vec::new();

    while completed < options.spins {
        match game.request_spin(now) {
            SpinRequest::Started => just_recharged = false,
            SpinRequest::Rejected(reason) if options.auto_recharge && just_recharged => {
                log::warn!(
                    "Session {} ended after {} spins: {} right after a recharge",
                    session_index,
                    completed,
                    reason.display_name()
                );
                stopped_early = true;
                break;
            }
            SpinRequest::Rejected(reason) if options.auto_recharge => {
                log::debug!(
                    "Session {}: {}, recharging",
                    session_index,
                    reason.display_name()
                );
                game.request_recharge();
                just_recharged = true;
                continue;
            }
            SpinRequest::Rejected(reason) => {
                log::info!(
                    "Session {} ended after {} spins: {}",
                    session_index,
                    completed,
                    reason.display_name()
                );
                stopped_early = true;
                break;
            }
            SpinRequest::Ignored => bail!("spin ignored while controller idle"),
        }

        let mut frames = 0;
        let summary = loop {
            now += FRAME_MS;
            frames += 1;
            if let Some(summary) = game.tick(1.0, now) {
                break summary;
            }
            if frames > frame_budget {
                bail!(
                    "session {} spin {} did not settle within {} frames",
                    session_index,
                    completed + 1,
                    frame_budget
                );
            }
        };
        completed += 1;

        let events = game.drain_events();
        if options.record_traces {
            let mut trace = StageTrace::new(
                format!("session-{}-spin-{}", session_index, summary.spin_index),
                game_id.clone(),
            )
            .with_spin(summary.spin_index.to_string());
            trace.extend(events);
            traces.push(trace);
        }
    }

    Ok(SessionReport {
        session_index,
        seed,
        spins_completed: completed,
        stopped_early,
        final_balance: game.balance(),
        elapsed_ms: now,
        stats: game.stats().clone(),
        traces,
    })
}

/// Run `sessions` independent sessions in parallel
///
/// Session `i` is seeded with `seed + i` when the config carries a seed.
pub fn run_batch(
    config: &SlotConfig,
    sessions: usize,
    options: &SessionOptions,
) -> Result<Vec<SessionReport>> {
    (0..sessions)
        .into_par_iter()
        .map(|i| {
            let mut session_config = config.clone();
            if let Some(seed) = config.seed {
                session_config.seed = Some(seed.wrapping_add(i as u64));
            }
            run_session(session_config, i, options)
        })
        .collect()
}

/// Sum session counters
pub fn merge_stats<'a>(stats: impl IntoIterator<Item = &'a SessionStats>) -> SessionStats {
    stats
        .into_iter()
        .fold(SessionStats::default(), |mut total, s| {
            total.total_spins += s.total_spins;
            total.wins += s.wins;
            total.losses += s.losses;
            total.big_wins += s.big_wins;
            total.rejected += s.rejected;
            total.recharges += s.recharges;
            total.total_staked += s.total_staked;
            total.total_paid += s.total_paid;
            total.max_payout = total.max_payout.max(s.max_payout);
            total
        })
}
