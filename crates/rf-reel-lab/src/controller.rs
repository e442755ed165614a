//! Game controller — the spin cycle state machine
//!
//! `Ready → Spinning → Evaluating → Ready`
//!
//! The controller is the only entry point a front end calls. It owns the
//! whole [`GameState`], debits and credits the ledger, drives the reel bank
//! once per frame and queues [`StageEvent`]s for the caller to drain.
//!
//! ## Event order for one spin
//!
//! ```text
//! request_spin  CreditChanged, SpinStart, Sound(loop spin)
//! per reel      ReelStopping, Sound(reel stop), … ReelStop
//! all stopped   Sound(stop spin), EvaluateWins, WinLineShow*,
//!               BigWin | NoWin, Sound(outcome), [CreditChanged], SpinEnd
//! ```

use serde::{Deserialize, Serialize};

use rf_stage::{RejectReason, SoundCommand, SoundId, Stage, StageEvent, WinOutcome};

use crate::bank::ReelBank;
use crate::config::SlotConfig;
use crate::error::{SlotError, SlotResult};
use crate::evaluator::{Evaluation, WinEvaluator};
use crate::hooks::Scene;
use crate::ledger::CreditLedger;
use crate::stats::SessionStats;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for a spin request
    #[default]
    Ready,
    /// Reels moving
    Spinning,
    /// All reels settled, scoring in progress
    Evaluating,
}

/// What happened to a spin request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRequest {
    /// Cost debited, reels started
    Started,
    /// A spin is already running
    Ignored,
    /// Refused; balance untouched
    Rejected(RejectReason),
}

impl SpinRequest {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// One settled and scored spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinSummary {
    /// 1-based spin number
    pub spin_index: u64,
    pub cost: u64,
    pub evaluation: Evaluation,
    pub outcome: WinOutcome,
    pub payout: u64,
    /// Balance after the payout
    pub balance: u64,
    /// Visible symbol IDs per reel, top to bottom
    pub reel_symbols: Vec<Vec<u32>>,
    pub started_ms: f64,
    pub ended_ms: f64,
}

impl SpinSummary {
    pub fn duration_ms(&self) -> f64 {
        self.ended_ms - self.started_ms
    }
}

/// Everything that changes during play
pub struct GameState {
    phase: GamePhase,
    bank: ReelBank,
    ledger: CreditLedger,
    stats: SessionStats,
    spin_count: u64,
    spin_started_ms: f64,
    clock_ms: f64,
    last_summary: Option<SpinSummary>,
}

impl GameState {
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn bank(&self) -> &ReelBank {
        &self.bank
    }

    pub fn ledger(&self) -> &CreditLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn last_summary(&self) -> Option<&SpinSummary> {
        self.last_summary.as_ref()
    }
}

/// Top-level reel game
pub struct GameController {
    config: SlotConfig,
    evaluator: WinEvaluator,
    state: GameState,
    outbox: Vec<StageEvent>,
}

impl GameController {
    /// Build a controller; invalid configuration is fatal here
    pub fn new(config: SlotConfig) -> SlotResult<Self> {
        let bank = ReelBank::from_config(&config)?;
        let evaluator = WinEvaluator::new(
            config.paytable.clone(),
            config.symbols.clone(),
            config.big_win_run,
        );
        log::info!(
            "Game '{}' ready: {}x{} grid, balance {}",
            config.game_id,
            config.grid.reels,
            config.grid.rows,
            config.starting_credit
        );

        Ok(Self {
            state: GameState {
                phase: GamePhase::Ready,
                bank,
                ledger: CreditLedger::new(config.starting_credit),
                stats: SessionStats::default(),
                spin_count: 0,
                spin_started_ms: 0.0,
                clock_ms: 0.0,
                last_summary: None,
            },
            evaluator,
            config,
            outbox: Vec::new(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn balance(&self) -> u64 {
        self.state.ledger.balance()
    }

    pub fn bank(&self) -> &ReelBank {
        &self.state.bank
    }

    pub fn stats(&self) -> &SessionStats {
        &self.state.stats
    }

    pub fn is_spinning(&self) -> bool {
        self.state.phase != GamePhase::Ready
    }

    /// Reseed the reel RNG
    pub fn seed(&mut self, seed: u64) {
        self.state.bank.seed(seed);
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> &[StageEvent] {
        &self.outbox
    }

    /// Push symbol offsets and changed kinds to a scene
    pub fn sync_scene(&mut self, scene: &mut dyn Scene) {
        self.state.bank.sync_scene(scene);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUESTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ask for a spin at driver time `now_ms`
    pub fn request_spin(&mut self, now_ms: f64) -> SpinRequest {
        self.state.clock_ms = now_ms;
        if self.is_spinning() {
            log::debug!("Spin requested while {:?}, ignoring", self.state.phase);
            return SpinRequest::Ignored;
        }

        let cost = self.config.spin_cost;
        let balance = match self.state.ledger.debit(cost) {
            Ok(balance) => balance,
            Err(SlotError::InsufficientCredit { balance, cost }) => {
                log::warn!("Spin rejected: balance {} below cost {}", balance, cost);
                self.state.stats.record_rejection();
                self.emit(
                    Stage::SpinRejected {
                        reason: RejectReason::InsufficientCredit,
                        balance,
                    },
                    now_ms,
                );
                return SpinRequest::Rejected(RejectReason::InsufficientCredit);
            }
            Err(e) => {
                log::error!("Unexpected ledger error: {}", e);
                return SpinRequest::Rejected(RejectReason::InsufficientCredit);
            }
        };

        self.state.spin_count += 1;
        self.state.spin_started_ms = now_ms;
        self.state.phase = GamePhase::Spinning;
        self.state.bank.start_all(now_ms);

        log::info!(
            "Spin #{} started: cost {}, balance {}",
            self.state.spin_count,
            cost,
            balance
        );
        self.emit(Stage::CreditChanged { balance }, now_ms);
        self.emit(Stage::SpinStart { cost }, now_ms);
        self.emit_sound(
            SoundCommand::Loop {
                sound: SoundId::SpinLoop,
            },
            now_ms,
        );
        SpinRequest::Started
    }

    /// Restore the balance to the configured recharge amount
    pub fn request_recharge(&mut self) -> u64 {
        let now_ms = self.state.clock_ms;
        let balance = self.config.recharge_amount;
        self.state.ledger.reset(balance);
        self.state.stats.record_recharge();
        log::info!("Balance recharged to {}", balance);
        self.emit(Stage::Recharge { balance }, now_ms);
        self.emit(Stage::CreditChanged { balance }, now_ms);
        balance
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FRAME
    // ═══════════════════════════════════════════════════════════════════════════

    /// Advance one frame; returns the summary on the frame the spin settles
    pub fn tick(&mut self, frame_delta: f64, now_ms: f64) -> Option<SpinSummary> {
        self.state.clock_ms = now_ms;
        if self.state.phase != GamePhase::Spinning {
            return None;
        }

        let report = self.state.bank.advance(frame_delta, now_ms);

        for &reel_index in &report.began_stopping {
            self.emit(Stage::ReelStopping { reel_index }, now_ms);
            self.emit_sound(
                SoundCommand::Play {
                    sound: SoundId::ReelStop,
                },
                now_ms,
            );
        }
        for &reel_index in &report.settled {
            let symbols = self
                .state
                .bank
                .visible_kinds(reel_index as usize)
                .into_iter()
                .map(|k| k.id())
                .collect();
            self.emit(
                Stage::ReelStop {
                    reel_index,
                    symbols,
                },
                now_ms,
            );
        }

        if !report.all_stopped {
            return None;
        }

        self.state.phase = GamePhase::Evaluating;
        let summary = self.finish_spin(now_ms);
        self.state.phase = GamePhase::Ready;
        self.state.last_summary = Some(summary.clone());
        Some(summary)
    }

    fn finish_spin(&mut self, now_ms: f64) -> SpinSummary {
        self.emit_sound(
            SoundCommand::Stop {
                sound: SoundId::SpinLoop,
            },
            now_ms,
        );
        self.emit(Stage::EvaluateWins, now_ms);

        let evaluation = self.evaluator.evaluate(&self.state.bank);
        let outcome = evaluation.outcome();
        let payout = evaluation.total_payout;

        for win in &evaluation.wins {
            let line = win.to_win_line(self.state.bank.catalog());
            self.emit(Stage::WinLineShow { line }, now_ms);
        }
        if evaluation.big_win {
            self.emit(Stage::BigWin { payout }, now_ms);
        } else if !evaluation.is_win() {
            self.emit(Stage::NoWin, now_ms);
        }
        self.emit_sound(
            SoundCommand::Play {
                sound: outcome.sound(),
            },
            now_ms,
        );

        let balance = if payout > 0 {
            let balance = self.state.ledger.credit(payout);
            self.emit(Stage::CreditChanged { balance }, now_ms);
            balance
        } else {
            self.state.ledger.balance()
        };

        let cost = self.config.spin_cost;
        self.state.stats.record_spin(cost, outcome, payout);
        self.emit(Stage::SpinEnd { outcome, payout }, now_ms);

        log::info!(
            "Spin #{} {}: {} run(s), payout {}, balance {}",
            self.state.spin_count,
            outcome.display_name(),
            evaluation.wins.len(),
            payout,
            balance
        );

        let reel_symbols = (0..self.state.bank.len())
            .map(|i| {
                self.state
                    .bank
                    .visible_kinds(i)
                    .into_iter()
                    .map(|k| k.id())
                    .collect()
            })
            .collect();

        SpinSummary {
            spin_index: self.state.spin_count,
            cost,
            evaluation,
            outcome,
            payout,
            balance,
            reel_symbols,
            started_ms: self.state.spin_started_ms,
            ended_ms: now_ms,
        }
    }

    fn emit(&mut self, stage: Stage, now_ms: f64) {
        self.outbox.push(StageEvent::new(stage, now_ms));
    }

    fn emit_sound(&mut self, command: SoundCommand, now_ms: f64) {
        self.emit(Stage::Sound { command }, now_ms);
    }
}
