//! Spin Cycle Test Suite
//!
//! Drives whole spins through `GameController` on a fixed 60 Hz clock.
//! Tests cover:
//! - Stop timing and left-to-right stop order
//! - Grid alignment after settling
//! - Credit conservation across a session
//! - Rejection and recharge
//! - Stage traces and hook dispatch
//! - Seed reproducibility

use approx::assert_abs_diff_eq;
use rf_reel_lab::{
    AudioSink, GameController, GamePhase, GridSpec, Presentation, Scene, SlotConfig, SpinRequest,
    SpinSummary, SpinTiming, StageDispatcher, SymbolKind,
};
use rf_stage::{RejectReason, SoundId, Stage, StageEvent, StageTrace, WinLine, WinOutcome};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Fixed-step driver; keeps its own clock across spins
struct Driver {
    game: GameController,
    now: f64,
}

impl Driver {
    fn new(config: SlotConfig) -> Self {
        Self {
            game: GameController::new(config).unwrap(),
            now: 0.0,
        }
    }

    fn spin(&mut self) -> Option<SpinSummary> {
        if !self.game.request_spin(self.now).is_started() {
            return None;
        }
        for _ in 0..100_000 {
            self.now += FRAME_MS;
            if let Some(summary) = self.game.tick(1.0, self.now) {
                return Some(summary);
            }
        }
        panic!("spin never settled");
    }
}

#[derive(Default)]
struct CountingAudio {
    loops_started: u32,
    loops_stopped: u32,
    played: Vec<SoundId>,
}

impl AudioSink for CountingAudio {
    fn play(&mut self, sound: SoundId) {
        self.played.push(sound);
    }

    fn start_loop(&mut self, _sound: SoundId) {
        self.loops_started += 1;
    }

    fn stop_loop(&mut self, _sound: SoundId) {
        self.loops_stopped += 1;
    }
}

#[derive(Default)]
struct Display {
    balance: Option<u64>,
    rejected: Vec<u64>,
    results: Vec<(Vec<WinLine>, WinOutcome, u64)>,
}

impl Presentation for Display {
    fn credit_changed(&mut self, balance: u64) {
        self.balance = Some(balance);
    }

    fn spin_rejected(&mut self, _reason: RejectReason, balance: u64) {
        self.rejected.push(balance);
    }

    fn spin_result(&mut self, lines: &[WinLine], outcome: WinOutcome, payout: u64) {
        self.results.push((lines.to_vec(), outcome, payout));
    }
}

#[derive(Default)]
struct Sprites {
    kinds: std::collections::HashMap<(u8, u8), SymbolKind>,
    offsets: std::collections::HashMap<(u8, u8), f64>,
}

impl Scene for Sprites {
    fn set_symbol_kind(&mut self, reel: u8, instance: u8, kind: SymbolKind) {
        self.kinds.insert((reel, instance), kind);
    }

    fn set_symbol_offset(&mut self, reel: u8, instance: u8, offset: f64) {
        self.offsets.insert((reel, instance), offset);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_normal_spin_duration_bounds() {
    let mut driver = Driver::new(SlotConfig::seeded(21));
    let summary = driver.spin().unwrap();

    // Last deadline is in [3600, 4000), plus a 500 ms stop animation
    assert!(summary.duration_ms() >= 4100.0);
    assert!(summary.duration_ms() < 4500.0 + 2.0 * FRAME_MS);
}

#[test]
fn test_turbo_is_faster_than_normal() {
    let mut normal = Driver::new(SlotConfig::seeded(4));
    let mut turbo = Driver::new(SlotConfig::seeded(4).with_timing(SpinTiming::turbo()));
    let a = normal.spin().unwrap();
    let b = turbo.spin().unwrap();
    assert!(b.duration_ms() < a.duration_ms());
}

#[test]
fn test_reels_stop_left_to_right_every_spin() {
    let mut driver = Driver::new(SlotConfig::seeded(99));
    for _ in 0..10 {
        driver.game.drain_events();
        driver.spin().unwrap();
        let mut trace = StageTrace::new("order", "classic");
        trace.extend(driver.game.drain_events());
        assert_eq!(trace.reel_stop_order(), vec![0, 1, 2, 3, 4]);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GEOMETRY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_offsets_grid_aligned_after_spin() {
    let mut driver = Driver::new(SlotConfig::studio(8));
    for _ in 0..5 {
        driver.spin().unwrap();
        let cell = driver.game.bank().grid().cell_size();
        for reel in driver.game.bank().reels() {
            for symbol in reel.symbols() {
                let rem = symbol.offset() % cell;
                assert_abs_diff_eq!(rem, 0.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_scene_receives_settled_offsets() {
    let mut driver = Driver::new(SlotConfig::studio(12));
    let mut sprites = Sprites::default();
    driver.game.sync_scene(&mut sprites);
    assert_eq!(sprites.kinds.len(), 20);

    driver.spin().unwrap();
    driver.game.sync_scene(&mut sprites);
    for reel in driver.game.bank().reels() {
        for (i, symbol) in reel.symbols().iter().enumerate() {
            let key = (reel.index(), i as u8);
            assert_eq!(sprites.kinds[&key], symbol.kind());
            assert_abs_diff_eq!(sprites.offsets[&key], symbol.offset());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CREDIT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_credit_conservation() {
    let mut driver = Driver::new(SlotConfig::studio(31));
    let mut expected = 50u64;
    while let Some(summary) = driver.spin() {
        expected = expected - 2 + summary.payout;
        assert_eq!(driver.game.balance(), expected);
        if summary.spin_index >= 200 {
            break;
        }
    }
    let stats = driver.game.stats();
    assert_eq!(
        driver.game.balance(),
        50 - stats.total_staked + stats.total_paid
    );
}

#[test]
fn test_out_of_credit_then_recharge() {
    let config = SlotConfig {
        starting_credit: 1,
        ..SlotConfig::studio(2)
    };
    let mut driver = Driver::new(config);

    assert_eq!(
        driver.game.request_spin(0.0),
        SpinRequest::Rejected(RejectReason::InsufficientCredit)
    );
    assert_eq!(driver.game.balance(), 1);
    assert_eq!(driver.game.phase(), GamePhase::Ready);

    driver.game.request_recharge();
    assert_eq!(driver.game.balance(), 50);
    assert!(driver.spin().is_some());
}

#[test]
fn test_request_during_spin_changes_nothing() {
    let mut driver = Driver::new(SlotConfig::seeded(6));
    driver.game.request_spin(0.0);
    for i in 1..=30 {
        driver.game.tick(1.0, i as f64 * FRAME_MS);
    }
    let phases = driver.game.bank().phases();
    let balance = driver.game.balance();

    assert_eq!(
        driver.game.request_spin(30.0 * FRAME_MS),
        SpinRequest::Ignored
    );
    assert_eq!(driver.game.bank().phases(), phases);
    assert_eq!(driver.game.balance(), balance);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STAGES & HOOKS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_trace_validates_and_round_trips() {
    let mut driver = Driver::new(SlotConfig::seeded(17));
    driver.spin().unwrap();

    let mut trace = StageTrace::new("trace-1", "classic").with_spin("1");
    trace.extend(driver.game.drain_events());

    let validation = trace.validate(5);
    assert!(validation.is_valid(), "{:?}", validation.warnings());
    assert!(trace.has_stage("evaluate_wins"));

    let json = trace.to_json().unwrap();
    let back = StageTrace::from_json(&json).unwrap();
    assert_eq!(back.events.len(), trace.events.len());
    for (a, b) in back.events.iter().zip(&trace.events) {
        assert_eq!(a.stage, b.stage);
    }
    assert_eq!(back.outcome(), trace.outcome());
}

#[test]
fn test_dispatch_to_hooks() {
    let mut driver = Driver::new(SlotConfig::studio(44));
    let mut dispatcher = StageDispatcher::new();
    let mut audio = CountingAudio::default();
    let mut display = Display::default();

    for _ in 0..10 {
        driver.spin().unwrap();
        let events: Vec<StageEvent> = driver.game.drain_events();
        dispatcher.dispatch(&events, &mut audio, &mut display);
    }

    assert_eq!(audio.loops_started, 10);
    assert_eq!(audio.loops_stopped, 10);
    let reel_stops = audio
        .played
        .iter()
        .filter(|s| **s == SoundId::ReelStop)
        .count();
    assert_eq!(reel_stops, 50);
    assert_eq!(display.results.len(), 10);
    assert_eq!(display.balance, Some(driver.game.balance()));

    for (lines, outcome, payout) in &display.results {
        assert_eq!(lines.is_empty(), *outcome == WinOutcome::NoWin);
        assert_eq!(lines.iter().map(|l| l.payout).sum::<u64>(), *payout);
    }
}

#[test]
fn test_rejection_reaches_presentation() {
    let config = SlotConfig {
        starting_credit: 1,
        ..SlotConfig::studio(3)
    };
    let mut game = GameController::new(config).unwrap();
    let mut dispatcher = StageDispatcher::new();
    let mut audio = CountingAudio::default();
    let mut display = Display::default();

    game.request_spin(0.0);
    dispatcher.dispatch(&game.drain_events(), &mut audio, &mut display);
    assert_eq!(display.rejected, vec![1]);
    assert!(audio.played.is_empty());
}

#[test]
fn test_big_win_stage_follows_flag() {
    let mut driver = Driver::new(SlotConfig::studio(5));
    for _ in 0..25 {
        let summary = driver.spin().unwrap();
        let events = driver.game.drain_events();
        let big = events
            .iter()
            .any(|e| matches!(e.stage, Stage::BigWin { .. }));
        assert_eq!(big, summary.evaluation.big_win);
        assert_eq!(
            summary.evaluation.big_win,
            summary.evaluation.wins.iter().any(|w| w.run_length == 5)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REPRODUCIBILITY & CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_same_seed_same_session() {
    let mut a = Driver::new(SlotConfig::seeded(1234));
    let mut b = Driver::new(SlotConfig::seeded(1234));
    for _ in 0..5 {
        let sa = a.spin().unwrap();
        let sb = b.spin().unwrap();
        assert_eq!(sa.reel_symbols, sb.reel_symbols);
        assert_eq!(sa.payout, sb.payout);
        assert_eq!(sa.ended_ms, sb.ended_ms);
    }
}

#[test]
fn test_yaml_config_drives_three_reels() {
    let config = SlotConfig::studio(9).with_grid(GridSpec::classic_3x3());
    let yaml = config.to_yaml().unwrap();

    let loaded = SlotConfig::from_yaml(&yaml).unwrap();
    assert_eq!(loaded.big_win_run, 5);
    let mut driver = Driver::new(loaded);
    for _ in 0..20 {
        let summary = driver.spin().unwrap();
        assert_eq!(summary.reel_symbols.len(), 3);
        // A full three-reel row pays but never reaches the big-win run
        assert!(!summary.evaluation.big_win);
        assert_ne!(summary.outcome, WinOutcome::BigWin);
    }
}
