//! Reel bank — synchronized start, staggered stops, "all stopped" detection

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::{GridSpec, SlotConfig};
use crate::error::SlotResult;
use crate::hooks::Scene;
use crate::reel::{Reel, ReelPhase, ReelStep};
use crate::symbols::{SymbolCatalog, SymbolKind};
use crate::timing::SpinTiming;

/// Per-frame transitions reported by [`ReelBank::advance`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// Every reel is Stopped
    pub all_stopped: bool,
    /// Reels whose deadline fired this frame
    pub began_stopping: Vec<u8>,
    /// Reels that settled this frame
    pub settled: Vec<u8>,
}

/// All reels of one machine
pub struct ReelBank {
    reels: Vec<Reel>,
    grid: GridSpec,
    timing: SpinTiming,
    catalog: SymbolCatalog,
    spin_speed: f64,
    rng: ChaCha8Rng,
}

impl ReelBank {
    /// Build the bank described by `config`
    pub fn from_config(config: &SlotConfig) -> SlotResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Ok(Self::with_rng(config, rng))
    }

    fn with_rng(config: &SlotConfig, mut rng: ChaCha8Rng) -> Self {
        let grid = config.grid;
        let reels = (0..grid.reels)
            .map(|i| Reel::new(i, &grid, &config.symbols, &mut rng))
            .collect();

        Self {
            reels,
            grid,
            timing: config.timing.clone(),
            catalog: config.symbols.clone(),
            spin_speed: config.spin_speed,
            rng,
        }
    }

    /// Reseed the RNG for reproducible spins
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reel(&self, index: usize) -> Option<&Reel> {
        self.reels.get(index)
    }

    pub fn len(&self) -> usize {
        self.reels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reels.is_empty()
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn timing(&self) -> &SpinTiming {
        &self.timing
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn phases(&self) -> Vec<ReelPhase> {
        self.reels.iter().map(Reel::phase).collect()
    }

    pub fn stop_deadlines(&self) -> Vec<f64> {
        self.reels.iter().map(Reel::stop_deadline_ms).collect()
    }

    /// Every reel is Stopped
    pub fn all_stopped(&self) -> bool {
        self.reels.iter().all(Reel::is_stopped)
    }

    /// Start every reel and schedule its stop deadline from `now_ms`
    pub fn start_all(&mut self, now_ms: f64) {
        let jitter_max = self.timing.stop_jitter_ms;
        for reel in &mut self.reels {
            let jitter = if jitter_max > 0.0 {
                self.rng.random_range(0.0..jitter_max)
            } else {
                0.0
            };
            let deadline = self.timing.stop_deadline(now_ms, reel.index(), jitter);
            reel.start(now_ms, deadline, self.spin_speed, &self.timing);
        }
        log::debug!("Reels started at {:.1}ms, deadlines {:?}", now_ms, self.stop_deadlines());
    }

    /// Advance every non-stopped reel by one frame
    pub fn advance(&mut self, frame_delta: f64, now_ms: f64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        for reel in &mut self.reels {
            let step = reel.update(
                frame_delta,
                now_ms,
                &self.grid,
                &self.timing,
                &self.catalog,
                &mut self.rng,
            );
            match step {
                ReelStep::BeganStopping => report.began_stopping.push(reel.index()),
                ReelStep::Settled => report.settled.push(reel.index()),
                ReelStep::Rest | ReelStep::Moved => {}
            }
        }
        report.all_stopped = self.all_stopped();
        report
    }

    /// Visible kinds of one reel, top to bottom
    pub fn visible_kinds(&self, reel_index: usize) -> Vec<SymbolKind> {
        self.reels
            .get(reel_index)
            .map(|r| r.visible_kinds(&self.grid))
            .unwrap_or_default()
    }

    /// Push offsets (always) and kinds (when changed) to the scene
    pub fn sync_scene(&mut self, scene: &mut dyn Scene) {
        for reel in &mut self.reels {
            let reel_index = reel.index();
            for (i, symbol) in reel.symbols_mut().iter_mut().enumerate() {
                if symbol.kind_changed() {
                    scene.set_symbol_kind(reel_index, i as u8, symbol.kind());
                    symbol.mark_kind_synced();
                }
                scene.set_symbol_offset(reel_index, i as u8, symbol.offset());
            }
        }
    }
}
