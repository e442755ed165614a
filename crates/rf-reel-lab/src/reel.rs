//! Reel — symbol track and spin/stop state machine
//!
//! ```text
//! Idle ──start──▶ Accelerating ──ramp done──▶ Spinning
//!                      │                          │
//!                      └────── deadline ──────────┤
//!                                                 ▼
//!              Stopped ◀──snap done── Stopping
//!                 │
//!                 └──start──▶ Accelerating …
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::symbols::{SymbolCatalog, SymbolKind};
use crate::timing::SpinTiming;
use crate::tween::Tween;

/// Spin phase of a single reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReelPhase {
    /// Never spun
    Idle,
    /// Ramping up to spin speed
    Accelerating,
    /// Constant-speed spin
    Spinning,
    /// Snapping to the grid
    Stopping,
    /// Settled; waits for the next spin
    Stopped,
}

impl ReelPhase {
    /// Offsets advance with speed in these phases
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Accelerating | Self::Spinning)
    }

    /// Not moving and not going to move without a new spin
    pub fn is_at_rest(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped)
    }
}

/// A positioned occurrence of a symbol kind on one reel's track
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInstance {
    offset: f64,
    kind: SymbolKind,
    kind_changed: bool,
}

impl SymbolInstance {
    fn new(offset: f64, kind: SymbolKind) -> Self {
        Self {
            offset,
            kind,
            kind_changed: true,
        }
    }

    /// Track-local vertical offset
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Kind was reassigned since the scene last read it
    pub fn kind_changed(&self) -> bool {
        self.kind_changed
    }

    pub(crate) fn mark_kind_synced(&mut self) {
        self.kind_changed = false;
    }
}

/// What a reel did during one `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelStep {
    /// Nothing to do (at rest)
    Rest,
    /// Offsets moved or snap animation progressed
    Moved,
    /// Deadline reached; snap animation started this frame
    BeganStopping,
    /// Snap animation finished; reel is now Stopped
    Settled,
}

/// Snap animation shared by all instances of a reel
#[derive(Debug, Clone)]
struct StopPlan {
    progress: Tween,
    from: Vec<f64>,
    targets: Vec<f64>,
}

/// One reel: `rows + 1` symbol instances on a wraparound track
#[derive(Debug, Clone)]
pub struct Reel {
    index: u8,
    symbols: Vec<SymbolInstance>,
    phase: ReelPhase,
    speed: f64,
    position: f64,
    stop_deadline_ms: f64,
    ramp: Option<Tween>,
    stop_plan: Option<StopPlan>,
}

impl Reel {
    /// Build a reel with evenly spaced random symbols
    pub fn new<R: Rng + ?Sized>(
        index: u8,
        grid: &GridSpec,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> Self {
        let cell = grid.cell_size();
        let symbols = (0..grid.symbols_per_reel())
            .map(|j| SymbolInstance::new(j as f64 * cell, catalog.random_kind(rng)))
            .collect();

        Self {
            index,
            symbols,
            phase: ReelPhase::Idle,
            speed: 0.0,
            position: 0.0,
            stop_deadline_ms: f64::INFINITY,
            ramp: None,
            stop_plan: None,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn phase(&self) -> ReelPhase {
        self.phase
    }

    /// Current speed in track units per frame
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Distance travelled since the last spin start
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn stop_deadline_ms(&self) -> f64 {
        self.stop_deadline_ms
    }

    pub fn symbols(&self) -> &[SymbolInstance] {
        &self.symbols
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut [SymbolInstance] {
        &mut self.symbols
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == ReelPhase::Stopped
    }

    /// Reset and begin a new spin
    pub fn start(&mut self, now_ms: f64, stop_deadline_ms: f64, spin_speed: f64, timing: &SpinTiming) {
        self.phase = ReelPhase::Accelerating;
        self.speed = 0.0;
        self.position = 0.0;
        self.stop_deadline_ms = stop_deadline_ms;
        self.stop_plan = None;
        self.ramp = Some(Tween::new(
            0.0,
            spin_speed,
            now_ms,
            timing.acceleration_ms,
            timing.acceleration_ease,
        ));
    }

    /// Advance one frame
    ///
    /// `frame_delta` is elapsed time in 60 Hz frames; `now_ms` is the driver clock.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        frame_delta: f64,
        now_ms: f64,
        grid: &GridSpec,
        timing: &SpinTiming,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) -> ReelStep {
        if !now_ms.is_finite() {
            log::warn!("Reel {} skipped frame with clock {}", self.index, now_ms);
            return ReelStep::Rest;
        }
        match self.phase {
            ReelPhase::Idle | ReelPhase::Stopped => ReelStep::Rest,
            ReelPhase::Accelerating | ReelPhase::Spinning => {
                if now_ms >= self.stop_deadline_ms {
                    self.begin_stop(now_ms, grid, timing);
                    return ReelStep::BeganStopping;
                }
                self.update_speed(now_ms);
                let delta = if frame_delta.is_finite() && frame_delta > 0.0 {
                    self.speed * frame_delta
                } else {
                    0.0
                };
                self.advance_offsets(delta, grid, catalog, rng);
                ReelStep::Moved
            }
            ReelPhase::Stopping => self.update_stop(now_ms),
        }
    }

    fn update_speed(&mut self, now_ms: f64) {
        let Some(ramp) = self.ramp else {
            return;
        };
        self.speed = ramp.value_at(now_ms);
        if self.phase == ReelPhase::Accelerating && ramp.is_finished(now_ms) {
            self.speed = ramp.to;
            self.phase = ReelPhase::Spinning;
            log::debug!("Reel {} at full speed", self.index);
        }
    }

    /// Move every instance by `delta`, recycling the ones that pass the seam
    ///
    /// Whole laps are dropped, so an instance recycles at most once per frame.
    fn advance_offsets<R: Rng + ?Sized>(
        &mut self,
        delta: f64,
        grid: &GridSpec,
        catalog: &SymbolCatalog,
        rng: &mut R,
    ) {
        let track = grid.track_height();
        self.position += delta;
        let step = delta.rem_euclid(track);
        for symbol in &mut self.symbols {
            let moved = symbol.offset + step;
            if moved >= track {
                symbol.offset = moved.rem_euclid(track);
                symbol.kind = catalog.random_kind(rng);
                symbol.kind_changed = true;
            } else {
                symbol.offset = moved;
            }
        }
    }

    fn begin_stop(&mut self, now_ms: f64, grid: &GridSpec, timing: &SpinTiming) {
        let track = grid.track_height();
        let cell = grid.cell_size();
        let from: Vec<f64> = self.symbols.iter().map(|s| s.offset).collect();
        let targets = from
            .iter()
            .map(|&offset| snap_target(offset, track, cell))
            .collect();

        self.phase = ReelPhase::Stopping;
        self.ramp = None;
        self.stop_plan = Some(StopPlan {
            progress: Tween::new(0.0, 1.0, now_ms, timing.stop_animation_ms, timing.stop_ease),
            from,
            targets,
        });
        log::debug!("Reel {} stopping at {:.1}ms", self.index, now_ms);
    }

    fn update_stop(&mut self, now_ms: f64) -> ReelStep {
        let Some(plan) = self.stop_plan.as_ref() else {
            // Stopping without a plan cannot happen through `begin_stop`; settle in place
            self.settle();
            return ReelStep::Settled;
        };

        let t = plan.progress.value_at(now_ms);
        let finished = plan.progress.is_finished(now_ms);
        for ((symbol, &from), &target) in self
            .symbols
            .iter_mut()
            .zip(&plan.from)
            .zip(&plan.targets)
        {
            symbol.offset = if finished {
                target
            } else {
                from + (target - from) * t
            };
        }

        if finished {
            self.settle();
            ReelStep::Settled
        } else {
            ReelStep::Moved
        }
    }

    fn settle(&mut self) {
        self.phase = ReelPhase::Stopped;
        self.speed = 0.0;
        self.stop_plan = None;
        log::debug!("Reel {} stopped", self.index);
    }

    /// Index of the instance closest to `target`; ties go to the first
    pub fn closest_instance(&self, target: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, symbol) in self.symbols.iter().enumerate() {
            let delta = (symbol.offset - target).abs();
            match best {
                Some((_, min)) if delta >= min => {}
                _ => best = Some((i, delta)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Visible symbols top to bottom (closest instance per row)
    pub fn visible_kinds(&self, grid: &GridSpec) -> Vec<SymbolKind> {
        grid.row_targets()
            .into_iter()
            .filter_map(|target| self.closest_instance(target))
            .map(|i| self.symbols[i].kind)
            .collect()
    }
}

/// Nearest grid-aligned offset for a symbol at `offset`
pub fn snap_target(offset: f64, track: f64, cell: f64) -> f64 {
    let current = offset.rem_euclid(track);
    (current / cell).round() * cell
}
