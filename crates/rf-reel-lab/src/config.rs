//! Reel engine configuration

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::paytable::{BIG_WIN_RUN, MIN_RUN, PayTable};
use crate::symbols::SymbolCatalog;
use crate::timing::SpinTiming;

/// Grid specification (reels × rows) and track geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels (columns)
    pub reels: u8,
    /// Number of visible rows per reel
    pub rows: u8,
    /// Symbol edge length in track units
    pub symbol_size: f64,
    /// Gap between stacked symbols
    pub symbol_padding: f64,
}

impl GridSpec {
    /// Classic 5×3 cabinet (150 px icons, 10 px gap)
    pub fn classic_5x3() -> Self {
        Self {
            reels: 5,
            rows: 3,
            symbol_size: 150.0,
            symbol_padding: 10.0,
        }
    }

    /// Three-reel fruit machine
    pub fn classic_3x3() -> Self {
        Self {
            reels: 3,
            ..Self::classic_5x3()
        }
    }

    /// Distance between adjacent symbols on a track
    pub fn cell_size(&self) -> f64 {
        self.symbol_size + self.symbol_padding
    }

    /// Symbols per reel: visible rows plus one wraparound slot
    pub fn symbols_per_reel(&self) -> usize {
        self.rows as usize + 1
    }

    /// Total track length one symbol travels before wrapping
    pub fn track_height(&self) -> f64 {
        self.symbols_per_reel() as f64 * self.cell_size()
    }

    /// Sample offsets of the visible rows (seam slot excluded)
    pub fn row_targets(&self) -> Vec<f64> {
        (1..=self.rows as usize)
            .map(|r| r as f64 * self.cell_size())
            .collect()
    }

    /// Total visible positions
    pub fn total_positions(&self) -> usize {
        self.reels as usize * self.rows as usize
    }

    pub fn validate(&self) -> SlotResult<()> {
        if self.reels == 0 {
            return Err(SlotError::InvalidConfig("reel count must be at least 1".into()));
        }
        if self.rows == 0 {
            return Err(SlotError::InvalidConfig("row count must be at least 1".into()));
        }
        let cell = self.cell_size();
        if !(self.symbol_size.is_finite() && self.symbol_size > 0.0) || self.symbol_padding < 0.0
        {
            return Err(SlotError::InvalidConfig(format!(
                "invalid symbol geometry: size {}, padding {}",
                self.symbol_size, self.symbol_padding
            )));
        }
        if !(cell.is_finite() && cell > 0.0) {
            return Err(SlotError::InvalidConfig(format!("invalid cell size {cell}")));
        }
        Ok(())
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::classic_5x3()
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Game identifier (used in traces)
    pub game_id: String,
    pub grid: GridSpec,
    pub timing: SpinTiming,
    pub symbols: SymbolCatalog,
    pub paytable: PayTable,
    /// Exact run length that sets the big-win flag
    #[serde(default = "default_big_win_run")]
    pub big_win_run: u8,
    /// Full spin speed in track units per 60 Hz frame
    pub spin_speed: f64,
    /// Credits debited per spin
    pub spin_cost: u64,
    /// Balance at construction
    pub starting_credit: u64,
    /// Balance restored by a recharge request
    pub recharge_amount: u64,
    /// RNG seed for reproducible spins (None = OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_big_win_run() -> u8 {
    BIG_WIN_RUN
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            game_id: "classic".into(),
            grid: GridSpec::default(),
            timing: SpinTiming::default(),
            symbols: SymbolCatalog::default(),
            paytable: PayTable::default(),
            big_win_run: BIG_WIN_RUN,
            spin_speed: 15.0,
            spin_cost: 2,
            starting_credit: 50,
            recharge_amount: 50,
            seed: None,
        }
    }
}

impl SlotConfig {
    /// Default cabinet with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self::default().with_seed(seed)
    }

    /// Short, jitter-free cycles for tests and tooling
    pub fn studio(seed: u64) -> Self {
        Self {
            timing: SpinTiming::studio(),
            ..Self::seeded(seed)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_timing(mut self, timing: SpinTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_symbols(mut self, symbols: SymbolCatalog) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_paytable(mut self, paytable: PayTable) -> Self {
        self.paytable = paytable;
        self
    }

    /// Fail fast on anything that would make a spin meaningless
    pub fn validate(&self) -> SlotResult<()> {
        self.grid.validate()?;
        self.timing.validate()?;
        self.symbols.validate()?;
        self.paytable.validate(self.grid.reels)?;
        if !(self.spin_speed.is_finite() && self.spin_speed > 0.0) {
            return Err(SlotError::InvalidConfig(format!(
                "spin speed must be positive, got {}",
                self.spin_speed
            )));
        }
        if self.big_win_run < MIN_RUN {
            return Err(SlotError::InvalidConfig(format!(
                "big-win run length {} is below the minimum run {}",
                self.big_win_run, MIN_RUN
            )));
        }
        if self.big_win_run > self.grid.reels {
            log::warn!(
                "Big-win run length {} can never hit on {} reels",
                self.big_win_run,
                self.grid.reels
            );
        }
        if self.recharge_amount < self.spin_cost {
            return Err(SlotError::InvalidConfig(format!(
                "recharge amount {} does not cover spin cost {}",
                self.recharge_amount, self.spin_cost
            )));
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SlotResult<Self> {
        let config: SlotConfig =
            serde_json::from_str(json).map_err(|e| SlotError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> SlotResult<Self> {
        let config: SlotConfig =
            serde_yml::from_str(yaml).map_err(|e| SlotError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> SlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlotError::ConfigParse(e.to_string()))
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> SlotResult<String> {
        serde_yml::to_string(self).map_err(|e| SlotError::ConfigParse(e.to_string()))
    }
}
