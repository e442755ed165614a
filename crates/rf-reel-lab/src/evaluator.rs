//! Win evaluator — samples the settled grid and scores horizontal runs

use serde::{Deserialize, Serialize};

use rf_stage::{SymbolPosition, WinLine, WinOutcome};

use crate::bank::ReelBank;
use crate::paytable::{MIN_RUN, PayTable};
use crate::symbols::{SymbolCatalog, SymbolKind};

/// One sampled cell: the instance closest to a row target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampledSymbol {
    pub kind: SymbolKind,
    /// Instance index on its reel (creation order)
    pub instance: u8,
}

/// Settled symbols arranged by row, each row ordered by reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledGrid {
    pub rows: Vec<Vec<SampledSymbol>>,
}

impl SettledGrid {
    /// Sample a bank: for every row target and reel, the closest instance
    pub fn sample(bank: &ReelBank) -> Self {
        let targets = bank.grid().row_targets();
        let rows = targets
            .iter()
            .map(|&target| {
                bank.reels()
                    .iter()
                    .filter_map(|reel| {
                        reel.closest_instance(target).map(|i| SampledSymbol {
                            kind: reel.symbols()[i].kind(),
                            instance: i as u8,
                        })
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Build from kinds, row by row
    ///
    /// Instance indices assume an unspun layout, where row `r` is shown by
    /// instance `r + 1`.
    pub fn from_rows(rows: Vec<Vec<SymbolKind>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(r, kinds)| {
                kinds
                    .into_iter()
                    .map(|kind| SampledSymbol {
                        kind,
                        instance: (r + 1) as u8,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Kinds of one row
    pub fn row_kinds(&self, row: usize) -> Vec<SymbolKind> {
        self.rows
            .get(row)
            .map(|r| r.iter().map(|s| s.kind).collect())
            .unwrap_or_default()
    }

    /// Kinds of one reel, top to bottom
    pub fn column_kinds(&self, reel: usize) -> Vec<SymbolKind> {
        self.rows
            .iter()
            .filter_map(|row| row.get(reel).map(|s| s.kind))
            .collect()
    }
}

/// A maximal run of equal kinds on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinResult {
    pub row: u8,
    pub kind: SymbolKind,
    pub start_reel: u8,
    pub run_length: u8,
    pub payout: u64,
    /// Symbols making up the run, in reel order
    pub positions: Vec<SymbolPosition>,
}

impl WinResult {
    /// Convert to the outward stage vocabulary
    pub fn to_win_line(&self, catalog: &SymbolCatalog) -> WinLine {
        WinLine {
            row_index: self.row,
            symbol_id: self.kind.id(),
            symbol_name: catalog.name(self.kind).map(str::to_owned),
            start_reel: self.start_reel,
            run_length: self.run_length,
            payout: self.payout,
            positions: self.positions.clone(),
        }
    }
}

/// Result of evaluating a settled grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub wins: Vec<WinResult>,
    pub total_payout: u64,
    pub big_win: bool,
}

impl Evaluation {
    pub fn is_win(&self) -> bool {
        !self.wins.is_empty()
    }

    pub fn outcome(&self) -> WinOutcome {
        if self.big_win {
            WinOutcome::BigWin
        } else if self.is_win() {
            WinOutcome::Win
        } else {
            WinOutcome::NoWin
        }
    }

    /// Wins on one row
    pub fn wins_on_row(&self, row: u8) -> impl Iterator<Item = &WinResult> {
        self.wins.iter().filter(move |w| w.row == row)
    }
}

/// Maximal runs `(start, length)` of equal identity with length ≥ `MIN_RUN`
pub fn find_runs(identities: &[u32]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=identities.len() {
        if i == identities.len() || identities[i] != identities[start] {
            let len = i - start;
            if len >= MIN_RUN as usize {
                runs.push((start, len));
            }
            start = i;
        }
    }
    runs
}

/// Scores settled grids against a paytable
#[derive(Debug, Clone)]
pub struct WinEvaluator {
    paytable: PayTable,
    catalog: SymbolCatalog,
    big_win_run: u8,
}

impl WinEvaluator {
    /// `big_win_run` is the exact run length that sets the big-win flag
    pub fn new(paytable: PayTable, catalog: SymbolCatalog, big_win_run: u8) -> Self {
        Self {
            paytable,
            catalog,
            big_win_run,
        }
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Sample and score a settled bank
    pub fn evaluate(&self, bank: &ReelBank) -> Evaluation {
        self.evaluate_grid(&SettledGrid::sample(bank))
    }

    /// Score a grid; pure with respect to its input
    pub fn evaluate_grid(&self, grid: &SettledGrid) -> Evaluation {
        let mut wins = Vec::new();
        for (row_index, row) in grid.rows.iter().enumerate() {
            let identities: Vec<u32> = row.iter().map(|s| self.catalog.identity(s.kind)).collect();
            for (start, len) in find_runs(&identities) {
                let run_length = len as u8;
                wins.push(WinResult {
                    row: row_index as u8,
                    kind: row[start].kind,
                    start_reel: start as u8,
                    run_length,
                    payout: self.paytable.payout(run_length),
                    positions: (start..start + len)
                        .map(|reel| SymbolPosition::new(reel as u8, row[reel].instance))
                        .collect(),
                });
            }
        }

        let total_payout = wins.iter().map(|w| w.payout).sum();
        let big_win = wins.iter().any(|w| w.run_length == self.big_win_run);

        Evaluation {
            wins,
            total_payout,
            big_win,
        }
    }
}
