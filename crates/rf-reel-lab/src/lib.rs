//! # rf-reel-lab — Reel Spin Engine for FluxForge Studio
//!
//! Frame-driven reel machine: spin-up, timed staggered stops, grid snapping
//! and horizontal run evaluation, with a credit ledger in front of it.
//!
//! ## Features
//!
//! - **Reel State Machine**: Idle → Accelerating → Spinning → Stopping → Stopped
//! - **Staggered Stops**: Per-reel deadlines, left to right, with seeded jitter
//! - **Run Evaluation**: Horizontal runs of 2+ equal symbols, big win on full width
//! - **Credit Ledger**: Non-negative balance, spin debits, payouts, recharge
//! - **Stage Output**: Every transition is queued as an `rf-stage` event
//!
//! ## Architecture
//!
//! ```text
//! GameController
//!     │
//!     ├── CreditLedger (balance)
//!     ├── ReelBank ── Reel × N (offsets, phases, tweens)
//!     └── WinEvaluator (PayTable, SymbolCatalog)
//!           │
//!           v
//!     SpinSummary + Vec<StageEvent>
//! ```
//!
//! The controller is single-threaded: one driver calls `tick(frame_delta, now_ms)`
//! per frame and the engine never blocks.

pub mod bank;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod hooks;
pub mod ledger;
pub mod paytable;
pub mod reel;
pub mod stats;
pub mod symbols;
pub mod timing;
pub mod tween;

pub use bank::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use evaluator::*;
pub use hooks::*;
pub use ledger::*;
pub use paytable::*;
pub use reel::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
pub use tween::*;
