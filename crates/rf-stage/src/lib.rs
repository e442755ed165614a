//! # rf-stage — Reel Cycle Stage System
//!
//! Defines the canonical stages a reel game passes through during one spin.
//! Presentation and audio layers never inspect engine internals — only STAGES.
//!
//! ## Philosophy
//!
//! Every spin passes through the same semantic phases:
//! - Spin starts → Reels stop one by one → Wins evaluated → Spin ends
//!
//! This crate defines those stages, the events that carry them and the trace
//! that records one spin's timeline.

pub mod stage;
pub mod event;
pub mod trace;
pub mod taxonomy;

pub use stage::*;
pub use event::*;
pub use trace::*;
pub use taxonomy::*;
