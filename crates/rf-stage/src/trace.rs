//! StageTrace — A complete sequence of stage events for one spin/session
//!
//! A trace captures the full timeline of a game round.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::StageEvent;
use crate::stage::{Stage, StageCategory};
use crate::taxonomy::WinOutcome;

/// A complete trace of stage events for one spin or session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Game identifier
    pub game_id: String,

    /// Spin ID within session
    #[serde(default)]
    pub spin_id: Option<String>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,

    /// Custom metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            spin_id: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Add many events
    pub fn extend(&mut self, events: impl IntoIterator<Item = StageEvent>) {
        self.events.extend(events);
    }

    /// Set spin ID
    pub fn with_spin(mut self, spin_id: impl Into<String>) -> Self {
        self.spin_id = Some(spin_id.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        let first = self.events.first().map(|e| e.timestamp_ms).unwrap_or(0.0);
        let last = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0.0);
        last - first
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Get all reel stop events
    pub fn reel_stops(&self) -> Vec<&StageEvent> {
        self.events_by_type("reel_stop")
    }

    /// Reel indices in the order they settled
    pub fn reel_stop_order(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match &e.stage {
                Stage::ReelStop { reel_index, .. } => Some(*reel_index),
                _ => None,
            })
            .collect()
    }

    /// Outcome of the last completed spin in the trace
    pub fn outcome(&self) -> Option<WinOutcome> {
        self.events.iter().rev().find_map(|e| match &e.stage {
            Stage::SpinEnd { outcome, .. } => Some(*outcome),
            _ => None,
        })
    }

    /// Total credits paid across all spins in the trace
    pub fn total_payout(&self) -> u64 {
        self.events
            .iter()
            .filter_map(|e| match &e.stage {
                Stage::SpinEnd { payout, .. } => Some(*payout),
                _ => None,
            })
            .sum()
    }

    /// Validate trace has required stages
    pub fn validate(&self, reel_count: u8) -> TraceValidation {
        let reel_stops = self.reel_stops().len();
        let order = self.reel_stop_order();
        TraceValidation {
            has_spin_start: self.has_stage("spin_start"),
            has_spin_end: self.has_stage("spin_end"),
            reel_stop_count: reel_stops as u8,
            has_all_reels: reel_stops >= reel_count as usize,
            stops_left_to_right: order.windows(2).all(|w| w[0] < w[1]),
        }
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            trace_id: self.trace_id.clone(),
            game_id: self.game_id.clone(),
            event_count: self.events.len(),
            duration_ms: self.duration_ms(),
            total_payout: self.total_payout(),
            outcome: self.outcome(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub has_spin_start: bool,
    pub has_spin_end: bool,
    pub has_all_reels: bool,
    pub reel_stop_count: u8,
    pub stops_left_to_right: bool,
}

impl TraceValidation {
    /// Check if trace is valid (has all required elements)
    pub fn is_valid(&self) -> bool {
        self.has_spin_start && self.has_spin_end && self.has_all_reels
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.has_spin_start {
            warnings.push("Missing SPIN_START event");
        }
        if !self.has_spin_end {
            warnings.push("Missing SPIN_END event");
        }
        if !self.has_all_reels {
            warnings.push("Not all reels have stop events");
        }
        if !self.stops_left_to_right {
            warnings.push("Reels settled out of order (jitter overlap)");
        }

        warnings
    }
}

/// Short summary of a trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub game_id: String,
    pub event_count: usize,
    pub duration_ms: f64,
    pub total_payout: u64,
    pub outcome: Option<WinOutcome>,
}
