//! Error types for the reel engine

use thiserror::Error;

/// Reel engine errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient credit: balance {balance}, cost {cost}")]
    InsufficientCredit { balance: u64, cost: u64 },

    #[error("Config parse error: {0}")]
    ConfigParse(String),
}

/// Result type for reel engine operations
pub type SlotResult<T> = Result<T, SlotError>;
