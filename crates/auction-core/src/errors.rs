//! # Core Error Types
//!
//! Every failure an auction call can produce. All errors are terminal for the
//! triggering call: the engine never retries and never leaves a partial update.

use thiserror::Error;

/// Auction errors returned by queries and trades
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub enum AuctionError {
    // ========================================================================
    // Phase Errors
    // ========================================================================

    #[error("Auction is not active")]
    AuctionNotActive,

    #[error("Trade direction is not supported during the bootstrap cycle")]
    UnsupportedDirection,

    #[error("Cycle has not ended yet (ends at {end_time}, now {now})")]
    CycleNotEnded { end_time: i64, now: i64 },

    #[error("No auction cycle has been initialized")]
    NotInitialized,

    // ========================================================================
    // Trade Errors
    // ========================================================================

    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: u128, available: u128 },

    #[error("Insufficient payment: required {required}, supplied {supplied}")]
    InsufficientPayment { required: u128, supplied: u128 },

    #[error("Insufficient engine balance: requested {requested}, available {available}")]
    InsufficientEngineBalance { requested: u128, available: u128 },

    #[error("Token ledger rejected the transfer")]
    TransferFailed,

    #[error("Trade amount must be greater than zero")]
    ZeroAmount,

    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("Invalid cycle window: start {start_time} is not before end {end_time}")]
    InvalidWindow { start_time: i64, end_time: i64 },
}

/// Result type using auction errors
pub type AuctionResult<T> = Result<T, AuctionError>;

impl AuctionError {
    /// Short stable name of the error kind, used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuctionNotActive => "AuctionNotActive",
            Self::UnsupportedDirection => "UnsupportedDirection",
            Self::CycleNotEnded { .. } => "CycleNotEnded",
            Self::NotInitialized => "NotInitialized",
            Self::InsufficientInventory { .. } => "InsufficientInventory",
            Self::InsufficientPayment { .. } => "InsufficientPayment",
            Self::InsufficientEngineBalance { .. } => "InsufficientEngineBalance",
            Self::TransferFailed => "TransferFailed",
            Self::ZeroAmount => "ZeroAmount",
            Self::ArithmeticOverflow => "ArithmeticOverflow",
            Self::DivisionByZero => "DivisionByZero",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::InvalidWindow { .. } => "InvalidWindow",
        }
    }
}
