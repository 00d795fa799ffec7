//! Error types for the auction simulator

use auction_core::AuctionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Io error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Auction error: {0}")]
    Auction(#[from] AuctionError),

    #[error("Step {index} ({action}) failed: {source}")]
    StepFailed {
        index: usize,
        action: &'static str,
        source: AuctionError,
    },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::SerializationError(err.to_string())
    }
}

impl From<toml::ser::Error> for SimError {
    fn from(err: toml::ser::Error) -> Self {
        SimError::SerializationError(err.to_string())
    }
}
