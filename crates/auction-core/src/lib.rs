//! # Auction Core - Fee Price Discovery
//!
//! This crate contains the deterministic auction engine that sells a scarce
//! token ("B") for a funding asset ("A") and back again through two declining
//! Dutch auctions, and derives a canonical B price from the trades. It provides:
//!
//! - 18-decimal fixed-point math with truncating division
//! - Phase derivation from wall-clock time and cycle boundaries
//! - Linear price decay curves for both trade directions
//! - Volume-weighted upper/lower price bounds and the committed derived price
//! - Cycle rollover with markup seeding
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde serialization for snapshots and configuration

pub mod auction;
pub mod collaborators;
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod oracle;
pub mod types;

// Re-export commonly used items
pub use auction::{AuctionEngine, AuctionState, BuyFill, SellFill, SharedAuction};
pub use collaborators::{FeedSwitch, FeedToggle, InMemoryLedger, ManualClock, SystemClock, TimeOracle, TokenLedger};
pub use config::AuctionConfig;
pub use constants::*;
pub use errors::{AuctionError, AuctionResult};
pub use oracle::BoundState;
pub use types::*;
