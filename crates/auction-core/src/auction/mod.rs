//! Auction engine and its building blocks.

pub mod cycle_manager;
pub mod engine;
pub mod pricing;
pub mod shared;
pub mod state;
pub mod trade;

pub use cycle_manager::{CycleManager, Slot};
pub use engine::{AuctionEngine, BuyFill, SellFill};
pub use shared::SharedAuction;
pub use state::AuctionState;
pub use trade::{BuyQuote, SellQuote};
