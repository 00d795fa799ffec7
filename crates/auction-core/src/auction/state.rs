//! # Engine State
//!
//! Everything the engine persists between calls. Phase is not here: it is
//! always re-derived from `cycle` and the current time.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::oracle::BoundState;
use crate::types::Cycle;

/// Persistent auction state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct AuctionState {
    /// Most recently created cycle, `None` before the first advance
    pub cycle: Option<Cycle>,

    /// Start of the bootstrap window, anchors the calendar
    pub genesis: Option<i64>,

    /// True until the first advance after the bootstrap cycle
    pub bootstrap: bool,

    /// Bounds accumulated by the current reported cycle
    pub bounds: BoundState,

    /// Last committed derived B price in A
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub derived_price: u128,

    /// Engine's own balance of asset A
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub reserve_a: u128,

    /// Number of cycles created so far
    pub cycles_started: u64,
}

impl AuctionState {
    /// Fresh state with the manual price as the committed price
    pub fn new(manual_price: u128) -> Self {
        Self {
            cycle: None,
            genesis: None,
            bootstrap: true,
            bounds: BoundState::default(),
            derived_price: manual_price,
            reserve_a: 0,
            cycles_started: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cycle.is_some()
    }
}
