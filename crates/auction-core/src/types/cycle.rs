//! # Cycle Types
//!
//! One auction window and the prices and inventory it was seeded with.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::errors::{AuctionError, AuctionResult};

/// Which kind of window a cycle is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum CycleKind {
    /// The unique first window: A buys B only, trades do not feed the oracle
    Bootstrap,
    /// Two-directional window whose trades feed the derived price
    Reported,
}

/// One auction window
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct Cycle {
    /// Sequential identifier, the bootstrap cycle is 0
    pub id: u64,
    /// Calendar slot index this cycle occupies
    pub slot: u64,
    pub kind: CycleKind,
    /// First instant at which the window is active (unix seconds)
    pub start_time: i64,
    /// First instant at which the window is no longer active
    pub end_time: i64,
    /// A per whole unit of B at `start_time`
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub initial_price_b: u128,
    /// B per whole unit of A at `start_time`
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub initial_price_a: u128,
    /// B allocated when the cycle was created
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub initial_inventory_b: u128,
    /// B still for sale
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub inventory_b: u128,
}

impl Cycle {
    /// Create a cycle, validating its window
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        slot: u64,
        kind: CycleKind,
        start_time: i64,
        end_time: i64,
        initial_price_b: u128,
        initial_price_a: u128,
        inventory_b: u128,
    ) -> AuctionResult<Self> {
        if start_time >= end_time {
            return Err(AuctionError::InvalidWindow { start_time, end_time });
        }

        Ok(Self {
            id,
            slot,
            kind,
            start_time,
            end_time,
            initial_price_b,
            initial_price_a,
            initial_inventory_b: inventory_b,
            inventory_b,
        })
    }

    /// Window length in seconds
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    pub fn is_bootstrap(&self) -> bool {
        self.kind == CycleKind::Bootstrap
    }

    /// Whether `now` falls inside [start_time, end_time)
    pub fn contains(&self, now: i64) -> bool {
        self.start_time <= now && now < self.end_time
    }

    /// B sold so far this cycle
    pub fn sold_b(&self) -> u128 {
        self.initial_inventory_b - self.inventory_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_window() {
        let cycle = Cycle::new(0, 0, CycleKind::Bootstrap, 100, 200, 10, 20, 1_000).unwrap();
        assert_eq!(cycle.duration(), 100);
        assert!(cycle.is_bootstrap());
        assert!(!cycle.contains(99));
        assert!(cycle.contains(100));
        assert!(cycle.contains(199));
        assert!(!cycle.contains(200));
        assert_eq!(cycle.sold_b(), 0);
    }

    #[test]
    fn test_invalid_window() {
        assert_eq!(
            Cycle::new(0, 0, CycleKind::Reported, 200, 200, 1, 1, 1),
            Err(AuctionError::InvalidWindow { start_time: 200, end_time: 200 })
        );
        assert_eq!(
            Cycle::new(0, 0, CycleKind::Reported, 300, 200, 1, 1, 1),
            Err(AuctionError::InvalidWindow { start_time: 300, end_time: 200 })
        );
    }
}
