//! # Price Bound Accumulator
//!
//! Running volume-weighted price bounds for the current reported cycle.
//!
//! - Upper bound: mean sale price of B, weighted by B volume (A→B trades)
//! - Lower bound: mean implied B price from A sales, weighted by A volume
//!
//! Both start at zero and only move through `record_upper`/`record_lower`.
//! The cycle manager is the only caller of `reset`.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::errors::AuctionResult;
use crate::math::big_int::weighted_mean_u128;
use crate::math::fixed_point::midpoint;
use crate::math::safe_math::safe_add_u128;

/// Volume-weighted upper and lower B price bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct BoundState {
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub upper_bound: u128,
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub upper_volume: u128,
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub lower_bound: u128,
    #[cfg_attr(feature = "client", serde(with = "crate::config::decimal"))]
    pub lower_volume: u128,
}

impl BoundState {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a B sale at `price` for `volume` units of B into the upper bound
    pub fn record_upper(&mut self, price: u128, volume: u128) -> AuctionResult<()> {
        *self = self.with_upper(price, volume)?;
        Ok(())
    }

    /// Fold an A sale with implied B `price` for `volume` units of A into the lower bound
    pub fn record_lower(&mut self, price: u128, volume: u128) -> AuctionResult<()> {
        *self = self.with_lower(price, volume)?;
        Ok(())
    }

    /// Copy of this state with an upper-bound observation applied.
    ///
    /// Lets a trade compute its post-state before any balance moves.
    pub fn with_upper(&self, price: u128, volume: u128) -> AuctionResult<Self> {
        let (bound, total) = fold(self.upper_bound, self.upper_volume, price, volume)?;
        Ok(Self {
            upper_bound: bound,
            upper_volume: total,
            ..*self
        })
    }

    /// Copy of this state with a lower-bound observation applied
    pub fn with_lower(&self, price: u128, volume: u128) -> AuctionResult<Self> {
        let (bound, total) = fold(self.lower_bound, self.lower_volume, price, volume)?;
        Ok(Self {
            lower_bound: bound,
            lower_volume: total,
            ..*self
        })
    }

    /// Both sides have seen at least one trade
    pub fn is_complete(&self) -> bool {
        self.upper_volume > 0 && self.lower_volume > 0
    }

    /// Midpoint of the bounds once both sides are populated, `fallback` otherwise
    pub fn current_price(&self, fallback: u128) -> u128 {
        if self.is_complete() {
            midpoint(self.upper_bound, self.lower_bound)
        } else {
            fallback
        }
    }

    /// Clear both bounds
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// (price*volume + bound*total) / (total + volume)
fn fold(bound: u128, total: u128, price: u128, volume: u128) -> AuctionResult<(u128, u128)> {
    if volume == 0 {
        return Ok((bound, total));
    }
    let new_bound = weighted_mean_u128(price, volume, bound, total)?;
    let new_total = safe_add_u128(total, volume)?;
    Ok((new_bound, new_total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SCALE;

    #[test]
    fn test_first_observation_sets_bound() {
        let mut bounds = BoundState::new();
        bounds.record_upper(140 * SCALE / 1_000, SCALE).unwrap();
        assert_eq!(bounds.upper_bound, 140 * SCALE / 1_000);
        assert_eq!(bounds.upper_volume, SCALE);
        assert_eq!(bounds.lower_bound, 0);
        assert!(!bounds.is_complete());
    }

    #[test]
    fn test_volume_weighting() {
        let p1 = 140_000_000_000_000_000u128;
        let p2 = 73_888_888_888_888_888u128;

        let mut bounds = BoundState::new();
        bounds.record_upper(p1, SCALE).unwrap();
        bounds.record_upper(p2, 2 * SCALE).unwrap();

        assert_eq!(bounds.upper_bound, (p2 * 2 + p1) / 3);
        assert_eq!(bounds.upper_volume, 3 * SCALE);
    }

    #[test]
    fn test_current_price_needs_both_sides() {
        let fallback = 35 * SCALE / 1_000;
        let mut bounds = BoundState::new();
        assert_eq!(bounds.current_price(fallback), fallback);

        bounds.record_upper(10, 1).unwrap();
        assert_eq!(bounds.current_price(fallback), fallback);

        bounds.record_lower(5, 1).unwrap();
        assert_eq!(bounds.current_price(fallback), 7);
    }

    #[test]
    fn test_zero_volume_is_ignored() {
        let mut bounds = BoundState::new();
        bounds.record_upper(10, 0).unwrap();
        assert_eq!(bounds, BoundState::default());
    }

    #[test]
    fn test_with_upper_does_not_mutate() {
        let bounds = BoundState::new();
        let next = bounds.with_upper(10, 1).unwrap();
        assert_eq!(bounds.upper_volume, 0);
        assert_eq!(next.upper_bound, 10);
    }

    #[test]
    fn test_reset() {
        let mut bounds = BoundState::new();
        bounds.record_upper(10, 1).unwrap();
        bounds.record_lower(5, 1).unwrap();
        bounds.reset();
        assert_eq!(bounds, BoundState::default());
    }
}
