//! # Cycle Manager
//!
//! Builds the bootstrap cycle and every cycle after it.
//!
//! Windows sit on a fixed calendar anchored at the bootstrap start (genesis):
//!
//! ```text
//! slot k: [genesis + k * period, genesis + k * period + duration)
//! period = auction_duration + dormant_duration
//! ```
//!
//! Seed prices carry a fixed markup over the reference price:
//! `price_b = markup * reference`, `price_a = markup * SCALE^2 / reference`.

use crate::config::AuctionConfig;
use crate::errors::{AuctionError, AuctionResult};
use crate::math::fixed_point::invert_price_with_markup;
use crate::math::safe_math::{safe_add_i64, safe_div_u128, safe_mul_i64, safe_mul_u128, safe_sub_i64};
use crate::types::{Cycle, CycleKind};

/// Calendar slot chosen for a new cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: u64,
    pub start_time: i64,
    pub end_time: i64,
}

/// Creates cycles according to an `AuctionConfig`
#[derive(Debug, Clone, Copy)]
pub struct CycleManager<'a> {
    config: &'a AuctionConfig,
}

impl<'a> CycleManager<'a> {
    pub fn new(config: &'a AuctionConfig) -> Self {
        Self { config }
    }

    /// The first cycle ever. Returns it together with the calendar genesis.
    pub fn bootstrap_cycle(
        &self,
        now: i64,
        engine_balance_b: u128,
        total_supply_b: u128,
    ) -> AuctionResult<(Cycle, i64)> {
        let genesis = safe_add_i64(now, self.config.start_delay)?;
        let slot = self.slot_at(genesis, 0)?;
        let (price_b, price_a) = self.seed_prices(self.config.manual_price_b)?;
        let inventory = self.inventory(
            engine_balance_b,
            total_supply_b,
            self.config.bootstrap_inventory_divisor,
        )?;

        let cycle = Cycle::new(
            0,
            slot.index,
            CycleKind::Bootstrap,
            slot.start_time,
            slot.end_time,
            price_b,
            price_a,
            inventory,
        )?;
        Ok((cycle, genesis))
    }

    /// The cycle following `previous`, seeded from `reference_price`
    pub fn next_cycle(
        &self,
        genesis: i64,
        previous: &Cycle,
        now: i64,
        reference_price: u128,
        engine_balance_b: u128,
        total_supply_b: u128,
    ) -> AuctionResult<Cycle> {
        let slot = self.next_slot(genesis, previous, now)?;
        let (price_b, price_a) = self.seed_prices(reference_price)?;
        let inventory = self.inventory(
            engine_balance_b,
            total_supply_b,
            self.config.cycle_inventory_divisor,
        )?;

        Cycle::new(
            previous.id + 1,
            slot.index,
            CycleKind::Reported,
            slot.start_time,
            slot.end_time,
            price_b,
            price_a,
            inventory,
        )
    }

    /// Earliest slot that starts no sooner than `previous` ends and is still open at `now`
    pub fn next_slot(&self, genesis: i64, previous: &Cycle, now: i64) -> AuctionResult<Slot> {
        let period = self.config.cycle_period()?;

        // First slot starting at or after the previous end
        let since_genesis = safe_sub_i64(previous.end_time, genesis)?.max(0);
        let after_previous = ceil_div_i64(since_genesis, period) as u64;

        // First slot whose window has not closed yet
        let past_first_close = safe_sub_i64(safe_sub_i64(now, genesis)?, self.config.auction_duration)?;
        let still_open = if past_first_close < 0 {
            0
        } else {
            (past_first_close / period) as u64 + 1
        };

        let index = after_previous.max(still_open).max(previous.slot + 1);
        self.slot_at(genesis, index)
    }

    /// Window of calendar slot `index`
    pub fn slot_at(&self, genesis: i64, index: u64) -> AuctionResult<Slot> {
        let period = self.config.cycle_period()?;
        let offset = i64::try_from(index).map_err(|_| AuctionError::ArithmeticOverflow)?;
        let start_time = safe_add_i64(genesis, safe_mul_i64(offset, period)?)?;
        let end_time = safe_add_i64(start_time, self.config.auction_duration)?;
        Ok(Slot { index, start_time, end_time })
    }

    /// (initial B price in A, initial A price in B) for a reference B price
    pub fn seed_prices(&self, reference_price: u128) -> AuctionResult<(u128, u128)> {
        let price_b = safe_mul_u128(self.config.markup, reference_price)?;
        let price_a = invert_price_with_markup(reference_price, self.config.markup)?;
        Ok((price_b, price_a))
    }

    /// B offered in a cycle: the configured share of supply, capped by what the engine holds
    pub fn inventory(
        &self,
        engine_balance_b: u128,
        total_supply_b: u128,
        divisor: u128,
    ) -> AuctionResult<u128> {
        let allocation = safe_div_u128(total_supply_b, divisor)?;
        Ok(allocation.min(engine_balance_b))
    }
}

fn ceil_div_i64(numerator: i64, denominator: i64) -> i64 {
    if numerator <= 0 {
        return 0;
    }
    (numerator - 1) / denominator + 1
}
