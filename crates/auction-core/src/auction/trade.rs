//! # Trade Quotes
//!
//! Validation and post-state computation for both trade directions.
//!
//! A quote carries every value the engine will write after the ledger
//! transfer succeeds. All checks and all checked arithmetic happen here, so
//! once a quote exists the only step left that can fail is the transfer itself.

use crate::constants::SCALE;
use crate::errors::{AuctionError, AuctionResult};
use crate::math::fixed_point::{invert_price, mul_scaled};
use crate::math::safe_math::{safe_add_u128, safe_sub_u128};
use crate::oracle::BoundState;
use crate::types::Cycle;

/// Fully validated A→B purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyQuote {
    pub price_b: u128,
    pub amount_b: u128,
    /// A kept by the engine
    pub cost_a: u128,
    /// A handed back to the buyer
    pub refund_a: u128,
    pub inventory_after: u128,
    pub reserve_a_after: u128,
    pub bounds_after: BoundState,
}

/// Fully validated B→A purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellQuote {
    pub price_a: u128,
    pub amount_a: u128,
    /// B paid by the seller
    pub cost_b: u128,
    /// A-price of B implied by `price_a`
    pub implied_price_b: u128,
    pub reserve_a_after: u128,
    pub bounds_after: BoundState,
}

/// Quote buying `amount_b` of B with `supplied_a` of A attached.
///
/// `record` is false during the bootstrap cycle, whose trades never reach the bounds.
pub fn quote_buy_b(
    cycle: &Cycle,
    bounds: &BoundState,
    reserve_a: u128,
    price_b: u128,
    amount_b: u128,
    supplied_a: u128,
    record: bool,
) -> AuctionResult<BuyQuote> {
    if amount_b == 0 {
        return Err(AuctionError::ZeroAmount);
    }

    if amount_b > cycle.inventory_b {
        return Err(AuctionError::InsufficientInventory {
            requested: amount_b,
            available: cycle.inventory_b,
        });
    }

    let cost_a = mul_scaled(amount_b, price_b)?;
    if supplied_a < cost_a {
        return Err(AuctionError::InsufficientPayment {
            required: cost_a,
            supplied: supplied_a,
        });
    }

    let bounds_after = if record {
        bounds.with_upper(price_b, amount_b)?
    } else {
        *bounds
    };

    Ok(BuyQuote {
        price_b,
        amount_b,
        cost_a,
        refund_a: supplied_a - cost_a,
        inventory_after: safe_sub_u128(cycle.inventory_b, amount_b)?,
        reserve_a_after: safe_add_u128(reserve_a, cost_a)?,
        bounds_after,
    })
}

/// Quote buying `amount_a` of A from the engine, paid in B
pub fn quote_sell_b(
    bounds: &BoundState,
    reserve_a: u128,
    price_a: u128,
    amount_a: u128,
) -> AuctionResult<SellQuote> {
    if amount_a == 0 {
        return Err(AuctionError::ZeroAmount);
    }

    if reserve_a < amount_a {
        return Err(AuctionError::InsufficientEngineBalance {
            requested: amount_a,
            available: reserve_a,
        });
    }

    let cost_b = mul_scaled(amount_a, price_a)?;
    let implied_price_b = invert_price(price_a)?;

    Ok(SellQuote {
        price_a,
        amount_a,
        cost_b,
        implied_price_b,
        reserve_a_after: reserve_a - amount_a,
        bounds_after: bounds.with_lower(implied_price_b, amount_a)?,
    })
}

/// Whole-unit helper used in logs
pub fn whole_units(amount: u128) -> u128 {
    amount / SCALE
}
