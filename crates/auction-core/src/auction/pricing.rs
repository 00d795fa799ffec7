//! # Pricing Curve
//!
//! Both sale prices decay linearly from the cycle's initial price to zero at
//! the end of the window:
//!
//! ```text
//! price(t) = initial * (duration - elapsed) / duration
//! ```
//!
//! B is always for sale while a window is open. A is only for sale once the
//! bootstrap cycle is over.

use log::debug;

use crate::errors::{AuctionError, AuctionResult};
use crate::math::fixed_point::linear_decay;
use crate::types::{Cycle, PhaseStatus};

/// Return the cycle if `now` is inside its window
fn active_cycle(cycle: Option<&Cycle>, bootstrap: bool, now: i64) -> AuctionResult<&Cycle> {
    let status = PhaseStatus::derive(now, cycle, bootstrap);
    match cycle {
        Some(cycle) if status.is_active() => Ok(cycle),
        _ => Err(AuctionError::AuctionNotActive),
    }
}

/// Cost in A of one whole unit of B at `now`
pub fn sale_price_b(cycle: Option<&Cycle>, bootstrap: bool, now: i64) -> AuctionResult<u128> {
    let cycle = active_cycle(cycle, bootstrap, now)?;
    let price = linear_decay(cycle.initial_price_b, now - cycle.start_time, cycle.duration())?;
    debug!("cycle {} B sale price at {}: {}", cycle.id, now, price);
    Ok(price)
}

/// Cost in B of one whole unit of A at `now`
pub fn sale_price_a(cycle: Option<&Cycle>, bootstrap: bool, now: i64) -> AuctionResult<u128> {
    if bootstrap {
        return Err(AuctionError::UnsupportedDirection);
    }
    let cycle = active_cycle(cycle, bootstrap, now)?;
    let price = linear_decay(cycle.initial_price_a, now - cycle.start_time, cycle.duration())?;
    debug!("cycle {} A sale price at {}: {}", cycle.id, now, price);
    Ok(price)
}
