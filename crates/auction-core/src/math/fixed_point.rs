//! # Fixed-Point Arithmetic
//!
//! 18-decimal fixed-point helpers. A price is "units of one asset per whole
//! unit (SCALE) of the other". Every division truncates toward zero; there is
//! no round-to-nearest anywhere in the engine.

use crate::constants::{SCALE, SCALE_SQUARED};
use crate::errors::{AuctionError, AuctionResult};
use crate::math::big_int::{mul_div_u128, Rounding};
use crate::math::safe_math::safe_cast_i64_to_u128;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert whole units into 18-decimal fixed point
pub fn to_fixed(whole_units: u128) -> AuctionResult<u128> {
    whole_units.checked_mul(SCALE).ok_or(AuctionError::ArithmeticOverflow)
}

/// Convert 18-decimal fixed point into f64 (display only)
pub fn fixed_to_f64(value: u128) -> f64 {
    (value as f64) / (SCALE as f64)
}

// ============================================================================
// Price Arithmetic
// ============================================================================

/// Cost of `amount` units at `price` per whole unit: amount * price / SCALE
pub fn mul_scaled(amount: u128, price: u128) -> AuctionResult<u128> {
    mul_div_u128(amount, price, SCALE, Rounding::Down)
}

/// Invert a price into the opposite unit: SCALE^2 / price
pub fn invert_price(price: u128) -> AuctionResult<u128> {
    if price == 0 {
        return Err(AuctionError::DivisionByZero);
    }
    Ok(SCALE_SQUARED / price)
}

/// Premium-inverted price: markup * SCALE^2 / price
pub fn invert_price_with_markup(price: u128, markup: u128) -> AuctionResult<u128> {
    mul_div_u128(markup, SCALE_SQUARED, price, Rounding::Down)
}

/// Linear decay from `initial` at `elapsed = 0` to zero at `elapsed = duration`:
/// initial * (duration - elapsed) / duration
pub fn linear_decay(initial: u128, elapsed: i64, duration: i64) -> AuctionResult<u128> {
    if duration <= 0 {
        return Err(AuctionError::DivisionByZero);
    }
    let elapsed = elapsed.clamp(0, duration);
    let remaining = safe_cast_i64_to_u128(duration - elapsed)?;
    let duration = safe_cast_i64_to_u128(duration)?;
    mul_div_u128(initial, remaining, duration, Rounding::Down)
}

/// Midpoint of two prices, truncating
pub fn midpoint(a: u128, b: u128) -> u128 {
    // a/2 + b/2 plus the carry of the two halves, without overflowing
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}
