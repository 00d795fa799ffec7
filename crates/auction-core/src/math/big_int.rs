//! Big integer operations for high-precision math
//!
//! This module provides U256 operations and mul_div functionality.
//! Prices and amounts are 18-decimal u128 values, so a product of two of them
//! routinely exceeds 128 bits before it is divided back down.

use crate::errors::{AuctionError, AuctionResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// 256-bit unsigned integer for intermediate calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256 {
    /// Low 128 bits
    pub lo: u128,
    /// High 128 bits
    pub hi: u128,
}

impl U256 {
    pub const ZERO: U256 = U256 { lo: 0, hi: 0 };

    /// Create a new U256 from low and high parts
    pub const fn new(lo: u128, hi: u128) -> Self {
        Self { lo, hi }
    }

    /// Create from a single u128 value
    pub const fn from_u128(value: u128) -> Self {
        Self { lo: value, hi: 0 }
    }

    /// Check if the value is zero
    pub const fn is_zero(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Convert to u128, returning None if overflow
    pub fn to_u128(&self) -> Option<u128> {
        if self.hi == 0 {
            Some(self.lo)
        } else {
            None
        }
    }

    /// Add two U256 values
    pub fn checked_add(&self, other: &U256) -> Option<U256> {
        let (lo, carry) = self.lo.overflowing_add(other.lo);
        let hi = self.hi.checked_add(other.hi)?.checked_add(carry as u128)?;
        Some(U256::new(lo, hi))
    }

    /// Divide by a u128 divisor, returning quotient and remainder.
    ///
    /// Plain shift-subtract long division; the quotient may still need all 256 bits.
    pub fn div_rem_u128(&self, divisor: u128) -> Option<(U256, u128)> {
        if divisor == 0 {
            return None;
        }

        // Fast path: dividend fits in u128
        if self.hi == 0 {
            return Some((U256::from_u128(self.lo / divisor), self.lo % divisor));
        }

        let mut quotient = U256::ZERO;
        let mut remainder: u128 = 0;
        for i in (0..256u32).rev() {
            let bit = if i >= 128 {
                (self.hi >> (i - 128)) & 1
            } else {
                (self.lo >> i) & 1
            };

            // remainder < divisor, so a carry out of bit 127 means the shifted
            // value is at least 2^128 > divisor
            let carry = remainder >> 127;
            remainder = (remainder << 1) | bit;

            if carry == 1 || remainder >= divisor {
                remainder = remainder.wrapping_sub(divisor);
                if i >= 128 {
                    quotient.hi |= 1 << (i - 128);
                } else {
                    quotient.lo |= 1 << i;
                }
            }
        }

        Some((quotient, remainder))
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.hi.cmp(&other.hi) {
            std::cmp::Ordering::Equal => self.lo.cmp(&other.lo),
            ordering => ordering,
        }
    }
}

/// Multiply two u128 values and return the full 256-bit product
pub fn mul_u128_to_u256(a: u128, b: u128) -> U256 {
    const MASK: u128 = u64::MAX as u128;

    // Split into 64-bit parts for multiplication
    let a_lo = a & MASK;
    let a_hi = a >> 64;
    let b_lo = b & MASK;
    let b_hi = b >> 64;

    // Each partial product fits in 128 bits
    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    // Middle column: high half of lo_lo plus the low halves of the cross terms
    let mid = (lo_lo >> 64) + (lo_hi & MASK) + (hi_lo & MASK);

    let lo = (lo_lo & MASK) | (mid << 64);
    let hi = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + (mid >> 64);

    U256::new(lo, hi)
}

/// Multiply two u128 values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div_u128(
    a: u128,
    b: u128,
    denominator: u128,
    rounding: Rounding,
) -> AuctionResult<u128> {
    if denominator == 0 {
        return Err(AuctionError::DivisionByZero);
    }

    let product = mul_u128_to_u256(a, b);
    let (quotient, remainder) = product
        .div_rem_u128(denominator)
        .ok_or(AuctionError::DivisionByZero)?;

    let mut result = quotient.to_u128().ok_or(AuctionError::ArithmeticOverflow)?;
    if rounding == Rounding::Up && remainder > 0 {
        result = result.checked_add(1).ok_or(AuctionError::ArithmeticOverflow)?;
    }

    Ok(result)
}

/// Weighted mean of two (value, weight) pairs, truncating:
/// (a * wa + b * wb) / (wa + wb)
pub fn weighted_mean_u128(a: u128, wa: u128, b: u128, wb: u128) -> AuctionResult<u128> {
    let total_weight = wa.checked_add(wb).ok_or(AuctionError::ArithmeticOverflow)?;
    if total_weight == 0 {
        return Err(AuctionError::DivisionByZero);
    }

    let numerator = mul_u128_to_u256(a, wa)
        .checked_add(&mul_u128_to_u256(b, wb))
        .ok_or(AuctionError::ArithmeticOverflow)?;

    let (quotient, _) = numerator
        .div_rem_u128(total_weight)
        .ok_or(AuctionError::DivisionByZero)?;

    quotient.to_u128().ok_or(AuctionError::ArithmeticOverflow)
}
