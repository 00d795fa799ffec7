//! # Safe Math Operations
//!
//! Overflow-checked arithmetic. Nothing in the engine wraps: every overflow or
//! underflow becomes an `AuctionError`.

use crate::errors::{AuctionError, AuctionResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Division with zero check. Must precede the generic arm: `$type:ty` also matches an identifier.
    (div, $fn_name:ident, $type:ty) => {
        /// Safe division with zero check (truncating)
        pub fn $fn_name(a: $type, b: $type) -> AuctionResult<$type> {
            if b == 0 {
                return Err(AuctionError::DivisionByZero);
            }
            Ok(a / b)
        }
    };

    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident) => {
        /// Checked operation, overflow or underflow becomes `ArithmeticOverflow`
        pub fn $fn_name(a: $type, b: $type) -> AuctionResult<$type> {
            a.$checked_method(b).ok_or(AuctionError::ArithmeticOverflow)
        }
    };
}

safe_arith!(safe_add_u128, u128, checked_add);
safe_arith!(safe_sub_u128, u128, checked_sub);
safe_arith!(safe_mul_u128, u128, checked_mul);
safe_arith!(div, safe_div_u128, u128);

safe_arith!(safe_add_i64, i64, checked_add);
safe_arith!(safe_sub_i64, i64, checked_sub);
safe_arith!(safe_mul_i64, i64, checked_mul);

/// Convert a non-negative i64 duration into u128
pub fn safe_cast_i64_to_u128(value: i64) -> AuctionResult<u128> {
    u128::try_from(value).map_err(|_| AuctionError::ArithmeticOverflow)
}
