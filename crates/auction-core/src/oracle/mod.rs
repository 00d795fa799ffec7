//! # Oracle Module
//!
//! The volume-weighted bound accumulator and the rule that picks which price
//! is exposed to fee consumers.

pub mod bounds;

pub use bounds::*;

/// Price exposed to fee consumers.
///
/// The manual constant while the bootstrap cycle is live, afterwards the last
/// committed derived price. A live cycle's bounds never leak into this value.
pub fn fee_price(bootstrap: bool, manual_price: u128, committed_price: u128) -> u128 {
    if bootstrap {
        manual_price
    } else {
        committed_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_price_selection() {
        assert_eq!(fee_price(true, 35, 99), 35);
        assert_eq!(fee_price(false, 35, 99), 99);
    }
}
