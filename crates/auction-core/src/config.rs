//! # Auction Configuration
//!
//! Timing, pricing and inventory policy for an engine instance.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{AuctionError, AuctionResult};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "client", serde(default))]
pub struct AuctionConfig {
    /// Length of every auction window in seconds
    pub auction_duration: i64,

    /// Dormant gap between two consecutive windows in seconds
    pub dormant_duration: i64,

    /// Delay between creating the bootstrap cycle and its window opening
    pub start_delay: i64,

    /// Fixed B price in A used until a reported cycle commits a derived price
    #[cfg_attr(feature = "client", serde(with = "decimal"))]
    pub manual_price_b: u128,

    /// Premium applied to the reference price when seeding a cycle
    #[cfg_attr(feature = "client", serde(with = "decimal"))]
    pub markup: u128,

    /// Bootstrap inventory = total B supply / this divisor
    #[cfg_attr(feature = "client", serde(with = "decimal"))]
    pub bootstrap_inventory_divisor: u128,

    /// Reported-cycle inventory = total B supply / this divisor
    #[cfg_attr(feature = "client", serde(with = "decimal"))]
    pub cycle_inventory_divisor: u128,
}

impl AuctionConfig {
    /// Validate configuration
    pub fn validate(&self) -> AuctionResult<()> {
        if self.auction_duration <= 0 {
            return Err(AuctionError::InvalidConfig("auction_duration must be greater than 0"));
        }

        if self.dormant_duration < 0 {
            return Err(AuctionError::InvalidConfig("dormant_duration must not be negative"));
        }

        if self.start_delay < 0 {
            return Err(AuctionError::InvalidConfig("start_delay must not be negative"));
        }

        if self.manual_price_b == 0 {
            return Err(AuctionError::InvalidConfig("manual_price_b must be greater than 0"));
        }

        if self.markup == 0 {
            return Err(AuctionError::InvalidConfig("markup must be at least 1"));
        }

        if self.bootstrap_inventory_divisor == 0 || self.cycle_inventory_divisor == 0 {
            return Err(AuctionError::InvalidConfig("inventory divisors must be greater than 0"));
        }

        Ok(())
    }

    /// Distance between two consecutive window starts
    pub fn cycle_period(&self) -> AuctionResult<i64> {
        self.auction_duration
            .checked_add(self.dormant_duration)
            .ok_or(AuctionError::ArithmeticOverflow)
    }
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            auction_duration: DEFAULT_AUCTION_DURATION,
            dormant_duration: DEFAULT_DORMANT_DURATION,
            start_delay: DEFAULT_START_DELAY,
            manual_price_b: DEFAULT_MANUAL_PRICE_B,
            markup: DEFAULT_MARKUP,
            bootstrap_inventory_divisor: DEFAULT_BOOTSTRAP_INVENTORY_DIVISOR,
            cycle_inventory_divisor: DEFAULT_CYCLE_INVENTORY_DIVISOR,
        }
    }
}

/// Serde helpers for u128 fields.
///
/// Writes decimal strings (TOML integers stop at i64), reads strings or plain integers.
#[cfg(feature = "client")]
pub mod decimal {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = u128;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
            Ok(value as u128)
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u128, E> {
            u128::try_from(value).map_err(|_| E::custom(format!("negative amount {}", value)))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
            value
                .replace('_', "")
                .parse::<u128>()
                .map_err(|e| E::custom(format!("invalid amount '{}': {}", value, e)))
        }
    }
}
