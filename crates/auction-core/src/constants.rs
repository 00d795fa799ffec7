//! # Protocol Constants
//!
//! Fundamental constants for the auction including:
//! - Fixed-point scale (10^18) and its square
//! - Cycle timing defaults
//! - Pricing defaults (manual price, markup)
//! - Inventory allocation defaults
//! - Phase status code offsets

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Fixed-point scale factor: 10^18 (one whole unit of either asset)
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// SCALE squared (10^36), used to invert a price into the opposite unit
pub const SCALE_SQUARED: u128 = SCALE * SCALE;

// ============================================================================
// Cycle Timing Constants
// ============================================================================

/// Seconds in one hour
pub const SECONDS_PER_HOUR: i64 = 60 * 60;

/// Default auction window length (24 hours)
pub const DEFAULT_AUCTION_DURATION: i64 = 24 * SECONDS_PER_HOUR;

/// Default dormant gap between two auction windows (24 hours)
pub const DEFAULT_DORMANT_DURATION: i64 = 24 * SECONDS_PER_HOUR;

/// Default delay between engine creation and the bootstrap window opening
pub const DEFAULT_START_DELAY: i64 = 24 * SECONDS_PER_HOUR;

// ============================================================================
// Pricing Constants
// ============================================================================

/// Manual B price in A (0.035 A per B) used before any reported cycle completes
pub const DEFAULT_MANUAL_PRICE_B: u128 = 35 * SCALE / 1_000;

/// Multiplicative premium applied to the derived price when seeding a cycle
pub const DEFAULT_MARKUP: u128 = 4;

// ============================================================================
// Inventory Constants
// ============================================================================

/// Bootstrap cycle offers 1/400th of the total B supply
pub const DEFAULT_BOOTSTRAP_INVENTORY_DIVISOR: u128 = 400;

/// Reported cycles offer 1/400th of the total B supply
pub const DEFAULT_CYCLE_INVENTORY_DIVISOR: u128 = 400;

// ============================================================================
// Phase Status Codes
// ============================================================================

/// Code offset added once the bootstrap cycle is over
pub const STATUS_REPORTED_OFFSET: u8 = 4;

/// Phase offset: window not yet open
pub const STATUS_UNSTARTED: u8 = 0;

/// Phase offset: window open
pub const STATUS_ACTIVE: u8 = 2;

/// Phase offset: window closed, waiting for advance
pub const STATUS_ENDED: u8 = 3;
