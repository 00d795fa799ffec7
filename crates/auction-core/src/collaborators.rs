//! # External Collaborators
//!
//! The engine does not own time, the B token ledger, or the feed switch.
//! Each is a trait at the seam plus the implementations used off-chain and in
//! tests.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Time
// ============================================================================

/// Source of the current instant (unix seconds), monotonic non-decreasing
pub trait TimeOracle {
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeOracle for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock. Clones share the same instant.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(now)),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: i64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    /// Move forward by `seconds`
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl TimeOracle for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Token ledger (asset B)
// ============================================================================

/// Ledger holding balances of asset B.
///
/// `transfer` is atomic and fails closed: on `false` no balance has moved.
pub trait TokenLedger {
    type Account: Clone + Eq + Debug;

    fn balance_of(&self, holder: &Self::Account) -> u128;

    fn total_supply(&self) -> u128;

    fn transfer(&mut self, from: &Self::Account, to: &Self::Account, amount: u128) -> bool;
}

/// In-memory B ledger keyed by account name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct InMemoryLedger {
    balances: HashMap<String, u128>,
    total_supply: u128,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new tokens for `holder`. Returns false on supply overflow.
    pub fn mint(&mut self, holder: &str, amount: u128) -> bool {
        let Some(total_supply) = self.total_supply.checked_add(amount) else {
            return false;
        };
        let balance = self.balances.entry(holder.to_string()).or_insert(0);
        // balance <= total_supply, so this cannot overflow once the supply add succeeded
        *balance += amount;
        self.total_supply = total_supply;
        true
    }

    /// Iterate holders and balances
    pub fn balances(&self) -> impl Iterator<Item = (&String, &u128)> {
        self.balances.iter()
    }
}

impl TokenLedger for InMemoryLedger {
    type Account = String;

    fn balance_of(&self, holder: &String) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn transfer(&mut self, from: &String, to: &String, amount: u128) -> bool {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }
        if from == to {
            return true;
        }
        let to_balance = self.balance_of(to);
        let Some(new_to_balance) = to_balance.checked_add(amount) else {
            return false;
        };

        self.balances.insert(from.clone(), from_balance - amount);
        self.balances.insert(to.clone(), new_to_balance);
        true
    }
}

// ============================================================================
// Feed toggle
// ============================================================================

/// Global switch gating publication of a new derived price
pub trait FeedToggle {
    fn is_enabled(&self) -> bool;
}

impl FeedToggle for bool {
    fn is_enabled(&self) -> bool {
        *self
    }
}

/// Shared switch. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct FeedSwitch {
    enabled: Arc<AtomicBool>,
}

impl FeedSwitch {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl FeedToggle for FeedSwitch {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();
        handle.advance(50);
        assert_eq!(clock.now(), 150);
        handle.set(10);
        assert_eq!(clock.now(), 10);
    }

    #[test]
    fn test_system_clock_is_current() {
        // Any date after 2020-01-01
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn test_ledger_transfer() {
        let mut ledger = InMemoryLedger::new();
        assert!(ledger.mint("alice", 100));
        assert_eq!(ledger.total_supply(), 100);

        let alice = "alice".to_string();
        let bob = "bob".to_string();
        assert!(ledger.transfer(&alice, &bob, 40));
        assert_eq!(ledger.balance_of(&alice), 60);
        assert_eq!(ledger.balance_of(&bob), 40);

        // Fails closed
        assert!(!ledger.transfer(&alice, &bob, 61));
        assert_eq!(ledger.balance_of(&alice), 60);
        assert_eq!(ledger.balance_of(&bob), 40);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn test_mint_overflow() {
        let mut ledger = InMemoryLedger::new();
        assert!(ledger.mint("alice", u128::MAX));
        assert!(!ledger.mint("bob", 1));
        assert_eq!(ledger.balance_of(&"bob".to_string()), 0);
    }

    #[test]
    fn test_feed_switch() {
        let switch = FeedSwitch::new(false);
        let handle = switch.clone();
        assert!(!switch.is_enabled());
        handle.set(true);
        assert!(switch.is_enabled());
        assert!(true.is_enabled());
    }
}
