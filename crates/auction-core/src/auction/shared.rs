//! Thread-safe handle around an engine.
//!
//! Every call takes the lock for its whole duration, so mutations never
//! interleave and queries always see a committed state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::auction::engine::{AuctionEngine, BuyFill, SellFill};
use crate::auction::state::AuctionState;
use crate::collaborators::{FeedToggle, TimeOracle, TokenLedger};
use crate::errors::AuctionResult;

/// Cloneable, lock-protected engine handle
pub struct SharedAuction<L, T, F>
where
    L: TokenLedger,
    T: TimeOracle,
    F: FeedToggle,
{
    inner: Arc<Mutex<AuctionEngine<L, T, F>>>,
}

impl<L, T, F> Clone for SharedAuction<L, T, F>
where
    L: TokenLedger,
    T: TimeOracle,
    F: FeedToggle,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, T, F> SharedAuction<L, T, F>
where
    L: TokenLedger,
    T: TimeOracle,
    F: FeedToggle,
{
    pub fn new(engine: AuctionEngine<L, T, F>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut AuctionEngine<L, T, F>) -> R) -> R {
        let mut engine = self.inner.lock();
        f(&mut engine)
    }

    pub fn buy_b(&self, buyer: &L::Account, amount_b: u128, supplied_a: u128) -> AuctionResult<BuyFill> {
        self.inner.lock().buy_b(buyer, amount_b, supplied_a)
    }

    pub fn sell_b(&self, seller: &L::Account, amount_a: u128) -> AuctionResult<SellFill> {
        self.inner.lock().sell_b(seller, amount_a)
    }

    pub fn advance_cycle(&self) -> AuctionResult<u64> {
        self.inner.lock().advance_cycle()
    }

    pub fn price_b(&self) -> AuctionResult<u128> {
        self.inner.lock().price_b()
    }

    pub fn price_a(&self) -> AuctionResult<u128> {
        self.inner.lock().price_a()
    }

    pub fn oracle_price(&self) -> u128 {
        self.inner.lock().oracle_price()
    }

    pub fn current_phase_code(&self) -> u8 {
        self.inner.lock().current_phase_code()
    }

    /// Copy of the persistent state
    pub fn snapshot(&self) -> AuctionState {
        self.inner.lock().state().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{InMemoryLedger, ManualClock};
    use crate::config::AuctionConfig;
    use crate::constants::SCALE;
    use std::thread;

    #[test]
    fn test_concurrent_buys_never_oversell() {
        let mut ledger = InMemoryLedger::new();
        ledger.mint("auction", 400 * SCALE);
        let clock = ManualClock::new(0);
        let engine = AuctionEngine::initialize(
            AuctionConfig::default(),
            ledger,
            clock.clone(),
            false,
            "auction".to_string(),
        )
        .unwrap();
        clock.set(engine.cycle_start().unwrap());

        // Inventory is 400 / 400 = 1 whole B, sold in tenths by 20 threads
        let shared = SharedAuction::new(engine);
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || shared.buy_b(&format!("buyer-{i}"), SCALE / 10, SCALE).is_ok())
            })
            .collect();
        let filled = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();

        assert_eq!(filled, 10);
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.cycle.unwrap().inventory_b, 0);
        shared.with(|engine| assert_eq!(engine.remaining_inventory_b(), 0));
    }
}
