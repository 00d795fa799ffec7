//! # Auction Engine
//!
//! Owns the persistent auction state and its collaborators, and exposes the
//! query and mutation surface. Every call reads the clock once at entry.
//!
//! Mutations are all-or-nothing: every check and every checked computation
//! runs first, the ledger transfer runs last, and state is written only after
//! the transfer succeeded.

use log::{debug, info, warn};

use crate::auction::cycle_manager::CycleManager;
use crate::auction::pricing::{sale_price_a, sale_price_b};
use crate::auction::state::AuctionState;
use crate::auction::trade::{quote_buy_b, quote_sell_b, whole_units};
use crate::collaborators::{FeedToggle, TimeOracle, TokenLedger};
use crate::config::AuctionConfig;
use crate::errors::{AuctionError, AuctionResult};
use crate::oracle::fee_price;
use crate::types::{Cycle, PhaseStatus};

/// Result of an A→B purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub struct BuyFill {
    /// B delivered to the buyer
    pub amount_b: u128,
    /// A kept by the engine
    pub cost_a: u128,
    /// A returned to the buyer
    pub refund_a: u128,
    /// B price the trade executed at
    pub price_b: u128,
}

/// Result of a B→A purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(serde::Serialize))]
pub struct SellFill {
    /// A paid out to the seller
    pub amount_a: u128,
    /// B taken from the seller
    pub cost_b: u128,
    /// A price the trade executed at
    pub price_a: u128,
}

/// Fee-price discovery auction
#[derive(Debug)]
pub struct AuctionEngine<L, T, F>
where
    L: TokenLedger,
    T: TimeOracle,
    F: FeedToggle,
{
    config: AuctionConfig,
    state: AuctionState,
    ledger: L,
    clock: T,
    feed: F,
    /// Engine's own account on the B ledger
    account: L::Account,
}

impl<L, T, F> AuctionEngine<L, T, F>
where
    L: TokenLedger,
    T: TimeOracle,
    F: FeedToggle,
{
    /// Create an engine with no cycle. The first `advance_cycle` creates the bootstrap cycle.
    pub fn new(config: AuctionConfig, ledger: L, clock: T, feed: F, account: L::Account) -> AuctionResult<Self> {
        config.validate()?;
        let state = AuctionState::new(config.manual_price_b);
        Ok(Self {
            config,
            state,
            ledger,
            clock,
            feed,
            account,
        })
    }

    /// Create an engine and immediately schedule the bootstrap cycle
    pub fn initialize(config: AuctionConfig, ledger: L, clock: T, feed: F, account: L::Account) -> AuctionResult<Self> {
        let mut engine = Self::new(config, ledger, clock, feed, account)?;
        engine.advance_cycle()?;
        Ok(engine)
    }

    /// Rebuild an engine from a persisted snapshot
    pub fn restore(
        config: AuctionConfig,
        state: AuctionState,
        ledger: L,
        clock: T,
        feed: F,
        account: L::Account,
    ) -> AuctionResult<Self> {
        config.validate()?;
        if state.cycle.is_some() != state.genesis.is_some() {
            return Err(AuctionError::InvalidConfig("snapshot cycle and genesis must be set together"));
        }
        // The bootstrap flag holds exactly until the first reported cycle exists
        let bootstrap_expected = state.cycle.as_ref().map_or(true, Cycle::is_bootstrap);
        if state.bootstrap != bootstrap_expected {
            return Err(AuctionError::InvalidConfig("snapshot bootstrap flag disagrees with its cycle kind"));
        }
        Ok(Self {
            config,
            state,
            ledger,
            clock,
            feed,
            account,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Persistent state snapshot
    pub fn state(&self) -> &AuctionState {
        &self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn account(&self) -> &L::Account {
        &self.account
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // ========================================================================
    // Phase Queries
    // ========================================================================

    /// Phase derived from the current time
    pub fn phase(&self) -> PhaseStatus {
        PhaseStatus::derive(self.clock.now(), self.state.cycle.as_ref(), self.state.bootstrap)
    }

    pub fn current_phase_code(&self) -> u8 {
        self.phase().code()
    }

    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    pub fn bootstrap_active(&self) -> bool {
        self.state.bootstrap
    }

    // ========================================================================
    // Cycle Queries
    // ========================================================================

    pub fn cycle(&self) -> AuctionResult<&Cycle> {
        self.state.cycle.as_ref().ok_or(AuctionError::NotInitialized)
    }

    pub fn cycle_id(&self) -> AuctionResult<u64> {
        Ok(self.cycle()?.id)
    }

    pub fn cycle_start(&self) -> AuctionResult<i64> {
        Ok(self.cycle()?.start_time)
    }

    pub fn cycle_end(&self) -> AuctionResult<i64> {
        Ok(self.cycle()?.end_time)
    }

    pub fn initial_price_b(&self) -> AuctionResult<u128> {
        Ok(self.cycle()?.initial_price_b)
    }

    pub fn initial_price_a(&self) -> AuctionResult<u128> {
        Ok(self.cycle()?.initial_price_a)
    }

    pub fn initial_inventory_b(&self) -> AuctionResult<u128> {
        Ok(self.cycle()?.initial_inventory_b)
    }

    /// B still for sale in the current cycle (0 before the first cycle)
    pub fn remaining_inventory_b(&self) -> u128 {
        self.state.cycle.as_ref().map_or(0, |cycle| cycle.inventory_b)
    }

    /// Engine's A balance
    pub fn reserve_a(&self) -> u128 {
        self.state.reserve_a
    }

    // ========================================================================
    // Price Queries
    // ========================================================================

    /// Live cost in A of one whole B
    pub fn price_b(&self) -> AuctionResult<u128> {
        sale_price_b(self.state.cycle.as_ref(), self.state.bootstrap, self.clock.now())
    }

    /// Live cost in B of one whole A
    pub fn price_a(&self) -> AuctionResult<u128> {
        sale_price_a(self.state.cycle.as_ref(), self.state.bootstrap, self.clock.now())
    }

    /// Price exposed to fee consumers
    pub fn oracle_price(&self) -> u128 {
        fee_price(self.state.bootstrap, self.config.manual_price_b, self.state.derived_price)
    }

    pub fn upper_bound(&self) -> u128 {
        self.state.bounds.upper_bound
    }

    pub fn lower_bound(&self) -> u128 {
        self.state.bounds.lower_bound
    }

    /// Live midpoint of the current cycle's bounds (manual price until both sides traded)
    pub fn current_price(&self) -> u128 {
        self.state.bounds.current_price(self.config.manual_price_b)
    }

    /// Last committed derived price
    pub fn committed_price(&self) -> u128 {
        self.state.derived_price
    }

    // ========================================================================
    // Trades
    // ========================================================================

    /// Buy `amount_b` of B paying with `supplied_a` of A. Excess A is refunded.
    pub fn buy_b(&mut self, buyer: &L::Account, amount_b: u128, supplied_a: u128) -> AuctionResult<BuyFill> {
        let now = self.clock.now();
        let price_b = sale_price_b(self.state.cycle.as_ref(), self.state.bootstrap, now)?;
        let cycle = self.cycle()?;
        let record = !cycle.is_bootstrap();

        let quote = quote_buy_b(
            cycle,
            &self.state.bounds,
            self.state.reserve_a,
            price_b,
            amount_b,
            supplied_a,
            record,
        )?;

        if !self.ledger.transfer(&self.account, buyer, quote.amount_b) {
            warn!("B ledger rejected transfer of {} to {:?}", quote.amount_b, buyer);
            return Err(AuctionError::TransferFailed);
        }

        self.state.reserve_a = quote.reserve_a_after;
        self.state.bounds = quote.bounds_after;
        if let Some(cycle) = self.state.cycle.as_mut() {
            cycle.inventory_b = quote.inventory_after;
        }

        debug!(
            "{:?} bought {} B (~{} whole) for {} A at {}, refund {}",
            buyer,
            quote.amount_b,
            whole_units(quote.amount_b),
            quote.cost_a,
            price_b,
            quote.refund_a
        );

        Ok(BuyFill {
            amount_b: quote.amount_b,
            cost_a: quote.cost_a,
            refund_a: quote.refund_a,
            price_b,
        })
    }

    /// Buy `amount_a` of A from the engine, paying in B. Only after bootstrap.
    pub fn sell_b(&mut self, seller: &L::Account, amount_a: u128) -> AuctionResult<SellFill> {
        let now = self.clock.now();
        let price_a = sale_price_a(self.state.cycle.as_ref(), self.state.bootstrap, now)?;

        let quote = quote_sell_b(&self.state.bounds, self.state.reserve_a, price_a, amount_a)?;

        if !self.ledger.transfer(seller, &self.account, quote.cost_b) {
            warn!("B ledger rejected transfer of {} from {:?}", quote.cost_b, seller);
            return Err(AuctionError::TransferFailed);
        }

        self.state.reserve_a = quote.reserve_a_after;
        self.state.bounds = quote.bounds_after;

        debug!(
            "{:?} bought {} A (~{} whole) for {} B at {}, implied B price {}",
            seller,
            quote.amount_a,
            whole_units(quote.amount_a),
            quote.cost_b,
            price_a,
            quote.implied_price_b
        );

        Ok(SellFill {
            amount_a: quote.amount_a,
            cost_b: quote.cost_b,
            price_a,
        })
    }

    // ========================================================================
    // Cycle Rollover
    // ========================================================================

    /// Close the current cycle and open the next one. Returns the new cycle id.
    ///
    /// With no cycle yet this schedules the bootstrap cycle.
    pub fn advance_cycle(&mut self) -> AuctionResult<u64> {
        let now = self.clock.now();
        let balance_b = self.ledger.balance_of(&self.account);
        let supply_b = self.ledger.total_supply();
        let manager = CycleManager::new(&self.config);

        let Some(current) = self.state.cycle.as_ref() else {
            let (cycle, genesis) = manager.bootstrap_cycle(now, balance_b, supply_b)?;
            info!(
                "Scheduled bootstrap cycle: window [{}, {}), B price {}, inventory {}",
                cycle.start_time, cycle.end_time, cycle.initial_price_b, cycle.inventory_b
            );
            let id = cycle.id;
            self.state.genesis = Some(genesis);
            self.state.cycle = Some(cycle);
            self.state.cycles_started = 1;
            return Ok(id);
        };

        if now < current.end_time {
            return Err(AuctionError::CycleNotEnded {
                end_time: current.end_time,
                now,
            });
        }
        let genesis = self.state.genesis.ok_or(AuctionError::NotInitialized)?;
        debug!(
            "Cycle {} closed: sold {} of {} B",
            current.id,
            current.sold_b(),
            current.initial_inventory_b
        );

        let derived_price = if current.is_bootstrap() {
            self.state.derived_price
        } else if !self.feed.is_enabled() {
            info!("Price feed disabled, keeping committed price {}", self.state.derived_price);
            self.state.derived_price
        } else {
            if !self.state.bounds.is_complete() {
                info!(
                    "Cycle {} closed without trades on both sides, falling back to the manual price",
                    current.id
                );
            }
            self.state.bounds.current_price(self.config.manual_price_b)
        };

        let next = manager.next_cycle(genesis, current, now, derived_price, balance_b, supply_b)?;

        if derived_price != self.state.derived_price {
            info!(
                "Committed derived price {} (was {}) from cycle {}",
                derived_price, self.state.derived_price, current.id
            );
        }
        info!(
            "Advanced to cycle {}: window [{}, {}), B price {}, A price {}, inventory {}",
            next.id, next.start_time, next.end_time, next.initial_price_b, next.initial_price_a, next.inventory_b
        );

        let id = next.id;
        self.state.derived_price = derived_price;
        self.state.bounds.reset();
        self.state.cycle = Some(next);
        self.state.bootstrap = false;
        self.state.cycles_started += 1;
        Ok(id)
    }
}
