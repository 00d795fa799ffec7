//! # Auction Scenario Tests
//!
//! End-to-end walks through the bootstrap cycle and the first reported
//! cycles, driving the engine with a manual clock and an in-memory ledger.

use auction_core::math::mul_scaled;
use auction_core::*;

type Engine = AuctionEngine<InMemoryLedger, ManualClock, FeedSwitch>;

const ENGINE: &str = "auction";
const TRADER: &str = "trader";
const HOUR: i64 = SECONDS_PER_HOUR;

struct Harness {
    engine: Engine,
    clock: ManualClock,
    feed: FeedSwitch,
}

fn account(name: &str) -> String {
    name.to_string()
}

/// 11M B in circulation, the engine funded with exactly one bootstrap allocation
fn harness() -> Harness {
    let supply = 11_000_000 * SCALE;
    let mut ledger = InMemoryLedger::new();
    ledger.mint(ENGINE, supply / 400);
    ledger.mint(TRADER, supply - supply / 400);

    let clock = ManualClock::new(1_500_000_000);
    let feed = FeedSwitch::new(false);
    let engine = Engine::initialize(
        AuctionConfig::default(),
        ledger,
        clock.clone(),
        feed.clone(),
        account(ENGINE),
    )
    .unwrap();

    Harness { engine, clock, feed }
}

impl Harness {
    fn to_start(&self) {
        self.clock.set(self.engine.cycle_start().unwrap());
    }

    fn to_end(&self) {
        self.clock.set(self.engine.cycle_end().unwrap() + 1);
    }

    fn buy_at_market(&mut self, amount_b: u128) -> BuyFill {
        let price_b = self.engine.price_b().unwrap();
        let cost = mul_scaled(amount_b, price_b).unwrap();
        self.engine.buy_b(&account(TRADER), amount_b, cost).unwrap()
    }

    fn sell_at_market(&mut self, amount_a: u128) -> SellFill {
        self.engine.sell_b(&account(TRADER), amount_a).unwrap()
    }

    fn balance(&self, holder: &str) -> u128 {
        self.engine.ledger().balance_of(&account(holder))
    }
}

#[test]
fn test_bootstrap_cycle() {
    let mut h = harness();

    // Dormant and in bootstrap before the window opens
    assert_eq!(h.engine.current_phase_code(), 0);
    assert!(h.engine.bootstrap_active());
    assert!(!h.engine.is_active());

    h.to_start();
    assert_eq!(h.engine.current_phase_code(), 2);
    assert!(h.engine.is_active());
    assert_eq!(h.engine.price_b().unwrap(), h.engine.initial_price_b().unwrap());

    // Only B is for sale during bootstrap
    assert_eq!(h.engine.price_a(), Err(AuctionError::UnsupportedDirection));
    assert_eq!(
        h.engine.sell_b(&account(TRADER), SCALE),
        Err(AuctionError::UnsupportedDirection)
    );

    // One hour into a 24 hour window the price has lost 1/24
    h.clock.advance(HOUR);
    let price_b = h.engine.initial_price_b().unwrap() * 23 / 24;
    assert_eq!(h.engine.price_b().unwrap(), price_b);

    assert_eq!(h.engine.initial_inventory_b().unwrap(), 11_000_000 * SCALE / 400);
    assert_eq!(h.balance(ENGINE), h.engine.initial_inventory_b().unwrap());
    assert_eq!(h.engine.reserve_a(), 0);

    // Overpayment comes back as a refund
    let trader_before = h.balance(TRADER);
    let cost = mul_scaled(SCALE, price_b).unwrap();
    let fill = h.engine.buy_b(&account(TRADER), SCALE, cost + 20).unwrap();
    assert_eq!(fill.cost_a, cost);
    assert_eq!(fill.refund_a, 20);
    assert_eq!(h.engine.reserve_a(), cost);
    assert_eq!(h.balance(TRADER), trader_before + SCALE);

    // Clear out the rest of the inventory
    let remaining = h.engine.remaining_inventory_b();
    let cost = mul_scaled(remaining, price_b).unwrap();
    h.engine.buy_b(&account(TRADER), remaining, cost).unwrap();
    assert_eq!(h.engine.remaining_inventory_b(), 0);
    assert_eq!(h.balance(ENGINE), 0);

    assert_eq!(
        h.engine.buy_b(&account(TRADER), remaining, cost),
        Err(AuctionError::InsufficientInventory { requested: remaining, available: 0 })
    );

    // Bootstrap buys never touch the bounds
    assert_eq!(h.engine.upper_bound(), 0);

    h.to_end();
    assert_eq!(h.engine.current_phase_code(), 3);
    assert!(h.engine.bootstrap_active());
    assert!(!h.engine.is_active());

    h.engine.advance_cycle().unwrap();
    h.to_start();

    // Both directions trade in a reported cycle
    assert_eq!(h.engine.current_phase_code(), 6);
    assert!(h.engine.is_active());
    assert!(!h.engine.bootstrap_active());
    assert_eq!(h.engine.price_b().unwrap(), h.engine.initial_price_b().unwrap());
    assert_eq!(h.engine.price_a().unwrap(), h.engine.initial_price_a().unwrap());

    let price_a = h.engine.initial_price_a().unwrap();
    let reserve_before = h.engine.reserve_a();
    let fill = h.sell_at_market(SCALE);
    assert_eq!(fill.cost_b, price_a);
    assert_eq!(h.engine.reserve_a(), reserve_before - SCALE);
    assert_eq!(h.balance(ENGINE), price_a);
    assert!(!h.engine.bootstrap_active());
}

#[test]
fn test_reporting_fee_from_auction() {
    let mut h = harness();

    // Seed the A reserve during bootstrap
    h.to_start();
    h.buy_at_market(5_000 * SCALE);
    h.to_end();
    h.engine.advance_cycle().unwrap();
    h.to_start();

    // First reported cycle: oracle still on the manual price, no bounds yet
    let manual = h.engine.config().manual_price_b;
    assert_eq!(h.engine.oracle_price(), manual);
    assert_eq!(h.engine.upper_bound(), 0);
    assert_eq!(h.engine.lower_bound(), 0);
    assert_eq!(h.engine.current_price(), manual);

    let price_b = h.engine.price_b().unwrap();
    h.buy_at_market(SCALE);
    assert_eq!(h.engine.upper_bound(), price_b);

    let price_a = h.engine.price_a().unwrap();
    h.sell_at_market(SCALE);
    let lower = SCALE_SQUARED / price_a;
    assert_eq!(h.engine.lower_bound(), lower);
    assert_eq!(
        h.engine.current_price(),
        (h.engine.lower_bound() + h.engine.upper_bound()) / 2
    );

    // Half a day later, larger trades weigh more
    h.clock.advance(12 * HOUR);
    let price_b2 = h.engine.price_b().unwrap();
    h.buy_at_market(2 * SCALE);
    assert_eq!(h.engine.upper_bound(), (price_b2 * 2 + price_b) / 3);

    let price_a2 = h.engine.price_a().unwrap();
    h.sell_at_market(2 * SCALE);
    let lower2 = SCALE_SQUARED / price_a2;
    assert_eq!(h.engine.lower_bound(), (lower2 * 2 + lower) / 3);

    let derived = (h.engine.lower_bound() + h.engine.upper_bound()) / 2;
    assert_eq!(h.engine.current_price(), derived);

    // Live bounds never reach the oracle
    assert_eq!(h.engine.oracle_price(), manual);

    h.feed.set(true);
    h.to_end();
    assert_eq!(h.engine.oracle_price(), manual);

    h.engine.advance_cycle().unwrap();
    assert_eq!(h.engine.committed_price(), derived);
    assert_eq!(h.engine.oracle_price(), derived);

    h.to_start();
    assert_eq!(h.engine.oracle_price(), derived);

    // Next cycle seeded at 4x the derived price in both directions
    assert_eq!(h.engine.initial_price_b().unwrap(), 4 * derived);
    assert_eq!(h.engine.initial_price_a().unwrap(), 4 * SCALE_SQUARED / derived);
    assert_eq!(h.engine.upper_bound(), 0);
    assert_eq!(h.engine.lower_bound(), 0);

    let price_b = h.engine.price_b().unwrap();
    h.buy_at_market(SCALE);
    assert_eq!(h.engine.upper_bound(), price_b);

    let price_a = h.engine.price_a().unwrap();
    h.sell_at_market(SCALE);
    assert_eq!(h.engine.lower_bound(), SCALE_SQUARED / price_a);

    let new_derived = (h.engine.lower_bound() + h.engine.upper_bound()) / 2;
    assert_eq!(h.engine.current_price(), new_derived);

    // Oracle lags until the next rollover commits
    h.to_end();
    assert_eq!(h.engine.oracle_price(), derived);

    h.engine.advance_cycle().unwrap();
    assert_eq!(h.engine.committed_price(), new_derived);
    assert_eq!(h.engine.oracle_price(), new_derived);
    assert_eq!(h.engine.initial_price_b().unwrap(), 4 * new_derived);
    assert_eq!(h.engine.initial_price_a().unwrap(), 4 * SCALE_SQUARED / new_derived);
}

#[test]
fn test_late_advance_skips_missed_windows() {
    let mut h = harness();
    let genesis = h.engine.cycle_start().unwrap();
    let period = h.engine.config().cycle_period().unwrap();

    // Nobody advances for a week after bootstrap
    h.clock.set(genesis + 7 * 24 * HOUR + 1);
    let id = h.engine.advance_cycle().unwrap();
    assert_eq!(id, 1);

    let start = h.engine.cycle_start().unwrap();
    assert_eq!((start - genesis) % period, 0);
    assert!(h.engine.cycle_end().unwrap() > h.engine.now());
    assert_eq!(h.engine.state().cycles_started, 2);

    h.to_start();
    assert!(h.engine.is_active());
    h.buy_at_market(SCALE);
}

#[test]
fn test_inventory_refreshes_each_cycle() {
    let mut h = harness();
    h.to_start();
    h.buy_at_market(1_000 * SCALE);
    h.to_end();
    h.engine.advance_cycle().unwrap();

    let balance = h.balance(ENGINE);
    assert_eq!(h.engine.remaining_inventory_b(), balance);
    assert_eq!(h.engine.initial_inventory_b().unwrap(), balance);

    h.to_start();
    h.sell_at_market(SCALE);
    let price_b = h.engine.price_b().unwrap();
    let fill = h.buy_at_market(SCALE);
    assert_eq!(fill.price_b, price_b);
    assert_eq!(h.engine.remaining_inventory_b(), balance - SCALE);
}

#[test]
fn test_shared_engine_matches_direct_calls() {
    let h = harness();
    let clock = h.clock.clone();
    let shared = SharedAuction::new(h.engine);

    clock.set(shared.with(|engine| engine.cycle_start().unwrap()));
    assert_eq!(shared.current_phase_code(), 2);

    let price_b = shared.price_b().unwrap();
    shared.buy_b(&account(TRADER), SCALE, price_b).unwrap();
    assert_eq!(shared.snapshot().reserve_a, price_b);
    assert_eq!(shared.oracle_price(), AuctionConfig::default().manual_price_b);
}

#[test]
fn test_dormant_gap_between_reported_windows() {
    let mut h = harness();
    h.to_end();
    assert_eq!(h.engine.current_phase_code(), 3);

    // After the first advance the wait for the next window is still a dormant-ended gap
    h.engine.advance_cycle().unwrap();
    assert!(h.engine.now() < h.engine.cycle_start().unwrap());
    assert_eq!(h.engine.current_phase_code(), 7);
    assert!(!h.engine.is_active());
    assert_eq!(h.engine.price_b(), Err(AuctionError::AuctionNotActive));
    assert_eq!(h.engine.price_a(), Err(AuctionError::AuctionNotActive));

    h.to_start();
    assert_eq!(h.engine.current_phase_code(), 6);

    h.to_end();
    assert_eq!(h.engine.current_phase_code(), 7);
    h.engine.advance_cycle().unwrap();
    assert_eq!(h.engine.current_phase_code(), 7);
    assert_eq!(
        h.engine.sell_b(&account(TRADER), SCALE),
        Err(AuctionError::AuctionNotActive)
    );
}

#[test]
fn test_one_sided_cycle_after_commit_falls_back_to_manual() {
    let mut h = harness();
    let manual = h.engine.config().manual_price_b;
    h.feed.set(true);

    h.to_start();
    h.buy_at_market(5_000 * SCALE);
    h.to_end();
    h.engine.advance_cycle().unwrap();

    // Both sides trade: a real derived price is committed
    h.to_start();
    h.buy_at_market(SCALE);
    h.sell_at_market(SCALE);
    let derived = h.engine.current_price();
    h.to_end();
    h.engine.advance_cycle().unwrap();
    assert_eq!(h.engine.oracle_price(), derived);
    assert_ne!(derived, manual);

    // Only buys: the live price is the manual constant, and advancing commits it
    h.to_start();
    h.buy_at_market(2 * SCALE);
    assert_eq!(h.engine.upper_bound(), h.engine.initial_price_b().unwrap());
    assert_eq!(h.engine.lower_bound(), 0);
    assert_eq!(h.engine.current_price(), manual);

    h.to_end();
    assert_eq!(h.engine.oracle_price(), derived);
    h.engine.advance_cycle().unwrap();
    assert_eq!(h.engine.committed_price(), manual);
    assert_eq!(h.engine.oracle_price(), manual);
    assert_eq!(h.engine.initial_price_b().unwrap(), 4 * manual);
    assert_eq!(h.engine.initial_price_a().unwrap(), 4 * SCALE_SQUARED / manual);
}
