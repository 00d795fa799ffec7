//! # Scenario Runner
//!
//! Replays a scripted sequence of steps against an engine driven by a manual
//! clock, an in-memory ledger and a feed switch. Every step produces an
//! outcome: its payload on success or the error kind on failure.

use std::fs;

use auction_core::config::decimal;
use auction_core::{
    AuctionEngine, AuctionError, AuctionResult, AuctionState, BuyFill, FeedSwitch, InMemoryLedger, ManualClock,
    SellFill, TimeOracle, TokenLedger,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};

type Engine = AuctionEngine<InMemoryLedger, ManualClock, FeedSwitch>;

// ============================================================================
// Scenario Format
// ============================================================================

/// Ordered list of steps loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub steps: Vec<Step>,
}

/// Point in time a `set_time` step moves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TimeTarget {
    Timestamp(i64),
    Anchor(Anchor),
}

/// Time relative to the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    CycleStart,
    CycleEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    SetTime {
        to: TimeTarget,
    },
    Wait {
        seconds: i64,
    },
    Advance,
    BuyB {
        account: String,
        #[serde(with = "decimal")]
        amount: u128,
        /// A attached to the purchase, exact cost when left out
        #[serde(default, with = "optional_decimal", skip_serializing_if = "Option::is_none")]
        payment: Option<u128>,
    },
    SellB {
        account: String,
        #[serde(with = "decimal")]
        amount: u128,
    },
    ToggleFeed {
        enabled: bool,
    },
    Snapshot {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::SetTime { .. } => "set_time",
            Step::Wait { .. } => "wait",
            Step::Advance => "advance",
            Step::BuyB { .. } => "buy_b",
            Step::SellB { .. } => "sell_b",
            Step::ToggleFeed { .. } => "toggle_feed",
            Step::Snapshot { .. } => "snapshot",
        }
    }
}

impl Scenario {
    /// Load a scenario from TOML file
    pub fn load(path: &str) -> SimResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::IoError(format!("Failed to read scenario file {}: {}", path, e)))?;
        let scenario: Scenario = toml::from_str(&content)
            .map_err(|e| SimError::SerializationError(format!("Failed to parse scenario file {}: {}", path, e)))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Save a scenario to TOML file
    pub fn save(&self, path: &str) -> SimResult<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.steps.is_empty() {
            return Err(SimError::InvalidScenario("scenario has no steps".to_string()));
        }
        for (index, step) in self.steps.iter().enumerate() {
            match step {
                Step::Wait { seconds } if *seconds < 0 => {
                    return Err(SimError::InvalidScenario(format!(
                        "step {}: wait must not go backwards ({}s)",
                        index, seconds
                    )));
                }
                Step::BuyB { account, .. } | Step::SellB { account, .. } if account.is_empty() => {
                    return Err(SimError::InvalidScenario(format!("step {}: account must not be empty", index)));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Bootstrap, seed the reserve, then one reported cycle with trades on both sides
    pub fn example() -> Self {
        let whole = auction_core::SCALE;
        Self {
            name: "bootstrap then one reported cycle".to_string(),
            steps: vec![
                Step::SetTime { to: TimeTarget::Anchor(Anchor::CycleStart) },
                Step::BuyB { account: "alice".to_string(), amount: 5_000 * whole, payment: None },
                Step::SetTime { to: TimeTarget::Anchor(Anchor::CycleEnd) },
                Step::Advance,
                Step::ToggleFeed { enabled: true },
                Step::SetTime { to: TimeTarget::Anchor(Anchor::CycleStart) },
                Step::BuyB { account: "alice".to_string(), amount: whole, payment: None },
                Step::SellB { account: "alice".to_string(), amount: whole },
                Step::Snapshot { label: Some("mid-cycle".to_string()) },
                Step::SetTime { to: TimeTarget::Anchor(Anchor::CycleEnd) },
                Step::Advance,
                Step::Snapshot { label: Some("committed".to_string()) },
            ],
        }
    }
}

/// `Option<u128>` through the decimal codec
mod optional_decimal {
    use super::decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Amount(#[serde(with = "decimal")] u128);

    pub fn serialize<S>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(amount) => decimal::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Amount>::deserialize(deserializer)?.map(|Amount(amount)| amount))
    }
}

// ============================================================================
// Report
// ============================================================================

/// Engine view captured by `snapshot` steps and at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineView {
    pub label: Option<String>,
    pub now: i64,
    pub phase_code: u8,
    pub bootstrap: bool,
    pub cycle_id: Option<u64>,
    pub price_b: Option<u128>,
    pub price_a: Option<u128>,
    pub oracle_price: u128,
    pub committed_price: u128,
    pub current_price: u128,
    pub upper_bound: u128,
    pub lower_bound: u128,
    pub remaining_inventory_b: u128,
    pub reserve_a: u128,
    pub engine_balance_b: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepOutput {
    Time { now: i64 },
    Advanced { cycle_id: u64 },
    Bought(BuyFill),
    Sold(SellFill),
    Feed { enabled: bool },
    Snapshot(EngineView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ok { output: StepOutput },
    Failed { kind: String, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: &'static str,
    pub now: i64,
    pub outcome: Outcome,
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub scenario: String,
    pub steps: Vec<StepReport>,
    pub failures: usize,
    pub final_view: EngineView,
    pub final_state: AuctionState,
}

// ============================================================================
// Simulator
// ============================================================================

pub struct Simulator {
    engine: Engine,
    clock: ManualClock,
    feed: FeedSwitch,
}

impl Simulator {
    /// Build the engine from configuration and schedule the bootstrap cycle
    pub fn new(config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let ledger = config.build_ledger()?;
        let clock = ManualClock::new(config.start_time);
        let feed = FeedSwitch::new(config.feed_enabled);

        let engine = AuctionEngine::initialize(
            config.auction.clone(),
            ledger,
            clock.clone(),
            feed.clone(),
            config.engine_account.clone(),
        )?;

        info!(
            "Simulator ready: bootstrap window [{}, {})",
            engine.cycle_start()?,
            engine.cycle_end()?
        );
        Ok(Self { engine, clock, feed })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Apply one step
    pub fn apply(&mut self, step: &Step) -> AuctionResult<StepOutput> {
        match step {
            Step::SetTime { to } => {
                let timestamp = match to {
                    TimeTarget::Timestamp(timestamp) => *timestamp,
                    TimeTarget::Anchor(Anchor::CycleStart) => self.engine.cycle_start()?,
                    // First instant after the window
                    TimeTarget::Anchor(Anchor::CycleEnd) => self.engine.cycle_end()?,
                };
                self.clock.set(timestamp);
                Ok(StepOutput::Time { now: timestamp })
            }
            Step::Wait { seconds } => {
                self.clock.advance(*seconds);
                Ok(StepOutput::Time { now: self.clock.now() })
            }
            Step::Advance => Ok(StepOutput::Advanced {
                cycle_id: self.engine.advance_cycle()?,
            }),
            Step::BuyB { account, amount, payment } => {
                let supplied = match payment {
                    Some(payment) => *payment,
                    None => auction_core::math::mul_scaled(*amount, self.engine.price_b()?)?,
                };
                Ok(StepOutput::Bought(self.engine.buy_b(account, *amount, supplied)?))
            }
            Step::SellB { account, amount } => Ok(StepOutput::Sold(self.engine.sell_b(account, *amount)?)),
            Step::ToggleFeed { enabled } => {
                self.feed.set(*enabled);
                Ok(StepOutput::Feed { enabled: *enabled })
            }
            Step::Snapshot { label } => Ok(StepOutput::Snapshot(self.view(label.clone()))),
        }
    }

    /// Run every step. With `fail_fast` the first failing step aborts the run.
    pub fn run(&mut self, scenario: &Scenario, fail_fast: bool) -> SimResult<Report> {
        info!("Running scenario '{}' ({} steps)", scenario.name, scenario.steps.len());

        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut failures = 0;

        for (index, step) in scenario.steps.iter().enumerate() {
            let action = step.action();
            let outcome = match self.apply(step) {
                Ok(output) => {
                    debug!("step {} {}: {:?}", index, action, output);
                    Outcome::Ok { output }
                }
                Err(source) => {
                    if fail_fast {
                        return Err(SimError::StepFailed { index, action, source });
                    }
                    warn!("step {} {} failed: {}", index, action, source);
                    failures += 1;
                    failure(&source)
                }
            };

            steps.push(StepReport {
                index,
                action,
                now: self.clock.now(),
                outcome,
            });
        }

        info!("Scenario finished with {} failed steps", failures);
        Ok(Report {
            scenario: scenario.name.clone(),
            steps,
            failures,
            final_view: self.view(None),
            final_state: self.engine.state().clone(),
        })
    }

    fn view(&self, label: Option<String>) -> EngineView {
        let engine = &self.engine;
        EngineView {
            label,
            now: engine.now(),
            phase_code: engine.current_phase_code(),
            bootstrap: engine.bootstrap_active(),
            cycle_id: engine.cycle_id().ok(),
            price_b: engine.price_b().ok(),
            price_a: engine.price_a().ok(),
            oracle_price: engine.oracle_price(),
            committed_price: engine.committed_price(),
            current_price: engine.current_price(),
            upper_bound: engine.upper_bound(),
            lower_bound: engine.lower_bound(),
            remaining_inventory_b: engine.remaining_inventory_b(),
            reserve_a: engine.reserve_a(),
            engine_balance_b: engine.ledger().balance_of(engine.account()),
        }
    }
}

fn failure(error: &AuctionError) -> Outcome {
    Outcome::Failed {
        kind: error.kind().to_string(),
        message: error.to_string(),
    }
}
