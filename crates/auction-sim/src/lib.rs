pub mod config;
pub mod error;
pub mod scenario;

pub use config::{create_example_config, BalanceConfig, SimConfig};
pub use error::{SimError, SimResult};
pub use scenario::{Anchor, EngineView, Outcome, Report, Scenario, Simulator, Step, StepOutput, TimeTarget};
