use std::collections::HashSet;
use std::fs;

use auction_core::config::decimal;
use auction_core::{AuctionConfig, InMemoryLedger, SCALE};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Simulator configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimConfig {
    /// Unix time the simulated clock starts at
    pub start_time: i64,

    /// Ledger account the engine trades from
    pub engine_account: String,

    /// Initial state of the price feed switch
    #[serde(default)]
    pub feed_enabled: bool,

    /// Engine parameters, defaults apply to anything left out
    #[serde(default)]
    pub auction: AuctionConfig,

    /// Initial B balances
    pub balances: Vec<BalanceConfig>,
}

/// Initial B holding of one account
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BalanceConfig {
    pub holder: String,

    /// Amount in 18-decimal base units
    #[serde(with = "decimal")]
    pub amount: u128,
}

impl SimConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> SimResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::IoError(format!("Failed to read config file {}: {}", path, e)))?;

        let config: SimConfig = toml::from_str(&content)
            .map_err(|e| SimError::SerializationError(format!("Failed to parse config file {}: {}", path, e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &str) -> SimResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| SimError::IoError(format!("Failed to write config file {}: {}", path, e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SimResult<()> {
        if self.engine_account.is_empty() {
            return Err(SimError::InvalidConfig("engine_account must not be empty".to_string()));
        }

        if self.start_time < 0 {
            return Err(SimError::InvalidConfig(format!(
                "start_time must not be negative, got {}",
                self.start_time
            )));
        }

        let mut seen = HashSet::new();
        for balance in &self.balances {
            if balance.holder.is_empty() {
                return Err(SimError::InvalidConfig("balance holder must not be empty".to_string()));
            }
            if !seen.insert(balance.holder.as_str()) {
                return Err(SimError::InvalidConfig(format!("duplicate balance for {}", balance.holder)));
            }
        }

        self.auction
            .validate()
            .map_err(|e| SimError::InvalidConfig(e.to_string()))?;

        Ok(())
    }

    /// Ledger seeded with the configured balances
    pub fn build_ledger(&self) -> SimResult<InMemoryLedger> {
        let mut ledger = InMemoryLedger::new();
        for balance in &self.balances {
            if !ledger.mint(&balance.holder, balance.amount) {
                return Err(SimError::InvalidConfig("total B supply overflows".to_string()));
            }
        }
        Ok(ledger)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time: 1_500_000_000,
            engine_account: "auction".to_string(),
            feed_enabled: false,
            auction: AuctionConfig::default(),
            balances: vec![],
        }
    }
}

/// Create example configuration file
pub fn create_example_config(path: &str) -> SimResult<()> {
    let supply = 11_000_000 * SCALE;
    let example_config = SimConfig {
        balances: vec![
            BalanceConfig {
                holder: "auction".to_string(),
                amount: supply / 400,
            },
            BalanceConfig {
                holder: "alice".to_string(),
                amount: supply - supply / 400,
            },
        ],
        ..SimConfig::default()
    };

    example_config.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auction_core::TokenLedger;

    const CONFIG: &str = r#"
start_time = 1000
engine_account = "auction"
feed_enabled = true

[auction]
auction_duration = 3600
manual_price_b = "35_000_000_000_000_000"

[[balances]]
holder = "auction"
amount = "27500000000000000000000"

[[balances]]
holder = "alice"
amount = 5
"#;

    #[test]
    fn test_parse_config() {
        let config: SimConfig = toml::from_str(CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.feed_enabled);
        assert_eq!(config.auction.auction_duration, 3600);
        assert_eq!(config.auction.markup, 4);
        assert_eq!(config.auction.manual_price_b, 35 * SCALE / 1000);

        let ledger = config.build_ledger().unwrap();
        assert_eq!(ledger.balance_of(&"auction".to_string()), 27_500 * SCALE);
        assert_eq!(ledger.total_supply(), 27_500 * SCALE + 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SimConfig::default();
        assert!(config.validate().is_ok());

        config.engine_account.clear();
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.auction.markup = 0;
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));

        let mut config = SimConfig::default();
        let balance = BalanceConfig { holder: "alice".to_string(), amount: 1 };
        config.balances = vec![balance.clone(), balance];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_example_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.toml");
        let path = path.to_str().unwrap();

        create_example_config(path).unwrap();
        let config = SimConfig::load(path).unwrap();
        assert_eq!(config.balances.len(), 2);
        assert_eq!(config.balances[0].amount, 27_500 * SCALE);
    }
}
