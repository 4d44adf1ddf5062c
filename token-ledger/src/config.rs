//! Configuration for the token ledger

use crate::types::{Account, Amount, TokenInfo};
use serde::{Deserialize, Serialize};

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Actor mailbox capacity (bounded, for backpressure)
    pub channel_capacity: usize,

    /// Token constructor arguments
    pub token: TokenConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "token-ledger".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            channel_capacity: 1000,
            token: TokenConfig::default(),
        }
    }
}

/// Token constructor arguments.
///
/// `initial_supply` and `deployer` are strings so that malformed values
/// surface as `InvalidConfig` instead of failing deserialization
/// (TOML has no 128-bit integers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token name
    pub name: String,

    /// Ticker symbol
    pub symbol: String,

    /// Base-unit scale
    pub decimals: u32,

    /// Initial supply in base units, as a decimal string
    pub initial_supply: String,

    /// Deployer account credited with the full supply, as hex
    pub deployer: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "SampleToken".to_string(),
            symbol: "ST".to_string(),
            decimals: 18,
            // 1000 tokens at 18 decimals
            initial_supply: "1000000000000000000000".to_string(),
            deployer: "0x0000000000000000000000000000000000000001".to_string(),
        }
    }
}

impl TokenConfig {
    /// Parse into typed constructor arguments.
    pub fn constructor_args(&self) -> crate::Result<(Amount, TokenInfo, Account)> {
        let initial_supply: Amount = self.initial_supply.parse().map_err(|e| {
            crate::Error::InvalidConfig(format!(
                "initial_supply {:?} is not a non-negative integer: {}",
                self.initial_supply, e
            ))
        })?;

        let deployer = Account::from_hex(&self.deployer).ok_or_else(|| {
            crate::Error::InvalidConfig(format!(
                "deployer {:?} is not a 20-byte hex account",
                self.deployer
            ))
        })?;

        let info = TokenInfo {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        };

        Ok((initial_supply, info, deployer))
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(name) = std::env::var("TOKEN_LEDGER_NAME") {
            config.token.name = name;
        }

        if let Ok(symbol) = std::env::var("TOKEN_LEDGER_SYMBOL") {
            config.token.symbol = symbol;
        }

        if let Ok(decimals) = std::env::var("TOKEN_LEDGER_DECIMALS") {
            config.token.decimals = decimals.parse().map_err(|e| {
                crate::Error::InvalidConfig(format!("TOKEN_LEDGER_DECIMALS: {}", e))
            })?;
        }

        if let Ok(supply) = std::env::var("TOKEN_LEDGER_INITIAL_SUPPLY") {
            config.token.initial_supply = supply;
        }

        if let Ok(deployer) = std::env::var("TOKEN_LEDGER_DEPLOYER") {
            config.token.deployer = deployer;
        }

        if let Ok(capacity) = std::env::var("TOKEN_LEDGER_CHANNEL_CAPACITY") {
            config.channel_capacity = capacity.parse().map_err(|e| {
                crate::Error::InvalidConfig(format!("TOKEN_LEDGER_CHANNEL_CAPACITY: {}", e))
            })?;
        }

        Ok(config)
    }
}
