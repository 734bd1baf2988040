use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub blockchain: BlockchainConfig,
    pub relay: RelayConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockchainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub contract_address: String,
    pub gas_limit: u64,
    pub confirmations: u64,
    pub confirmation_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub verify_sender: bool,
    pub content_cache_ttl_secs: u64,
    pub content_cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("blockchain.rpc_url", "http://localhost:8545")?
            .set_default("blockchain.chain_id", 97)? // BSC testnet
            .set_default(
                "blockchain.contract_address",
                "0x05BdeE78E712935801916270925EAe29567f91a9",
            )?
            .set_default("blockchain.gas_limit", 1_000_000)?
            .set_default("blockchain.confirmations", 1)?
            .set_default("blockchain.confirmation_timeout_secs", 60)?
            .set_default("relay.verify_sender", true)?
            .set_default("relay.content_cache_ttl_secs", 5)?
            .set_default("relay.content_cache_capacity", 64)?
            .set_default("ui.static_dir", "static")?;

        // Try to load from config file if it exists
        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        } else {
            builder = builder.add_source(File::with_name("config.toml").required(false));
        }

        // Override with environment variables. Double underscore separates
        // nesting so underscored field names survive: PARROT_BLOCKCHAIN__RPC_URL.
        builder = builder.add_source(
            Environment::with_prefix("PARROT")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            blockchain: BlockchainConfig {
                rpc_url: "http://localhost:8545".to_string(),
                chain_id: 97,
                contract_address: "0x05BdeE78E712935801916270925EAe29567f91a9".to_string(),
                gas_limit: 1_000_000,
                confirmations: 1,
                confirmation_timeout_secs: 60,
            },
            relay: RelayConfig {
                verify_sender: true,
                content_cache_ttl_secs: 5,
                content_cache_capacity: 64,
            },
            ui: UiConfig {
                static_dir: "static".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.blockchain.chain_id, 97);
        assert_eq!(config.blockchain.gas_limit, 1_000_000);
        assert_eq!(config.blockchain.confirmations, 1);
        assert!(config.relay.verify_sender);
    }

    #[test]
    fn test_config_file_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4100\n").unwrap();

        std::env::set_var("CONFIG_PATH", path.to_str().unwrap());
        let config = Config::from_env().unwrap();
        std::env::remove_var("CONFIG_PATH");

        assert_eq!(config.server.port, 4100);
        // untouched fields keep their defaults
        assert_eq!(config.blockchain.chain_id, 97);
    }

    #[test]
    fn test_env_override_reaches_underscored_fields() {
        std::env::set_var("PARROT_BLOCKCHAIN__RPC_URL", "http://node.example:9999");
        let config = Config::from_env().unwrap();
        std::env::remove_var("PARROT_BLOCKCHAIN__RPC_URL");

        assert_eq!(config.blockchain.rpc_url, "http://node.example:9999");
    }

    #[test]
    fn test_contract_address_parses() {
        let config = Config::default();
        let parsed: Result<ethers::types::Address, _> = config.blockchain.contract_address.parse();
        assert!(parsed.is_ok());
    }
}
