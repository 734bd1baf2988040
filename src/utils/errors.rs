use ethers::types::{Address, H256};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Blockchain error: {0}")]
    Blockchain(#[from] ethers::providers::ProviderError),

    #[error("ABI error: {0}")]
    Abi(#[from] ethers::abi::Error),

    #[error("Invalid RPC url: {0}")]
    RpcUrl(#[from] url::ParseError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Signature does not match sender: claimed {claimed:?}, recovered {recovered:?}")]
    SenderMismatch { claimed: Address, recovered: Address },

    #[error("Transaction reverted: {tx_hash:?}")]
    Reverted { tx_hash: H256 },

    #[error("Transaction confirmation timeout: {tx_hash:?}")]
    ConfirmationTimeout { tx_hash: H256 },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Network error: {0}")]
    Network(#[from] hyper::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl RelayError {
    pub fn invalid_address<T: Into<String>>(message: T) -> Self {
        Self::InvalidAddress(message.into())
    }

    pub fn invalid_signature<T: Into<String>>(message: T) -> Self {
        Self::InvalidSignature(message.into())
    }

    pub fn invalid_amount<T: Into<String>>(message: T) -> Self {
        Self::InvalidAmount(message.into())
    }
}
