use crate::config::Config;
use crate::utils::errors::{RelayError, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::sync::Arc;

/// The node operations the relay depends on. Kept behind a trait so the
/// relay engine can be exercised without a live node.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn transaction_count(&self, address: Address) -> Result<U256>;
    async fn gas_price(&self) -> Result<U256>;
    async fn balance(&self, address: Address) -> Result<U256>;
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256>;
    async fn transaction_receipt(&self, tx_hash: H256) -> Result<Option<TransactionReceipt>>;
    async fn block_number(&self) -> Result<u64>;
    async fn call(&self, tx: TypedTransaction) -> Result<Bytes>;
}

/// JSON-RPC client for the node carrying the Parrot Protocol contract.
#[derive(Debug, Clone)]
pub struct ParrotClient {
    provider: Arc<Provider<Http>>,
    chain_id: u64,
    contract_address: Address,
}

impl ParrotClient {
    pub fn new(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.blockchain.rpc_url.as_str())?;
        let contract_address = parse_ethereum_address(&config.blockchain.contract_address)?;

        Ok(Self {
            provider: Arc::new(provider),
            chain_id: config.blockchain.chain_id,
            contract_address,
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }
}

#[async_trait]
impl ChainRpc for ParrotClient {
    /// Transaction count at `latest`, used as the caller's next nonce.
    async fn transaction_count(&self, address: Address) -> Result<U256> {
        self.provider
            .get_transaction_count(address, Some(BlockNumber::Latest.into()))
            .await
            .map_err(RelayError::Blockchain)
    }

    async fn gas_price(&self) -> Result<U256> {
        self.provider
            .get_gas_price()
            .await
            .map_err(RelayError::Blockchain)
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(RelayError::Blockchain)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<H256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(RelayError::Blockchain)?;
        Ok(pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: H256) -> Result<Option<TransactionReceipt>> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(RelayError::Blockchain)
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map(|n| n.as_u64())
            .map_err(RelayError::Blockchain)
    }

    async fn call(&self, tx: TypedTransaction) -> Result<Bytes> {
        self.provider
            .call(&tx, None)
            .await
            .map_err(RelayError::Blockchain)
    }
}

// Helper functions for address and transaction handling
pub fn format_transaction_hash(hash: &H256) -> String {
    format!("0x{:x}", hash)
}

pub fn format_ethereum_address(address: &Address) -> String {
    format!("0x{:x}", address)
}

pub fn parse_ethereum_address(address_str: &str) -> Result<Address> {
    address_str
        .parse()
        .map_err(|_| RelayError::invalid_address(format!("not an Ethereum address: {address_str}")))
}
