use crate::auth::signature::{
    create_content_message, parse_signature, purchase_content_message, vote_message,
    SignatureVerifier,
};
use crate::blockchain::client::{format_ethereum_address, parse_ethereum_address, ChainRpc};
use crate::blockchain::contracts::{ContentData, ParrotAbi};
use crate::blockchain::transactions::{
    build_envelope, submit_signed, wait_for_confirmation, EnvelopeParams, RelayReceipt,
};
use crate::config::Config;
use crate::metrics::RelayMetrics;
use crate::relay::cache::ContentCache;
use crate::utils::errors::{RelayError, Result};
use crate::utils::helpers::{format_address, parse_ether_amount};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, U256};
use std::sync::Arc;
use std::time::Duration;

/// Forwards pre-signed contract calls to the node. One method per endpoint;
/// every action follows the same shape: parse fields, fetch the caller's
/// nonce, assemble the envelope, attach the caller's signature, submit, and
/// block until confirmed.
#[derive(Clone)]
pub struct RelayEngine {
    chain: Arc<dyn ChainRpc>,
    codec: Arc<ParrotAbi>,
    verifier: SignatureVerifier,
    cache: ContentCache,
    metrics: RelayMetrics,
    contract_address: Address,
    chain_id: u64,
    gas_limit: U256,
    confirmations: u64,
    confirmation_timeout: Duration,
    verify_sender: bool,
}

impl RelayEngine {
    pub fn new(chain: Arc<dyn ChainRpc>, config: &Config, metrics: RelayMetrics) -> Result<Self> {
        Ok(Self {
            chain,
            codec: Arc::new(ParrotAbi::new()?),
            verifier: SignatureVerifier::new(),
            cache: ContentCache::new(
                config.relay.content_cache_capacity,
                config.relay.content_cache_ttl_secs,
            ),
            metrics,
            contract_address: parse_ethereum_address(&config.blockchain.contract_address)?,
            chain_id: config.blockchain.chain_id,
            gas_limit: U256::from(config.blockchain.gas_limit),
            confirmations: config.blockchain.confirmations,
            confirmation_timeout: Duration::from_secs(config.blockchain.confirmation_timeout_secs),
            verify_sender: config.relay.verify_sender,
        })
    }

    pub async fn create_content(
        &self,
        uri: &str,
        price: &str,
        signature: &str,
        address: &str,
    ) -> Result<RelayReceipt> {
        let price_wei = parse_ether_amount(price)?;
        let data = self.codec.encode_create_content(uri, price_wei)?;
        let message = create_content_message(uri, price);
        self.relay("createContent", address, U256::zero(), data, signature, &message)
            .await
    }

    pub async fn purchase_content(
        &self,
        id: u64,
        value: &str,
        signature: &str,
        address: &str,
    ) -> Result<RelayReceipt> {
        let value_wei = parse_ether_amount(value)?;
        let data = self.codec.encode_purchase_content(id)?;
        let message = purchase_content_message(id, value);
        self.relay("purchaseContent", address, value_wei, data, signature, &message)
            .await
    }

    pub async fn vote(&self, id: u64, signature: &str, address: &str) -> Result<RelayReceipt> {
        let data = self.codec.encode_vote(id)?;
        let message = vote_message(id);
        self.relay("vote", address, U256::zero(), data, signature, &message)
            .await
    }

    /// Read the active content list via `eth_call`, short-circuiting through
    /// the cache.
    pub async fn active_content(&self) -> Result<Vec<ContentData>> {
        if let Some(contents) = self.cache.get(&self.contract_address).await {
            tracing::debug!(count = contents.len(), "Content list served from cache");
            return Ok(contents);
        }

        let data = self.codec.encode_get_active_content()?;
        let call = TypedTransaction::Legacy(
            TransactionRequest::new()
                .to(self.contract_address)
                .data(data),
        );

        let output = self.chain.call(call).await?;
        let contents = self.codec.decode_active_content(&output)?;

        self.cache
            .put(self.contract_address, contents.clone())
            .await;

        Ok(contents)
    }

    async fn relay(
        &self,
        action: &str,
        address: &str,
        value: U256,
        data: Bytes,
        signature: &str,
        auth_message: &str,
    ) -> Result<RelayReceipt> {
        let relay_id = uuid::Uuid::new_v4();
        tracing::info!(
            %relay_id,
            action,
            caller = %format_address(address),
            "Relaying transaction"
        );

        let result = self
            .relay_inner(address, value, data, signature, auth_message)
            .await;

        match &result {
            Ok(receipt) => {
                self.metrics.record_relay(action, "confirmed");
                tracing::info!(
                    %relay_id,
                    action,
                    tx_hash = %format!("{:?}", receipt.transaction_hash),
                    "Transaction confirmed"
                );
            }
            Err(RelayError::SenderMismatch { .. }) => {
                self.metrics.record_relay(action, "rejected");
                tracing::warn!(%relay_id, action, "Rejected transaction with mismatched sender");
            }
            Err(e) => {
                self.metrics.record_relay(action, "failed");
                tracing::error!(%relay_id, action, error = %e, "Relay failed");
            }
        }

        result
    }

    async fn relay_inner(
        &self,
        address: &str,
        value: U256,
        data: Bytes,
        signature: &str,
        auth_message: &str,
    ) -> Result<RelayReceipt> {
        let caller = parse_ethereum_address(address)?;
        let signature = parse_signature(signature)?;

        // The wallet signed the per-action message, not the envelope; the
        // claimed sender must be its recovered signer.
        if self.verify_sender {
            let recovered = self.verifier.recover_personal(auth_message, &signature)?;
            if recovered != caller {
                return Err(RelayError::SenderMismatch {
                    claimed: caller,
                    recovered,
                });
            }
        }

        let nonce = self.chain.transaction_count(caller).await?;
        let gas_price = self.chain.gas_price().await?;

        let tx = build_envelope(EnvelopeParams {
            to: self.contract_address,
            value,
            nonce,
            gas_limit: self.gas_limit,
            gas_price,
            data,
            chain_id: self.chain_id,
        });

        let started = std::time::Instant::now();
        let tx_hash = submit_signed(self.chain.as_ref(), &tx, &signature).await?;
        let receipt = wait_for_confirmation(
            self.chain.as_ref(),
            tx_hash,
            self.confirmations,
            self.confirmation_timeout,
        )
        .await?;

        self.metrics
            .confirmation_seconds
            .observe(started.elapsed().as_secs_f64());

        // The list is stale the moment a write confirms
        self.cache.clear().await;

        Ok(RelayReceipt::from(receipt))
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn contract_address_hex(&self) -> String {
        format_ethereum_address(&self.contract_address)
    }
}
