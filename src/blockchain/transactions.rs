use crate::blockchain::client::ChainRpc;
use crate::utils::errors::{RelayError, Result};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use serde::{Deserialize, Serialize};

/// Everything needed to assemble one contract call envelope.
#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    pub to: Address,
    pub value: U256,
    pub nonce: U256,
    pub gas_limit: U256,
    pub gas_price: U256,
    pub data: Bytes,
    pub chain_id: u64,
}

/// Build a legacy transaction envelope for the contract call. The caller has
/// already signed this exact envelope; the relay only fills in what the
/// node round-trip provides (nonce, gas price).
pub fn build_envelope(params: EnvelopeParams) -> TypedTransaction {
    let tx = TransactionRequest::new()
        .to(params.to)
        .value(params.value)
        .nonce(params.nonce)
        .gas(params.gas_limit)
        .gas_price(params.gas_price)
        .data(params.data)
        .chain_id(params.chain_id);

    TypedTransaction::Legacy(tx)
}

/// Attach the caller-provided signature and submit the raw transaction.
pub async fn submit_signed(
    chain: &dyn ChainRpc,
    tx: &TypedTransaction,
    signature: &Signature,
) -> Result<H256> {
    let raw = tx.rlp_signed(signature);
    let tx_hash = chain.send_raw_transaction(raw).await?;
    tracing::info!(tx_hash = %format!("{tx_hash:?}"), "Submitted transaction");
    Ok(tx_hash)
}

/// Poll for the receipt until the transaction has the requested number of
/// confirmations. A receipt with status 0 is a revert. No retry on timeout.
pub async fn wait_for_confirmation(
    chain: &dyn ChainRpc,
    tx_hash: H256,
    confirmations: u64,
    timeout: std::time::Duration,
) -> Result<TransactionReceipt> {
    tokio::time::timeout(timeout, async {
        loop {
            if let Some(receipt) = chain.transaction_receipt(tx_hash).await? {
                // Only an explicit status 0 is a revert; a missing status
                // (pre-Byzantium node) leaves inclusion as the only signal.
                if receipt.status == Some(U64::zero()) {
                    return Err(RelayError::Reverted { tx_hash });
                }

                if confirmations <= 1 {
                    return Ok(receipt);
                }

                if let Some(included_at) = receipt.block_number {
                    let current = chain.block_number().await?;
                    if current.saturating_sub(included_at.as_u64()) + 1 >= confirmations {
                        return Ok(receipt);
                    }
                }
            }

            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
    })
    .await
    .map_err(|_| RelayError::ConfirmationTimeout { tx_hash })?
}

/// The slice of the receipt the relay returns to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayReceipt {
    pub transaction_hash: H256,
    pub block_number: Option<U64>,
    pub gas_used: Option<U256>,
    pub status: Option<U64>,
}

impl From<TransactionReceipt> for RelayReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: receipt.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::client::MockChainRpc;

    fn envelope() -> TypedTransaction {
        build_envelope(EnvelopeParams {
            to: Address::repeat_byte(0x11),
            value: U256::from(5),
            nonce: U256::from(9),
            gas_limit: U256::from(1_000_000),
            gas_price: U256::from(3_000_000_000u64),
            data: Bytes::from(vec![0xde, 0xad]),
            chain_id: 97,
        })
    }

    #[test]
    fn test_build_envelope() {
        match envelope() {
            TypedTransaction::Legacy(tx) => {
                assert_eq!(tx.to, Some(NameOrAddress::Address(Address::repeat_byte(0x11))));
                assert_eq!(tx.value, Some(U256::from(5)));
                assert_eq!(tx.nonce, Some(U256::from(9)));
                assert_eq!(tx.gas, Some(U256::from(1_000_000)));
                assert_eq!(tx.gas_price, Some(U256::from(3_000_000_000u64)));
                assert_eq!(tx.chain_id, Some(U64::from(97)));
            }
            _ => panic!("Expected legacy transaction"),
        }
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_success() {
        let tx_hash = H256::repeat_byte(0xab);

        let mut chain = MockChainRpc::new();
        chain.expect_transaction_receipt().returning(move |hash| {
            let receipt = TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(100)),
                status: Some(U64::from(1)),
                ..Default::default()
            };
            Ok(Some(receipt))
        });

        let receipt = wait_for_confirmation(
            &chain,
            tx_hash,
            1,
            std::time::Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(receipt.transaction_hash, tx_hash);
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_revert() {
        let tx_hash = H256::repeat_byte(0xcd);

        let mut chain = MockChainRpc::new();
        chain.expect_transaction_receipt().returning(move |hash| {
            let receipt = TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(100)),
                status: Some(U64::from(0)),
                ..Default::default()
            };
            Ok(Some(receipt))
        });

        let result = wait_for_confirmation(
            &chain,
            tx_hash,
            1,
            std::time::Duration::from_secs(5),
        )
        .await;
        assert!(matches!(result, Err(RelayError::Reverted { .. })));
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_without_status_field() {
        let tx_hash = H256::repeat_byte(0x42);

        let mut chain = MockChainRpc::new();
        chain.expect_transaction_receipt().returning(move |hash| {
            let receipt = TransactionReceipt {
                transaction_hash: hash,
                block_number: Some(U64::from(100)),
                status: None,
                ..Default::default()
            };
            Ok(Some(receipt))
        });

        // inclusion without a status field counts as confirmed
        let receipt = wait_for_confirmation(
            &chain,
            tx_hash,
            1,
            std::time::Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(receipt.transaction_hash, tx_hash);
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_timeout() {
        let tx_hash = H256::repeat_byte(0xef);

        let mut chain = MockChainRpc::new();
        chain.expect_transaction_receipt().returning(|_| Ok(None));

        let result = wait_for_confirmation(
            &chain,
            tx_hash,
            1,
            std::time::Duration::from_millis(50),
        )
        .await;
        assert!(matches!(result, Err(RelayError::ConfirmationTimeout { .. })));
    }
}
