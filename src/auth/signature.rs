use crate::utils::errors::{RelayError, Result};
use ethers::core::types::{Address, Signature, H256, U256};
use ethers::utils::hash_message;
use secp256k1::{ecdsa::RecoverableSignature, Message, Secp256k1};
use sha3::{Digest, Keccak256};

/// Recovers transaction senders from the 65-byte signatures clients submit.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secp: Secp256k1<secp256k1::All>,
}

impl SignatureVerifier {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Recover the address that signed the given 32-byte digest.
    pub fn recover_from_digest(&self, digest: H256, signature: &Signature) -> Result<Address> {
        let mut compact = [0u8; 64];
        signature.r.to_big_endian(&mut compact[0..32]);
        signature.s.to_big_endian(&mut compact[32..64]);

        let recovery_id = secp256k1::ecdsa::RecoveryId::from_u8_masked(normalize_v(signature.v)?);

        let signature = RecoverableSignature::from_compact(&compact, recovery_id)
            .map_err(|_| RelayError::invalid_signature("Invalid signature format"))?;

        let message = Message::from_digest(digest.to_fixed_bytes());

        let public_key = self
            .secp
            .recover_ecdsa(message, &signature)
            .map_err(|_| RelayError::invalid_signature("Failed to recover public key"))?;

        Ok(self.public_key_to_address(&public_key))
    }

    /// Recover the address that signed a human-readable message with the
    /// EIP-191 personal-message scheme (what `signer.signMessage` produces).
    pub fn recover_personal(&self, message: &str, signature: &Signature) -> Result<Address> {
        self.recover_from_digest(hash_message(message), signature)
    }

    /// Convert a secp256k1 public key to an Ethereum address.
    fn public_key_to_address(&self, public_key: &secp256k1::PublicKey) -> Address {
        let public_key_bytes = public_key.serialize_uncompressed();

        // Take the last 64 bytes (remove the 0x04 prefix)
        let public_key_hash = Keccak256::digest(&public_key_bytes[1..]);

        // Take the last 20 bytes as the address
        let mut address_bytes = [0u8; 20];
        address_bytes.copy_from_slice(&public_key_hash[12..]);

        Address::from(address_bytes)
    }

    /// Check if a signature is in the correct format
    pub fn is_valid_signature_format(&self, signature: &str) -> bool {
        // Remove 0x prefix if present
        let sig = signature.strip_prefix("0x").unwrap_or(signature);

        // Must be exactly 130 hex characters (65 bytes)
        sig.len() == 130 && sig.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new()
    }
}

// The exact strings the UI asks the wallet to sign, one per action. The
// relay recovers the sender from these, so they must match byte for byte.

pub fn create_content_message(uri: &str, price: &str) -> String {
    format!("Create content: {uri} with price {price}")
}

pub fn purchase_content_message(id: u64, value: &str) -> String {
    format!("Purchase content ID: {id} with price {value}")
}

pub fn vote_message(id: u64) -> String {
    format!("Vote for content ID: {id}")
}

/// Parse a 65-byte hex signature into its r, s, v components.
pub fn parse_signature(signature: &str) -> Result<Signature> {
    let bytes = hex::decode(signature.strip_prefix("0x").unwrap_or(signature))
        .map_err(|_| RelayError::invalid_signature("Invalid hex signature"))?;

    if bytes.len() != 65 {
        return Err(RelayError::invalid_signature("Signature must be 65 bytes"));
    }

    Ok(Signature {
        r: U256::from_big_endian(&bytes[0..32]),
        s: U256::from_big_endian(&bytes[32..64]),
        v: bytes[64] as u64,
    })
}

/// Reduce a signature's `v` to a raw recovery id. Accepts the bare parity,
/// the pre-EIP-155 27/28 form, and the EIP-155 chain-folded form.
fn normalize_v(v: u64) -> Result<u8> {
    match v {
        0 | 1 => Ok(v as u8),
        27 | 28 => Ok((v - 27) as u8),
        v if v >= 35 => Ok(((v - 35) % 2) as u8),
        _ => Err(RelayError::invalid_signature(format!(
            "unsupported recovery value: {v}"
        ))),
    }
}
