use crate::utils::errors::{RelayError, Result};
use ethers::abi::{Abi, Token};
use ethers::types::{Bytes, U256};
use serde::{Deserialize, Serialize};

/// ABI fragment for the externally deployed Parrot Protocol contract.
/// Only the functions the relay forwards (plus the listing view) are included.
const PARROT_ABI: &str = r#"[
    {
        "name": "createContent",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [
            { "name": "uri", "type": "string" },
            { "name": "price", "type": "uint256" }
        ],
        "outputs": []
    },
    {
        "name": "purchaseContent",
        "type": "function",
        "stateMutability": "payable",
        "inputs": [ { "name": "id", "type": "uint256" } ],
        "outputs": []
    },
    {
        "name": "vote",
        "type": "function",
        "stateMutability": "nonpayable",
        "inputs": [ { "name": "id", "type": "uint256" } ],
        "outputs": []
    },
    {
        "name": "getActiveContent",
        "type": "function",
        "stateMutability": "view",
        "inputs": [],
        "outputs": [
            {
                "name": "",
                "type": "tuple[]",
                "components": [
                    { "name": "id", "type": "uint256" },
                    { "name": "uri", "type": "string" },
                    { "name": "price", "type": "uint256" },
                    { "name": "votes", "type": "uint256" },
                    { "name": "active", "type": "bool" }
                ]
            }
        ]
    }
]"#;

/// One content record as stored by the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    pub id: u64,
    pub uri: String,
    pub price: U256,
    pub votes: u64,
    pub active: bool,
}

/// Encoder/decoder for Parrot Protocol calls.
#[derive(Debug, Clone)]
pub struct ParrotAbi {
    abi: Abi,
}

impl ParrotAbi {
    pub fn new() -> Result<Self> {
        let abi: Abi = serde_json::from_str(PARROT_ABI)?;
        Ok(Self { abi })
    }

    pub fn encode_create_content(&self, uri: &str, price: U256) -> Result<Bytes> {
        let data = self
            .abi
            .function("createContent")?
            .encode_input(&[Token::String(uri.to_string()), Token::Uint(price)])?;
        Ok(Bytes::from(data))
    }

    pub fn encode_purchase_content(&self, id: u64) -> Result<Bytes> {
        let data = self
            .abi
            .function("purchaseContent")?
            .encode_input(&[Token::Uint(U256::from(id))])?;
        Ok(Bytes::from(data))
    }

    pub fn encode_vote(&self, id: u64) -> Result<Bytes> {
        let data = self
            .abi
            .function("vote")?
            .encode_input(&[Token::Uint(U256::from(id))])?;
        Ok(Bytes::from(data))
    }

    pub fn encode_get_active_content(&self) -> Result<Bytes> {
        let data = self.abi.function("getActiveContent")?.encode_input(&[])?;
        Ok(Bytes::from(data))
    }

    /// Decode the return data of `getActiveContent` into content records.
    pub fn decode_active_content(&self, output: &[u8]) -> Result<Vec<ContentData>> {
        let tokens = self.abi.function("getActiveContent")?.decode_output(output)?;

        let items = match tokens.into_iter().next() {
            Some(Token::Array(items)) => items,
            _ => {
                return Err(RelayError::Abi(ethers::abi::Error::InvalidData));
            }
        };

        items.into_iter().map(decode_content_tuple).collect()
    }
}

fn decode_content_tuple(token: Token) -> Result<ContentData> {
    let fields = match token {
        Token::Tuple(fields) if fields.len() == 5 => fields,
        _ => return Err(RelayError::Abi(ethers::abi::Error::InvalidData)),
    };

    let mut fields = fields.into_iter();
    let id = next_u64(&mut fields)?;
    let uri = match fields.next() {
        Some(Token::String(uri)) => uri,
        _ => return Err(RelayError::Abi(ethers::abi::Error::InvalidData)),
    };
    let price = next_uint(&mut fields)?;
    let votes = next_u64(&mut fields)?;
    let active = match fields.next() {
        Some(Token::Bool(active)) => active,
        _ => return Err(RelayError::Abi(ethers::abi::Error::InvalidData)),
    };

    Ok(ContentData {
        id,
        uri,
        price,
        votes,
        active,
    })
}

fn next_uint(fields: &mut impl Iterator<Item = Token>) -> Result<U256> {
    match fields.next() {
        Some(Token::Uint(value)) => Ok(value),
        _ => Err(RelayError::Abi(ethers::abi::Error::InvalidData)),
    }
}

// The response bytes are untrusted; a value wider than u64 is malformed
// data, not a panic.
fn next_u64(fields: &mut impl Iterator<Item = Token>) -> Result<u64> {
    let value = next_uint(fields)?;
    if value > U256::from(u64::MAX) {
        return Err(RelayError::Abi(ethers::abi::Error::InvalidData));
    }
    Ok(value.as_u64())
}
