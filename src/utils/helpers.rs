use crate::utils::errors::{RelayError, Result};
use ethers::types::U256;
use ethers::utils::{format_ether, parse_ether};

/// Convert a human-readable ether amount ("0.5") to wei.
pub fn parse_ether_amount(amount: &str) -> Result<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(RelayError::invalid_amount("amount is empty"));
    }

    parse_ether(amount).map_err(|e| RelayError::invalid_amount(format!("{amount}: {e}")))
}

pub fn format_ether_amount(wei: U256) -> String {
    format_ether(wei)
}

pub fn format_address(address: &str) -> String {
    if address.len() >= 10 {
        format!("{}...{}", &address[0..6], &address[address.len() - 4..])
    } else {
        address.to_string()
    }
}
