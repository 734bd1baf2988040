use validator::ValidationError;

pub fn validate_ethereum_address(address: &str) -> Result<(), ValidationError> {
    if address.len() != 42 {
        return Err(ValidationError::new("invalid_length"));
    }

    if !address.starts_with("0x") {
        return Err(ValidationError::new("invalid_prefix"));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("invalid_hex"));
    }

    Ok(())
}

pub fn validate_signature_hex(signature: &str) -> Result<(), ValidationError> {
    let sig = signature.strip_prefix("0x").unwrap_or(signature);

    // 65 bytes: r (32) + s (32) + v (1)
    if sig.len() != 130 {
        return Err(ValidationError::new("invalid_length"));
    }

    if !sig.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::new("invalid_hex"));
    }

    Ok(())
}

pub fn validate_content_uri(uri: &str) -> Result<(), ValidationError> {
    if uri.trim().is_empty() {
        return Err(ValidationError::new("empty_uri"));
    }

    if uri.len() > 2048 {
        return Err(ValidationError::new("uri_too_long"));
    }

    if url::Url::parse(uri).is_err() {
        return Err(ValidationError::new("invalid_uri"));
    }

    Ok(())
}

pub fn validate_ether_amount(amount: &str) -> Result<(), ValidationError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ValidationError::new("empty_amount"));
    }

    let mut parts = amount.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();

    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_amount"));
    }

    if let Some(frac) = frac {
        // 18 decimals is the native unit's precision
        if frac.is_empty() || frac.len() > 18 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("invalid_amount"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ethereum_address() {
        assert!(validate_ethereum_address("0x742d35Cc6634C0532925a3b8D5c1b9E9C4F5e5A1").is_ok());
        assert!(validate_ethereum_address("742d35Cc6634C0532925a3b8D5c1b9E9C4F5e5A1ab").is_err());
        assert!(validate_ethereum_address("0x123").is_err());
        assert!(validate_ethereum_address(&("0x".to_owned() + &"g".repeat(40))).is_err());
    }

    #[test]
    fn test_validate_signature_hex() {
        assert!(validate_signature_hex(&("0x".to_owned() + &"a".repeat(130))).is_ok());
        assert!(validate_signature_hex(&"a".repeat(130)).is_ok());
        assert!(validate_signature_hex(&"a".repeat(128)).is_err());
        assert!(validate_signature_hex(&"g".repeat(130)).is_err());
    }

    #[test]
    fn test_validate_content_uri() {
        assert!(validate_content_uri("ipfs://QmTest123").is_ok());
        assert!(validate_content_uri("https://example.com/content/1").is_ok());
        assert!(validate_content_uri("").is_err());
        assert!(validate_content_uri("not a uri").is_err());
    }

    #[test]
    fn test_validate_ether_amount() {
        assert!(validate_ether_amount("1").is_ok());
        assert!(validate_ether_amount("0.5").is_ok());
        assert!(validate_ether_amount("10.000000000000000001").is_ok());
        assert!(validate_ether_amount("").is_err());
        assert!(validate_ether_amount(".5").is_err());
        assert!(validate_ether_amount("1.").is_err());
        assert!(validate_ether_amount("1.2.3").is_err());
        assert!(validate_ether_amount("0.1234567890123456789").is_err());
        assert!(validate_ether_amount("-1").is_err());
    }
}
