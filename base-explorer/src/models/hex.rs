//! Parsing of user supplied hex values and unit formatting for display.

use std::str::FromStr;

use alloy::primitives::{Address, TxHash, U256};
use alloy_primitives::utils::format_units;

/// Parse a user supplied address string into an `Address`.
///
/// Accepts 40 hex digits with an optional "0x" prefix. All-lowercase and
/// all-uppercase input is accepted as-is; mixed case input must carry a valid
/// EIP-55 checksum.
///
/// # Arguments
///
/// * `hex` - The hexadecimal address string
///
/// # Returns
///
/// * `Result<Address, String>` - Parsed address or error message
pub fn parse_hex_address(hex: &str) -> Result<Address, String> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Invalid address: {}", hex));
    }

    let address = Address::from_str(digits).map_err(|e| format!("Invalid address: {}", e))?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *digits {
        return Err(format!("Invalid address checksum: {}", hex));
    }

    Ok(address)
}

/// Parse a 32-byte transaction hash, with or without the "0x" prefix.
pub fn parse_tx_hash(hex: &str) -> Result<TxHash, String> {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() != 64 {
        return Err(format!("Invalid transaction hash length: {}", hex));
    }
    TxHash::from_str(digits).map_err(|e| format!("Invalid transaction hash: {}", e))
}

/// Format a wei amount in ether, e.g. `1500000000000000000` -> `"1.5"`.
pub fn format_ether(wei: U256) -> String {
    format_decimal(wei, "ether")
}

/// Format a wei amount in gwei, e.g. `2500000000` -> `"2.5"`.
pub fn format_gwei(wei: U256) -> String {
    format_decimal(wei, "gwei")
}

/// Ether value of a wei amount as a float, for USD arithmetic.
pub fn ether_to_f64(wei: U256) -> f64 {
    format_ether(wei).parse::<f64>().unwrap_or(0.0)
}

fn format_decimal(wei: U256, unit: &str) -> String {
    match format_units(wei, unit) {
        Ok(formatted) => trim_decimal(&formatted),
        // Only reachable with an unknown unit name
        Err(_) => wei.to_string(),
    }
}

/// Drop trailing fractional zeros and a dangling decimal point.
pub fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    value
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
