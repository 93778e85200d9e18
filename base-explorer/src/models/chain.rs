use alloy::primitives::{Address, U256};
use serde::Serialize;

use super::hex::{ether_to_f64, format_ether, format_gwei};
use crate::rpc::{ChainBlock, ChainReceipt, ChainTransaction};

/// Native balance of one address
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddressBalance {
    /// EIP-55 checksummed address
    pub address: String,
    pub balance_wei: String,
    pub balance_eth: String,
    /// Network label, e.g. "Base Mainnet"
    pub network: String,
    #[serde(skip)]
    wei: U256,
}

impl AddressBalance {
    pub fn new(address: Address, wei: U256, network: &str) -> Self {
        Self {
            address: address.to_checksum(None),
            balance_wei: wei.to_string(),
            balance_eth: format_ether(wei),
            network: network.to_string(),
            wei,
        }
    }

    /// Balance in ether as a float, for price conversion
    pub fn balance_ether(&self) -> f64 {
        ether_to_f64(self.wei)
    }
}

/// Full view of a single transaction, including receipt data once mined
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionDetails {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    pub value_wei: String,
    pub value_eth: String,
    /// Gas limit
    pub gas: u64,
    pub gas_price_wei: String,
    pub gas_price_gwei: String,
    pub nonce: u64,
    /// `None` while the transaction is pending
    pub block_number: Option<u64>,
    /// 1 for success, 0 for failure; `None` without a receipt
    pub status: Option<u8>,
    pub gas_used: Option<u64>,
    #[serde(skip)]
    value: U256,
}

impl TransactionDetails {
    pub fn new(tx: &ChainTransaction, receipt: Option<&ChainReceipt>) -> Self {
        let gas_price = U256::from(tx.gas_price);
        Self {
            hash: tx.hash.to_string(),
            from: tx.from.to_checksum(None),
            to: tx.to.map(|to| to.to_checksum(None)),
            value_wei: tx.value.to_string(),
            value_eth: format_ether(tx.value),
            gas: tx.gas_limit,
            gas_price_wei: gas_price.to_string(),
            gas_price_gwei: format_gwei(gas_price),
            nonce: tx.nonce,
            block_number: tx.block_number,
            status: receipt.map(|r| u8::from(r.status)),
            gas_used: receipt.map(|r| r.gas_used),
            value: tx.value,
        }
    }

    /// Transferred value in ether as a float, for price conversion
    pub fn value_ether(&self) -> f64 {
        ether_to_f64(self.value)
    }
}

/// Compact view of a transaction found while scanning recent blocks
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionSummary {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value_wei: String,
    pub value_eth: String,
    pub block_number: u64,
    /// Timestamp of the containing block
    pub timestamp: u64,
    pub gas_price_gwei: String,
    /// Only present when a price snapshot was available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<f64>,
    #[serde(skip)]
    value: U256,
}

impl TransactionSummary {
    pub fn new(tx: &ChainTransaction, block: &ChainBlock) -> Self {
        Self {
            hash: tx.hash.to_string(),
            from: tx.from.to_checksum(None),
            to: tx.to.map(|to| to.to_checksum(None)),
            value_wei: tx.value.to_string(),
            value_eth: format_ether(tx.value),
            block_number: tx.block_number.unwrap_or(block.number),
            timestamp: block.timestamp,
            gas_price_gwei: format_gwei(U256::from(tx.gas_price)),
            value_usd: None,
            value: tx.value,
        }
    }

    pub fn value_ether(&self) -> f64 {
        ether_to_f64(self.value)
    }
}

/// Snapshot of the connected network
///
/// When the node cannot be queried only `network`, `is_connected` and `error`
/// are populated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkInfo {
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_timestamp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price_wei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price_gwei: Option<String>,
    pub is_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NetworkInfo {
    pub fn connected(network: &str, chain_id: u64, head: &ChainBlock, gas_price: u128) -> Self {
        let gas_price = U256::from(gas_price);
        Self {
            network: network.to_string(),
            chain_id: Some(chain_id),
            block_number: Some(head.number),
            block_timestamp: Some(head.timestamp),
            gas_price_wei: Some(gas_price.to_string()),
            gas_price_gwei: Some(format_gwei(gas_price)),
            is_connected: true,
            error: None,
        }
    }

    pub fn degraded(network: &str, error: String) -> Self {
        Self {
            network: network.to_string(),
            chain_id: None,
            block_number: None,
            block_timestamp: None,
            gas_price_wei: None,
            gas_price_gwei: None,
            is_connected: false,
            error: Some(error),
        }
    }
}
