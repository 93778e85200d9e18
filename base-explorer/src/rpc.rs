use std::sync::Arc;

use alloy::{
    network::{Ethereum, ReceiptResponse, TransactionResponse},
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::{Block, BlockId, BlockNumberOrTag, Transaction, TransactionReceipt},
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::error::ChainError;

/// A transaction as returned by the node, reduced to the fields the explorer shows
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTransaction {
    pub hash: TxHash,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub gas_limit: u64,
    /// Effective gas price in wei
    pub gas_price: u128,
    pub nonce: u64,
    /// `None` while pending
    pub block_number: Option<u64>,
}

/// Receipt fields of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainReceipt {
    pub status: bool,
    pub gas_used: u64,
}

/// A block with its full transaction list (empty when fetched header-only)
#[derive(Debug, Clone, PartialEq)]
pub struct ChainBlock {
    pub number: u64,
    pub timestamp: u64,
    pub transactions: Vec<ChainTransaction>,
}

/// The chain queries the explorer depends on
///
/// `Ok(None)` means the node answered but knows nothing about the requested
/// item; `Err` means the request itself failed.
#[automock]
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Number of the current chain head
    async fn block_number(&self) -> Result<u64, ChainError>;

    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Current gas price in wei
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Native balance at the latest block
    async fn balance(&self, address: Address) -> Result<U256, ChainError>;

    async fn transaction(&self, hash: TxHash) -> Result<Option<ChainTransaction>, ChainError>;

    async fn receipt(&self, hash: TxHash) -> Result<Option<ChainReceipt>, ChainError>;

    /// Block `number` with full transaction objects
    async fn block_with_transactions(&self, number: u64) -> Result<Option<ChainBlock>, ChainError>;

    /// Header of the latest block, without transactions
    async fn latest_block(&self) -> Result<ChainBlock, ChainError>;
}

/// Ethereum RPC client for blockchain interactions
///
/// This client provides a typed interface for communicating with Ethereum
/// compatible nodes through the Alloy providers.
#[derive(Clone)]
pub struct EthereumClient {
    /// Typed provider for Ethereum network
    pub provider: Arc<dyn Provider<Ethereum>>,
}

impl EthereumClient {
    /// Create a new client with an HTTP provider
    ///
    /// This constructor establishes a connection to the node and verifies the
    /// connection is working by fetching the latest block number.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - URL of the RPC endpoint
    /// * `network` - Network label used in logs and errors
    pub async fn new(rpc_url: &str, network: &str) -> Result<Self, ChainError> {
        let connection_error = |reason: String| ChainError::Connection {
            network: network.to_string(),
            reason,
        };

        let url: Url = rpc_url
            .parse()
            .map_err(|e| connection_error(format!("invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider = ProviderBuilder::new()
            .network::<Ethereum>()
            .on_http(url);

        // Test the connection by fetching the latest block number
        let block_number = provider
            .get_block_number()
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        info!(%network, block_number, "Connected to chain RPC endpoint");

        Ok(Self {
            provider: Arc::new(provider),
        })
    }
}

fn rpc_error(e: impl std::fmt::Display) -> ChainError {
    ChainError::Rpc(e.to_string())
}

fn to_chain_transaction(tx: &Transaction) -> ChainTransaction {
    // Nodes report the effective price for mined dynamic-fee transactions
    let gas_price = tx
        .effective_gas_price
        .or_else(|| alloy::consensus::Transaction::gas_price(tx))
        .unwrap_or_else(|| alloy::consensus::Transaction::max_fee_per_gas(tx));

    ChainTransaction {
        hash: TransactionResponse::tx_hash(tx),
        from: TransactionResponse::from(tx),
        to: alloy::consensus::Transaction::to(tx),
        value: alloy::consensus::Transaction::value(tx),
        gas_limit: alloy::consensus::Transaction::gas_limit(tx),
        gas_price,
        nonce: alloy::consensus::Transaction::nonce(tx),
        block_number: TransactionResponse::block_number(tx),
    }
}

fn to_chain_receipt(receipt: &TransactionReceipt) -> ChainReceipt {
    ChainReceipt {
        status: ReceiptResponse::status(receipt),
        gas_used: ReceiptResponse::gas_used(receipt),
    }
}

fn to_chain_block(block: &Block) -> ChainBlock {
    ChainBlock {
        number: block.header.number,
        timestamp: block.header.timestamp,
        transactions: block.transactions.txns().map(to_chain_transaction).collect(),
    }
}

#[async_trait]
impl ChainRpc for EthereumClient {
    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider.get_block_number().await.map_err(rpc_error)
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider.get_chain_id().await.map_err(rpc_error)
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.provider.get_gas_price().await.map_err(rpc_error)
    }

    async fn balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider.get_balance(address).await.map_err(rpc_error)
    }

    async fn transaction(&self, hash: TxHash) -> Result<Option<ChainTransaction>, ChainError> {
        let maybe_tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(rpc_error)?;
        Ok(maybe_tx.as_ref().map(to_chain_transaction))
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<ChainReceipt>, ChainError> {
        let maybe_receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(rpc_error)?;
        Ok(maybe_receipt.as_ref().map(to_chain_receipt))
    }

    async fn block_with_transactions(&self, number: u64) -> Result<Option<ChainBlock>, ChainError> {
        let maybe_block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await
            .map_err(rpc_error)?;
        Ok(maybe_block.as_ref().map(to_chain_block))
    }

    async fn latest_block(&self) -> Result<ChainBlock, ChainError> {
        // Request the latest block from the provider
        let maybe_block = self
            .provider
            .get_block(BlockId::Number(BlockNumberOrTag::Latest))
            .await
            .map_err(rpc_error)?;

        // Ensure a block was returned
        let block =
            maybe_block.ok_or_else(|| ChainError::Rpc("No latest block returned".to_string()))?;
        Ok(ChainBlock {
            number: block.header.number,
            timestamp: block.header.timestamp,
            transactions: Vec::new(),
        })
    }
}
