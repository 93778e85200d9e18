use crate::{
    error::ChainError,
    models::{
        hex::{parse_hex_address, parse_tx_hash},
        AddressBalance, NetworkInfo, TransactionDetails, TransactionSummary,
    },
    rpc::{ChainRpc, EthereumClient},
    scan::scan_recent_transactions,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Network label for Base mainnet
pub const MAINNET_LABEL: &str = "Base Mainnet";

/// Network label for the Base Sepolia testnet
pub const TESTNET_LABEL: &str = "Base Sepolia Testnet";

/// Chain query facade used by the HTTP layer
///
/// Every lookup swallows RPC failures: they are logged here and surface to the
/// caller as `None`, an empty list or a degraded `NetworkInfo`.
#[derive(Clone)]
pub struct ChainExplorer {
    /// Client used for every chain query
    pub rpc: Arc<dyn ChainRpc>,
    /// Human readable network label
    network: String,
}

impl ChainExplorer {
    /// Wraps an already connected client
    pub fn new(rpc: Arc<dyn ChainRpc>, network: &str) -> Self {
        Self {
            rpc,
            network: network.to_string(),
        }
    }

    /// Connect to `rpc_url` and verify the node answers before returning
    ///
    /// # Returns
    ///
    /// * `Result<Self, ChainError>` - `ChainError::Connection` when the
    ///   liveness check fails; the explorer is never built without a live node
    pub async fn connect(rpc_url: &str, is_testnet: bool) -> Result<Self, ChainError> {
        let network = if is_testnet { TESTNET_LABEL } else { MAINNET_LABEL };
        match EthereumClient::new(rpc_url, network).await {
            Ok(client) => Ok(Self::new(Arc::new(client), network)),
            Err(e) => {
                error!("Failed to connect to {}: {}", network, e);
                Err(e)
            }
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Native balance of `address`
    ///
    /// Returns `None` without touching the node when the address is malformed,
    /// and `None` when the RPC call fails.
    #[instrument(skip(self))]
    pub async fn get_balance(&self, address: &str) -> Option<AddressBalance> {
        let parsed = match parse_hex_address(address) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejected address: {}", e);
                return None;
            }
        };

        match self.rpc.balance(parsed).await {
            Ok(wei) => Some(AddressBalance::new(parsed, wei, &self.network)),
            Err(e) => {
                error!("Error getting balance for {}: {}", address, e);
                None
            }
        }
    }

    /// Transaction by hash, with receipt fields once mined
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, hash: &str) -> Option<TransactionDetails> {
        let parsed = match parse_tx_hash(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejected transaction hash: {}", e);
                return None;
            }
        };

        let tx = match self.rpc.transaction(parsed).await {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                debug!("Transaction {} not found", hash);
                return None;
            }
            Err(e) => {
                error!("Error getting transaction {}: {}", hash, e);
                return None;
            }
        };

        // A pending transaction has no receipt yet
        let receipt = match self.rpc.receipt(parsed).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!("Error getting receipt for {}: {}", hash, e);
                None
            }
        };

        Some(TransactionDetails::new(&tx, receipt.as_ref()))
    }

    /// Up to `limit` transactions involving `address`, newest first
    ///
    /// Only the most recent blocks are searched, see [`crate::scan`].
    #[instrument(skip(self))]
    pub async fn get_recent_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Vec<TransactionSummary> {
        let parsed = match parse_hex_address(address) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejected address: {}", e);
                return Vec::new();
            }
        };

        let head = match self.rpc.block_number().await {
            Ok(head) => head,
            Err(e) => {
                error!("Error getting recent transactions for {}: {}", address, e);
                return Vec::new();
            }
        };

        info!("Scanning recent blocks from {} for {}", head, parsed);
        let scan = scan_recent_transactions(self.rpc.as_ref(), parsed, head, limit).await;
        info!(
            "Found {} transactions for {} in {} blocks",
            scan.transactions.len(),
            parsed,
            scan.blocks_scanned
        );
        scan.transactions
    }

    /// Current network state; degraded instead of failing when the node errors
    #[instrument(skip(self))]
    pub async fn get_network_info(&self) -> NetworkInfo {
        match self.fetch_network_info().await {
            Ok(info) => info,
            Err(e) => {
                error!("Error getting network info: {}", e);
                NetworkInfo::degraded(&self.network, e.to_string())
            }
        }
    }

    async fn fetch_network_info(&self) -> Result<NetworkInfo, ChainError> {
        let head = self.rpc.latest_block().await?;
        let gas_price = self.rpc.gas_price().await?;
        let chain_id = self.rpc.chain_id().await?;
        Ok(NetworkInfo::connected(&self.network, chain_id, &head, gas_price))
    }
}
