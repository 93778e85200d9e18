//! Recent-transaction lookup by walking blocks backwards from the chain head.
//!
//! Nodes offer no per-address transaction index, so the scan fetches whole
//! blocks newest-first and filters their transactions. Work is bounded by
//! [`MAX_BLOCKS_TO_SCAN`]; anything older is not found.

use alloy::primitives::Address;
use tracing::{debug, warn};

use crate::{
    models::TransactionSummary,
    rpc::{ChainBlock, ChainRpc},
};

/// Upper bound on blocks fetched by one scan
pub const MAX_BLOCKS_TO_SCAN: u64 = 1000;

/// Outcome of one scan, newest transaction first
#[derive(Debug, Default)]
pub struct ScanResult {
    pub transactions: Vec<TransactionSummary>,
    pub blocks_scanned: u64,
    /// Blocks that could not be fetched and were skipped
    pub failed_blocks: Vec<u64>,
}

/// Collect up to `limit` transactions sent from or to `address`.
///
/// Scans blocks `head`, `head - 1`, ... for at most `min(head, MAX_BLOCKS_TO_SCAN)`
/// blocks, so the genesis block is never fetched. A block that fails to load is
/// logged and skipped; the scan carries on with the next older block.
pub async fn scan_recent_transactions(
    rpc: &dyn ChainRpc,
    address: Address,
    head: u64,
    limit: usize,
) -> ScanResult {
    let mut result = ScanResult::default();
    let blocks_to_scan = head.min(MAX_BLOCKS_TO_SCAN);
    let oldest = head - blocks_to_scan;

    for number in (oldest + 1..=head).rev() {
        if result.transactions.len() >= limit {
            break;
        }
        result.blocks_scanned += 1;

        match rpc.block_with_transactions(number).await {
            Ok(Some(block)) => collect_matches(&block, address, limit, &mut result.transactions),
            Ok(None) => {
                warn!(block = number, "Block not returned by node, skipping");
                result.failed_blocks.push(number);
            }
            Err(e) => {
                warn!(block = number, error = %e, "Error scanning block, skipping");
                result.failed_blocks.push(number);
            }
        }
    }

    debug!(
        %address,
        blocks_scanned = result.blocks_scanned,
        failed = result.failed_blocks.len(),
        found = result.transactions.len(),
        "Block scan finished"
    );
    result
}

fn collect_matches(
    block: &ChainBlock,
    address: Address,
    limit: usize,
    found: &mut Vec<TransactionSummary>,
) {
    for tx in &block.transactions {
        if found.len() >= limit {
            return;
        }
        if tx.from == address || tx.to == Some(address) {
            found.push(TransactionSummary::new(tx, block));
        }
    }
}
