//! Tests for the bounded backwards block scan

use std::sync::{Arc, Mutex};

use base_explorer::{
    rpc::MockChainRpc,
    scan::{scan_recent_transactions, MAX_BLOCKS_TO_SCAN},
};

use crate::helpers::{addr, block, rpc_failure, transfer, ALICE, BOB, CAROL, ONE_AND_A_HALF_ETH};
use crate::init_logger;

#[tokio::test]
async fn test_scan_stops_once_limit_is_reached() {
    init_logger();

    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions()
        .times(3)
        .returning(|number| Ok(Some(block(number, vec![transfer(number, 0, ALICE, BOB, 1)]))));

    let result = scan_recent_transactions(&rpc, addr(ALICE), 100, 3).await;

    let numbers: Vec<u64> = result.transactions.iter().map(|tx| tx.block_number).collect();
    assert_eq!(numbers, vec![100, 99, 98]);
    assert_eq!(result.blocks_scanned, 3);
}

#[tokio::test]
async fn test_scan_never_exceeds_block_cap() {
    init_logger();

    let head = 5_000;
    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions()
        .withf(move |number| *number > head - MAX_BLOCKS_TO_SCAN && *number <= head)
        .times(MAX_BLOCKS_TO_SCAN as usize)
        .returning(|number| Ok(Some(block(number, vec![transfer(number, 0, BOB, CAROL, 1)]))));

    let result = scan_recent_transactions(&rpc, addr(ALICE), head, 10).await;

    assert!(result.transactions.is_empty());
    assert_eq!(result.blocks_scanned, MAX_BLOCKS_TO_SCAN);
    assert!(result.failed_blocks.is_empty());
}

#[tokio::test]
async fn test_short_chain_skips_genesis_block() {
    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions()
        .withf(|number| *number >= 1)
        .times(5)
        .returning(|number| Ok(Some(block(number, Vec::new()))));

    let result = scan_recent_transactions(&rpc, addr(ALICE), 5, 10).await;

    assert_eq!(result.blocks_scanned, 5);
    assert!(result.transactions.is_empty());
}

#[tokio::test]
async fn test_genesis_head_scans_nothing() {
    let rpc = MockChainRpc::new();

    let result = scan_recent_transactions(&rpc, addr(ALICE), 0, 10).await;

    assert_eq!(result.blocks_scanned, 0);
    assert!(result.transactions.is_empty());
}

#[tokio::test]
async fn test_failed_block_is_skipped() {
    init_logger();

    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions().returning(|number| match number {
        9 => Err(rpc_failure()),
        7 => Ok(None),
        10 | 8 => Ok(Some(block(number, vec![transfer(number, 0, BOB, ALICE, 5)]))),
        _ => Ok(Some(block(number, Vec::new()))),
    });

    let result = scan_recent_transactions(&rpc, addr(ALICE), 10, 5).await;

    let numbers: Vec<u64> = result.transactions.iter().map(|tx| tx.block_number).collect();
    assert_eq!(numbers, vec![10, 8]);
    assert_eq!(result.failed_blocks, vec![9, 7]);
    assert_eq!(result.blocks_scanned, 10);
}

#[tokio::test]
async fn test_single_match_five_blocks_back() {
    let head = 2_000;
    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions().returning(move |number| {
        let txs = if number == head - 5 {
            vec![
                transfer(number, 0, BOB, CAROL, 1),
                transfer(number, 1, ALICE, BOB, ONE_AND_A_HALF_ETH),
            ]
        } else {
            vec![transfer(number, 0, CAROL, BOB, 1)]
        };
        Ok(Some(block(number, txs)))
    });

    let result = scan_recent_transactions(&rpc, addr(ALICE), head, 10).await;

    assert_eq!(result.transactions.len(), 1);
    let found = &result.transactions[0];
    assert_eq!(found.block_number, head - 5);
    assert_eq!(found.value_eth, "1.5");
    assert_eq!(found.from, ALICE);
    assert_eq!(found.timestamp, block(head - 5, Vec::new()).timestamp);
    assert_eq!(result.blocks_scanned, MAX_BLOCKS_TO_SCAN);
}

#[tokio::test]
async fn test_limit_applies_within_a_single_block() {
    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions().times(1).returning(|number| {
        Ok(Some(block(
            number,
            vec![
                transfer(number, 0, ALICE, BOB, 1),
                transfer(number, 1, BOB, ALICE, 2),
                transfer(number, 2, ALICE, CAROL, 3),
            ],
        )))
    });

    let result = scan_recent_transactions(&rpc, addr(ALICE), 50, 2).await;

    assert_eq!(result.transactions.len(), 2);
    assert_eq!(result.transactions[0].value_wei, "1");
    assert_eq!(result.transactions[1].value_wei, "2");
}

#[tokio::test]
async fn test_matches_sender_recipient_and_contract_creation() {
    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions().returning(|number| {
        let mut creation = transfer(number, 1, ALICE, BOB, 0);
        creation.to = None;
        Ok(Some(block(
            number,
            vec![transfer(number, 0, BOB, ALICE, 1), creation, transfer(number, 2, BOB, CAROL, 1)],
        )))
    });

    let result = scan_recent_transactions(&rpc, addr(ALICE), 1, 10).await;

    assert_eq!(result.transactions.len(), 2);
    assert_eq!(result.transactions[0].to.as_deref(), Some(ALICE));
    assert_eq!(result.transactions[1].to, None);
}

#[tokio::test]
async fn test_results_are_newest_first() {
    let fetched = Arc::new(Mutex::new(Vec::new()));
    let seen = fetched.clone();

    let mut rpc = MockChainRpc::new();
    rpc.expect_block_with_transactions().returning(move |number| {
        seen.lock().unwrap().push(number);
        let txs = if number % 7 == 0 || number % 11 == 0 {
            vec![transfer(number, 0, ALICE, BOB, 1), transfer(number, 1, CAROL, ALICE, 1)]
        } else {
            Vec::new()
        };
        Ok(Some(block(number, txs)))
    });

    let result = scan_recent_transactions(&rpc, addr(ALICE), 300, 40).await;

    assert_eq!(result.transactions.len(), 40);
    assert!(result
        .transactions
        .windows(2)
        .all(|pair| pair[0].block_number >= pair[1].block_number));

    let fetched = fetched.lock().unwrap();
    assert!(fetched.windows(2).all(|pair| pair[0] == pair[1] + 1));
}
