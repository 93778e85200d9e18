//! Data models used throughout the application
//!
//! Request-scoped value objects returned by the explorer and price services,
//! plus the hex parsing and unit formatting helpers they rely on.

// Chain entities: balances, transactions, network info
pub mod chain;

// Hex parsing and wei/gwei/ether formatting
pub mod hex;

// Price quotes and the upstream price API payload
pub mod price;

pub use chain::{AddressBalance, NetworkInfo, TransactionDetails, TransactionSummary};
pub use price::PriceQuote;
