// Export modules for the binary and the integration tests
pub mod api;
pub mod config;
pub mod error;
pub mod explorer;
pub mod models;
pub mod price;
pub mod rpc;
pub mod scan;
