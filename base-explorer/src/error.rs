use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while talking to the chain RPC endpoint
///
/// These never reach HTTP clients directly: the explorer logs them and turns
/// them into empty or degraded results.
#[derive(Error, Debug)]
pub enum ChainError {
    /// The endpoint could not be reached or failed the liveness check
    #[error("could not connect to {network}: {reason}")]
    Connection { network: String, reason: String },

    /// A single RPC request failed
    #[error("RPC request failed: {0}")]
    Rpc(String),
}

/// Errors raised by the price API client
#[derive(Error, Debug)]
pub enum PriceError {
    /// Transport failure, timeout, non-success status or undecodable body
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response did not contain an entry for the requested asset
    #[error("No price data for asset: {0}")]
    NoPriceData(String),
}

/// Service-specific error types
///
/// Each variant maps to one HTTP status code returned by the API.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Address was malformed or its balance could not be fetched
    #[error("Invalid address or error fetching data")]
    InvalidAddress(String),

    /// No transaction is known for the given hash
    #[error("Transaction not found")]
    TransactionNotFound(String),

    /// The price API did not return a usable quote
    #[error("Unable to fetch price data")]
    PriceUnavailable,

    /// Query parameter `limit` outside of the accepted range
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

/// Structured error response for the API
#[derive(Serialize)]
struct ErrorResponse {
    /// Human-readable error message
    error: String,

    /// Machine-readable error code
    error_code: String,

    /// Optional detailed error information
    details: Option<String>,
}

impl ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            ServiceError::InvalidAddress(_) => "INVALID_ADDRESS",
            ServiceError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            ServiceError::PriceUnavailable => "PRICE_UNAVAILABLE",
            ServiceError::InvalidLimit(_) => "INVALID_LIMIT",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ServiceError::InvalidAddress(details)
            | ServiceError::TransactionNotFound(details)
            | ServiceError::InvalidLimit(details) => Some(details.clone()),
            ServiceError::PriceUnavailable => None,
        }
    }
}

impl ResponseError for ServiceError {
    /// Convert the error to an HTTP response with a JSON error body
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            details: self.details(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            ServiceError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ServiceError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PriceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::InvalidLimit(_) => StatusCode::BAD_REQUEST,
        }
    }
}
