use crate::{
    error::ServiceError,
    explorer::ChainExplorer,
    models::{AddressBalance, NetworkInfo, PriceQuote, TransactionDetails, TransactionSummary},
    price::PriceService,
};
use actix_cors::Cors;
use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Service version reported by the banner endpoint
pub const API_VERSION: &str = "1.0.0";

/// Transactions returned when `limit` is omitted
pub const DEFAULT_TRANSACTION_LIMIT: i64 = 10;

/// Largest accepted `limit`
pub const MAX_TRANSACTION_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
struct AddressResponse {
    #[serde(flatten)]
    balance: AddressBalance,
    balance_usd: Option<f64>,
}

#[derive(Serialize)]
struct TransactionResponse {
    #[serde(flatten)]
    transaction: TransactionDetails,
    value_usd: Option<f64>,
}

#[derive(Serialize)]
struct NetworkResponse {
    #[serde(flatten)]
    info: NetworkInfo,
    eth_price: Option<PriceQuote>,
}

#[derive(Serialize)]
struct AddressTransactionsResponse {
    address: String,
    count: usize,
    transactions: Vec<TransactionSummary>,
}

/// Service banner
#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Base Explorer API",
        "version": API_VERSION,
    }))
}

/// Reports whether the chain node is reachable; always answers 200
#[get("/health")]
async fn health_check(explorer: web::Data<Arc<ChainExplorer>>) -> HttpResponse {
    info!("Health check requested");

    let network_info = explorer.get_network_info().await;
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "blockchain_connected": network_info.is_connected,
        "network": network_info.network,
    }))
}

/// Balance of an address with its USD value
#[get("/api/address/{address}")]
async fn get_address_info(
    path: web::Path<String>,
    explorer: web::Data<Arc<ChainExplorer>>,
    prices: web::Data<Arc<PriceService>>,
) -> Result<HttpResponse, ServiceError> {
    let address = path.into_inner();
    debug!("Address lookup for {}", address);

    let balance = explorer
        .get_balance(&address)
        .await
        .ok_or_else(|| ServiceError::InvalidAddress(address.clone()))?;

    let balance_usd = prices.convert_to_usd(balance.balance_ether()).await;

    Ok(HttpResponse::Ok().json(AddressResponse {
        balance,
        balance_usd,
    }))
}

/// Transaction details with the USD value of the transfer
///
/// The price is fetched for this request alone, at the current market rate.
#[get("/api/transaction/{hash}")]
async fn get_transaction(
    path: web::Path<String>,
    explorer: web::Data<Arc<ChainExplorer>>,
    prices: web::Data<Arc<PriceService>>,
) -> Result<HttpResponse, ServiceError> {
    let hash = path.into_inner();
    debug!("Transaction lookup for {}", hash);

    let transaction = explorer
        .get_transaction(&hash)
        .await
        .ok_or_else(|| ServiceError::TransactionNotFound(hash.clone()))?;

    let value_usd = prices.convert_to_usd(transaction.value_ether()).await;

    Ok(HttpResponse::Ok().json(TransactionResponse {
        transaction,
        value_usd,
    }))
}

/// Network information plus the current ETH quote, which may be null
#[get("/api/network")]
async fn get_network_info(
    explorer: web::Data<Arc<ChainExplorer>>,
    prices: web::Data<Arc<PriceService>>,
) -> HttpResponse {
    let info = explorer.get_network_info().await;
    let eth_price = prices.get_current_price().await;

    HttpResponse::Ok().json(NetworkResponse { info, eth_price })
}

/// Current ETH quote
#[get("/api/price/eth")]
async fn get_eth_price(
    prices: web::Data<Arc<PriceService>>,
) -> Result<HttpResponse, ServiceError> {
    let quote = prices
        .get_current_price()
        .await
        .ok_or(ServiceError::PriceUnavailable)?;
    Ok(HttpResponse::Ok().json(quote))
}

/// Recent transactions of an address found by scanning the latest blocks
///
/// One price snapshot is applied to every returned transaction regardless of
/// when each was mined.
#[get("/api/address/{address}/transactions")]
async fn get_address_transactions(
    path: web::Path<String>,
    query: web::Query<TransactionsQuery>,
    explorer: web::Data<Arc<ChainExplorer>>,
    prices: web::Data<Arc<PriceService>>,
) -> Result<HttpResponse, ServiceError> {
    let address = path.into_inner();
    let limit = validate_limit(query.limit)?;
    debug!("Recent transactions for {} (limit {})", address, limit);

    let mut transactions = explorer.get_recent_transactions(&address, limit).await;

    let eth_price = prices
        .get_current_price()
        .await
        .and_then(|quote| quote.usable_price());
    if let Some(price) = eth_price {
        for tx in &mut transactions {
            tx.value_usd = Some(tx.value_ether() * price);
        }
    }

    Ok(HttpResponse::Ok().json(AddressTransactionsResponse {
        address,
        count: transactions.len(),
        transactions,
    }))
}

/// Check `limit` against `1..=MAX_TRANSACTION_LIMIT`, applying the default
pub fn validate_limit(limit: Option<i64>) -> Result<usize, ServiceError> {
    let limit = limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT);
    if !(1..=MAX_TRANSACTION_LIMIT).contains(&limit) {
        return Err(ServiceError::InvalidLimit(format!(
            "limit must be between 1 and {}, got {}",
            MAX_TRANSACTION_LIMIT, limit
        )));
    }
    usize::try_from(limit).map_err(|e| ServiceError::InvalidLimit(e.to_string()))
}

/// CORS policy for the configured origins
///
/// A `*` entry allows any origin; the request origin is echoed back since
/// credentials are supported.
pub fn cors_policy(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.iter().any(|origin| origin == "*") {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Configure the API routes for the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(health_check)
        .service(get_address_transactions)
        .service(get_address_info)
        .service(get_transaction)
        .service(get_network_info)
        .service(get_eth_price);
}
