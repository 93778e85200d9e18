use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use tracing::{debug, error, instrument};

use crate::{
    error::PriceError,
    models::price::{PriceQuote, SimplePrice},
};

/// Timeout applied to every price API request
pub const PRICE_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// CoinGecko asset id for ether
pub const ETH_ASSET_ID: &str = "ethereum";

/// Where current ETH prices come from
#[automock]
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_eth_quote(&self) -> Result<PriceQuote, PriceError>;
}

/// Client for the CoinGecko `simple/price` endpoint
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Builds the HTTP client once; it is reused for every request
    pub fn new(base_url: &str) -> Result<Self, PriceError> {
        Self::with_timeout(base_url, PRICE_REQUEST_TIMEOUT)
    }

    /// Same as [`CoinGeckoClient::new`] with a custom per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, PriceError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_eth_quote(&self) -> Result<PriceQuote, PriceError> {
        let url = format!("{}/simple/price", self.base_url);

        let mut response: HashMap<String, SimplePrice> = self
            .http
            .get(&url)
            .query(&[
                ("ids", ETH_ASSET_ID),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .remove(ETH_ASSET_ID)
            .map(PriceQuote::from)
            .ok_or_else(|| PriceError::NoPriceData(ETH_ASSET_ID.to_string()))
    }
}

/// Price feed used by the HTTP layer
///
/// Nothing is cached: each call goes to the upstream API, so two calls in the
/// same request may observe different prices.
#[derive(Clone)]
pub struct PriceService {
    source: Arc<dyn PriceSource>,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Service backed by the CoinGecko API at `base_url`
    pub fn coingecko(base_url: &str) -> Result<Self, PriceError> {
        Ok(Self::new(Arc::new(CoinGeckoClient::new(base_url)?)))
    }

    /// Current ETH quote, or `None` when the price API is unavailable
    #[instrument(skip(self))]
    pub async fn get_current_price(&self) -> Option<PriceQuote> {
        match self.source.fetch_eth_quote().await {
            Ok(quote) => {
                debug!("Fetched ETH quote: {:?}", quote);
                Some(quote)
            }
            Err(e) => {
                error!("Error fetching ETH price: {}", e);
                None
            }
        }
    }

    /// USD value of `eth_amount` at the current price
    pub async fn convert_to_usd(&self, eth_amount: f64) -> Option<f64> {
        let price = self.get_current_price().await?.usable_price()?;
        Some(eth_amount * price)
    }
}

