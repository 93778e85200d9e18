use serde::{Deserialize, Serialize};

/// Current ETH market data; every field is optional upstream
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub price_usd: Option<f64>,
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
}

impl PriceQuote {
    /// USD price usable for conversion; a missing or zero price is unusable
    pub fn usable_price(&self) -> Option<f64> {
        self.price_usd.filter(|price| *price != 0.0)
    }
}

/// One asset entry of the CoinGecko `simple/price` response
#[derive(Debug, Deserialize)]
pub struct SimplePrice {
    pub usd: Option<f64>,
    pub usd_24h_change: Option<f64>,
    pub usd_24h_vol: Option<f64>,
}

impl From<SimplePrice> for PriceQuote {
    fn from(price: SimplePrice) -> Self {
        Self {
            price_usd: price.usd,
            change_24h: price.usd_24h_change,
            volume_24h: price.usd_24h_vol,
        }
    }
}
