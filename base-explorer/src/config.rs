use eyre::{Result, WrapErr};
use std::env;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173";

/// Service configuration structure
///
/// Every value is read from the environment, falling back to defaults suitable
/// for local development against the public Base endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind the server to (default: 0.0.0.0)
    pub host: String,

    /// Port to listen on (default: 8000)
    pub port: u16,

    /// Number of HTTP worker threads (default: 4)
    pub workers: usize,

    /// Base mainnet RPC endpoint
    pub base_rpc_url: String,

    /// Base Sepolia testnet RPC endpoint
    pub base_testnet_rpc_url: String,

    /// Connect to the testnet endpoint instead of mainnet
    pub use_testnet: bool,

    /// CoinGecko API base URL
    pub coingecko_api_url: String,

    /// Origins allowed by the CORS policy
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// * `HOST` - Server host address (default: "0.0.0.0")
    /// * `PORT` - Server port (default: 8000)
    /// * `WORKERS` - HTTP worker threads (default: 4)
    /// * `BASE_RPC_URL` - Mainnet RPC URL (default: "https://mainnet.base.org")
    /// * `BASE_TESTNET_RPC_URL` - Testnet RPC URL (default: "https://sepolia.base.org")
    /// * `USE_TESTNET` - "true" or "false" (default: false)
    /// * `COINGECKO_API_URL` - Price API URL (default: "https://api.coingecko.com/api/v3")
    /// * `ALLOWED_ORIGINS` - Comma separated list of CORS origins
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .wrap_err("PORT must be a valid port number")?,
            workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse::<usize>()
                .wrap_err("WORKERS must be a positive integer")?,
            base_rpc_url: env::var("BASE_RPC_URL")
                .unwrap_or_else(|_| "https://mainnet.base.org".to_string()),
            base_testnet_rpc_url: env::var("BASE_TESTNET_RPC_URL")
                .unwrap_or_else(|_| "https://sepolia.base.org".to_string()),
            use_testnet: env::var("USE_TESTNET")
                .unwrap_or_else(|_| "false".to_string())
                .to_ascii_lowercase()
                .parse::<bool>()
                .wrap_err("USE_TESTNET must be true or false")?,
            coingecko_api_url: env::var("COINGECKO_API_URL")
                .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".to_string()),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
        })
    }

    /// RPC endpoint selected by `use_testnet`
    pub fn rpc_url(&self) -> &str {
        if self.use_testnet {
            &self.base_testnet_rpc_url
        } else {
            &self.base_rpc_url
        }
    }
}

/// Split a comma separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
