use actix_web::{web, App, HttpServer};
use base_explorer::{api, config::Config, explorer::ChainExplorer, price::PriceService};
use eyre::WrapErr;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

/// Application entry point
///
/// This is the main function that:
/// 1. Sets up logging
/// 2. Loads configuration
/// 3. Connects to the chain RPC endpoint, refusing to start if it is down
/// 4. Builds the price client
/// 5. Serves the HTTP API until shutdown, then releases the clients
#[actix_web::main]
async fn main() -> eyre::Result<()> {
    // Info for our service, lower levels for dependencies to reduce noise
    let filter = EnvFilter::from_default_env()
        .add_directive("base_explorer=info".parse()?)
        .add_directive("actix_web=error".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().wrap_err("Failed to load config")?;
    info!("Starting Base Explorer API...");

    let explorer = Arc::new(
        ChainExplorer::connect(config.rpc_url(), config.use_testnet)
            .await
            .wrap_err("Failed to connect to chain RPC endpoint")?,
    );
    let prices = Arc::new(
        PriceService::coingecko(&config.coingecko_api_url)
            .wrap_err("Failed to build price client")?,
    );
    info!("Services initialized successfully on {}", explorer.network());

    let allowed_origins = config.allowed_origins.clone();
    let server_explorer = explorer.clone();
    let server_prices = prices.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(api::cors_policy(&allowed_origins))
            // Add logging middleware
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_explorer.clone()))
            .app_data(web::Data::new(server_prices.clone()))
            .configure(api::configure)
    })
    .workers(config.workers)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Shutting down Base Explorer API...");
    drop(prices);
    drop(explorer);
    Ok(())
}
