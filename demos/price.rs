//! Read-only walk through the swap API: decimals, indicative price and a quote.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example price
//! ```
//!
//! Optionally log to a file:
//! ```sh
//! LOG_FILE=price.log RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example price
//! ```

use std::fs::File;

use permit2_swap::chain::{ChainClient as _, Client as ChainClient};
use permit2_swap::chain_config;
use permit2_swap::config::Config;
use permit2_swap::quote::Client as QuoteClient;
use permit2_swap::quote::types::SwapRequest;
use permit2_swap::swap::to_minor_units;
use permit2_swap::types::dec;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let config = Config::from_env()?;
    let pair = chain_config(config.chain_id())
        .ok_or_else(|| anyhow::anyhow!("no token pair known for chain {}", config.chain_id()))?;

    let chain = ChainClient::connect(&config)?;
    let quotes = QuoteClient::from_config(&config)?;

    let decimals = chain.decimals(pair.weth).await?;
    info!(token = %pair.weth, decimals);

    let request = SwapRequest::builder()
        .chain_id(config.chain_id())
        .sell_token(pair.weth)
        .buy_token(pair.wsteth)
        .sell_amount(to_minor_units(dec!(0.1), decimals)?)
        .taker(chain.address())
        .build();

    match quotes.price(&request).await {
        Ok(price) => {
            info!(
                endpoint = "price",
                liquidity_available = price.liquidity_available,
                buy_amount = ?price.buy_amount,
                allowance_spender = ?price.allowance_spender()
            );
            if let Some(route) = &price.route {
                for (source, percent) in route.liquidity_breakdown() {
                    info!(endpoint = "price", source = %source, percent = %percent);
                }
            }
            if let Some(metadata) = &price.token_metadata {
                info!(
                    endpoint = "price",
                    buy_token_taxed = metadata.buy_token.is_taxed(),
                    sell_token_taxed = metadata.sell_token.is_taxed()
                );
            }
        }
        Err(e) => debug!(endpoint = "price", error = %e),
    }

    match quotes.quote(&request).await {
        Ok(quote) => info!(
            endpoint = "quote",
            to = %quote.transaction.to,
            buy_amount = ?quote.buy_amount,
            has_permit = quote.permit_typed_data().is_some()
        ),
        Err(e) => debug!(endpoint = "quote", error = %e),
    }

    Ok(())
}
