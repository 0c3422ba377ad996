//! Full swap: sells 0.1 WETH for wstETH on the configured chain.
//!
//! This broadcasts real transactions from `PRIVATE_KEY`. Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example swap
//! ```

use permit2_swap::chain::Client as ChainClient;
use permit2_swap::chain_config;
use permit2_swap::config::Config;
use permit2_swap::quote::Client as QuoteClient;
use permit2_swap::swap::SwapExecutor;
use permit2_swap::types::dec;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let pair = chain_config(config.chain_id())
        .ok_or_else(|| anyhow::anyhow!("no token pair known for chain {}", config.chain_id()))?;

    let executor = SwapExecutor::new(
        ChainClient::connect(&config)?,
        QuoteClient::from_config(&config)?,
    );

    let request = executor
        .request_for(pair.weth, pair.wsteth, dec!(0.1))
        .await?;
    let mut run = executor.start(request);

    match run.run().await {
        Ok(outcome) => {
            if let Some(approval) = outcome.approval {
                info!(
                    approval = %approval.transaction_hash,
                    block_number = approval.block_number
                );
            }
            info!(
                hash = %outcome.transaction_hash,
                url = ?outcome.explorer_url,
                "swap submitted"
            );
        }
        Err(e) => {
            error!(failed_at = ?run.failed_at(), error = %e, "swap failed");
            return Err(e.into());
        }
    }

    Ok(())
}
