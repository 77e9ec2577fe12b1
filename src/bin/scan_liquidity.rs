use anyhow::Context;

use v3_pool_ops::bootstrap::{self, AppState};
use v3_pool_ops::config::Config;
use v3_pool_ops::engine::ops;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;
    let pool = bootstrap::require("POOL_ADDRESS", state.pool)?;

    let scan = ops::scan_liquidity(
        state.client.clone(),
        pool,
        config.scan_width,
        config.scan_concurrency,
    )
    .await
    .with_context(|| format!("Failed to scan pool {:?}", pool))?;

    log::info!(
        "{} of {} ticks initialized, {} unreadable",
        scan.initialized_ticks().count(),
        scan.ticks.len(),
        scan.missing.len()
    );
    println!("{}", serde_json::to_string_pretty(&scan)?);

    Ok(())
}
