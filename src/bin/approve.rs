use anyhow::Context;

use v3_pool_ops::bootstrap::{self, AppState};
use v3_pool_ops::chain::tokens;
use v3_pool_ops::config::{parse_amount, Config};
use v3_pool_ops::engine::ops;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;

    let token_address = bootstrap::require("TOKEN_A_ADDRESS", state.token_a)?;
    let router = bootstrap::require("SWAP_ROUTER_ADDRESS", state.swap_router)?;
    let token = tokens::token_info(state.client.clone(), token_address)
        .await
        .context("Failed to read token metadata")?;
    let amount = parse_amount("APPROVE_AMOUNT", &config.approve_amount, token.decimals)?;

    let sent = ops::ensure_allowance(
        state.client.clone(),
        &token,
        state.wallet_address,
        router,
        amount,
        amount,
    )
    .await
    .with_context(|| format!("Failed to approve {}", token.symbol))?;

    if sent {
        let updated =
            tokens::allowance(state.client.clone(), token.address, state.wallet_address, router)
                .await?;
        log::info!("Updated {} allowance: {}", token.symbol, token.format(updated));
    }

    Ok(())
}
