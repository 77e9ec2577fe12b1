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
    let token = tokens::token_info(state.client.clone(), token_address)
        .await
        .context("Failed to read token metadata")?;
    let amount = parse_amount("MINT_AMOUNT", &config.mint_amount, token.decimals)?;

    ops::mint_test_tokens(state.client.clone(), &token, state.wallet_address, amount)
        .await
        .with_context(|| format!("Failed to mint {}", token.symbol))?;

    Ok(())
}
