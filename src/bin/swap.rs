use anyhow::Context;

use v3_pool_ops::bootstrap::{self, AppState};
use v3_pool_ops::chain::tokens;
use v3_pool_ops::config::{parse_amount, Config};
use v3_pool_ops::engine::ops::{self, PoolLocator, SwapRequest};
use v3_pool_ops::error::ConfigError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;

    let token_in = bootstrap::require("TOKEN_A_ADDRESS", state.token_a)?;
    let token_out = bootstrap::require("TOKEN_B_ADDRESS", state.token_b)?;
    let swap_router = bootstrap::require("SWAP_ROUTER_ADDRESS", state.swap_router)?;
    // an explicit pool address wins over the factory lookup
    let pool = match (state.pool, state.factory) {
        (Some(pool), _) => PoolLocator::Address(pool),
        (None, Some(factory)) => PoolLocator::Factory(factory),
        (None, None) => return Err(ConfigError::Missing("POOL_ADDRESS").into()),
    };

    let token_in = tokens::token_info(state.client.clone(), token_in)
        .await
        .context("Failed to read input token metadata")?;
    let token_out = tokens::token_info(state.client.clone(), token_out)
        .await
        .context("Failed to read output token metadata")?;

    let amount_out_min = config
        .swap_amount_out_min
        .as_deref()
        .map(|raw| parse_amount("SWAP_AMOUNT_OUT_MIN", raw, token_out.decimals))
        .transpose()?;

    let request = SwapRequest {
        pool,
        swap_router,
        amount_in: parse_amount("SWAP_AMOUNT_IN", &config.swap_amount_in, token_in.decimals)?,
        approve_amount: parse_amount("APPROVE_AMOUNT", &config.approve_amount, token_in.decimals)?,
        token_in,
        token_out,
        fee: config.fee_tier,
        amount_out_min,
        slippage_bps: config.slippage_bps,
        requote_slippage_bps: config.requote_slippage_bps,
        deadline_window_secs: config.deadline_window_secs,
        gas_limit: config.gas_limit,
        owner: state.wallet_address,
        recipient: state.wallet_address,
    };

    let outcome = ops::swap_exact_input(state.client.clone(), &request)
        .await
        .context("Swap failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "params": outcome.params,
            "quoted_out": outcome.quoted_out,
            "received": outcome.received,
            "tx_hash": outcome.tx_hash,
        }))?
    );

    Ok(())
}
