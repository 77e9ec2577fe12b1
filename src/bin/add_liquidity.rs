use anyhow::Context;

use v3_pool_ops::bootstrap::{self, AppState};
use v3_pool_ops::chain::tokens;
use v3_pool_ops::config::{parse_amount, Config};
use v3_pool_ops::engine::ops::{self, LiquidityRequest};
use v3_pool_ops::engine::params::{LiquidityAmounts, RangeSpec};
use v3_pool_ops::math::sqrt_price::PriceRatio;
use v3_pool_ops::models::TickRange;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;

    let token_a = bootstrap::require("TOKEN_A_ADDRESS", state.token_a)?;
    let token_b = bootstrap::require("TOKEN_B_ADDRESS", state.token_b)?;
    let factory = bootstrap::require("FACTORY_ADDRESS", state.factory)?;
    let position_manager =
        bootstrap::require("POSITION_MANAGER_ADDRESS", state.position_manager)?;

    let token_a = tokens::token_info(state.client.clone(), token_a)
        .await
        .context("Failed to read token A metadata")?;
    let token_b = tokens::token_info(state.client.clone(), token_b)
        .await
        .context("Failed to read token B metadata")?;

    let amounts = LiquidityAmounts {
        amount_a: parse_amount("LIQUIDITY_AMOUNT_A", &config.liquidity_amount_a, token_a.decimals)?,
        amount_b: parse_amount("LIQUIDITY_AMOUNT_B", &config.liquidity_amount_b, token_b.decimals)?,
    };
    let approve_amounts = LiquidityAmounts {
        amount_a: parse_amount("APPROVE_AMOUNT", &config.approve_amount, token_a.decimals)?,
        amount_b: parse_amount("APPROVE_AMOUNT", &config.approve_amount, token_b.decimals)?,
    };
    let range = match (config.tick_lower, config.tick_upper) {
        (Some(tick_lower), Some(tick_upper)) => {
            RangeSpec::Explicit(TickRange { tick_lower, tick_upper })
        }
        _ => RangeSpec::Around {
            width_in_spacings: config.range_width,
            anchor: config.range_anchor,
        },
    };
    let initial_price = config
        .initial_price
        .as_deref()
        .map(PriceRatio::from_decimal_str)
        .transpose()
        .context("INITIAL_PRICE is not a positive decimal")?;

    let request = LiquidityRequest {
        factory,
        position_manager,
        token_a,
        token_b,
        fee: config.fee_tier,
        initial_price,
        amounts,
        approve_amounts,
        range,
        slippage_bps: config.slippage_bps,
        deadline_window_secs: config.deadline_window_secs,
        gas_limit: config.gas_limit,
        owner: state.wallet_address,
        recipient: state.wallet_address,
    };

    let outcome = ops::add_liquidity(state.client.clone(), &request)
        .await
        .context("Failed to add liquidity")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "pool": outcome.pool,
            "pool_created": outcome.pool_created,
            "params": outcome.params,
            "position": outcome.minted,
            "tx_hash": outcome.tx_hash,
            "liquidity_before": outcome.liquidity_before.to_string(),
            "liquidity_after": outcome.liquidity_after.to_string(),
        }))?
    );

    Ok(())
}
