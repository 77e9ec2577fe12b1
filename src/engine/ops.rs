// Scripted procedures: read state -> compute parameters -> submit -> await
// confirmation -> re-read for the log. Every local precondition is checked
// before the first transaction of a procedure is sent.

use ethers::prelude::*;
use futures::{stream, StreamExt};
use std::sync::Arc;

use crate::chain::{
    periphery::{self, MintedPosition},
    pools,
    tokens::{self, TokenInfo},
};
use crate::engine::params::{
    build_mint_params, build_swap_params, pool_price_ratio, LiquidityAmounts, MintInputs,
    RangeSpec,
};
use crate::error::{ChainError, OpsError, ParamError};
use crate::math::{
    deadline::{deadline_from_now, unix_now},
    slippage::{check_tolerance, min_amount, resolve_min_output},
    sqrt_price::{encode_sqrt_price_x96, price_from_sqrt_price_x96, PriceRatio},
    tick_range::{compute_range, ticks_in_range, validate_range, RangeAnchor},
};
use crate::models::{LiquidityScan, MintParameters, PoolKey, PoolState, SwapParameters};

// ------------------------------- Tokens --------------------------------------

/// Mints `amount` of a test token to `recipient` and returns the new balance.
pub async fn mint_test_tokens<M: Middleware + 'static>(
    client: Arc<M>,
    token: &TokenInfo,
    recipient: Address,
    amount: U256,
) -> Result<U256, OpsError> {
    log::info!(
        "Minting {} {} to {:?}...",
        token.format(amount),
        token.symbol,
        recipient
    );
    tokens::mint(client.clone(), token.address, recipient, amount).await?;

    let balance = tokens::balance_of(client, token.address, recipient).await?;
    log::info!("Updated {} balance: {}", token.symbol, token.format(balance));
    Ok(balance)
}

/// Approves `approve_amount` only when the current allowance is below
/// `required`. Returns whether an approval was sent.
pub async fn ensure_allowance<M: Middleware + 'static>(
    client: Arc<M>,
    token: &TokenInfo,
    owner: Address,
    spender: Address,
    required: U256,
    approve_amount: U256,
) -> Result<bool, OpsError> {
    let current = tokens::allowance(client.clone(), token.address, owner, spender).await?;
    log::info!(
        "Current {} allowance for {:?}: {}",
        token.symbol,
        spender,
        token.format(current)
    );

    if current >= required {
        log::info!("{:?} already approved for {}", spender, token.symbol);
        return Ok(false);
    }

    log::info!("Approving {:?} to spend {}...", spender, token.symbol);
    tokens::approve(client, token.address, spender, approve_amount.max(required)).await?;
    Ok(true)
}

// -------------------------------- Pools --------------------------------------

/// Returns the pool address, creating and initializing the pool at
/// `initial_price` (raw token1 per token0) when the factory has none.
pub async fn ensure_pool<M: Middleware + 'static>(
    client: Arc<M>,
    factory: Address,
    position_manager: Address,
    key: &PoolKey,
    initial_price: Option<&PriceRatio>,
) -> Result<(Address, bool), OpsError> {
    if let Some(pool) = pools::get_pool(client.clone(), factory, key).await? {
        log::info!("Pool already exists at {:?}", pool);
        return Ok((pool, false));
    }

    log::info!("Pool does not exist. Creating and initializing...");
    let price = initial_price.ok_or(OpsError::MissingInitialPrice)?;
    let sqrt_price_x96 = encode_sqrt_price_x96(price)?;
    log::info!("Initial price {} -> sqrtPriceX96 {}", price, sqrt_price_x96);

    periphery::create_and_initialize_pool(client.clone(), position_manager, key, sqrt_price_x96)
        .await?;

    let pool = pools::get_pool(client, factory, key)
        .await?
        .ok_or(ChainError::PoolNotFound {
            token0: key.token0,
            token1: key.token1,
            fee: key.fee,
        })?;
    log::info!("Pool created and initialized at {:?}", pool);
    Ok((pool, true))
}

/// Everything `add_liquidity` needs; token A/B are in the caller's order.
#[derive(Debug, Clone)]
pub struct LiquidityRequest {
    pub factory: Address,
    pub position_manager: Address,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    pub fee: u32,
    /// Whole token B per whole token A; only used when the pool is missing.
    pub initial_price: Option<PriceRatio>,
    pub amounts: LiquidityAmounts,
    /// Allowance granted when the current one is short; per token, A then B.
    pub approve_amounts: LiquidityAmounts,
    pub range: RangeSpec,
    pub slippage_bps: u32,
    pub deadline_window_secs: u64,
    pub gas_limit: u64,
    /// Signing account; pays the tokens and grants the allowances.
    pub owner: Address,
    /// Receives the position NFT.
    pub recipient: Address,
}

#[derive(Debug, Clone)]
pub struct LiquidityOutcome {
    pub pool: Address,
    pub pool_created: bool,
    pub params: MintParameters,
    pub minted: Option<MintedPosition>,
    pub tx_hash: TxHash,
    pub liquidity_before: u128,
    pub liquidity_after: u128,
}

pub async fn add_liquidity<M: Middleware + 'static>(
    client: Arc<M>,
    req: &LiquidityRequest,
) -> Result<LiquidityOutcome, OpsError> {
    // local checks first: nothing is submitted if any of these fail
    let (key, a_is_token0) = PoolKey::new(req.token_a.address, req.token_b.address, req.fee)?;
    check_tolerance(req.slippage_bps)?;
    deadline_from_now(req.deadline_window_secs)?;

    let spacing = pools::tick_spacing_for_fee(client.clone(), req.factory, key.fee).await?;
    log::info!("Tick spacing for fee tier {}: {}", key.fee, spacing);
    if spacing <= 0 {
        return Err(ParamError::UndefinedInput("fee tier has no tick spacing on this factory").into());
    }
    if let RangeSpec::Explicit(range) = req.range {
        validate_range(&range, spacing)?;
    }

    let (decimals0, decimals1) = if a_is_token0 {
        (req.token_a.decimals, req.token_b.decimals)
    } else {
        (req.token_b.decimals, req.token_a.decimals)
    };
    let initial_price = req
        .initial_price
        .clone()
        .map(|p| pool_price_ratio(p, req.token_a.decimals, req.token_b.decimals, a_is_token0));
    if let Some(price) = &initial_price {
        encode_sqrt_price_x96(price)?;
    }

    let (pool, pool_created) = ensure_pool(
        client.clone(),
        req.factory,
        req.position_manager,
        &key,
        initial_price.as_ref(),
    )
    .await?;

    // pool state is read strictly before the mint is built
    let state = pools::load_pool_state(client.clone(), pool).await?;
    log_pool_state(&state, decimals0, decimals1);

    let params = build_mint_params(
        &key,
        a_is_token0,
        &state,
        &MintInputs {
            range: req.range,
            amounts: req.amounts,
            slippage_bps: req.slippage_bps,
            recipient: req.recipient,
            now_unix_secs: unix_now(),
            deadline_window_secs: req.deadline_window_secs,
        },
    )?;
    log::info!(
        "Tick range: [{}, {}]",
        params.range.tick_lower,
        params.range.tick_upper
    );

    for (token, desired, approve_amount) in [
        (&req.token_a, req.amounts.amount_a, req.approve_amounts.amount_a),
        (&req.token_b, req.amounts.amount_b, req.approve_amounts.amount_b),
    ] {
        ensure_allowance(
            client.clone(),
            token,
            req.owner,
            req.position_manager,
            desired,
            approve_amount,
        )
        .await?;
    }

    log::info!("Adding liquidity...");
    let (receipt, minted) =
        periphery::mint_position(client.clone(), req.position_manager, &params, req.gas_limit)
            .await?;
    log::info!("Liquidity added. Transaction hash: {:?}", receipt.transaction_hash);
    if let Some(m) = &minted {
        log::info!(
            "Position #{}: liquidity {}, amount0 {}, amount1 {}",
            m.token_id,
            m.liquidity,
            m.amount0,
            m.amount1
        );
    }

    log::info!("Re-checking liquidity...");
    let after = pools::load_pool_state(client, pool).await?;
    log::info!("Updated pool liquidity: {}", after.liquidity);

    Ok(LiquidityOutcome {
        pool,
        pool_created,
        params,
        minted,
        tx_hash: receipt.transaction_hash,
        liquidity_before: state.liquidity,
        liquidity_after: after.liquidity,
    })
}

fn log_pool_state(state: &PoolState, decimals0: u8, decimals1: u8) {
    log::info!("Current pool liquidity: {}", state.liquidity);
    log::info!(
        "Pool price (token1 per token0): {:.6}",
        price_from_sqrt_price_x96(state.sqrt_price_x96, decimals0, decimals1)
    );
    log::info!("Current tick: {}", state.tick);
}

// -------------------------------- Swaps --------------------------------------

/// How to find the pool for a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolLocator {
    Address(Address),
    Factory(Address),
}

#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub pool: PoolLocator,
    pub swap_router: Address,
    pub token_in: TokenInfo,
    pub token_out: TokenInfo,
    pub fee: u32,
    pub amount_in: U256,
    /// Explicit floor; derived from the quote when absent.
    pub amount_out_min: Option<U256>,
    pub slippage_bps: u32,
    pub requote_slippage_bps: u32,
    pub approve_amount: U256,
    pub deadline_window_secs: u64,
    pub gas_limit: u64,
    /// Signing account; spends `token_in`.
    pub owner: Address,
    /// Receives `token_out`.
    pub recipient: Address,
}

#[derive(Debug, Clone)]
pub struct SwapOutcome {
    pub params: SwapParameters,
    pub quoted_out: U256,
    pub tx_hash: TxHash,
    pub received: U256,
}

pub async fn swap_exact_input<M: Middleware + 'static>(
    client: Arc<M>,
    req: &SwapRequest,
) -> Result<SwapOutcome, OpsError> {
    let (key, in_is_token0) = PoolKey::new(req.token_in.address, req.token_out.address, req.fee)?;
    check_tolerance(req.slippage_bps)?;
    check_tolerance(req.requote_slippage_bps)?;
    let deadline_at = deadline_from_now(req.deadline_window_secs)?;
    let mut params = build_swap_params(
        &key,
        req.token_in.address,
        req.amount_in,
        req.amount_out_min.unwrap_or_default(),
        req.recipient,
        deadline_at,
    )?;

    log::info!(
        "Swapping {} {} for {}...",
        req.token_in.format(req.amount_in),
        req.token_in.symbol,
        req.token_out.symbol
    );

    let balance = tokens::balance_of(client.clone(), req.token_in.address, req.owner).await?;
    log::info!("{} balance: {}", req.token_in.symbol, req.token_in.format(balance));
    if balance < req.amount_in {
        return Err(OpsError::InsufficientBalance { have: balance, need: req.amount_in });
    }

    let state = match req.pool {
        PoolLocator::Address(pool) => {
            let onchain = pools::pool_key(client.clone(), pool).await?;
            if onchain.fee != key.fee
                || !onchain.contains(req.token_in.address)
                || !onchain.contains(req.token_out.address)
            {
                return Err(OpsError::PoolMismatch {
                    pool,
                    token0: onchain.token0,
                    token1: onchain.token1,
                    fee: onchain.fee,
                });
            }
            pools::load_pool_state(client.clone(), pool).await?
        }
        PoolLocator::Factory(factory) => {
            pools::get_pool_state(client.clone(), factory, &key).await?
        }
    };
    let (decimals0, decimals1) = if in_is_token0 {
        (req.token_in.decimals, req.token_out.decimals)
    } else {
        (req.token_out.decimals, req.token_in.decimals)
    };
    log_pool_state(&state, decimals0, decimals1);
    if state.liquidity == 0 {
        return Err(OpsError::NoLiquidity(state.address));
    }

    ensure_allowance(
        client.clone(),
        &req.token_in,
        req.owner,
        req.swap_router,
        req.amount_in,
        req.approve_amount,
    )
    .await?;

    let quoted_out =
        periphery::quote_exact_input_single(client.clone(), req.swap_router, &params, req.owner)
            .await
            .map_err(|e| OpsError::QuoteFailed(e.to_string()))?;
    log::info!(
        "Expected output: {} {}",
        req.token_out.format(quoted_out),
        req.token_out.symbol
    );

    params.amount_out_minimum = match req.amount_out_min {
        Some(configured) => {
            let resolved = resolve_min_output(Some(configured), quoted_out, req.requote_slippage_bps)?;
            if resolved != configured {
                log::warn!(
                    "Expected output ({}) is below the configured minimum ({}); using {}",
                    req.token_out.format(quoted_out),
                    req.token_out.format(configured),
                    req.token_out.format(resolved)
                );
            }
            resolved
        }
        None => min_amount(quoted_out, req.slippage_bps)?,
    };
    log::info!(
        "Minimum output: {} {}",
        req.token_out.format(params.amount_out_minimum),
        req.token_out.symbol
    );

    let out_before =
        tokens::balance_of(client.clone(), req.token_out.address, req.recipient).await?;
    let receipt =
        periphery::exact_input_single(client.clone(), req.swap_router, &params, req.gas_limit)
            .await?;
    log::info!(
        "Swap completed successfully. Transaction hash: {:?}",
        receipt.transaction_hash
    );

    let out_after = tokens::balance_of(client, req.token_out.address, req.recipient).await?;
    let received = out_after.saturating_sub(out_before);
    log::info!("Received {} {}", req.token_out.format(received), req.token_out.symbol);

    Ok(SwapOutcome {
        params,
        quoted_out,
        tx_hash: receipt.transaction_hash,
        received,
    })
}

// ----------------------------- Liquidity scan --------------------------------

/// Reads every usable tick within `width_in_spacings` of the current tick and
/// sums their gross liquidity. Reads run `concurrency` at a time, results stay
/// in tick order; a failed read is recorded, not fatal.
pub async fn scan_liquidity<M: Middleware + 'static>(
    client: Arc<M>,
    pool: Address,
    width_in_spacings: u32,
    concurrency: usize,
) -> Result<LiquidityScan, OpsError> {
    let state = pools::load_pool_state(client.clone(), pool).await?;
    log::info!("Current tick: {}", state.tick);
    log::info!("Tick spacing: {}", state.tick_spacing);

    let range = compute_range(
        state.tick,
        state.tick_spacing,
        width_in_spacings,
        RangeAnchor::Centered,
    )?;
    log::info!("Tick range: [{}, {}]", range.tick_lower, range.tick_upper);
    let ticks = ticks_in_range(&range, state.tick_spacing)?;

    log::info!("Analyzing liquidity across {} ticks...", ticks.len());
    let results: Vec<(i32, Result<_, ChainError>)> = stream::iter(ticks.into_iter().map(|tick| {
        let client = client.clone();
        async move { (tick, pools::tick_info(client, pool, tick).await) }
    }))
    .buffered(concurrency.max(1))
    .collect()
    .await;

    let mut scan = LiquidityScan {
        pool,
        current_tick: state.tick,
        tick_spacing: state.tick_spacing,
        range,
        ticks: Vec::with_capacity(results.len()),
        missing: Vec::new(),
        total_liquidity_gross: U256::zero(),
    };
    for (tick, result) in results {
        match result {
            Ok(info) => {
                log::info!(
                    "Tick: {}, LiquidityNet: {}, LiquidityGross: {}",
                    info.tick,
                    info.liquidity_net,
                    info.liquidity_gross
                );
                scan.total_liquidity_gross += U256::from(info.liquidity_gross);
                scan.ticks.push(info);
            }
            Err(e) => {
                log::warn!("Tick {} has no data: {}", tick, e);
                scan.missing.push(tick);
            }
        }
    }

    log::info!("Total liquidity in range: {}", scan.total_liquidity_gross);
    Ok(scan)
}
