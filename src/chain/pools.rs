use ethers::prelude::*;
use std::sync::Arc;

use super::contracts::{V3Factory, V3Pool};
use crate::error::ChainError;
use crate::models::{PoolKey, PoolState, TickLiquidity};

/// Factory lookup; `None` while the pool has not been created.
pub async fn get_pool<M: Middleware + 'static>(
    client: Arc<M>,
    factory: Address,
    key: &PoolKey,
) -> Result<Option<Address>, ChainError> {
    let factory = V3Factory::new(factory, client);
    let pool = factory.get_pool(key.token0, key.token1, key.fee).call().await?;
    log::debug!("factory.getPool({:?}, {:?}, {}) = {:?}", key.token0, key.token1, key.fee, pool);
    Ok((pool != Address::zero()).then_some(pool))
}

/// Spacing the factory assigns to a fee tier; zero for tiers it never enabled.
pub async fn tick_spacing_for_fee<M: Middleware + 'static>(
    client: Arc<M>,
    factory: Address,
    fee: u32,
) -> Result<i32, ChainError> {
    let factory = V3Factory::new(factory, client);
    Ok(factory.fee_amount_tick_spacing(fee).call().await?)
}

/// slot0, liquidity and tickSpacing of a known pool.
pub async fn load_pool_state<M: Middleware + 'static>(
    client: Arc<M>,
    pool: Address,
) -> Result<PoolState, ChainError> {
    let contract = V3Pool::new(pool, client);
    let (sqrt_price_x96, tick, _, _, _, _, _) = contract.slot_0().call().await?;
    let liquidity = contract.liquidity().call().await?;
    let tick_spacing = contract.tick_spacing().call().await?;

    log::debug!(
        "pool {:?}: sqrtPriceX96: {}, tick: {}, spacing: {}, liquidity: {}",
        pool,
        sqrt_price_x96,
        tick,
        tick_spacing,
        liquidity
    );

    Ok(PoolState {
        address: pool,
        sqrt_price_x96,
        tick,
        tick_spacing,
        liquidity,
    })
}

/// The pair and fee tier as the pool contract itself reports them.
pub async fn pool_key<M: Middleware + 'static>(
    client: Arc<M>,
    pool: Address,
) -> Result<PoolKey, ChainError> {
    let contract = V3Pool::new(pool, client);
    let token0 = contract.token_0().call().await?;
    let token1 = contract.token_1().call().await?;
    let fee = contract.fee().call().await?;
    Ok(PoolKey { token0, token1, fee })
}

pub async fn get_pool_state<M: Middleware + 'static>(
    client: Arc<M>,
    factory: Address,
    key: &PoolKey,
) -> Result<PoolState, ChainError> {
    let pool = get_pool(client.clone(), factory, key)
        .await?
        .ok_or(ChainError::PoolNotFound {
            token0: key.token0,
            token1: key.token1,
            fee: key.fee,
        })?;
    load_pool_state(client, pool).await
}

pub async fn tick_info<M: Middleware + 'static>(
    client: Arc<M>,
    pool: Address,
    tick: i32,
) -> Result<TickLiquidity, ChainError> {
    let contract = V3Pool::new(pool, client);
    let (liquidity_gross, liquidity_net, _, _, _, _, _, initialized) =
        contract.ticks(tick).call().await?;
    Ok(TickLiquidity {
        tick,
        liquidity_gross,
        liquidity_net,
        initialized,
    })
}
