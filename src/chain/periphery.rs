use ethers::abi::{self, ParamType, Token};
use ethers::prelude::*;
use ethers::utils::keccak256;
use std::sync::Arc;

use super::contracts::{PositionManager, SwapRouter, INCREASE_LIQUIDITY_SIGNATURE};
use super::tx::send_and_confirm;
use crate::error::ChainError;
use crate::models::{MintParameters, PoolKey, SwapParameters};

/// What the position manager reported for a freshly minted position.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MintedPosition {
    pub token_id: U256,
    pub liquidity: u128,
    pub amount0: U256,
    pub amount1: U256,
}

type MintTuple = (Address, Address, u32, i32, i32, U256, U256, U256, U256, Address, U256);
type ExactInputSingleTuple = (Address, Address, u32, Address, U256, U256, U256, U256);

fn mint_tuple(p: &MintParameters) -> MintTuple {
    (
        p.token0,
        p.token1,
        p.fee,
        p.range.tick_lower,
        p.range.tick_upper,
        p.amount0_desired,
        p.amount1_desired,
        p.amount0_min,
        p.amount1_min,
        p.recipient,
        U256::from(p.deadline),
    )
}

fn exact_input_single_tuple(p: &SwapParameters) -> ExactInputSingleTuple {
    (
        p.token_in,
        p.token_out,
        p.fee,
        p.recipient,
        U256::from(p.deadline),
        p.amount_in,
        p.amount_out_minimum,
        p.sqrt_price_limit_x96,
    )
}

pub async fn create_and_initialize_pool<M: Middleware + 'static>(
    client: Arc<M>,
    position_manager: Address,
    key: &PoolKey,
    sqrt_price_x96: U256,
) -> Result<TransactionReceipt, ChainError> {
    let manager = PositionManager::new(position_manager, client);
    let call = manager.create_and_initialize_pool_if_necessary(
        key.token0,
        key.token1,
        key.fee,
        sqrt_price_x96,
    );
    send_and_confirm(call, "createAndInitializePoolIfNecessary").await
}

pub async fn mint_position<M: Middleware + 'static>(
    client: Arc<M>,
    position_manager: Address,
    params: &MintParameters,
    gas_limit: u64,
) -> Result<(TransactionReceipt, Option<MintedPosition>), ChainError> {
    let manager = PositionManager::new(position_manager, client);
    let call = manager.mint(mint_tuple(params)).gas(gas_limit);
    let receipt = send_and_confirm(call, "mint position").await?;
    let minted = decode_increase_liquidity(&receipt.logs, position_manager);
    Ok((receipt, minted))
}

/// Picks the position manager's `IncreaseLiquidity` event out of a mint receipt.
pub fn decode_increase_liquidity(logs: &[Log], position_manager: Address) -> Option<MintedPosition> {
    let topic0 = H256::from(keccak256(INCREASE_LIQUIDITY_SIGNATURE.as_bytes()));
    let log = logs.iter().find(|log| {
        log.address == position_manager && log.topics.len() == 2 && log.topics[0] == topic0
    })?;

    let decoded = abi::decode(
        &[ParamType::Uint(128), ParamType::Uint(256), ParamType::Uint(256)],
        &log.data,
    )
    .ok()?;
    match decoded.as_slice() {
        [Token::Uint(liquidity), Token::Uint(amount0), Token::Uint(amount1)] => Some(MintedPosition {
            token_id: U256::from_big_endian(log.topics[1].as_bytes()),
            liquidity: u128::try_from(*liquidity).ok()?,
            amount0: *amount0,
            amount1: *amount1,
        }),
        _ => None,
    }
}

/// Static-call simulation of the swap with no output floor, sent as `from`
/// (the account whose balance and allowance back the real swap).
pub async fn quote_exact_input_single<M: Middleware + 'static>(
    client: Arc<M>,
    swap_router: Address,
    params: &SwapParameters,
    from: Address,
) -> Result<U256, ChainError> {
    let router = SwapRouter::new(swap_router, client);
    let mut tuple = exact_input_single_tuple(params);
    tuple.6 = U256::zero();
    Ok(router.exact_input_single(tuple).from(from).call().await?)
}

pub async fn exact_input_single<M: Middleware + 'static>(
    client: Arc<M>,
    swap_router: Address,
    params: &SwapParameters,
    gas_limit: u64,
) -> Result<TransactionReceipt, ChainError> {
    let router = SwapRouter::new(swap_router, client);
    let call = router
        .exact_input_single(exact_input_single_tuple(params))
        .gas(gas_limit);
    send_and_confirm(call, "exactInputSingle").await
}
