use ethers::types::{Address, U256};

use crate::error::ParamError;
use crate::math::{
    deadline::deadline,
    slippage::min_amount,
    sqrt_price::PriceRatio,
    tick_range::{compute_range, validate_range, RangeAnchor},
};
use crate::models::{MintParameters, PoolKey, PoolState, SwapParameters, TickRange};

/// How the position's tick range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Computed from the pool's current tick.
    Around { width_in_spacings: u32, anchor: RangeAnchor },
    /// Supplied by the caller; validated against the pool's spacing.
    Explicit(TickRange),
}

impl Default for RangeSpec {
    fn default() -> Self {
        RangeSpec::Around { width_in_spacings: 10, anchor: RangeAnchor::Centered }
    }
}

pub fn resolve_range(spec: RangeSpec, state: &PoolState) -> Result<TickRange, ParamError> {
    match spec {
        RangeSpec::Around { width_in_spacings, anchor } => {
            compute_range(state.tick, state.tick_spacing, width_in_spacings, anchor)
        }
        RangeSpec::Explicit(range) => {
            validate_range(&range, state.tick_spacing)?;
            Ok(range)
        }
    }
}

/// Desired deposit expressed in the caller's token A / token B order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAmounts {
    pub amount_a: U256,
    pub amount_b: U256,
}

#[derive(Debug, Clone, Copy)]
pub struct MintInputs {
    pub range: RangeSpec,
    pub amounts: LiquidityAmounts,
    pub slippage_bps: u32,
    pub recipient: Address,
    pub now_unix_secs: u64,
    pub deadline_window_secs: u64,
}

/// Builds the position manager's `mint` arguments from a fresh pool read.
pub fn build_mint_params(
    key: &PoolKey,
    token_a_is_token0: bool,
    state: &PoolState,
    inputs: &MintInputs,
) -> Result<MintParameters, ParamError> {
    let range = resolve_range(inputs.range, state)?;

    let (amount0_desired, amount1_desired) = if token_a_is_token0 {
        (inputs.amounts.amount_a, inputs.amounts.amount_b)
    } else {
        (inputs.amounts.amount_b, inputs.amounts.amount_a)
    };

    Ok(MintParameters {
        token0: key.token0,
        token1: key.token1,
        fee: key.fee,
        range,
        amount0_desired,
        amount1_desired,
        amount0_min: min_amount(amount0_desired, inputs.slippage_bps)?,
        amount1_min: min_amount(amount1_desired, inputs.slippage_bps)?,
        recipient: inputs.recipient,
        deadline: deadline(inputs.now_unix_secs, inputs.deadline_window_secs)?,
    })
}

/// Orients a human price (whole token B per whole token A) as the pool's raw
/// token1-per-token0 ratio.
pub fn pool_price_ratio(
    price_b_per_a: PriceRatio,
    decimals_a: u8,
    decimals_b: u8,
    token_a_is_token0: bool,
) -> PriceRatio {
    let raw = price_b_per_a.scaled_for_decimals(decimals_a, decimals_b);
    if token_a_is_token0 {
        raw
    } else {
        raw.inverted()
    }
}

/// `exactInputSingle` arguments with no price limit.
pub fn build_swap_params(
    key: &PoolKey,
    token_in: Address,
    amount_in: U256,
    amount_out_minimum: U256,
    recipient: Address,
    deadline_unix_secs: u64,
) -> Result<SwapParameters, ParamError> {
    let token_out = key.counterpart(token_in).ok_or_else(|| {
        ParamError::InvalidPoolKey(format!("{:?} is not part of the pool", token_in))
    })?;
    if amount_in.is_zero() {
        return Err(ParamError::UndefinedInput("swap amount must be non-zero"));
    }

    Ok(SwapParameters {
        token_in,
        token_out,
        fee: key.fee,
        recipient,
        deadline: deadline_unix_secs,
        amount_in,
        amount_out_minimum,
        sqrt_price_limit_x96: U256::zero(),
    })
}
