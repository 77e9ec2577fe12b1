use ethers::types::{Address, U256};
use serde::Serialize;

use crate::error::ParamError;

/// Fee tiers (hundredths of a basis point) the target factories enable.
pub const SUPPORTED_FEE_TIERS: [u32; 5] = [100, 500, 2500, 3000, 10000];

/// Token pair plus fee tier, stored in the sorted order the AMM expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
}

impl PoolKey {
    /// Validates and sorts the pair. The flag is true when `token_a` ended up
    /// as token0.
    pub fn new(token_a: Address, token_b: Address, fee: u32) -> Result<(Self, bool), ParamError> {
        if token_a == token_b {
            return Err(ParamError::InvalidPoolKey(format!(
                "tokenA and tokenB are both {:?}",
                token_a
            )));
        }
        if !SUPPORTED_FEE_TIERS.contains(&fee) {
            return Err(ParamError::InvalidPoolKey(format!("unsupported fee tier {}", fee)));
        }

        let a_is_token0 = token_a < token_b;
        let (token0, token1) = if a_is_token0 {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok((PoolKey { token0, token1, fee }, a_is_token0))
    }

    pub fn contains(&self, token: Address) -> bool {
        token == self.token0 || token == self.token1
    }

    /// The other side of the pair, if `token` belongs to it.
    pub fn counterpart(&self, token: Address) -> Option<Address> {
        if token == self.token0 {
            Some(self.token1)
        } else if token == self.token1 {
            Some(self.token0)
        } else {
            None
        }
    }
}

/// Snapshot of a deployed pool, read fresh before every dependent transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolState {
    pub address: Address,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub tick_spacing: i32,
    pub liquidity: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintParameters {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub range: TickRange,
    pub amount0_desired: U256,
    pub amount1_desired: U256,
    pub amount0_min: U256,
    pub amount1_min: U256,
    pub recipient: Address,
    pub deadline: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapParameters {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// Zero leaves the swap unconstrained by price.
    pub sqrt_price_limit_x96: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickLiquidity {
    pub tick: i32,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub initialized: bool,
}

/// Result of walking every usable tick of a range.
#[derive(Debug, Clone, Serialize)]
pub struct LiquidityScan {
    pub pool: Address,
    pub current_tick: i32,
    pub tick_spacing: i32,
    pub range: TickRange,
    pub ticks: Vec<TickLiquidity>,
    /// Ticks whose read failed.
    pub missing: Vec<i32>,
    pub total_liquidity_gross: U256,
}

impl LiquidityScan {
    pub fn initialized_ticks(&self) -> impl Iterator<Item = &TickLiquidity> {
        self.ticks.iter().filter(|t| t.liquidity_gross > 0)
    }
}
