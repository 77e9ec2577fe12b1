// Q64.96 square-root price encoding for pool initialization.
// ----------------------------------------------------------
// Prices are exact rationals (BigUint over BigUint) all the way to the integer
// square root, so large ratios and 18-decimal scaling lose nothing to f64.

use std::fmt;
use std::str::FromStr;

use ethers::types::U256;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rust_decimal::Decimal;

use super::{biguint_to_u256, u256_to_biguint};
use crate::error::ParamError;

/// TickMath.MIN_SQRT_RATIO
pub const MIN_SQRT_RATIO: u64 = 4_295_128_739;
/// TickMath.MAX_SQRT_RATIO
pub const MAX_SQRT_RATIO: &str = "1461446703485210103287273052203988822378723970342";

/// Raw price of token0 in units of token1 (token1 base units per token0 base unit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRatio {
    numerator: BigUint,
    denominator: BigUint,
}

impl PriceRatio {
    pub fn new(numerator: BigUint, denominator: BigUint) -> Result<Self, ParamError> {
        if numerator.is_zero() || denominator.is_zero() {
            return Err(ParamError::UndefinedInput("price ratio must be positive and finite"));
        }
        Ok(Self::reduced(numerator, denominator))
    }

    fn reduced(numerator: BigUint, denominator: BigUint) -> Self {
        let gcd = numerator.gcd(&denominator);
        PriceRatio {
            numerator: numerator / &gcd,
            denominator: denominator / gcd,
        }
    }

    pub fn integer(value: u128) -> Result<Self, ParamError> {
        Self::new(BigUint::from(value), BigUint::one())
    }

    /// Exact parse of a decimal literal such as `"1000"` or `"0.000325"`.
    pub fn from_decimal_str(s: &str) -> Result<Self, ParamError> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ParamError::UndefinedInput("price is not a decimal number"))?;
        if value.is_sign_negative() {
            return Err(ParamError::UndefinedInput("price ratio must be positive and finite"));
        }
        let mantissa = value.mantissa().unsigned_abs();
        Self::new(BigUint::from(mantissa), BigUint::from(10u8).pow(value.scale()))
    }

    /// Converts a human price (whole token1 per whole token0) into base units.
    pub fn scaled_for_decimals(self, decimals0: u8, decimals1: u8) -> Self {
        let ten = BigUint::from(10u8);
        let numerator = self.numerator * ten.pow(decimals1 as u32);
        let denominator = self.denominator * ten.pow(decimals0 as u32);
        Self::reduced(numerator, denominator)
    }

    /// Same price quoted the other way round.
    pub fn inverted(self) -> Self {
        PriceRatio {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }
}

impl fmt::Display for PriceRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// `floor(sqrt(ratio) * 2^96)`, computed as `isqrt(num * 2^192 / den)`.
pub fn encode_sqrt_price_x96(ratio: &PriceRatio) -> Result<U256, ParamError> {
    let scaled: BigUint = (&ratio.numerator << 192u32) / &ratio.denominator;
    let root = scaled.sqrt();

    let max = BigUint::parse_bytes(MAX_SQRT_RATIO.as_bytes(), 10)
        .ok_or(ParamError::UndefinedInput("max sqrt ratio constant"))?;
    if root < BigUint::from(MIN_SQRT_RATIO) || root >= max {
        return Err(ParamError::PriceOutOfRange(
            biguint_to_u256(&root).unwrap_or(U256::MAX),
        ));
    }
    biguint_to_u256(&root).ok_or(ParamError::ArithmeticOverflow("sqrt price"))
}

/// Human price (whole token1 per whole token0) from a pool's sqrtPriceX96.
/// Lossy; for logging only.
pub fn price_from_sqrt_price_x96(sqrt_price_x96: U256, decimals0: u8, decimals1: u8) -> f64 {
    let sqrt = u256_to_biguint(sqrt_price_x96).to_f64().unwrap_or(0.0) / 2f64.powi(96);
    sqrt * sqrt * 10f64.powi(decimals0 as i32 - decimals1 as i32)
}
