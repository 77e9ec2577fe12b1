use ethers::types::{U256, U512};

use crate::error::ParamError;

pub const BPS_DENOMINATOR: u32 = 10_000;

pub fn check_tolerance(tolerance_bps: u32) -> Result<(), ParamError> {
    if tolerance_bps > BPS_DENOMINATOR {
        return Err(ParamError::InvalidTolerance(tolerance_bps));
    }
    Ok(())
}

/// `desired * (10000 - tolerance_bps) / 10000`, truncated.
///
/// The product is taken at 512 bits; the quotient never exceeds `desired`
/// so it always fits back into 256.
pub fn min_amount(desired: U256, tolerance_bps: u32) -> Result<U256, ParamError> {
    check_tolerance(tolerance_bps)?;
    if tolerance_bps == 0 {
        return Ok(desired);
    }

    let keep = U256::from(BPS_DENOMINATOR - tolerance_bps);
    let scaled = desired.full_mul(keep) / U512::from(BPS_DENOMINATOR);
    U256::try_from(scaled).map_err(|_| ParamError::ArithmeticOverflow("slippage minimum"))
}

/// Minimum output for a swap once a quote is known.
///
/// A configured minimum the quote cannot meet would make the swap revert, so
/// it is replaced by the quote less `requote_tolerance_bps`. Without a
/// configured minimum the quote-derived one is used directly.
pub fn resolve_min_output(
    configured: Option<U256>,
    quoted: U256,
    requote_tolerance_bps: u32,
) -> Result<U256, ParamError> {
    match configured {
        Some(min) if quoted >= min => Ok(min),
        _ => min_amount(quoted, requote_tolerance_bps),
    }
}
