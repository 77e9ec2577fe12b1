// Tick range selection for new liquidity positions.
// -------------------------------------------------
// The position manager reverts unless both bounds sit on the pool's tick-spacing
// grid and lower < upper, so everything here is checked before a mint is built.
// All intermediate arithmetic runs in i64 so nothing wraps.

use crate::error::ParamError;
use crate::models::TickRange;

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

/// Where the range sits relative to the spacing-aligned current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeAnchor {
    /// `[base - w, base + w]`
    #[default]
    Centered,
    /// `[base, base + w]`
    FromBase,
}

impl std::str::FromStr for RangeAnchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "centered" | "center" => Ok(RangeAnchor::Centered),
            "base" | "from_base" | "above" => Ok(RangeAnchor::FromBase),
            other => Err(format!("unknown range anchor {}", other)),
        }
    }
}

fn require_spacing(tick_spacing: i32) -> Result<i64, ParamError> {
    if tick_spacing <= 0 {
        return Err(ParamError::UndefinedInput("tick spacing must be positive"));
    }
    if tick_spacing > MAX_TICK {
        return Err(ParamError::UndefinedInput("tick spacing exceeds the tick domain"));
    }
    Ok(tick_spacing as i64)
}

/// Smallest and largest ticks on the spacing grid inside [MIN_TICK, MAX_TICK].
pub fn usable_tick_bounds(tick_spacing: i32) -> Result<(i32, i32), ParamError> {
    let spacing = require_spacing(tick_spacing)?;
    let max = (MAX_TICK as i64 / spacing) * spacing;
    Ok((-max as i32, max as i32))
}

/// `floor(tick / spacing) * spacing`, rounding toward negative infinity.
pub fn align_tick(tick: i32, tick_spacing: i32) -> Result<i32, ParamError> {
    let spacing = require_spacing(tick_spacing)?;
    let aligned = (tick as i64).div_euclid(spacing) * spacing;
    i32::try_from(aligned).map_err(|_| ParamError::ArithmeticOverflow("aligned tick"))
}

/// Range of `width` spacings anchored on the aligned current tick.
///
/// A width of zero is widened to one spacing so the range is never empty.
/// Bounds are clamped to the usable ticks; the base is kept at least one
/// spacing below the top so the upper bound always clears it.
pub fn compute_range(
    current_tick: i32,
    tick_spacing: i32,
    width_in_spacings: u32,
    anchor: RangeAnchor,
) -> Result<TickRange, ParamError> {
    let spacing = require_spacing(tick_spacing)?;
    let (min_usable, max_usable) = usable_tick_bounds(tick_spacing)?;
    let (min_usable, max_usable) = (min_usable as i64, max_usable as i64);

    let base = (current_tick as i64).div_euclid(spacing) * spacing;
    let base = base.clamp(min_usable, max_usable - spacing);

    let offset = (width_in_spacings.max(1) as i64)
        .checked_mul(spacing)
        .ok_or(ParamError::ArithmeticOverflow("range width"))?;

    let lower = match anchor {
        RangeAnchor::Centered => base - offset,
        RangeAnchor::FromBase => base,
    };
    let upper = base + offset;

    let range = TickRange {
        tick_lower: i32::try_from(lower.max(min_usable))
            .map_err(|_| ParamError::ArithmeticOverflow("tick lower"))?,
        tick_upper: i32::try_from(upper.min(max_usable))
            .map_err(|_| ParamError::ArithmeticOverflow("tick upper"))?,
    };
    validate_range(&range, tick_spacing)?;
    Ok(range)
}

/// Checks a range (computed or user supplied) against the pool's grid.
pub fn validate_range(range: &TickRange, tick_spacing: i32) -> Result<(), ParamError> {
    require_spacing(tick_spacing)?;
    let invalid = |reason| ParamError::InvalidRange {
        lower: range.tick_lower,
        upper: range.tick_upper,
        spacing: tick_spacing,
        reason,
    };

    if range.tick_lower >= range.tick_upper {
        return Err(invalid("lower must be below upper"));
    }
    if range.tick_lower % tick_spacing != 0 || range.tick_upper % tick_spacing != 0 {
        return Err(invalid("bounds must be multiples of the tick spacing"));
    }
    if range.tick_lower < MIN_TICK || range.tick_upper > MAX_TICK {
        return Err(invalid("bounds outside the tick domain"));
    }
    Ok(())
}

/// Every spacing-aligned tick from lower to upper, inclusive.
pub fn ticks_in_range(range: &TickRange, tick_spacing: i32) -> Result<Vec<i32>, ParamError> {
    validate_range(range, tick_spacing)?;
    Ok((range.tick_lower..=range.tick_upper)
        .step_by(tick_spacing as usize)
        .collect())
}
