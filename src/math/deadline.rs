use crate::error::ParamError;

/// Ten minutes, the window every script used.
pub const DEFAULT_DEADLINE_WINDOW_SECS: u64 = 600;

/// Absolute expiry `now + window`.
pub fn deadline(now_unix_secs: u64, window_secs: u64) -> Result<u64, ParamError> {
    now_unix_secs
        .checked_add(window_secs)
        .ok_or(ParamError::ArithmeticOverflow("deadline"))
}

pub fn unix_now() -> u64 {
    // pre-epoch clocks are treated as the epoch
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}

pub fn deadline_from_now(window_secs: u64) -> Result<u64, ParamError> {
    deadline(unix_now(), window_secs)
}
