use std::env;
use std::str::FromStr;

use ethers::types::U256;

use crate::error::ConfigError;
use crate::math::deadline::DEFAULT_DEADLINE_WINDOW_SECS;
use crate::math::tick_range::RangeAnchor;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub private_key: String,
    pub chain_id: Option<u64>,

    // Token addresses
    pub token_a_address: Option<String>,
    pub token_b_address: Option<String>,

    // Protocol addresses
    pub factory_address: Option<String>,
    pub position_manager_address: Option<String>,
    pub swap_router_address: Option<String>,
    pub pool_address: Option<String>,

    pub fee_tier: u32,

    // Amounts, in whole tokens ("max" allowed for approvals)
    pub mint_amount: String,
    pub approve_amount: String,
    pub liquidity_amount_a: String,
    pub liquidity_amount_b: String,
    pub swap_amount_in: String,
    pub swap_amount_out_min: Option<String>,

    /// Whole token B per whole token A, used only when creating a pool.
    pub initial_price: Option<String>,

    // Range selection
    pub range_width: u32,
    pub range_anchor: RangeAnchor,
    pub tick_lower: Option<i32>,
    pub tick_upper: Option<i32>,
    pub scan_width: u32,
    pub scan_concurrency: usize,

    // Execution
    pub slippage_bps: u32,
    pub requote_slippage_bps: u32,
    pub deadline_window_secs: u64,
    pub gas_limit: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load configuration files (secrets first, then public config)
        dotenv::from_filename("secrets.env").ok();
        dotenv::from_filename("addresses.env").ok();
        dotenv::from_filename("config/addresses.env").ok();
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let tick_lower = parse_opt(&get, "TICK_LOWER")?;
        let tick_upper = parse_opt(&get, "TICK_UPPER")?;
        if tick_lower.is_some() != tick_upper.is_some() {
            return Err(ConfigError::Missing(if tick_lower.is_some() {
                "TICK_UPPER"
            } else {
                "TICK_LOWER"
            }));
        }

        Ok(Config {
            rpc_url: required("RPC_URL")?,
            private_key: required("PRIVATE_KEY")?,
            chain_id: parse_opt(&get, "CHAIN_ID")?,

            token_a_address: get("TOKEN_A_ADDRESS"),
            token_b_address: get("TOKEN_B_ADDRESS"),

            factory_address: get("FACTORY_ADDRESS"),
            position_manager_address: get("POSITION_MANAGER_ADDRESS"),
            swap_router_address: get("SWAP_ROUTER_ADDRESS"),
            pool_address: get("POOL_ADDRESS"),

            fee_tier: parse_or(&get, "FEE_TIER", 500)?,

            mint_amount: text("MINT_AMOUNT", "10000"),
            approve_amount: text("APPROVE_AMOUNT", "max"),
            liquidity_amount_a: text("LIQUIDITY_AMOUNT_A", "10"),
            liquidity_amount_b: text("LIQUIDITY_AMOUNT_B", "10"),
            swap_amount_in: text("SWAP_AMOUNT_IN", "10"),
            swap_amount_out_min: get("SWAP_AMOUNT_OUT_MIN"),

            initial_price: get("INITIAL_PRICE"),

            range_width: parse_or(&get, "RANGE_WIDTH", 10)?,
            range_anchor: parse_or(&get, "RANGE_ANCHOR", RangeAnchor::Centered)?,
            tick_lower,
            tick_upper,
            scan_width: parse_or(&get, "SCAN_WIDTH", 20)?,
            scan_concurrency: parse_or(&get, "SCAN_CONCURRENCY", 8)?,

            slippage_bps: parse_or(&get, "SLIPPAGE_BPS", 100)?,
            requote_slippage_bps: parse_or(&get, "REQUOTE_SLIPPAGE_BPS", 500)?,
            deadline_window_secs: parse_or(&get, "DEADLINE_WINDOW_SECS", DEFAULT_DEADLINE_WINDOW_SECS)?,
            gas_limit: parse_or(&get, "GAS_LIMIT", 3_000_000)?,
        })
    }
}

fn parse_opt<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value: raw.clone() })
        })
        .transpose()
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    Ok(parse_opt(get, key)?.unwrap_or(default))
}

/// Whole-token amount to base units; `"max"` means `type(uint256).max`.
pub fn parse_amount(key: &'static str, raw: &str, decimals: u8) -> Result<U256, ConfigError> {
    if raw.trim().eq_ignore_ascii_case("max") {
        return Ok(U256::MAX);
    }
    ethers::utils::parse_units(raw.trim(), decimals as u32)
        .map(Into::into)
        .map_err(|_| ConfigError::Invalid { key, value: raw.to_string() })
}
