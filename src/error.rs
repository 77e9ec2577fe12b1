use ethers::contract::ContractError;
use ethers::providers::{Middleware, ProviderError};
use ethers::types::U256;
use thiserror::Error;

/// Precondition failures raised while building parameters. None of these
/// ever reach the chain.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("invalid tick range [{lower}, {upper}] for spacing {spacing}: {reason}")]
    InvalidRange {
        lower: i32,
        upper: i32,
        spacing: i32,
        reason: &'static str,
    },
    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),
    #[error("undefined input: {0}")]
    UndefinedInput(&'static str),
    #[error("slippage tolerance {0} bps exceeds 10000")]
    InvalidTolerance(u32),
    #[error("invalid pool key: {0}")]
    InvalidPoolKey(String),
    #[error("sqrt price {0} outside the pool's representable range")]
    PriceOutOfRange(U256),
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("contract call failed: {0}")]
    Contract(String),
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("transaction {0:?} dropped from mempool before confirmation")]
    TransactionDropped(ethers::types::TxHash),
    #[error("transaction {0:?} reverted")]
    Reverted(ethers::types::TxHash),
    #[error("no pool for {token0:?}/{token1:?} at fee tier {fee}")]
    PoolNotFound {
        token0: ethers::types::Address,
        token1: ethers::types::Address,
        fee: u32,
    },
}

impl<M: Middleware> From<ContractError<M>> for ChainError {
    fn from(err: ContractError<M>) -> Self {
        ChainError::Contract(err.to_string())
    }
}

/// Failures of the scripted procedures in `engine::ops`.
#[derive(Debug, Error)]
pub enum OpsError {
    #[error(transparent)]
    Param(#[from] ParamError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("pool does not exist and no initial price was configured")]
    MissingInitialPrice,
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: U256, need: U256 },
    #[error("pool {0:?} has no active liquidity")]
    NoLiquidity(ethers::types::Address),
    #[error("swap simulation failed: {0}")]
    QuoteFailed(String),
    #[error("pool {pool:?} trades {token0:?}/{token1:?} at fee tier {fee}, not the requested pair")]
    PoolMismatch {
        pool: ethers::types::Address,
        token0: ethers::types::Address,
        token1: ethers::types::Address,
        fee: u32,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}
