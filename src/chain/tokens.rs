use ethers::prelude::*;
use std::sync::Arc;

use super::contracts::TestToken;
use super::tx::send_and_confirm;
use crate::error::ChainError;

/// Symbol and decimals, read once per run for logging and unit scaling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    /// Base units to a human string, e.g. `10000000` at 6 decimals -> `"10.000000"`.
    pub fn format(&self, amount: U256) -> String {
        ethers::utils::format_units(amount, self.decimals as u32)
            .unwrap_or_else(|_| amount.to_string())
    }
}

pub async fn token_info<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
) -> Result<TokenInfo, ChainError> {
    let contract = TestToken::new(token, client);
    let decimals = contract.decimals().call().await?;
    // some test tokens omit symbol(); fall back to the address
    let symbol = match contract.symbol().call().await {
        Ok(symbol) => symbol,
        Err(e) => {
            log::debug!("symbol() unavailable on {:?}: {}", token, e);
            format!("{:?}", token)
        }
    };
    Ok(TokenInfo { address: token, symbol, decimals })
}

pub async fn balance_of<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
    owner: Address,
) -> Result<U256, ChainError> {
    Ok(TestToken::new(token, client).balance_of(owner).call().await?)
}

pub async fn allowance<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
    owner: Address,
    spender: Address,
) -> Result<U256, ChainError> {
    Ok(TestToken::new(token, client).allowance(owner, spender).call().await?)
}

pub async fn approve<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TransactionReceipt, ChainError> {
    let contract = TestToken::new(token, client);
    send_and_confirm(contract.approve(spender, amount), "approve").await
}

/// Mints from a test token that exposes an open `mint(address,uint256)`.
pub async fn mint<M: Middleware + 'static>(
    client: Arc<M>,
    token: Address,
    to: Address,
    amount: U256,
) -> Result<TransactionReceipt, ChainError> {
    let contract = TestToken::new(token, client);
    send_and_confirm(contract.mint(to, amount), "mint").await
}
