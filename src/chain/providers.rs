use ethers::prelude::*;
use std::sync::Arc;

use crate::error::ConfigError;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub fn create_provider(rpc_url: &str) -> Result<Provider<Http>, ConfigError> {
    Provider::<Http>::try_from(rpc_url).map_err(|_| ConfigError::Invalid {
        key: "RPC_URL",
        value: rpc_url.to_string(),
    })
}

/// Wallet from a hex private key, bound to `chain_id` for EIP-155 signing.
pub fn create_wallet(private_key: &str, chain_id: u64) -> Result<LocalWallet, ConfigError> {
    let wallet: LocalWallet = private_key
        .trim()
        .trim_start_matches("0x")
        .parse()
        .map_err(|_| ConfigError::Invalid {
            key: "PRIVATE_KEY",
            // never echo the key itself
            value: "<redacted>".to_string(),
        })?;
    Ok(wallet.with_chain_id(chain_id))
}

pub fn create_signer_client(provider: Provider<Http>, wallet: LocalWallet) -> Arc<SignerClient> {
    Arc::new(SignerMiddleware::new(provider, wallet))
}
