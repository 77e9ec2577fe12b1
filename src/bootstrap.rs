use std::str::FromStr;
use std::sync::Arc;

use ethers::prelude::*;

use crate::chain::providers::{self, SignerClient};
use crate::config::Config;
use crate::error::ConfigError;

/// Signer client plus every address the scripts may need, parsed once.
pub struct AppState {
    pub client: Arc<SignerClient>,
    pub chain_id: u64,
    pub wallet_address: Address,

    // Token addresses
    pub token_a: Option<Address>,
    pub token_b: Option<Address>,

    // Protocol addresses
    pub factory: Option<Address>,
    pub position_manager: Option<Address>,
    pub swap_router: Option<Address>,
    pub pool: Option<Address>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = providers::create_provider(&config.rpc_url)?;
        let chain_id = match config.chain_id {
            Some(id) => id,
            None => provider.get_chainid().await?.as_u64(),
        };
        let wallet = providers::create_wallet(&config.private_key, chain_id)?;
        let wallet_address = wallet.address();
        let client = providers::create_signer_client(provider, wallet);

        log::info!("Connected to chain {} as {:?}", chain_id, wallet_address);

        Ok(AppState {
            client,
            chain_id,
            wallet_address,

            token_a: parse_address("TOKEN_A_ADDRESS", &config.token_a_address)?,
            token_b: parse_address("TOKEN_B_ADDRESS", &config.token_b_address)?,

            factory: parse_address("FACTORY_ADDRESS", &config.factory_address)?,
            position_manager: parse_address(
                "POSITION_MANAGER_ADDRESS",
                &config.position_manager_address,
            )?,
            swap_router: parse_address("SWAP_ROUTER_ADDRESS", &config.swap_router_address)?,
            pool: parse_address("POOL_ADDRESS", &config.pool_address)?,
        })
    }
}

pub fn parse_address(key: &'static str, value: &Option<String>) -> Result<Option<Address>, ConfigError> {
    value
        .as_ref()
        .map(|addr| {
            Address::from_str(addr.trim())
                .map_err(|_| ConfigError::Invalid { key, value: addr.clone() })
        })
        .transpose()
}

/// Unwraps an optional address a particular script cannot run without.
pub fn require(key: &'static str, value: Option<Address>) -> Result<Address, ConfigError> {
    value.ok_or(ConfigError::Missing(key))
}

/// `RUST_LOG` wins when set; otherwise info-level output.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
