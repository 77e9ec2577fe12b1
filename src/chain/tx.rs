use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::prelude::*;

use crate::error::ChainError;

/// Submits the call and waits for its receipt. A mined-but-reverted
/// transaction is an error.
pub async fn send_and_confirm<M, D>(
    call: ContractCall<M, D>,
    label: &str,
) -> Result<TransactionReceipt, ChainError>
where
    M: Middleware + 'static,
    D: Detokenize,
{
    let pending = call.send().await?;
    let tx_hash = pending.tx_hash();
    log::info!("{} submitted: {:?}", label, tx_hash);

    let receipt = pending
        .await?
        .ok_or(ChainError::TransactionDropped(tx_hash))?;
    check_status(&receipt)?;

    log::info!(
        "{} confirmed in block {:?} (gas used: {:?})",
        label,
        receipt.block_number,
        receipt.gas_used
    );
    Ok(receipt)
}

pub fn check_status(receipt: &TransactionReceipt) -> Result<(), ChainError> {
    if receipt.status == Some(U64::zero()) {
        return Err(ChainError::Reverted(receipt.transaction_hash));
    }
    Ok(())
}
