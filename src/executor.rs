//! Deposit invocation
//!
//! One control flow shared by every protocol:
//! normalize → build call → dispatch → await confirmation.
//! Each step runs once; there are no retries. Failures are kept as
//! [`DepositError`] and only turned into text by [`Outcome::render`].

use crate::action::DepositRequest;
use crate::amount;
use crate::error::DepositError;
use crate::protocols::Protocol;
use crate::wallet::{ContractCall, TransactionReceipt, WalletClient};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

/// Terminal state of one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Succeeded {
        /// Amount exactly as the caller supplied it
        amount: String,
        receipt: TransactionReceipt,
    },
    Failed(DepositError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn error(&self) -> Option<&DepositError> {
        match self {
            Outcome::Succeeded { .. } => None,
            Outcome::Failed(e) => Some(e),
        }
    }

    /// The single string handed back to the calling agent
    pub fn render(&self, display_name: &str) -> String {
        match self {
            Outcome::Succeeded { amount, receipt } => format!(
                "Deposited {} ETH to {} with transaction hash: {} and transaction link: {}",
                amount, display_name, receipt.transaction_hash, receipt.transaction_link
            ),
            Outcome::Failed(DepositError::InvalidAmount(_)) => {
                "Error: Amount must be greater than 0".to_string()
            }
            Outcome::Failed(DepositError::AmountOutOfRange(detail)) => {
                format!("Error: Amount out of range: {}", detail)
            }
            Outcome::Failed(DepositError::InvalidInput(detail)) => {
                format!("Error: Invalid input: {}", detail)
            }
            Outcome::Failed(
                DepositError::DispatchFailure(message) | DepositError::ConfirmationFailure(message),
            ) => format!("Error depositing to {}: {}", display_name, message),
        }
    }
}

/// Normalize the amount and assemble the contract call, without any I/O
pub fn prepare(
    protocol: &Protocol,
    request: &DepositRequest,
    now: DateTime<Utc>,
) -> Result<ContractCall, DepositError> {
    let deposit = amount::normalize(
        &request.amount,
        protocol.min_out,
        protocol.deadline_window,
        now,
    )?;

    debug!(
        atomic = %deposit.atomic,
        min_out = ?deposit.min_out.map(|v| v.to_string()),
        deadline = ?deposit.deadline,
        "Normalized deposit amount"
    );

    Ok(protocol.contract_call(&deposit))
}

/// Run a deposit against `wallet` using the current time for deadlines
pub async fn execute(
    protocol: &Protocol,
    wallet: &dyn WalletClient,
    request: &DepositRequest,
) -> Outcome {
    execute_at(protocol, wallet, request, Utc::now()).await
}

/// Run a deposit with an explicit clock reading
#[tracing::instrument(skip_all, fields(action = protocol.action_name, amount = %request.amount))]
pub async fn execute_at(
    protocol: &Protocol,
    wallet: &dyn WalletClient,
    request: &DepositRequest,
    now: DateTime<Utc>,
) -> Outcome {
    match try_execute(protocol, wallet, request, now).await {
        Ok(receipt) => {
            info!(
                tx_hash = %receipt.transaction_hash,
                "Deposit confirmed"
            );
            Outcome::Succeeded {
                amount: request.amount.clone(),
                receipt,
            }
        }
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "Deposit failed");
            Outcome::Failed(e)
        }
    }
}

async fn try_execute(
    protocol: &Protocol,
    wallet: &dyn WalletClient,
    request: &DepositRequest,
    now: DateTime<Utc>,
) -> Result<TransactionReceipt, DepositError> {
    let call = prepare(protocol, request, now)?;

    info!(
        contract = %call.contract_address,
        network = %call.network,
        method = call.method,
        "Dispatching deposit"
    );
    let pending = wallet
        .invoke_contract(&call)
        .await
        .map_err(|e| DepositError::DispatchFailure(e.to_string()))?;

    debug!("Awaiting confirmation");
    pending
        .wait()
        .await
        .map_err(|e| DepositError::ConfirmationFailure(e.to_string()))
}
