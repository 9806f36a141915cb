//! Wallet boundary
//!
//! Deposit actions never sign or submit anything themselves. They hand a
//! fully described [`ContractCall`] to a [`WalletClient`] and wait on the
//! returned [`PendingInvocation`] for confirmation.

mod alloy_client;
mod signer;
#[cfg(test)]
pub(crate) mod testing;

pub use alloy_client::AlloyWalletClient;
pub use signer::SecureWallet;

use crate::config::Network;
use alloy::primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Named contract arguments, values in their string form
pub type CallArgs = BTreeMap<String, String>;

/// Identifier of the native asset attached to deposit calls
pub const NATIVE_ASSET_ID: &str = "eth";

/// A contract call ready for a wallet client to encode, sign, and submit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractCall {
    /// Network the contract is deployed on
    pub network: Network,
    pub contract_address: Address,
    pub method: &'static str,
    /// JSON ABI containing `method`
    pub abi: Value,
    pub args: CallArgs,
    /// Native asset value attached, in whole units of `asset_id`
    pub amount: Decimal,
    pub asset_id: &'static str,
}

/// What a wallet reports once a transaction is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub transaction_link: String,
}

/// Errors surfaced by a wallet client
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("{0}")]
    InvalidCall(String),

    #[error("wrong network: {0}")]
    WrongNetwork(String),

    #[error("{0}")]
    Rejected(String),

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("{0}")]
    Transport(String),
}

/// A submitted transaction that has not been confirmed yet
#[async_trait]
pub trait PendingInvocation: Send {
    /// Block until the transaction is mined, with whatever timeout policy
    /// the wallet client has.
    async fn wait(self: Box<Self>) -> Result<TransactionReceipt, WalletError>;
}

/// Signs and submits contract calls
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn invoke_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Box<dyn PendingInvocation>, WalletError>;
}
