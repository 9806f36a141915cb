//! Deposit protocol definitions
//!
//! Each protocol is pure configuration: where its deposit contract lives,
//! which method and ABI to call, how the minimum output and deadline are
//! derived, and a builder mapping normalized amounts to named arguments.
//! The shared control flow lives in [`crate::executor`].

mod etherfi;
mod kelpdao;
mod renzo;

pub use etherfi::ETHERFI;
pub use kelpdao::KELPDAO;
pub use renzo::RENZO;

use crate::amount::{MinOutPolicy, NormalizedDeposit};
use crate::config::Network;
use crate::wallet::{CallArgs, ContractCall, NATIVE_ASSET_ID};
use alloy::primitives::Address;
use serde_json::Value;
use std::time::Duration;

/// Static description of one protocol's ETH deposit
pub struct Protocol {
    /// Unique action slug exposed to agents
    pub action_name: &'static str,
    /// Name used in result messages
    pub display_name: &'static str,
    /// Usage prompt shown to the calling agent
    pub description: &'static str,
    /// The single network whose deployment is wired into calls
    pub network: Network,
    pub contract: Address,
    pub method: &'static str,
    pub abi: fn() -> Value,
    pub min_out: MinOutPolicy,
    pub deadline_window: Option<Duration>,
    pub build_args: fn(&NormalizedDeposit) -> CallArgs,
}

impl Protocol {
    /// Assemble the contract call for a normalized deposit
    pub fn contract_call(&self, deposit: &NormalizedDeposit) -> ContractCall {
        ContractCall {
            network: self.network,
            contract_address: self.contract,
            method: self.method,
            abi: (self.abi)(),
            args: (self.build_args)(deposit),
            amount: deposit.amount,
            asset_id: NATIVE_ASSET_ID,
        }
    }
}

impl std::fmt::Debug for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Protocol")
            .field("action_name", &self.action_name)
            .field("network", &self.network)
            .field("contract", &self.contract)
            .field("method", &self.method)
            .field("min_out", &self.min_out)
            .field("deadline_window", &self.deadline_window)
            .finish_non_exhaustive()
    }
}

/// Every protocol with a deposit action
pub fn all() -> [&'static Protocol; 3] {
    [&RENZO, &ETHERFI, &KELPDAO]
}

/// Insert `value` under `name` when the protocol's policy produced one.
/// A missing value surfaces later as a missing-argument encoding error.
fn insert_opt<T: ToString>(args: &mut CallArgs, name: &str, value: Option<T>) {
    if let Some(value) = value {
        args.insert(name.to_string(), value.to_string());
    }
}
