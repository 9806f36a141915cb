//! Restaking deposit actions
//!
//! Exposes ETH deposits into Renzo, EtherFi and KelpDAO as named,
//! schema-described actions an agent can discover and invoke:
//! - Decimal amounts are normalized to atomic units exactly
//! - Each protocol is configuration over one shared invocation flow
//! - Every invocation answers with a single human-readable string
//!
//! # Security Model
//!
//! - Actions never touch key material; they hand a described contract call
//!   to a [`wallet::WalletClient`]
//! - The bundled alloy client keeps the private key inside
//!   [`wallet::SecureWallet`]
//! - Optional JSONL audit trail of every invocation

pub mod action;
pub mod amount;
pub mod audit;
pub mod config;
pub mod executor;
pub mod protocols;
pub mod registry;
pub mod stats;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use action::{ActionDescriptor, DepositRequest, InputSchema};
pub use config::{Config, Network, RpcConfig, PRIVATE_KEY_ENV};
pub use error::{DepositError, Error, Result};
pub use executor::Outcome;
pub use registry::ActionRegistry;
