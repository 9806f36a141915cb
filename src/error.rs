//! Error types for the deposit actions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Action already registered: {0}")]
    DuplicateAction(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single deposit invocation failed.
///
/// Kept structured inside the crate; `ActionDescriptor::invoke` is the only
/// place it is flattened into the agent-facing string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepositError {
    /// Input did not match the action's field list.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Amount was unparsable, zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount is positive but larger than can be represented exactly.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    /// The wallet client rejected building or submitting the call.
    #[error("{0}")]
    DispatchFailure(String),

    /// The call was submitted but never confirmed successfully.
    #[error("{0}")]
    ConfirmationFailure(String),
}

impl DepositError {
    /// Stable tag for logs and the audit trail.
    pub fn kind(&self) -> &'static str {
        match self {
            DepositError::InvalidInput(_) => "invalid_input",
            DepositError::InvalidAmount(_) => "invalid_amount",
            DepositError::AmountOutOfRange(_) => "amount_out_of_range",
            DepositError::DispatchFailure(_) => "dispatch_failure",
            DepositError::ConfirmationFailure(_) => "confirmation_failure",
        }
    }
}
