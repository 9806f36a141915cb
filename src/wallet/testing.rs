//! In-memory wallet double for tests

use super::{ContractCall, PendingInvocation, TransactionReceipt, WalletClient, WalletError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    Confirm { hash: String, link: String },
    RejectDispatch(String),
    FailConfirmation(String),
}

/// Records every call it receives and answers with a fixed behavior
#[derive(Clone)]
pub(crate) struct RecordingWallet {
    behavior: Behavior,
    calls: Arc<Mutex<Vec<ContractCall>>>,
}

impl RecordingWallet {
    pub(crate) fn confirming(hash: &str, link: &str) -> Self {
        Self::with_behavior(Behavior::Confirm {
            hash: hash.to_string(),
            link: link.to_string(),
        })
    }

    pub(crate) fn rejecting(message: &str) -> Self {
        Self::with_behavior(Behavior::RejectDispatch(message.to_string()))
    }

    pub(crate) fn failing_confirmation(message: &str) -> Self {
        Self::with_behavior(Behavior::FailConfirmation(message.to_string()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }
}

struct Pending(Result<TransactionReceipt, String>);

#[async_trait]
impl PendingInvocation for Pending {
    async fn wait(self: Box<Self>) -> Result<TransactionReceipt, WalletError> {
        self.0.map_err(WalletError::Transport)
    }
}

#[async_trait]
impl WalletClient for RecordingWallet {
    async fn invoke_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Box<dyn PendingInvocation>, WalletError> {
        self.calls.lock().unwrap().push(call.clone());

        match &self.behavior {
            Behavior::Confirm { hash, link } => Ok(Box::new(Pending(Ok(TransactionReceipt {
                transaction_hash: hash.clone(),
                transaction_link: link.clone(),
            })))),
            Behavior::RejectDispatch(message) => Err(WalletError::Rejected(message.clone())),
            Behavior::FailConfirmation(message) => Ok(Box::new(Pending(Err(message.clone())))),
        }
    }
}
