//! Action registry
//!
//! Collects the descriptors exposed to a calling agent, enforces unique
//! names, and routes invocations by name.

use crate::action::ActionDescriptor;
use crate::audit::{AuditLog, Completion};
use crate::protocols;
use crate::wallet::WalletClient;
use crate::{Error, Result};
use serde_json::{json, Value};
use std::time::Instant;
use uuid::Uuid;

/// Name-unique collection of actions
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<ActionDescriptor>,
    audit: Option<AuditLog>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding one deposit action per supported protocol
    pub fn deposit_actions() -> Self {
        let mut registry = Self::new();
        for protocol in protocols::all() {
            // Protocol slugs are distinct constants
            if let Err(e) = registry.register(ActionDescriptor::deposit(protocol)) {
                tracing::error!(error = %e, "Skipping deposit action");
            }
        }
        registry
    }

    /// Record every invocation to `audit`
    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn register(&mut self, action: ActionDescriptor) -> Result<()> {
        if self.get(action.name()).is_some() {
            return Err(Error::DuplicateAction(action.name().to_string()));
        }
        tracing::debug!(action = action.name(), "Registered action");
        self.actions.push(action);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Tool listing for discovery: name, description and JSON input schema
    pub fn describe(&self) -> Value {
        Value::Array(
            self.actions
                .iter()
                .map(|a| {
                    json!({
                        "name": a.name(),
                        "description": a.description(),
                        "input_schema": a.json_schema(),
                    })
                })
                .collect(),
        )
    }

    /// Invoke an action by name.
    ///
    /// Only an unknown name is an `Err`; every deposit failure is reported
    /// inside the returned string.
    pub async fn invoke(
        &self,
        name: &str,
        wallet: &dyn WalletClient,
        input: &Value,
    ) -> Result<String> {
        let action = self
            .get(name)
            .ok_or_else(|| Error::UnknownAction(name.to_string()))?;

        let invocation_id = Uuid::new_v4();
        if let Some(audit) = &self.audit {
            audit.record_start(invocation_id, name, input).await;
        }

        let started = Instant::now();
        let outcome = action.run(wallet, input).await;
        let rendered = outcome.render(action.protocol().display_name);

        if let Some(audit) = &self.audit {
            audit
                .record_complete(
                    invocation_id,
                    name,
                    input,
                    Completion {
                        success: outcome.is_success(),
                        error_kind: outcome.error().map(|e| e.kind()),
                        result: &rendered,
                        duration_ms: started.elapsed().as_millis() as u64,
                    },
                )
                .await;
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::RENZO;
    use crate::wallet::testing::RecordingWallet;
    use tempfile::NamedTempFile;

    #[test]
    fn test_deposit_actions() {
        let registry = ActionRegistry::deposit_actions();

        assert_eq!(registry.len(), 3);
        for name in ["renzo_deposit", "etherfi_deposit", "kelpdao_deposit"] {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let mut registry = ActionRegistry::new();
        registry.register(ActionDescriptor::deposit(&RENZO)).unwrap();

        let err = registry
            .register(ActionDescriptor::deposit(&RENZO))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAction(name) if name == "renzo_deposit"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_describe() {
        let listing = ActionRegistry::deposit_actions().describe();
        let entries = listing.as_array().unwrap();

        assert_eq!(entries.len(), 3);
        for entry in entries {
            assert!(entry["name"].as_str().unwrap().ends_with("_deposit"));
            assert_eq!(entry["input_schema"]["required"], json!(["amount"]));
            assert_eq!(entry["input_schema"]["properties"]["amount"]["type"], "string");
        }
    }

    #[test]
    fn test_unknown_action() {
        let registry = ActionRegistry::deposit_actions();
        let wallet = RecordingWallet::confirming("0x1", "link");

        let result = tokio_test::block_on(registry.invoke(
            "lido_deposit",
            &wallet,
            &json!({ "amount": "1" }),
        ));

        assert!(matches!(result, Err(Error::UnknownAction(_))));
    }

    #[tokio::test]
    async fn test_invoke_writes_audit_trail() {
        let temp_file = NamedTempFile::new().unwrap();
        let registry =
            ActionRegistry::deposit_actions().with_audit_log(AuditLog::new(temp_file.path()));
        let wallet = RecordingWallet::confirming("0xbeef", "https://arbiscan.io/tx/0xbeef");

        let result = registry
            .invoke("kelpdao_deposit", &wallet, &json!({ "amount": "0.1" }))
            .await
            .unwrap();

        assert_eq!(
            result,
            "Deposited 0.1 ETH to Kelpdao with transaction hash: 0xbeef and transaction link: https://arbiscan.io/tx/0xbeef"
        );

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["status"], "success");
        assert_eq!(lines[1]["action"], "kelpdao_deposit");
        assert!(lines[1]["error_kind"].is_null());
    }

    #[tokio::test]
    async fn test_audit_records_error_kind() {
        let temp_file = NamedTempFile::new().unwrap();
        let registry =
            ActionRegistry::deposit_actions().with_audit_log(AuditLog::new(temp_file.path()));
        let wallet = RecordingWallet::confirming("0x1", "link");

        let result = registry
            .invoke("renzo_deposit", &wallet, &json!({ "amount": "-5" }))
            .await
            .unwrap();

        assert_eq!(result, "Error: Amount must be greater than 0");
        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("\"error_kind\":\"invalid_amount\""));
    }
}
