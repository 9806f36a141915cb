//! Audit log
//!
//! Appends one JSONL entry when an action starts and one when it completes.
//! Write failures are logged and never affect the invocation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Entry in the audit log
#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: DateTime<Utc>,
    invocation_id: Uuid,
    entry_type: &'static str,
    action: &'a str,
    input: &'a Value,
    status: &'static str,
    error_kind: Option<&'static str>,
    result: Option<&'a str>,
    duration_ms: u64,
}

/// Completed invocation as reported to [`AuditLog::record_complete`]
pub struct Completion<'a> {
    pub success: bool,
    pub error_kind: Option<&'static str>,
    pub result: &'a str,
    pub duration_ms: u64,
}

struct AuditLogWriter {
    path: PathBuf,
}

impl AuditLogWriter {
    fn write(&self, entry: &AuditEntry<'_>) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Shared JSONL audit trail of action invocations
#[derive(Clone)]
pub struct AuditLog {
    writer: Arc<Mutex<AuditLogWriter>>,
}

impl AuditLog {
    /// # Arguments
    /// * `log_path` - Path to the audit log file (JSONL format)
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            writer: Arc::new(Mutex::new(AuditLogWriter {
                path: log_path.into(),
            })),
        }
    }

    pub async fn record_start(&self, invocation_id: Uuid, action: &str, input: &Value) {
        self.write(AuditEntry {
            timestamp: Utc::now(),
            invocation_id,
            entry_type: "action_start",
            action,
            input,
            status: "pending",
            error_kind: None,
            result: None,
            duration_ms: 0,
        })
        .await;
    }

    pub async fn record_complete(
        &self,
        invocation_id: Uuid,
        action: &str,
        input: &Value,
        completion: Completion<'_>,
    ) {
        self.write(AuditEntry {
            timestamp: Utc::now(),
            invocation_id,
            entry_type: "action_complete",
            action,
            input,
            status: if completion.success { "success" } else { "error" },
            error_kind: completion.error_kind,
            result: Some(completion.result),
            duration_ms: completion.duration_ms,
        })
        .await;
    }

    async fn write(&self, entry: AuditEntry<'_>) {
        let writer = self.writer.lock().await;
        if let Err(e) = writer.write(&entry) {
            tracing::warn!(error = %e, "Failed to write audit log entry");
        }
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_logs_start_and_complete() {
        let temp_file = NamedTempFile::new().unwrap();
        let audit = AuditLog::new(temp_file.path());
        let id = Uuid::new_v4();
        let input = json!({ "amount": "0.01" });

        audit.record_start(id, "renzo_deposit", &input).await;
        audit
            .record_complete(
                id,
                "renzo_deposit",
                &input,
                Completion {
                    success: false,
                    error_kind: Some("dispatch_failure"),
                    result: "Error depositing to Renzo: boom",
                    duration_ms: 12,
                },
            )
            .await;

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["entry_type"], "action_start");
        assert_eq!(lines[1]["entry_type"], "action_complete");
        assert_eq!(lines[1]["status"], "error");
        assert_eq!(lines[1]["error_kind"], "dispatch_failure");
        assert_eq!(lines[0]["invocation_id"], lines[1]["invocation_id"]);
        assert_eq!(lines[1]["input"]["amount"], "0.01");
    }

    #[tokio::test]
    async fn test_unwritable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for append
        let audit = AuditLog::new(dir.path());

        audit
            .record_start(Uuid::new_v4(), "kelpdao_deposit", &json!({}))
            .await;
    }
}
