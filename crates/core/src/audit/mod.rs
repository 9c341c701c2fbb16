//! Audit trail collaborator seam.
//!
//! Destructive operations emit a record carrying the pre-deletion entity
//! snapshot. The sink is write-only and fire-and-forget: a failing sink
//! must never affect the operation that emitted the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use incentiva_shared::types::UserId;

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The user who performed the action, when known.
    pub actor_id: Option<UserId>,
    /// What happened, e.g. `"deal.deleted"`.
    pub action: String,
    /// The entity type the action applied to.
    pub entity_type: String,
    /// The entity's identity.
    pub entity_id: Uuid,
    /// Entity state captured before the destructive action.
    pub snapshot: Value,
}

/// Collaborator that persists audit records.
#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
    /// Records one audit event. Implementations must not panic; errors
    /// are theirs to log and swallow.
    fn record(&self, event: AuditEvent);
}

/// Default sink that logs audit events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAuditSink;

impl AuditSink for LogAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            actor_id = ?event.actor_id,
            action = %event.action,
            entity_type = %event.entity_type,
            entity_id = %event.entity_id,
            snapshot = %event.snapshot,
            "audit record emitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_sink_receives_snapshot() {
        let mut mock = MockAuditSink::new();
        mock.expect_record()
            .withf(|event| event.action == "deal.deleted" && event.snapshot["value"] == "50000")
            .times(1)
            .return_const(());

        mock.record(AuditEvent {
            actor_id: Some(UserId::new()),
            action: "deal.deleted".to_string(),
            entity_type: "deal".to_string(),
            entity_id: Uuid::new_v4(),
            snapshot: json!({ "value": "50000" }),
        });
    }

    #[test]
    fn test_log_sink_does_not_panic() {
        LogAuditSink.record(AuditEvent {
            actor_id: None,
            action: "deal.deleted".to_string(),
            entity_type: "deal".to_string(),
            entity_id: Uuid::nil(),
            snapshot: json!({}),
        });
    }
}
