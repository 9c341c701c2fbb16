//! Outbound notification collaborator seam.
//!
//! Delivery itself (websockets, push, email) lives outside this system.
//! The engine only emits events through the [`Notifier`] trait after a
//! successful state transition. Calls are fire-and-forget: a failing
//! notifier must never affect the outcome of the operation that
//! triggered it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use incentiva_shared::types::UserId;

/// Kinds of events the engine notifies about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A deal was approved and accruals were recorded.
    DealApproved,
    /// A deal was rejected.
    DealRejected,
    /// Points were redeemed against the user's balance.
    PointsRedeemed,
}

impl NotificationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DealApproved => "deal_approved",
            Self::DealRejected => "deal_rejected",
            Self::PointsRedeemed => "points_redeemed",
        }
    }
}

/// Collaborator that delivers notifications to users.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Delivers one notification. Implementations must not panic; errors
    /// are theirs to log and swallow.
    fn notify(&self, user_id: UserId, kind: NotificationKind, payload: Value);
}

/// Default notifier that logs events through `tracing`.
///
/// Used in development and wherever no delivery backend is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, user_id: UserId, kind: NotificationKind, payload: Value) {
        tracing::info!(
            user_id = %user_id,
            kind = kind.as_str(),
            %payload,
            "notification emitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(NotificationKind::DealApproved.as_str(), "deal_approved");
        assert_eq!(NotificationKind::DealRejected.as_str(), "deal_rejected");
        assert_eq!(NotificationKind::PointsRedeemed.as_str(), "points_redeemed");
    }

    #[test]
    fn test_mock_notifier_receives_event() {
        let mut mock = MockNotifier::new();
        mock.expect_notify()
            .withf(|_, kind, _| *kind == NotificationKind::DealApproved)
            .times(1)
            .return_const(());

        mock.notify(
            UserId::new(),
            NotificationKind::DealApproved,
            json!({ "points": 50 }),
        );
    }

    #[test]
    fn test_log_notifier_does_not_panic() {
        LogNotifier.notify(UserId::new(), NotificationKind::PointsRedeemed, json!({}));
    }
}
