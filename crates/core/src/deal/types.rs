//! Deal domain types for lifecycle management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use incentiva_shared::types::UserId;

/// Deal status in the approval lifecycle.
///
/// Deals are created in `Pending` and transition exactly once under normal
/// flow:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
///
/// Re-running approval on an already-approved deal is tolerated so that
/// recalculation and retried requests cannot double-count; the caller
/// retracts existing ledger entries before re-recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Deal has been logged and awaits an approval decision.
    Pending,
    /// Deal has been approved and its accruals recorded.
    Approved,
    /// Deal has been rejected; no accruals.
    Rejected,
}

impl DealStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the status is a terminal decision.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle action representing a validated transition with audit data.
#[derive(Debug, Clone)]
pub enum DealAction {
    /// Approve a deal and record its accruals.
    Approve {
        /// The new status after approval.
        new_status: DealStatus,
        /// The user who approved the deal.
        approved_by: UserId,
        /// When the deal was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject a deal; no accruals are recorded.
    Reject {
        /// The new status after rejection.
        new_status: DealStatus,
    },
}

impl DealAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> DealStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(DealStatus::Pending.as_str(), "pending");
        assert_eq!(DealStatus::Approved.as_str(), "approved");
        assert_eq!(DealStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(DealStatus::parse("pending"), Some(DealStatus::Pending));
        assert_eq!(DealStatus::parse("APPROVED"), Some(DealStatus::Approved));
        assert_eq!(DealStatus::parse("Rejected"), Some(DealStatus::Rejected));
        assert_eq!(DealStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_is_decided() {
        assert!(!DealStatus::Pending.is_decided());
        assert!(DealStatus::Approved.is_decided());
        assert!(DealStatus::Rejected.is_decided());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", DealStatus::Pending), "pending");
    }
}
