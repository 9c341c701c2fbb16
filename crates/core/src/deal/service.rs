//! Deal workflow service for status transitions.
//!
//! This module implements the state machine logic for moving deals
//! through the approval lifecycle.

use chrono::Utc;

use incentiva_shared::types::UserId;

use crate::deal::error::DealError;
use crate::deal::types::{DealAction, DealStatus};

/// Stateless service for validating deal lifecycle transitions.
///
/// All methods are associated functions that validate and execute
/// state transitions, returning the appropriate `DealAction` with
/// audit trail information.
pub struct DealWorkflow;

impl DealWorkflow {
    /// Approve a pending deal.
    ///
    /// Approval of an already-approved deal is accepted: the orchestrating
    /// repository retracts the deal's existing ledger entries before
    /// re-recording, so re-running approval never double-counts.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the deal
    /// * `approved_by` - The user approving the deal
    ///
    /// # Returns
    /// * `Ok(DealAction::Approve)` if the transition is valid
    /// * `Err(DealError::InvalidTransition)` if the deal was rejected
    pub fn approve(
        current_status: DealStatus,
        approved_by: UserId,
    ) -> Result<DealAction, DealError> {
        match current_status {
            DealStatus::Pending | DealStatus::Approved => Ok(DealAction::Approve {
                new_status: DealStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            DealStatus::Rejected => Err(DealError::InvalidTransition {
                from: current_status,
                to: DealStatus::Approved,
            }),
        }
    }

    /// Reject a pending deal.
    ///
    /// Rejecting an already-rejected deal is a no-op transition and is
    /// accepted for the same idempotence reason as re-approval.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the deal
    ///
    /// # Returns
    /// * `Ok(DealAction::Reject)` if the transition is valid
    /// * `Err(DealError::InvalidTransition)` if the deal was approved
    pub fn reject(current_status: DealStatus) -> Result<DealAction, DealError> {
        match current_status {
            DealStatus::Pending | DealStatus::Rejected => Ok(DealAction::Reject {
                new_status: DealStatus::Rejected,
            }),
            DealStatus::Approved => Err(DealError::InvalidTransition {
                from: current_status,
                to: DealStatus::Rejected,
            }),
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Approved, Rejected → Rejected (idempotent re-runs)
    #[must_use]
    pub fn is_valid_transition(from: DealStatus, to: DealStatus) -> bool {
        matches!(
            (from, to),
            (DealStatus::Pending, DealStatus::Approved | DealStatus::Rejected)
                | (DealStatus::Approved, DealStatus::Approved)
                | (DealStatus::Rejected, DealStatus::Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_from_pending() {
        let approver = UserId::new();
        let result = DealWorkflow::approve(DealStatus::Pending, approver);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().new_status(), DealStatus::Approved);
    }

    #[test]
    fn test_approve_carries_approver() {
        let approver = UserId::new();
        let action = DealWorkflow::approve(DealStatus::Pending, approver).unwrap();
        match action {
            DealAction::Approve { approved_by, .. } => assert_eq!(approved_by, approver),
            DealAction::Reject { .. } => panic!("expected approve action"),
        }
    }

    #[test]
    fn test_reapprove_is_tolerated() {
        let result = DealWorkflow::approve(DealStatus::Approved, UserId::new());
        assert!(result.is_ok());
        assert_eq!(result.unwrap().new_status(), DealStatus::Approved);
    }

    #[test]
    fn test_approve_rejected_fails() {
        let result = DealWorkflow::approve(DealStatus::Rejected, UserId::new());
        assert!(matches!(result, Err(DealError::InvalidTransition { .. })));
    }

    #[test]
    fn test_reject_from_pending() {
        let result = DealWorkflow::reject(DealStatus::Pending);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().new_status(), DealStatus::Rejected);
    }

    #[test]
    fn test_rereject_is_tolerated() {
        let result = DealWorkflow::reject(DealStatus::Rejected);
        assert!(result.is_ok());
    }

    #[test]
    fn test_reject_approved_fails() {
        let result = DealWorkflow::reject(DealStatus::Approved);
        assert!(matches!(result, Err(DealError::InvalidTransition { .. })));
    }

    #[test]
    fn test_is_valid_transition() {
        assert!(DealWorkflow::is_valid_transition(
            DealStatus::Pending,
            DealStatus::Approved
        ));
        assert!(DealWorkflow::is_valid_transition(
            DealStatus::Pending,
            DealStatus::Rejected
        ));
        assert!(DealWorkflow::is_valid_transition(
            DealStatus::Approved,
            DealStatus::Approved
        ));

        assert!(!DealWorkflow::is_valid_transition(
            DealStatus::Approved,
            DealStatus::Rejected
        ));
        assert!(!DealWorkflow::is_valid_transition(
            DealStatus::Rejected,
            DealStatus::Approved
        ));
        assert!(!DealWorkflow::is_valid_transition(
            DealStatus::Approved,
            DealStatus::Pending
        ));
    }
}
