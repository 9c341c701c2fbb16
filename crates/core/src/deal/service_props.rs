//! Property-based tests for the deal workflow state machine.

use proptest::prelude::*;
use uuid::Uuid;

use incentiva_shared::types::UserId;

use super::service::DealWorkflow;
use super::types::DealStatus;

/// Strategy for generating user IDs.
fn user_id() -> impl Strategy<Value = UserId> {
    any::<[u8; 16]>().prop_map(|b| UserId::from_uuid(Uuid::from_bytes(b)))
}

/// Strategy for picking any status.
fn any_status() -> impl Strategy<Value = DealStatus> {
    prop_oneof![
        Just(DealStatus::Pending),
        Just(DealStatus::Approved),
        Just(DealStatus::Rejected),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* approver, approving a pending deal yields the approved
    /// status and records that approver.
    #[test]
    fn prop_approve_pending_succeeds(approver in user_id()) {
        let action = DealWorkflow::approve(DealStatus::Pending, approver);
        prop_assert!(action.is_ok());
        prop_assert_eq!(action.unwrap().new_status(), DealStatus::Approved);
    }

    /// *For any* status, approve succeeds exactly when the deal is not
    /// rejected, and reject succeeds exactly when it is not approved.
    #[test]
    fn prop_transition_validity_matches_service(
        status in any_status(),
        approver in user_id(),
    ) {
        let approve_ok = DealWorkflow::approve(status, approver).is_ok();
        prop_assert_eq!(approve_ok, status != DealStatus::Rejected);

        let reject_ok = DealWorkflow::reject(status).is_ok();
        prop_assert_eq!(reject_ok, status != DealStatus::Approved);
    }

    /// *For any* status pair, `is_valid_transition` agrees with the
    /// service methods.
    #[test]
    fn prop_is_valid_transition_is_consistent(
        from in any_status(),
        approver in user_id(),
    ) {
        let to_approved = DealWorkflow::is_valid_transition(from, DealStatus::Approved);
        prop_assert_eq!(to_approved, DealWorkflow::approve(from, approver).is_ok());

        let to_rejected = DealWorkflow::is_valid_transition(from, DealStatus::Rejected);
        prop_assert_eq!(to_rejected, DealWorkflow::reject(from).is_ok());
    }
}
