//! Approval repository orchestrating deal state transitions.
//!
//! Approval runs as one transaction per deal with a row-level lock
//! spanning read, accrual computation, retraction, ledger write, and
//! status persistence. Concurrent approval and recalculation of the same
//! deal serialize on that lock; different deals never contend.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use incentiva_core::accrual::{
    AccrualCalculator, DealType, RateResolver, RegionRates, SellerSegment,
};
use incentiva_core::deal::{DealAction, DealError, DealStatus, DealWorkflow};
use incentiva_core::ledger::round_goal_delta;
use incentiva_core::notification::{NotificationKind, Notifier};
use incentiva_shared::types::UserId;

use crate::entities::{deals, sea_orm_active_enums, users};
use crate::repositories::config::{active_points_rates, active_region_candidates};
use crate::repositories::ledger::LedgerRepository;

/// Approval repository for deal state transitions.
#[derive(Clone)]
pub struct ApprovalRepository {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
}

impl ApprovalRepository {
    /// Creates a new approval repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Approves a deal and records its accruals.
    ///
    /// Steps, all inside one transaction holding the deal's row lock:
    /// 1. load the deal and its owning user;
    /// 2. validate the transition;
    /// 3. compute points from the region's active points configuration
    ///    (none configured means zero points and a warning);
    /// 4. resolve the goal rate configuration and compute goals
    ///    (unresolved means zero goals and a warning, never an error);
    /// 5. retract any existing accrual for the deal, then record the
    ///    fresh entries and persist the deal's new state.
    ///
    /// The approval notification is emitted after commit, fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns an error if the deal or user is missing, the deal was
    /// rejected, or a database operation fails.
    pub async fn approve_deal(
        &self,
        deal_id: Uuid,
        approver_id: Uuid,
    ) -> Result<deals::Model, DealError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let deal = deals::Entity::find_by_id(deal_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DealError::DealNotFound(deal_id))?;

        let user = users::Entity::find_by_id(deal.user_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DealError::UserNotFound(deal.user_id))?;

        let action = DealWorkflow::approve(
            deal_status_to_core(&deal.status),
            UserId::from_uuid(approver_id),
        )?;

        let deal_type = deal_type_to_core(&deal.deal_type);
        let points = compute_points(&txn, &user, deal.value, deal_type).await?;
        let (resolved, raw_goals) = compute_goals(&txn, &user, deal.value, deal_type).await?;

        // Retract before re-recording so a re-run cannot double-count.
        LedgerRepository::retract_accrual(&txn, deal.id)
            .await
            .map_err(db_err)?;

        let DealAction::Approve {
            approved_by,
            approved_at,
            ..
        } = action
        else {
            return Err(DealError::Database("unexpected workflow action".to_string()));
        };

        let mut active: deals::ActiveModel = deal.into();
        active.status = Set(sea_orm_active_enums::DealStatus::Approved);
        active.points_earned = Set(points);
        active.goals_earned = Set(round_goal_delta(raw_goals));
        active.approved_by = Set(Some(approved_by.into_inner()));
        active.approved_at = Set(Some(approved_at.into()));
        active.updated_at = Set(approved_at.into());

        let updated = active.update(&txn).await.map_err(db_err)?;

        LedgerRepository::record_accrual(&txn, &updated, points, raw_goals, resolved.as_ref())
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        self.emit(
            updated.user_id,
            NotificationKind::DealApproved,
            json!({
                "deal_id": updated.id,
                "points_earned": updated.points_earned,
                "goals_earned": updated.goals_earned,
            }),
        );

        Ok(updated)
    }

    /// Rejects a deal. No accrual is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the deal is missing, the deal was approved, or
    /// a database operation fails.
    pub async fn reject_deal(&self, deal_id: Uuid) -> Result<deals::Model, DealError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let deal = deals::Entity::find_by_id(deal_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DealError::DealNotFound(deal_id))?;

        let action = DealWorkflow::reject(deal_status_to_core(&deal.status))?;

        let mut active: deals::ActiveModel = deal.into();
        active.status = Set(core_status_to_db(action.new_status()));
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        self.emit(
            updated.user_id,
            NotificationKind::DealRejected,
            json!({ "deal_id": updated.id }),
        );

        Ok(updated)
    }

    /// Emits a notification without touching the caller's result.
    ///
    /// Runs detached so a slow or failing notifier cannot delay the
    /// response or unwind the committed transaction.
    fn emit(&self, user_id: Uuid, kind: NotificationKind, payload: serde_json::Value) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            notifier.notify(UserId::from_uuid(user_id), kind, payload);
        });
    }
}

/// Computes points from the region's active points configuration.
pub(crate) async fn compute_points(
    txn: &DatabaseTransaction,
    user: &users::Model,
    value: rust_decimal::Decimal,
    deal_type: DealType,
) -> Result<i64, DealError> {
    match active_points_rates(txn, &user.region).await.map_err(db_err)? {
        Some(rates) => Ok(AccrualCalculator::points(value, &rates, deal_type)),
        None => {
            warn!(
                user_id = %user.id,
                region = %user.region,
                "no active points configuration for region, zero points accrue"
            );
            Ok(0)
        }
    }
}

/// Resolves the goal rate configuration and computes the raw goals quotient.
///
/// A seller without a category, or with no matching configuration, accrues
/// zero goals. Neither case is an error.
pub(crate) async fn compute_goals(
    txn: &DatabaseTransaction,
    user: &users::Model,
    value: rust_decimal::Decimal,
    deal_type: DealType,
) -> Result<(Option<RegionRates>, rust_decimal::Decimal), DealError> {
    let Some(category) = &user.category else {
        return Ok((None, rust_decimal::Decimal::ZERO));
    };

    let candidates = active_region_candidates(txn, &user.region, category)
        .await
        .map_err(db_err)?;

    let segment = SellerSegment {
        user_id: UserId::from_uuid(user.id),
        region: user.region.clone(),
        category: category.clone(),
        subregion: user.subregion.clone(),
    };

    match RateResolver::resolve(&candidates, &segment) {
        Some(config) => {
            let raw = AccrualCalculator::goals(value, config, deal_type);
            Ok((Some(config.clone()), raw))
        }
        None => {
            warn!(
                user_id = %user.id,
                region = %user.region,
                category = %category,
                subregion = ?user.subregion,
                "no goal rate configuration resolved, zero goals accrue"
            );
            Ok((None, rust_decimal::Decimal::ZERO))
        }
    }
}

/// Maps a database error into the domain error.
pub(crate) fn db_err(e: sea_orm::DbErr) -> DealError {
    DealError::Database(e.to_string())
}

/// Converts the stored status into the core status.
pub(crate) fn deal_status_to_core(status: &sea_orm_active_enums::DealStatus) -> DealStatus {
    match status {
        sea_orm_active_enums::DealStatus::Pending => DealStatus::Pending,
        sea_orm_active_enums::DealStatus::Approved => DealStatus::Approved,
        sea_orm_active_enums::DealStatus::Rejected => DealStatus::Rejected,
    }
}

/// Converts the core status into the stored status.
pub(crate) fn core_status_to_db(status: DealStatus) -> sea_orm_active_enums::DealStatus {
    match status {
        DealStatus::Pending => sea_orm_active_enums::DealStatus::Pending,
        DealStatus::Approved => sea_orm_active_enums::DealStatus::Approved,
        DealStatus::Rejected => sea_orm_active_enums::DealStatus::Rejected,
    }
}

/// Converts the stored deal type into the core deal type.
pub(crate) fn deal_type_to_core(deal_type: &sea_orm_active_enums::DealType) -> DealType {
    match deal_type {
        sea_orm_active_enums::DealType::NewCustomer => DealType::NewCustomer,
        sea_orm_active_enums::DealType::Renewal => DealType::Renewal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            sea_orm_active_enums::DealStatus::Pending,
            sea_orm_active_enums::DealStatus::Approved,
            sea_orm_active_enums::DealStatus::Rejected,
        ] {
            assert_eq!(core_status_to_db(deal_status_to_core(&status)), status);
        }
    }

    #[test]
    fn test_deal_type_conversion() {
        assert_eq!(
            deal_type_to_core(&sea_orm_active_enums::DealType::NewCustomer),
            DealType::NewCustomer
        );
        assert_eq!(
            deal_type_to_core(&sea_orm_active_enums::DealType::Renewal),
            DealType::Renewal
        );
    }
}
