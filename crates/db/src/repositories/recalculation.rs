//! Points recalculation job.
//!
//! Re-derives `points_earned` for every deal against the current points
//! configuration, after an administrator changes a rate. Deals are
//! processed one at a time in their own transactions, so one deal's
//! failure never aborts the rest, and running the job twice with no
//! intervening configuration change leaves every total unchanged.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use incentiva_core::deal::DealError;

use crate::entities::{deals, sea_orm_active_enums::DealStatus, users};
use crate::repositories::approval::{compute_points, db_err, deal_type_to_core};
use crate::repositories::ledger::LedgerRepository;

/// Result of one recalculation run.
#[derive(Debug, Clone)]
pub struct RecalculationSummary {
    /// Number of deals whose stored points changed.
    pub updated: usize,
    /// Per-deal error descriptions; the run completes despite them.
    pub errors: Vec<String>,
}

/// Idempotent points recalculation over the whole deal set.
#[derive(Debug, Clone)]
pub struct RecalculationJob {
    db: DatabaseConnection,
}

impl RecalculationJob {
    /// Creates a new recalculation job.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recalculates points for every deal in the system.
    ///
    /// For each deal:
    /// - recompute points under the current configuration;
    /// - approved deals whose stored value differs get their points
    ///   entries retracted and rewritten, and the new value persisted;
    /// - unapproved deals with stale nonzero points are reset to zero and
    ///   their stray ledger entries retracted.
    ///
    /// # Errors
    ///
    /// Returns an error only if the initial deal listing fails; per-deal
    /// failures land in the summary's error list instead.
    pub async fn recalculate_points(&self) -> Result<RecalculationSummary, DealError> {
        let deal_ids: Vec<Uuid> = deals::Entity::find()
            .select_only()
            .column(deals::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut updated = 0usize;
        let mut errors = Vec::new();

        for deal_id in deal_ids {
            match self.recalculate_deal(deal_id).await {
                Ok(true) => updated += 1,
                Ok(false) => {}
                Err(e) => errors.push(format!("deal {deal_id}: {e}")),
            }
        }

        info!(updated, failed = errors.len(), "points recalculation finished");

        Ok(RecalculationSummary { updated, errors })
    }

    /// Recalculates one deal inside its own transaction and row lock.
    ///
    /// Returns true when the stored points changed.
    async fn recalculate_deal(&self, deal_id: Uuid) -> Result<bool, DealError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let deal = deals::Entity::find_by_id(deal_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DealError::DealNotFound(deal_id))?;

        if deal.status == DealStatus::Approved {
            let user = users::Entity::find_by_id(deal.user_id)
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or(DealError::UserNotFound(deal.user_id))?;

            let recomputed =
                compute_points(&txn, &user, deal.value, deal_type_to_core(&deal.deal_type))
                    .await?;

            if recomputed == deal.points_earned {
                return Ok(false);
            }

            LedgerRepository::retract_points(&txn, deal.id)
                .await
                .map_err(db_err)?;

            let mut active: deals::ActiveModel = deal.into();
            active.points_earned = Set(recomputed);
            active.updated_at = Set(chrono::Utc::now().into());
            let updated = active.update(&txn).await.map_err(db_err)?;

            LedgerRepository::record_points(&txn, &updated, recomputed)
                .await
                .map_err(db_err)?;

            txn.commit().await.map_err(db_err)?;
            return Ok(true);
        }

        // Unapproved deal carrying stale points from a prior state.
        if deal.points_earned != 0 {
            LedgerRepository::retract_accrual(&txn, deal.id)
                .await
                .map_err(db_err)?;

            let mut active: deals::ActiveModel = deal.into();
            active.points_earned = Set(0);
            active.updated_at = Set(chrono::Utc::now().into());
            active.update(&txn).await.map_err(db_err)?;

            txn.commit().await.map_err(db_err)?;
            return Ok(true);
        }

        Ok(false)
    }
}
