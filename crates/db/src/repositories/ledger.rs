//! Ledger repository for the points and goals accrual ledgers.
//!
//! Both ledgers are append/remove logs. Accrual writes and retractions
//! always run inside the caller's transaction so a deal's ledger state and
//! its stored totals can never diverge across a crash.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use incentiva_core::accrual::RegionRates;
use incentiva_core::ledger::{AttributionMonth, round_goal_delta};

use crate::entities::{deals, goals_ledger_entries, points_ledger_entries};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Redemption amount must be positive.
    #[error("Redemption amount must be positive")]
    NonPositiveRedemption,

    /// Balance too low for the requested redemption.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Points requested for redemption.
        requested: i64,
        /// Points currently available.
        available: i64,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Ledger repository for accrual writes and balance reads.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Transactional accrual writes
    // ========================================================================

    /// Records the accrual entries for an approved deal.
    ///
    /// Writes one points entry when `points > 0` and one goals entry when
    /// the raw goals quotient rounds above zero and a configuration
    /// resolved. The goals delta is rounded to two decimal places here, at
    /// the point of write. Attribution month and year come from the deal's
    /// close date.
    ///
    /// Runs inside the caller's transaction; callers retract any existing
    /// entries for the deal first.
    ///
    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub async fn record_accrual(
        txn: &DatabaseTransaction,
        deal: &deals::Model,
        points: i64,
        raw_goals: Decimal,
        resolved: Option<&RegionRates>,
    ) -> Result<(), DbErr> {
        let now = Utc::now().into();

        Self::record_points(txn, deal, points).await?;

        if let Some(config) = resolved {
            let delta = round_goal_delta(raw_goals);
            if delta > Decimal::ZERO {
                let attribution = AttributionMonth::from_close_date(deal.close_date);
                let entry = goals_ledger_entries::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    user_id: Set(deal.user_id),
                    deal_id: Set(deal.id),
                    delta: Set(delta),
                    month: Set(i16::from(attribution.month)),
                    year: Set(i16::try_from(attribution.year).unwrap_or(i16::MAX)),
                    region_config_id: Set(config.id.into_inner()),
                    description: Set(format!("Goals accrual for deal {}", deal.id)),
                    created_at: Set(now),
                };
                entry.insert(txn).await?;
            }
        }

        Ok(())
    }

    /// Writes one points entry for a deal when `points > 0`.
    ///
    /// Used on its own by points recalculation, which rewrites points
    /// entries without touching the goals ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record_points(
        txn: &DatabaseTransaction,
        deal: &deals::Model,
        points: i64,
    ) -> Result<(), DbErr> {
        if points > 0 {
            let entry = points_ledger_entries::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(deal.user_id),
                deal_id: Set(Some(deal.id)),
                delta: Set(points),
                description: Set(format!("Points accrual for deal {}", deal.id)),
                created_at: Set(Utc::now().into()),
            };
            entry.insert(txn).await?;
        }
        Ok(())
    }

    /// Deletes the points ledger entries referencing a deal.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn retract_points(txn: &DatabaseTransaction, deal_id: Uuid) -> Result<(), DbErr> {
        points_ledger_entries::Entity::delete_many()
            .filter(points_ledger_entries::Column::DealId.eq(deal_id))
            .exec(txn)
            .await?;
        Ok(())
    }

    /// Deletes all ledger entries referencing a deal, both ledgers.
    ///
    /// Retraction plus reinsertion is the only way accruals change;
    /// entries are never updated in place. Entries are keyed by deal id,
    /// so retracting one deal never touches another deal's entries.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails.
    pub async fn retract_accrual(txn: &DatabaseTransaction, deal_id: Uuid) -> Result<(), DbErr> {
        Self::retract_points(txn, deal_id).await?;

        goals_ledger_entries::Entity::delete_many()
            .filter(goals_ledger_entries::Column::DealId.eq(deal_id))
            .exec(txn)
            .await?;

        Ok(())
    }

    // ========================================================================
    // Redemption
    // ========================================================================

    /// Redeems points against a user's balance.
    ///
    /// Writes a negative-delta entry after checking the balance inside one
    /// transaction. Redemption entries carry no deal reference and are
    /// excluded from ranking aggregates by the positive-delta filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive, the balance is too
    /// low, or the database operation fails.
    pub async fn redeem_points(
        &self,
        user_id: Uuid,
        points: i64,
        description: String,
    ) -> Result<points_ledger_entries::Model, LedgerError> {
        if points <= 0 {
            return Err(LedgerError::NonPositiveRedemption);
        }

        let txn = self.db.begin().await?;

        let entries = points_ledger_entries::Entity::find()
            .filter(points_ledger_entries::Column::UserId.eq(user_id))
            .all(&txn)
            .await?;
        let available: i64 = entries.iter().map(|e| e.delta).sum();

        if available < points {
            return Err(LedgerError::InsufficientBalance {
                requested: points,
                available,
            });
        }

        let entry = points_ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            deal_id: Set(None),
            delta: Set(-points),
            description: Set(description),
            created_at: Set(Utc::now().into()),
        };
        let inserted = entry.insert(&txn).await?;

        txn.commit().await?;
        Ok(inserted)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Sums all deltas: the user's redeemable balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn points_balance(&self, user_id: Uuid) -> Result<i64, LedgerError> {
        let entries = points_ledger_entries::Entity::find()
            .filter(points_ledger_entries::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;

        Ok(entries.iter().map(|e| e.delta).sum())
    }

    /// Sums positive deltas only: the user's earned points.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn points_earned(&self, user_id: Uuid) -> Result<i64, LedgerError> {
        let entries = points_ledger_entries::Entity::find()
            .filter(points_ledger_entries::Column::UserId.eq(user_id))
            .filter(points_ledger_entries::Column::Delta.gt(0))
            .all(&self.db)
            .await?;

        Ok(entries.iter().map(|e| e.delta).sum())
    }

    /// Sums a user's goals for one attribution month.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn goals_for_month(
        &self,
        user_id: Uuid,
        month: i16,
        year: i16,
    ) -> Result<Decimal, LedgerError> {
        let entries = goals_ledger_entries::Entity::find()
            .filter(goals_ledger_entries::Column::UserId.eq(user_id))
            .filter(goals_ledger_entries::Column::Month.eq(month))
            .filter(goals_ledger_entries::Column::Year.eq(year))
            .all(&self.db)
            .await?;

        Ok(entries.iter().map(|e| e.delta).sum())
    }

    /// Lists a user's points ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn points_history(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<points_ledger_entries::Model>, LedgerError> {
        Ok(points_ledger_entries::Entity::find()
            .filter(points_ledger_entries::Column::UserId.eq(user_id))
            .order_by_desc(points_ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Lists the ledger entries referencing a deal, both ledgers.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn entries_for_deal(
        &self,
        deal_id: Uuid,
    ) -> Result<
        (
            Vec<points_ledger_entries::Model>,
            Vec<goals_ledger_entries::Model>,
        ),
        LedgerError,
    > {
        let points = points_ledger_entries::Entity::find()
            .filter(points_ledger_entries::Column::DealId.eq(deal_id))
            .all(&self.db)
            .await?;

        let goals = goals_ledger_entries::Entity::find()
            .filter(goals_ledger_entries::Column::DealId.eq(deal_id))
            .all(&self.db)
            .await?;

        Ok((points, goals))
    }
}
