//! Deal repository for sale records.
//!
//! Deals carry no accrual logic of their own; approval and recalculation
//! live in their own repositories. Deletion is destructive and emits an
//! audit snapshot before the row goes away.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use incentiva_core::audit::{AuditEvent, AuditSink};
use incentiva_shared::types::{PageRequest, UserId};

use crate::entities::{
    deals,
    sea_orm_active_enums::{DealStatus, DealType},
    users,
};

/// Error types for deal storage operations.
#[derive(Debug, thiserror::Error)]
pub enum DealStoreError {
    /// Deal not found.
    #[error("Deal not found: {0}")]
    NotFound(Uuid),

    /// Owning user not found.
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Deal value must be strictly positive.
    #[error("Deal value must be positive, got {0}")]
    NonPositiveValue(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a deal.
#[derive(Debug, Clone)]
pub struct CreateDealInput {
    /// The seller who closed the deal.
    pub user_id: Uuid,
    /// Deal type.
    pub deal_type: DealType,
    /// Monetary value of the sale.
    pub value: Decimal,
    /// The date the sale closed; goals attribute to this month.
    pub close_date: NaiveDate,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// Filter options for listing deals.
#[derive(Debug, Clone, Default)]
pub struct DealFilter {
    /// Filter by status.
    pub status: Option<DealStatus>,
    /// Filter by owning user.
    pub user_id: Option<Uuid>,
    /// Filter by close date range start.
    pub from: Option<NaiveDate>,
    /// Filter by close date range end.
    pub to: Option<NaiveDate>,
}

/// Deal repository for CRUD operations.
#[derive(Clone)]
pub struct DealRepository {
    db: DatabaseConnection,
    audit: Arc<dyn AuditSink>,
}

impl DealRepository {
    /// Creates a new deal repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, audit: Arc<dyn AuditSink>) -> Self {
        Self { db, audit }
    }

    /// Creates a new deal in pending status.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not positive, the owning user does
    /// not exist, or the database operation fails.
    pub async fn create_deal(&self, input: CreateDealInput) -> Result<deals::Model, DealStoreError> {
        if input.value <= Decimal::ZERO {
            return Err(DealStoreError::NonPositiveValue(input.value));
        }

        let user = users::Entity::find_by_id(input.user_id)
            .one(&self.db)
            .await?
            .ok_or(DealStoreError::UserNotFound(input.user_id))?;

        let now = Utc::now().into();
        let deal = deals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            deal_type: Set(input.deal_type),
            value: Set(input.value),
            status: Set(DealStatus::Pending),
            points_earned: Set(0),
            goals_earned: Set(Decimal::ZERO),
            close_date: Set(input.close_date),
            approved_by: Set(None),
            approved_at: Set(None),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(deal.insert(&self.db).await?)
    }

    /// Gets a deal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the deal is not found or the query fails.
    pub async fn get_deal(&self, deal_id: Uuid) -> Result<deals::Model, DealStoreError> {
        deals::Entity::find_by_id(deal_id)
            .one(&self.db)
            .await?
            .ok_or(DealStoreError::NotFound(deal_id))
    }

    /// Lists deals with optional filters, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_deals(
        &self,
        filter: DealFilter,
        page: &PageRequest,
    ) -> Result<(Vec<deals::Model>, u64), DealStoreError> {
        let mut query = deals::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(deals::Column::Status.eq(status));
        }
        if let Some(user_id) = filter.user_id {
            query = query.filter(deals::Column::UserId.eq(user_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(deals::Column::CloseDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(deals::Column::CloseDate.lte(to));
        }

        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(deals::Column::CloseDate)
            .order_by_desc(deals::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Deletes a deal and its ledger entries.
    ///
    /// The pre-deletion snapshot goes to the audit sink fire-and-forget;
    /// a failing sink cannot block the deletion. Ledger entries referencing
    /// the deal are removed by the cascade, keeping totals consistent with
    /// the remaining entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the deal is not found or the database operation
    /// fails.
    pub async fn delete_deal(
        &self,
        deal_id: Uuid,
        actor_id: Option<Uuid>,
    ) -> Result<(), DealStoreError> {
        let txn = self.db.begin().await?;

        let deal = deals::Entity::find_by_id(deal_id)
            .one(&txn)
            .await?
            .ok_or(DealStoreError::NotFound(deal_id))?;

        let snapshot = serde_json::to_value(&deal).unwrap_or_default();
        deal.delete(&txn).await?;

        txn.commit().await?;

        self.audit.record(AuditEvent {
            actor_id: actor_id.map(UserId::from_uuid),
            action: "deal.deleted".to_string(),
            entity_type: "deal".to_string(),
            entity_id: deal_id,
            snapshot,
        });

        Ok(())
    }
}
