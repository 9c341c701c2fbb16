//! Prize criteria repository.
//!
//! Criteria are plain administrator-edited rows except for activation:
//! at most one criteria may be active system-wide, enforced by a guarded
//! deactivate-all-then-activate-one transaction on top of a partial
//! unique index. Concurrent activations serialize on that index.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{prize_criteria, sea_orm_active_enums::CriteriaType};

/// Error types for criteria operations.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    /// Criteria not found.
    #[error("Criteria not found: {0}")]
    NotFound(Uuid),

    /// Combined weights must sum to 100.
    #[error("Combined weights must sum to 100, got {points_weight} + {deals_weight}")]
    InvalidWeights {
        /// Points weight in percent.
        points_weight: i16,
        /// Deals weight in percent.
        deals_weight: i16,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a prize criteria.
#[derive(Debug, Clone)]
pub struct CreateCriteriaInput {
    /// Human-readable name.
    pub name: String,
    /// Scoring mode.
    pub criteria_type: CriteriaType,
    /// Region restriction, if any.
    pub region: Option<String>,
    /// Category restriction, if any.
    pub category: Option<String>,
    /// Subregion restriction, if any.
    pub subregion: Option<String>,
    /// Minimum earned points to qualify, if set.
    pub min_points: Option<i64>,
    /// Minimum approved deal count to qualify, if set.
    pub min_deals: Option<i64>,
    /// Weight of points in a combined score, in percent.
    pub points_weight: i16,
    /// Weight of deal count in a combined score, in percent.
    pub deals_weight: i16,
    /// Evaluation window start.
    pub starts_on: Option<NaiveDate>,
    /// Evaluation window end.
    pub ends_on: Option<NaiveDate>,
}

/// Input for updating a prize criteria.
#[derive(Debug, Clone, Default)]
pub struct UpdateCriteriaInput {
    /// New name.
    pub name: Option<String>,
    /// New minimum points threshold (Some(None) clears it).
    pub min_points: Option<Option<i64>>,
    /// New minimum deals threshold (Some(None) clears it).
    pub min_deals: Option<Option<i64>>,
    /// New points weight.
    pub points_weight: Option<i16>,
    /// New deals weight.
    pub deals_weight: Option<i16>,
    /// New evaluation window start (Some(None) clears it).
    pub starts_on: Option<Option<NaiveDate>>,
    /// New evaluation window end (Some(None) clears it).
    pub ends_on: Option<Option<NaiveDate>>,
}

/// Prize criteria repository.
#[derive(Debug, Clone)]
pub struct CriteriaRepository {
    db: DatabaseConnection,
}

impl CriteriaRepository {
    /// Creates a new criteria repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a criteria, inactive until explicitly activated.
    ///
    /// # Errors
    ///
    /// Returns an error if combined weights do not sum to 100 or the
    /// database operation fails.
    pub async fn create_criteria(
        &self,
        input: CreateCriteriaInput,
    ) -> Result<prize_criteria::Model, CriteriaError> {
        validate_weights(input.criteria_type.clone(), input.points_weight, input.deals_weight)?;

        let now = Utc::now().into();
        let criteria = prize_criteria::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            criteria_type: Set(input.criteria_type),
            region: Set(input.region),
            category: Set(input.category),
            subregion: Set(input.subregion),
            min_points: Set(input.min_points),
            min_deals: Set(input.min_deals),
            points_weight: Set(input.points_weight),
            deals_weight: Set(input.deals_weight),
            starts_on: Set(input.starts_on),
            ends_on: Set(input.ends_on),
            is_active: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(criteria.insert(&self.db).await?)
    }

    /// Updates a criteria.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria is not found, the resulting
    /// combined weights do not sum to 100, or the database operation
    /// fails.
    pub async fn update_criteria(
        &self,
        criteria_id: Uuid,
        input: UpdateCriteriaInput,
    ) -> Result<prize_criteria::Model, CriteriaError> {
        let criteria = prize_criteria::Entity::find_by_id(criteria_id)
            .one(&self.db)
            .await?
            .ok_or(CriteriaError::NotFound(criteria_id))?;

        let points_weight = input.points_weight.unwrap_or(criteria.points_weight);
        let deals_weight = input.deals_weight.unwrap_or(criteria.deals_weight);
        validate_weights(criteria.criteria_type.clone(), points_weight, deals_weight)?;

        let mut active: prize_criteria::ActiveModel = criteria.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(min_points) = input.min_points {
            active.min_points = Set(min_points);
        }
        if let Some(min_deals) = input.min_deals {
            active.min_deals = Set(min_deals);
        }
        active.points_weight = Set(points_weight);
        active.deals_weight = Set(deals_weight);
        if let Some(starts_on) = input.starts_on {
            active.starts_on = Set(starts_on);
        }
        if let Some(ends_on) = input.ends_on {
            active.ends_on = Set(ends_on);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Activates a criteria, deactivating every other one.
    ///
    /// Both updates run in one transaction so no interleaving can leave
    /// two active rows; the partial unique index backs this up at the
    /// storage level.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria is not found or the database
    /// operation fails.
    pub async fn activate_criteria(
        &self,
        criteria_id: Uuid,
    ) -> Result<prize_criteria::Model, CriteriaError> {
        let txn = self.db.begin().await?;

        let criteria = prize_criteria::Entity::find_by_id(criteria_id)
            .one(&txn)
            .await?
            .ok_or(CriteriaError::NotFound(criteria_id))?;

        prize_criteria::Entity::update_many()
            .col_expr(prize_criteria::Column::IsActive, Expr::value(false))
            .filter(prize_criteria::Column::IsActive.eq(true))
            .exec(&txn)
            .await?;

        let mut active: prize_criteria::ActiveModel = criteria.into();
        active.is_active = Set(true);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Gets a criteria by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria is not found or the query fails.
    pub async fn get_criteria(
        &self,
        criteria_id: Uuid,
    ) -> Result<prize_criteria::Model, CriteriaError> {
        prize_criteria::Entity::find_by_id(criteria_id)
            .one(&self.db)
            .await?
            .ok_or(CriteriaError::NotFound(criteria_id))
    }

    /// Returns the single active criteria, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn active_criteria(&self) -> Result<Option<prize_criteria::Model>, CriteriaError> {
        Ok(prize_criteria::Entity::find()
            .filter(prize_criteria::Column::IsActive.eq(true))
            .one(&self.db)
            .await?)
    }

    /// Lists all criteria, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_criteria(&self) -> Result<Vec<prize_criteria::Model>, CriteriaError> {
        Ok(prize_criteria::Entity::find()
            .order_by_desc(prize_criteria::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Deletes a criteria.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria is not found or the database
    /// operation fails.
    pub async fn delete_criteria(&self, criteria_id: Uuid) -> Result<(), CriteriaError> {
        let result = prize_criteria::Entity::delete_by_id(criteria_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CriteriaError::NotFound(criteria_id));
        }
        Ok(())
    }
}

/// Rejects combined criteria whose weights do not sum to 100.
///
/// Validation lives here at the write boundary; the ranking engine takes
/// stored weights as-is.
fn validate_weights(
    criteria_type: CriteriaType,
    points_weight: i16,
    deals_weight: i16,
) -> Result<(), CriteriaError> {
    if criteria_type == CriteriaType::Combined && points_weight + deals_weight != 100 {
        return Err(CriteriaError::InvalidWeights {
            points_weight,
            deals_weight,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_weights_combined() {
        assert!(validate_weights(CriteriaType::Combined, 60, 40).is_ok());
        assert!(matches!(
            validate_weights(CriteriaType::Combined, 60, 50),
            Err(CriteriaError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_validate_weights_other_types_unchecked() {
        assert!(validate_weights(CriteriaType::Points, 0, 0).is_ok());
        assert!(validate_weights(CriteriaType::TopGoals, 70, 70).is_ok());
    }
}
