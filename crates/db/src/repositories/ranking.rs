//! Ranking repository: read-side aggregation for prize rankings.
//!
//! Aggregation reads approved deals, the goals ledger, and the criteria
//! row, then hands the per-user aggregates to the core ranking engine.
//! Everything here is read-only and snapshot-tolerant; a ledger being
//! appended to concurrently only shifts the next read.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

use incentiva_core::accrual::SellerSegment;
use incentiva_core::ranking::{
    CriteriaType, PrizeCriteria, RankingEngine, RankingEntry, UserAggregate,
};
use incentiva_core::accrual::RateResolver;
use incentiva_shared::types::{CriteriaId, UserId};

use crate::entities::{deals, goals_ledger_entries, prize_criteria, sea_orm_active_enums, users};
use crate::repositories::config::active_region_candidates;

/// Error types for ranking operations.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    /// Criteria not found.
    #[error("Criteria not found: {0}")]
    CriteriaNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One row of the monthly goal progress report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct GoalProgressRow {
    /// The seller.
    pub user_id: Uuid,
    /// The seller's display name.
    pub full_name: String,
    /// Goals attributed to the requested month.
    pub goals: Decimal,
    /// The monthly target from the seller's resolved configuration, zero
    /// when no configuration resolves.
    pub monthly_target: Decimal,
}

/// Ranking repository for prize eligibility queries.
#[derive(Debug, Clone)]
pub struct RankingRepository {
    db: DatabaseConnection,
}

impl RankingRepository {
    /// Creates a new ranking repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Produces the ranking for a stored criteria.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria is not found or a query fails.
    pub async fn get_ranking(&self, criteria_id: Uuid) -> Result<Vec<RankingEntry>, RankingError> {
        let criteria = prize_criteria::Entity::find_by_id(criteria_id)
            .one(&self.db)
            .await?
            .ok_or(RankingError::CriteriaNotFound(criteria_id))?;

        self.rank_with(&criteria_to_core(&criteria)).await
    }

    /// Produces the ranking for an ad-hoc criteria, e.g. a periodic prize.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn rank_with(
        &self,
        criteria: &PrizeCriteria,
    ) -> Result<Vec<RankingEntry>, RankingError> {
        let aggregates = self.aggregate(criteria.starts_on, criteria.ends_on).await?;
        Ok(RankingEngine::rank(criteria, &aggregates))
    }

    /// Builds per-user aggregates from approved deals and the goals ledger.
    ///
    /// The evaluation window, when set, bounds deals by their approval
    /// timestamp. Aggregates are ordered by user registration time, which
    /// is the stable order that breaks score ties downstream.
    async fn aggregate(
        &self,
        starts_on: Option<NaiveDate>,
        ends_on: Option<NaiveDate>,
    ) -> Result<Vec<UserAggregate>, RankingError> {
        let mut query = deals::Entity::find()
            .filter(deals::Column::Status.eq(sea_orm_active_enums::DealStatus::Approved));

        if let Some(start) = starts_on {
            let start_at = start.and_time(NaiveTime::MIN).and_utc();
            query = query.filter(deals::Column::ApprovedAt.gte(start_at));
        }
        if let Some(end) = ends_on
            && let Some(next_day) = end.succ_opt()
        {
            let end_at = next_day.and_time(NaiveTime::MIN).and_utc();
            query = query.filter(deals::Column::ApprovedAt.lt(end_at));
        }

        let deal_rows = query.all(&self.db).await?;

        let mut totals: HashMap<Uuid, (i64, i64)> = HashMap::new();
        for deal in &deal_rows {
            let entry = totals.entry(deal.user_id).or_insert((0, 0));
            entry.0 += deal.points_earned;
            entry.1 += 1;
        }

        if totals.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<Uuid> = totals.keys().copied().collect();

        let goal_rows = goals_ledger_entries::Entity::find()
            .filter(goals_ledger_entries::Column::UserId.is_in(user_ids.clone()))
            .all(&self.db)
            .await?;

        let mut goal_totals: HashMap<Uuid, Decimal> = HashMap::new();
        for entry in &goal_rows {
            *goal_totals.entry(entry.user_id).or_insert(Decimal::ZERO) += entry.delta;
        }

        let user_rows = users::Entity::find()
            .filter(users::Column::Id.is_in(user_ids))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(user_rows
            .into_iter()
            .map(|user| {
                let (points, deal_count) = totals.get(&user.id).copied().unwrap_or((0, 0));
                UserAggregate {
                    user_id: UserId::from_uuid(user.id),
                    region: user.region,
                    category: user.category,
                    subregion: user.subregion,
                    points,
                    deals: deal_count,
                    goals: goal_totals.get(&user.id).copied().unwrap_or(Decimal::ZERO),
                }
            })
            .collect())
    }

    /// Monthly goal progress for a region: goals attributed to the month
    /// against each seller's configured monthly target.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn goal_progress(
        &self,
        region: &str,
        month: i16,
        year: i16,
    ) -> Result<Vec<GoalProgressRow>, RankingError> {
        let sellers = users::Entity::find()
            .filter(users::Column::Region.eq(region))
            .filter(users::Column::IsActive.eq(true))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let goal_rows = goals_ledger_entries::Entity::find()
            .filter(
                goals_ledger_entries::Column::UserId
                    .is_in(sellers.iter().map(|u| u.id).collect::<Vec<_>>()),
            )
            .filter(goals_ledger_entries::Column::Month.eq(month))
            .filter(goals_ledger_entries::Column::Year.eq(year))
            .all(&self.db)
            .await?;

        let mut goal_totals: HashMap<Uuid, Decimal> = HashMap::new();
        for entry in &goal_rows {
            *goal_totals.entry(entry.user_id).or_insert(Decimal::ZERO) += entry.delta;
        }

        let mut rows = Vec::with_capacity(sellers.len());
        for user in sellers {
            let monthly_target = match &user.category {
                Some(category) => {
                    let candidates =
                        active_region_candidates(&self.db, &user.region, category).await?;
                    let segment = SellerSegment {
                        user_id: UserId::from_uuid(user.id),
                        region: user.region.clone(),
                        category: category.clone(),
                        subregion: user.subregion.clone(),
                    };
                    RateResolver::resolve(&candidates, &segment)
                        .map_or(Decimal::ZERO, |config| config.monthly_goal_target)
                }
                None => Decimal::ZERO,
            };

            rows.push(GoalProgressRow {
                user_id: user.id,
                full_name: user.full_name,
                goals: goal_totals.get(&user.id).copied().unwrap_or(Decimal::ZERO),
                monthly_target,
            });
        }

        rows.sort_by(|a, b| b.goals.cmp(&a.goals));
        Ok(rows)
    }
}

/// Converts a stored criteria row into the core criteria type.
pub(crate) fn criteria_to_core(model: &prize_criteria::Model) -> PrizeCriteria {
    PrizeCriteria {
        id: CriteriaId::from_uuid(model.id),
        name: model.name.clone(),
        criteria_type: criteria_type_to_core(&model.criteria_type),
        region: model.region.clone(),
        category: model.category.clone(),
        subregion: model.subregion.clone(),
        min_points: model.min_points,
        min_deals: model.min_deals,
        points_weight: model.points_weight,
        deals_weight: model.deals_weight,
        starts_on: model.starts_on,
        ends_on: model.ends_on,
        is_active: model.is_active,
    }
}

/// Converts the stored criteria type into the core criteria type.
pub(crate) fn criteria_type_to_core(
    criteria_type: &sea_orm_active_enums::CriteriaType,
) -> CriteriaType {
    match criteria_type {
        sea_orm_active_enums::CriteriaType::Points => CriteriaType::Points,
        sea_orm_active_enums::CriteriaType::Deals => CriteriaType::Deals,
        sea_orm_active_enums::CriteriaType::Combined => CriteriaType::Combined,
        sea_orm_active_enums::CriteriaType::TopGoals => CriteriaType::TopGoals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_criteria_type_conversion() {
        assert_eq!(
            criteria_type_to_core(&sea_orm_active_enums::CriteriaType::Points),
            CriteriaType::Points
        );
        assert_eq!(
            criteria_type_to_core(&sea_orm_active_enums::CriteriaType::TopGoals),
            CriteriaType::TopGoals
        );
    }

    #[test]
    fn test_criteria_to_core_carries_filters() {
        let model = prize_criteria::Model {
            id: Uuid::new_v4(),
            name: "Summer Sprint".to_string(),
            criteria_type: sea_orm_active_enums::CriteriaType::Combined,
            region: Some("north".to_string()),
            category: None,
            subregion: None,
            min_points: Some(500),
            min_deals: None,
            points_weight: 60,
            deals_weight: 40,
            starts_on: NaiveDate::from_ymd_opt(2026, 6, 1),
            ends_on: NaiveDate::from_ymd_opt(2026, 8, 31),
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };

        let core = criteria_to_core(&model);
        assert_eq!(core.criteria_type, CriteriaType::Combined);
        assert_eq!(core.region.as_deref(), Some("north"));
        assert_eq!(core.min_points, Some(500));
        assert_eq!(core.points_weight, 60);
        assert!(core.is_active);
    }
}
