//! Rate configuration repository.
//!
//! Region and points configurations are plain administrator-edited data.
//! They are not versioned: editing a rate changes what a future
//! recalculation computes, never what the ledgers already hold.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use incentiva_core::accrual::{PointsRates, RegionRates};
use incentiva_shared::types::{PointsConfigId, RegionConfigId};

use crate::entities::{points_configs, region_configs};

/// Error types for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration row not found.
    #[error("Configuration not found: {0}")]
    NotFound(Uuid),

    /// A rate was not strictly positive.
    #[error("Rates must be positive")]
    NonPositiveRate,

    /// An active configuration already covers the same tuple.
    #[error("An active configuration already exists for this segment")]
    DuplicateActiveConfig,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a region configuration.
#[derive(Debug, Clone)]
pub struct CreateRegionConfigInput {
    /// Geographic region.
    pub region: String,
    /// Partner category.
    pub category: String,
    /// Subregion, when the configuration is subregion-specific.
    pub subregion: Option<String>,
    /// Dollars per goal for new-customer deals.
    pub new_customer_goal_rate: Decimal,
    /// Dollars per goal for renewal deals.
    pub renewal_goal_rate: Decimal,
    /// Monthly goal target for progress reporting.
    pub monthly_goal_target: Decimal,
}

/// Input for updating a region configuration.
#[derive(Debug, Clone, Default)]
pub struct UpdateRegionConfigInput {
    /// New new-customer goal rate.
    pub new_customer_goal_rate: Option<Decimal>,
    /// New renewal goal rate.
    pub renewal_goal_rate: Option<Decimal>,
    /// New monthly goal target.
    pub monthly_goal_target: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Input for creating a points configuration.
#[derive(Debug, Clone)]
pub struct CreatePointsConfigInput {
    /// Geographic region.
    pub region: String,
    /// Dollars per point for new-customer deals.
    pub new_customer_rate: Decimal,
    /// Dollars per point for renewal deals.
    pub renewal_rate: Decimal,
}

/// Input for updating a points configuration.
#[derive(Debug, Clone, Default)]
pub struct UpdatePointsConfigInput {
    /// New new-customer rate.
    pub new_customer_rate: Option<Decimal>,
    /// New renewal rate.
    pub renewal_rate: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Repository for region and points rate configurations.
#[derive(Debug, Clone)]
pub struct ConfigRepository {
    db: DatabaseConnection,
}

impl ConfigRepository {
    /// Creates a new configuration repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Region configurations (goal rates)
    // ========================================================================

    /// Creates a region configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate is not positive, an active configuration
    /// already covers the tuple, or the database operation fails.
    pub async fn create_region_config(
        &self,
        input: CreateRegionConfigInput,
    ) -> Result<region_configs::Model, ConfigError> {
        if input.new_customer_goal_rate <= Decimal::ZERO
            || input.renewal_goal_rate <= Decimal::ZERO
        {
            return Err(ConfigError::NonPositiveRate);
        }

        let mut duplicate_query = region_configs::Entity::find()
            .filter(region_configs::Column::Region.eq(input.region.clone()))
            .filter(region_configs::Column::Category.eq(input.category.clone()))
            .filter(region_configs::Column::IsActive.eq(true));
        // An absent subregion matches NULL, not any subregion.
        duplicate_query = match &input.subregion {
            Some(subregion) => {
                duplicate_query.filter(region_configs::Column::Subregion.eq(subregion.clone()))
            }
            None => duplicate_query.filter(region_configs::Column::Subregion.is_null()),
        };
        let duplicate = duplicate_query.one(&self.db).await?;
        if duplicate.is_some() {
            return Err(ConfigError::DuplicateActiveConfig);
        }

        let now = Utc::now().into();
        let config = region_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set(input.region),
            category: Set(input.category),
            subregion: Set(input.subregion),
            new_customer_goal_rate: Set(input.new_customer_goal_rate),
            renewal_goal_rate: Set(input.renewal_goal_rate),
            monthly_goal_target: Set(input.monthly_goal_target),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(config.insert(&self.db).await?)
    }

    /// Updates a region configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not found, a new rate is
    /// not positive, or the database operation fails.
    pub async fn update_region_config(
        &self,
        config_id: Uuid,
        input: UpdateRegionConfigInput,
    ) -> Result<region_configs::Model, ConfigError> {
        let config = region_configs::Entity::find_by_id(config_id)
            .one(&self.db)
            .await?
            .ok_or(ConfigError::NotFound(config_id))?;

        if input.new_customer_goal_rate.is_some_and(|r| r <= Decimal::ZERO)
            || input.renewal_goal_rate.is_some_and(|r| r <= Decimal::ZERO)
        {
            return Err(ConfigError::NonPositiveRate);
        }

        let mut active: region_configs::ActiveModel = config.into();
        if let Some(rate) = input.new_customer_goal_rate {
            active.new_customer_goal_rate = Set(rate);
        }
        if let Some(rate) = input.renewal_goal_rate {
            active.renewal_goal_rate = Set(rate);
        }
        if let Some(target) = input.monthly_goal_target {
            active.monthly_goal_target = Set(target);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a region configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not found or the database
    /// operation fails.
    pub async fn delete_region_config(&self, config_id: Uuid) -> Result<(), ConfigError> {
        let result = region_configs::Entity::delete_by_id(config_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ConfigError::NotFound(config_id));
        }
        Ok(())
    }

    /// Lists all region configurations, stable order for admin screens.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_region_configs(&self) -> Result<Vec<region_configs::Model>, ConfigError> {
        Ok(region_configs::Entity::find()
            .order_by_asc(region_configs::Column::Region)
            .order_by_asc(region_configs::Column::Category)
            .all(&self.db)
            .await?)
    }

    // ========================================================================
    // Points configurations (dollar-per-point rates)
    // ========================================================================

    /// Creates a points configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a rate is not positive, the region already has
    /// an active configuration, or the database operation fails.
    pub async fn create_points_config(
        &self,
        input: CreatePointsConfigInput,
    ) -> Result<points_configs::Model, ConfigError> {
        if input.new_customer_rate <= Decimal::ZERO || input.renewal_rate <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveRate);
        }

        let duplicate = points_configs::Entity::find()
            .filter(points_configs::Column::Region.eq(input.region.clone()))
            .filter(points_configs::Column::IsActive.eq(true))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(ConfigError::DuplicateActiveConfig);
        }

        let now = Utc::now().into();
        let config = points_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set(input.region),
            new_customer_rate: Set(input.new_customer_rate),
            renewal_rate: Set(input.renewal_rate),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(config.insert(&self.db).await?)
    }

    /// Updates a points configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not found, a new rate is
    /// not positive, or the database operation fails.
    pub async fn update_points_config(
        &self,
        config_id: Uuid,
        input: UpdatePointsConfigInput,
    ) -> Result<points_configs::Model, ConfigError> {
        let config = points_configs::Entity::find_by_id(config_id)
            .one(&self.db)
            .await?
            .ok_or(ConfigError::NotFound(config_id))?;

        if input.new_customer_rate.is_some_and(|r| r <= Decimal::ZERO)
            || input.renewal_rate.is_some_and(|r| r <= Decimal::ZERO)
        {
            return Err(ConfigError::NonPositiveRate);
        }

        let mut active: points_configs::ActiveModel = config.into();
        if let Some(rate) = input.new_customer_rate {
            active.new_customer_rate = Set(rate);
        }
        if let Some(rate) = input.renewal_rate {
            active.renewal_rate = Set(rate);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a points configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is not found or the database
    /// operation fails.
    pub async fn delete_points_config(&self, config_id: Uuid) -> Result<(), ConfigError> {
        let result = points_configs::Entity::delete_by_id(config_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ConfigError::NotFound(config_id));
        }
        Ok(())
    }

    /// Lists all points configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_points_configs(&self) -> Result<Vec<points_configs::Model>, ConfigError> {
        Ok(points_configs::Entity::find()
            .order_by_asc(points_configs::Column::Region)
            .all(&self.db)
            .await?)
    }
}

// ============================================================================
// Lookup helpers shared with the approval and recalculation paths
// ============================================================================

/// Loads the active goal rate candidates for a region and category.
///
/// The exact-tuple resolution over these candidates is the core resolver's
/// job; this only narrows the search to the indexed columns.
pub(crate) async fn active_region_candidates<C: ConnectionTrait>(
    conn: &C,
    region: &str,
    category: &str,
) -> Result<Vec<RegionRates>, DbErr> {
    let rows = region_configs::Entity::find()
        .filter(region_configs::Column::Region.eq(region))
        .filter(region_configs::Column::Category.eq(category))
        .filter(region_configs::Column::IsActive.eq(true))
        .all(conn)
        .await?;

    Ok(rows.iter().map(region_rates_from_model).collect())
}

/// Loads the active points rates for a region, if configured.
pub(crate) async fn active_points_rates<C: ConnectionTrait>(
    conn: &C,
    region: &str,
) -> Result<Option<PointsRates>, DbErr> {
    let row = points_configs::Entity::find()
        .filter(points_configs::Column::Region.eq(region))
        .filter(points_configs::Column::IsActive.eq(true))
        .one(conn)
        .await?;

    Ok(row.as_ref().map(points_rates_from_model))
}

/// Converts a region configuration row into the core rate type.
pub(crate) fn region_rates_from_model(model: &region_configs::Model) -> RegionRates {
    RegionRates {
        id: RegionConfigId::from_uuid(model.id),
        region: model.region.clone(),
        category: model.category.clone(),
        subregion: model.subregion.clone(),
        new_customer_goal_rate: model.new_customer_goal_rate,
        renewal_goal_rate: model.renewal_goal_rate,
        monthly_goal_target: model.monthly_goal_target,
    }
}

/// Converts a points configuration row into the core rate type.
pub(crate) fn points_rates_from_model(model: &points_configs::Model) -> PointsRates {
    PointsRates {
        id: PointsConfigId::from_uuid(model.id),
        region: model.region.clone(),
        new_customer_rate: model.new_customer_rate,
        renewal_rate: model.renewal_rate,
    }
}
