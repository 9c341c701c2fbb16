//! Rate configuration routes: region goal rates and points rates.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use incentiva_db::ConfigRepository;
use incentiva_db::repositories::config::{
    ConfigError, CreatePointsConfigInput, CreateRegionConfigInput, UpdatePointsConfigInput,
    UpdateRegionConfigInput,
};

/// Creates the configuration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/region-configs", get(list_region_configs))
        .route("/region-configs", post(create_region_config))
        .route("/region-configs/{config_id}", patch(update_region_config))
        .route("/region-configs/{config_id}", delete(delete_region_config))
        .route("/points-configs", get(list_points_configs))
        .route("/points-configs", post(create_points_config))
        .route("/points-configs/{config_id}", patch(update_points_config))
        .route("/points-configs/{config_id}", delete(delete_points_config))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a region configuration.
#[derive(Debug, Deserialize)]
pub struct CreateRegionConfigRequest {
    /// Geographic region.
    pub region: String,
    /// Partner category.
    pub category: String,
    /// Subregion, if the configuration is subregion-specific.
    pub subregion: Option<String>,
    /// Dollars per goal for new-customer deals.
    pub new_customer_goal_rate: Decimal,
    /// Dollars per goal for renewal deals.
    pub renewal_goal_rate: Decimal,
    /// Monthly goal target.
    #[serde(default)]
    pub monthly_goal_target: Decimal,
}

/// Request body for updating a region configuration.
#[derive(Debug, Deserialize)]
pub struct UpdateRegionConfigRequest {
    /// New new-customer goal rate.
    pub new_customer_goal_rate: Option<Decimal>,
    /// New renewal goal rate.
    pub renewal_goal_rate: Option<Decimal>,
    /// New monthly goal target.
    pub monthly_goal_target: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Request body for creating a points configuration.
#[derive(Debug, Deserialize)]
pub struct CreatePointsConfigRequest {
    /// Geographic region.
    pub region: String,
    /// Dollars per point for new-customer deals.
    pub new_customer_rate: Decimal,
    /// Dollars per point for renewal deals.
    pub renewal_rate: Decimal,
}

/// Request body for updating a points configuration.
#[derive(Debug, Deserialize)]
pub struct UpdatePointsConfigRequest {
    /// New new-customer rate.
    pub new_customer_rate: Option<Decimal>,
    /// New renewal rate.
    pub renewal_rate: Option<Decimal>,
    /// New active flag.
    pub is_active: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Lists all region configurations.
async fn list_region_configs(State(state): State<AppState>) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo.list_region_configs().await {
        Ok(configs) => Json(configs).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Creates a region configuration.
async fn create_region_config(
    State(state): State<AppState>,
    Json(request): Json<CreateRegionConfigRequest>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo
        .create_region_config(CreateRegionConfigInput {
            region: request.region,
            category: request.category,
            subregion: request.subregion,
            new_customer_goal_rate: request.new_customer_goal_rate,
            renewal_goal_rate: request.renewal_goal_rate,
            monthly_goal_target: request.monthly_goal_target,
        })
        .await
    {
        Ok(config) => (StatusCode::CREATED, Json(config)).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Updates a region configuration.
async fn update_region_config(
    State(state): State<AppState>,
    Path(config_id): Path<Uuid>,
    Json(request): Json<UpdateRegionConfigRequest>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo
        .update_region_config(
            config_id,
            UpdateRegionConfigInput {
                new_customer_goal_rate: request.new_customer_goal_rate,
                renewal_goal_rate: request.renewal_goal_rate,
                monthly_goal_target: request.monthly_goal_target,
                is_active: request.is_active,
            },
        )
        .await
    {
        Ok(config) => Json(config).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Deletes a region configuration.
async fn delete_region_config(
    State(state): State<AppState>,
    Path(config_id): Path<Uuid>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo.delete_region_config(config_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Lists all points configurations.
async fn list_points_configs(State(state): State<AppState>) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo.list_points_configs().await {
        Ok(configs) => Json(configs).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Creates a points configuration.
async fn create_points_config(
    State(state): State<AppState>,
    Json(request): Json<CreatePointsConfigRequest>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo
        .create_points_config(CreatePointsConfigInput {
            region: request.region,
            new_customer_rate: request.new_customer_rate,
            renewal_rate: request.renewal_rate,
        })
        .await
    {
        Ok(config) => (StatusCode::CREATED, Json(config)).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Updates a points configuration.
async fn update_points_config(
    State(state): State<AppState>,
    Path(config_id): Path<Uuid>,
    Json(request): Json<UpdatePointsConfigRequest>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo
        .update_points_config(
            config_id,
            UpdatePointsConfigInput {
                new_customer_rate: request.new_customer_rate,
                renewal_rate: request.renewal_rate,
                is_active: request.is_active,
            },
        )
        .await
    {
        Ok(config) => Json(config).into_response(),
        Err(e) => config_error_response(&e),
    }
}

/// Deletes a points configuration.
async fn delete_points_config(
    State(state): State<AppState>,
    Path(config_id): Path<Uuid>,
) -> Response {
    let repo = ConfigRepository::new(state.db.clone());

    match repo.delete_points_config(config_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => config_error_response(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn config_error_response(error: &ConfigError) -> Response {
    let (status, code) = match error {
        ConfigError::NotFound(_) => (StatusCode::NOT_FOUND, "CONFIG_NOT_FOUND"),
        ConfigError::NonPositiveRate => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ConfigError::DuplicateActiveConfig => (StatusCode::CONFLICT, "DUPLICATE_ACTIVE_CONFIG"),
        ConfigError::Database(_) => {
            error!(%error, "configuration storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}
