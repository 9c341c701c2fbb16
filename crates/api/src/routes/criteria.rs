//! Prize criteria routes, including the single-active activation.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use incentiva_db::CriteriaRepository;
use incentiva_db::entities::sea_orm_active_enums::CriteriaType;
use incentiva_db::repositories::criteria::{
    CreateCriteriaInput, CriteriaError, UpdateCriteriaInput,
};

/// Creates the prize criteria routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/prize-criteria", get(list_criteria))
        .route("/prize-criteria", post(create_criteria))
        .route("/prize-criteria/{criteria_id}", get(get_criteria))
        .route("/prize-criteria/{criteria_id}", patch(update_criteria))
        .route("/prize-criteria/{criteria_id}", delete(delete_criteria))
        .route("/prize-criteria/{criteria_id}/activate", post(activate_criteria))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a prize criteria.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCriteriaRequest {
    /// Human-readable name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Scoring mode.
    pub criteria_type: CriteriaType,
    /// Region restriction, if any.
    pub region: Option<String>,
    /// Category restriction, if any.
    pub category: Option<String>,
    /// Subregion restriction, if any.
    pub subregion: Option<String>,
    /// Minimum earned points to qualify.
    pub min_points: Option<i64>,
    /// Minimum approved deal count to qualify.
    pub min_deals: Option<i64>,
    /// Weight of points in a combined score, percent.
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub points_weight: i16,
    /// Weight of deal count in a combined score, percent.
    #[serde(default)]
    #[validate(range(min = 0, max = 100))]
    pub deals_weight: i16,
    /// Evaluation window start.
    pub starts_on: Option<NaiveDate>,
    /// Evaluation window end.
    pub ends_on: Option<NaiveDate>,
}

/// Request body for updating a prize criteria.
#[derive(Debug, Deserialize)]
pub struct UpdateCriteriaRequest {
    /// New name.
    pub name: Option<String>,
    /// New minimum points threshold.
    pub min_points: Option<Option<i64>>,
    /// New minimum deals threshold.
    pub min_deals: Option<Option<i64>>,
    /// New points weight.
    pub points_weight: Option<i16>,
    /// New deals weight.
    pub deals_weight: Option<i16>,
    /// New evaluation window start.
    pub starts_on: Option<Option<NaiveDate>>,
    /// New evaluation window end.
    pub ends_on: Option<Option<NaiveDate>>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Lists all criteria.
async fn list_criteria(State(state): State<AppState>) -> Response {
    let repo = CriteriaRepository::new(state.db.clone());

    match repo.list_criteria().await {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

/// Creates a criteria, inactive until activated.
async fn create_criteria(
    State(state): State<AppState>,
    Json(request): Json<CreateCriteriaRequest>,
) -> Response {
    if let Err(errors) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "VALIDATION_ERROR", "message": errors.to_string() })),
        )
            .into_response();
    }

    let repo = CriteriaRepository::new(state.db.clone());

    match repo
        .create_criteria(CreateCriteriaInput {
            name: request.name,
            criteria_type: request.criteria_type,
            region: request.region,
            category: request.category,
            subregion: request.subregion,
            min_points: request.min_points,
            min_deals: request.min_deals,
            points_weight: request.points_weight,
            deals_weight: request.deals_weight,
            starts_on: request.starts_on,
            ends_on: request.ends_on,
        })
        .await
    {
        Ok(criteria) => (StatusCode::CREATED, Json(criteria)).into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

/// Gets a criteria by ID.
async fn get_criteria(State(state): State<AppState>, Path(criteria_id): Path<Uuid>) -> Response {
    let repo = CriteriaRepository::new(state.db.clone());

    match repo.get_criteria(criteria_id).await {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

/// Updates a criteria.
async fn update_criteria(
    State(state): State<AppState>,
    Path(criteria_id): Path<Uuid>,
    Json(request): Json<UpdateCriteriaRequest>,
) -> Response {
    let repo = CriteriaRepository::new(state.db.clone());

    match repo
        .update_criteria(
            criteria_id,
            UpdateCriteriaInput {
                name: request.name,
                min_points: request.min_points,
                min_deals: request.min_deals,
                points_weight: request.points_weight,
                deals_weight: request.deals_weight,
                starts_on: request.starts_on,
                ends_on: request.ends_on,
            },
        )
        .await
    {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

/// Deletes a criteria.
async fn delete_criteria(State(state): State<AppState>, Path(criteria_id): Path<Uuid>) -> Response {
    let repo = CriteriaRepository::new(state.db.clone());

    match repo.delete_criteria(criteria_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

/// Activates a criteria, deactivating all others transactionally.
async fn activate_criteria(
    State(state): State<AppState>,
    Path(criteria_id): Path<Uuid>,
) -> Response {
    let repo = CriteriaRepository::new(state.db.clone());

    match repo.activate_criteria(criteria_id).await {
        Ok(criteria) => Json(criteria).into_response(),
        Err(e) => criteria_error_response(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn criteria_error_response(error: &CriteriaError) -> Response {
    let (status, code) = match error {
        CriteriaError::NotFound(_) => (StatusCode::NOT_FOUND, "CRITERIA_NOT_FOUND"),
        CriteriaError::InvalidWeights { .. } => (StatusCode::BAD_REQUEST, "INVALID_WEIGHTS"),
        CriteriaError::Database(_) => {
            error!(%error, "criteria storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}
