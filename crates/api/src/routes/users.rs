//! User routes: carrier CRUD plus points balance and redemption.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use crate::AppState;
use incentiva_db::entities::{sea_orm_active_enums::UserRole, users};
use incentiva_db::repositories::ledger::LedgerError;
use incentiva_db::repositories::user::{CreateUserInput, UserError};
use incentiva_db::{LedgerRepository, UserRepository};
use incentiva_shared::types::{PageRequest, PageResponse};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/points", get(get_points))
        .route("/users/{user_id}/redeem", post(redeem_points))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Full display name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    /// Unique email address.
    #[validate(email)]
    pub email: String,
    /// Platform role.
    pub role: UserRole,
    /// Geographic region.
    #[validate(length(min = 1, max = 100))]
    pub region: String,
    /// Partner category, if any.
    pub category: Option<String>,
    /// Subregion, if any.
    pub subregion: Option<String>,
}

/// Request body for redeeming points.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// Points to redeem; must be positive.
    pub points: i64,
    /// What the redemption was for.
    pub description: String,
}

/// Response body for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Full display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Platform role.
    pub role: UserRole,
    /// Region.
    pub region: String,
    /// Partner category.
    pub category: Option<String>,
    /// Subregion.
    pub subregion: Option<String>,
    /// Whether the user is active.
    pub is_active: bool,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            role: model.role,
            region: model.region,
            category: model.category,
            subregion: model.subregion,
            is_active: model.is_active,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Creates a user.
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Response {
    if let Err(errors) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "VALIDATION_ERROR", "message": errors.to_string() })),
        )
            .into_response();
    }

    let repo = UserRepository::new(state.db.clone());

    match repo
        .create_user(CreateUserInput {
            full_name: request.full_name,
            email: request.email,
            role: request.role,
            region: request.region,
            category: request.category,
            subregion: request.subregion,
        })
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(user))).into_response(),
        Err(e) => user_error_response(&e),
    }
}

/// Lists users with pagination.
async fn list_users(State(state): State<AppState>, Query(page): Query<PageRequest>) -> Response {
    let repo = UserRepository::new(state.db.clone());

    match repo.list_users(&page).await {
        Ok((users, total)) => {
            let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            Json(PageResponse::new(data, page.page, page.per_page, total)).into_response()
        }
        Err(e) => user_error_response(&e),
    }
}

/// Gets a user by ID.
async fn get_user(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Response {
    let repo = UserRepository::new(state.db.clone());

    match repo.get_user(user_id).await {
        Ok(user) => Json(UserResponse::from(user)).into_response(),
        Err(e) => user_error_response(&e),
    }
}

/// Returns the user's points balance, earned total, and history.
async fn get_points(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Response {
    let ledger = LedgerRepository::new(state.db.clone());

    let balance = match ledger.points_balance(user_id).await {
        Ok(balance) => balance,
        Err(e) => return ledger_error_response(&e),
    };
    let earned = match ledger.points_earned(user_id).await {
        Ok(earned) => earned,
        Err(e) => return ledger_error_response(&e),
    };
    let history = match ledger.points_history(user_id).await {
        Ok(history) => history,
        Err(e) => return ledger_error_response(&e),
    };

    Json(json!({
        "user_id": user_id,
        "balance": balance,
        "earned": earned,
        "history": history,
    }))
    .into_response()
}

/// Redeems points against the user's balance.
async fn redeem_points(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<RedeemRequest>,
) -> Response {
    let ledger = LedgerRepository::new(state.db.clone());

    match ledger
        .redeem_points(user_id, request.points, request.description)
        .await
    {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn user_error_response(error: &UserError) -> Response {
    let (status, code) = match error {
        UserError::NotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        UserError::DuplicateEmail(_) => (StatusCode::CONFLICT, "DUPLICATE_EMAIL"),
        UserError::Database(_) => {
            error!(%error, "user storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}

fn ledger_error_response(error: &LedgerError) -> Response {
    let (status, code) = match error {
        LedgerError::NonPositiveRedemption => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        LedgerError::InsufficientBalance { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_BALANCE")
        }
        LedgerError::Database(_) => {
            error!(%error, "ledger failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}
