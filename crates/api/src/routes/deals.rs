//! Deal routes: creation, listing, approval, rejection, deletion.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::Actor};
use incentiva_core::deal::DealError;
use incentiva_db::entities::{
    deals,
    sea_orm_active_enums::{DealStatus, DealType},
};
use incentiva_db::repositories::deal::{CreateDealInput, DealFilter, DealStoreError};
use incentiva_db::{ApprovalRepository, DealRepository};
use incentiva_shared::types::{PageRequest, PageResponse};

/// Creates the deal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deals", post(create_deal))
        .route("/deals", get(list_deals))
        .route("/deals/{deal_id}", get(get_deal))
        .route("/deals/{deal_id}", delete(delete_deal))
        .route("/deals/{deal_id}/approve", post(approve_deal))
        .route("/deals/{deal_id}/reject", post(reject_deal))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a deal.
#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    /// The seller who closed the deal.
    pub user_id: Uuid,
    /// Deal type (`new_customer` or `renewal`).
    pub deal_type: DealType,
    /// Monetary value of the sale.
    pub value: Decimal,
    /// The date the sale closed.
    pub close_date: NaiveDate,
    /// Optional free-form description.
    pub description: Option<String>,
}

/// Query parameters for listing deals.
#[derive(Debug, Deserialize)]
pub struct ListDealsQuery {
    /// Filter by status.
    pub status: Option<DealStatus>,
    /// Filter by owning user.
    pub user_id: Option<Uuid>,
    /// Filter by close date range start.
    pub from: Option<NaiveDate>,
    /// Filter by close date range end.
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Response body for a deal.
#[derive(Debug, Serialize)]
pub struct DealResponse {
    /// Deal ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Deal type.
    pub deal_type: DealType,
    /// Monetary value.
    pub value: Decimal,
    /// Lifecycle status.
    pub status: DealStatus,
    /// Points earned on approval.
    pub points_earned: i64,
    /// Goals earned on approval.
    pub goals_earned: Decimal,
    /// Close date.
    pub close_date: NaiveDate,
    /// Approver, once decided.
    pub approved_by: Option<Uuid>,
    /// Approval timestamp, once decided.
    pub approved_at: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl From<deals::Model> for DealResponse {
    fn from(model: deals::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            deal_type: model.deal_type,
            value: model.value,
            status: model.status,
            points_earned: model.points_earned,
            goals_earned: model.goals_earned,
            close_date: model.close_date,
            approved_by: model.approved_by,
            approved_at: model.approved_at.map(|t| t.to_rfc3339()),
            description: model.description,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Creates a deal in pending status.
async fn create_deal(
    State(state): State<AppState>,
    Json(request): Json<CreateDealRequest>,
) -> Response {
    let repo = DealRepository::new(state.db.clone(), state.audit.clone());

    match repo
        .create_deal(CreateDealInput {
            user_id: request.user_id,
            deal_type: request.deal_type,
            value: request.value,
            close_date: request.close_date,
            description: request.description,
        })
        .await
    {
        Ok(deal) => (StatusCode::CREATED, Json(DealResponse::from(deal))).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// Lists deals with optional filters.
async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<ListDealsQuery>,
) -> Response {
    let repo = DealRepository::new(state.db.clone(), state.audit.clone());

    let filter = DealFilter {
        status: query.status,
        user_id: query.user_id,
        from: query.from,
        to: query.to,
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo.list_deals(filter, &page).await {
        Ok((deals, total)) => {
            let data: Vec<DealResponse> = deals.into_iter().map(DealResponse::from).collect();
            Json(PageResponse::new(data, page.page, page.per_page, total)).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// Gets a deal by ID.
async fn get_deal(State(state): State<AppState>, Path(deal_id): Path<Uuid>) -> Response {
    let repo = DealRepository::new(state.db.clone(), state.audit.clone());

    match repo.get_deal(deal_id).await {
        Ok(deal) => Json(DealResponse::from(deal)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// Deletes a deal, emitting an audit snapshot.
async fn delete_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    actor: Actor,
) -> Response {
    let repo = DealRepository::new(state.db.clone(), state.audit.clone());

    match repo.delete_deal(deal_id, Some(actor.0)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// Approves a deal, recording its accruals.
async fn approve_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    actor: Actor,
) -> Response {
    let repo = ApprovalRepository::new(state.db.clone(), state.notifier.clone());

    match repo.approve_deal(deal_id, actor.0).await {
        Ok(deal) => Json(DealResponse::from(deal)).into_response(),
        Err(e) => deal_error_response(&e),
    }
}

/// Rejects a deal.
async fn reject_deal(State(state): State<AppState>, Path(deal_id): Path<Uuid>) -> Response {
    let repo = ApprovalRepository::new(state.db.clone(), state.notifier.clone());

    match repo.reject_deal(deal_id).await {
        Ok(deal) => Json(DealResponse::from(deal)).into_response(),
        Err(e) => deal_error_response(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn store_error_response(error: &DealStoreError) -> Response {
    let (status, code) = match error {
        DealStoreError::NotFound(_) => (StatusCode::NOT_FOUND, "DEAL_NOT_FOUND"),
        DealStoreError::UserNotFound(_) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        DealStoreError::NonPositiveValue(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        DealStoreError::Database(_) => {
            error!(%error, "deal storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}

fn deal_error_response(error: &DealError) -> Response {
    if matches!(error, DealError::Database(_)) {
        error!(%error, "deal workflow failure");
    }

    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({ "error": error.error_code(), "message": error.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_deal() -> deals::Model {
        deals::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            deal_type: DealType::NewCustomer,
            value: dec!(50_000),
            status: DealStatus::Approved,
            points_earned: 50,
            goals_earned: dec!(50.00),
            close_date: NaiveDate::from_ymd_opt(2026, 7, 15).expect("valid date"),
            approved_by: Some(Uuid::new_v4()),
            approved_at: Some(Utc::now().into()),
            description: Some("Q3 expansion".to_string()),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_deal_response_mapping() {
        let deal = sample_deal();
        let deal_id = deal.id;
        let response = DealResponse::from(deal);

        assert_eq!(response.id, deal_id);
        assert_eq!(response.points_earned, 50);
        assert_eq!(response.goals_earned, dec!(50.00));
        assert!(response.approved_at.is_some());
    }

    #[test]
    fn test_store_error_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            store_error_response(&DealStoreError::NotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            store_error_response(&DealStoreError::NonPositiveValue(dec!(-1))).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_deal_error_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            deal_error_response(&DealError::DealNotFound(id)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            deal_error_response(&DealError::Database("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
