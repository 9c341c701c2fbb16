//! Ranking routes: prize rankings and monthly goal progress.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use incentiva_db::RankingRepository;
use incentiva_db::repositories::ranking::RankingError;

/// Creates the ranking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rankings/goal-progress", get(goal_progress))
        .route("/rankings/{criteria_id}", get(get_ranking))
}

/// Query parameters for the goal progress report.
#[derive(Debug, Deserialize)]
pub struct GoalProgressQuery {
    /// Region to report on.
    pub region: String,
    /// Attribution month, 1 to 12.
    pub month: i16,
    /// Attribution year.
    pub year: i16,
}

/// Produces the ordered ranking for a stored criteria.
async fn get_ranking(State(state): State<AppState>, Path(criteria_id): Path<Uuid>) -> Response {
    let repo = RankingRepository::new(state.db.clone());

    match repo.get_ranking(criteria_id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => ranking_error_response(&e),
    }
}

/// Monthly goals against configured targets for one region.
async fn goal_progress(
    State(state): State<AppState>,
    Query(query): Query<GoalProgressQuery>,
) -> Response {
    if !(1..=12).contains(&query.month) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "VALIDATION_ERROR", "message": "month must be 1 to 12" })),
        )
            .into_response();
    }

    let repo = RankingRepository::new(state.db.clone());

    match repo.goal_progress(&query.region, query.month, query.year).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => ranking_error_response(&e),
    }
}

fn ranking_error_response(error: &RankingError) -> Response {
    let (status, code) = match error {
        RankingError::CriteriaNotFound(_) => (StatusCode::NOT_FOUND, "CRITERIA_NOT_FOUND"),
        RankingError::Database(_) => {
            error!(%error, "ranking query failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
        }
    };

    (
        status,
        Json(json!({ "error": code, "message": error.to_string() })),
    )
        .into_response()
}
