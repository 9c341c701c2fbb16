//! Administrative recalculation route.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::Actor};
use incentiva_db::RecalculationJob;

/// Creates the recalculation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/recalculate-points", post(recalculate_points))
}

/// Re-derives points for every deal against current configuration.
///
/// Per-deal failures are reported in the response body; they do not fail
/// the request.
async fn recalculate_points(State(state): State<AppState>, actor: Actor) -> Response {
    info!(actor_id = %actor.0, "points recalculation requested");

    let job = RecalculationJob::new(state.db.clone());

    match job.recalculate_points().await {
        Ok(summary) => Json(json!({
            "updated": summary.updated,
            "errors": summary.errors,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "points recalculation failed to start");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "DATABASE_ERROR", "message": e.to_string() })),
            )
                .into_response()
        }
    }
}
