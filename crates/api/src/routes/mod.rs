//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod configs;
pub mod criteria;
pub mod deals;
pub mod health;
pub mod rankings;
pub mod recalculation;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(deals::routes())
        .merge(configs::routes())
        .merge(criteria::routes())
        .merge(rankings::routes())
        .merge(recalculation::routes())
}
