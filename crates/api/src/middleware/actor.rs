//! Gateway actor extractor.
//!
//! Authentication itself lives in the upstream gateway, which forwards the
//! authenticated user's id in the `X-Actor-Id` header. Handlers that need
//! to know who acted take an [`Actor`] argument.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

/// Header carrying the authenticated user's id, set by the gateway.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The authenticated user on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub Uuid);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok());

        let Some(raw) = header else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "MISSING_ACTOR",
                    "message": "X-Actor-Id header is required"
                })),
            )
                .into_response());
        };

        match Uuid::parse_str(raw) {
            Ok(id) => Ok(Self(id)),
            Err(_) => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "INVALID_ACTOR",
                    "message": "X-Actor-Id header must be a UUID"
                })),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_actor_extracted_from_header() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .header("X-Actor-Id", id.to_string())
            .body(())
            .expect("request");
        let (mut parts, ()) = request.into_parts();

        let actor = Actor::from_request_parts(&mut parts, &())
            .await
            .expect("actor");
        assert_eq!(actor.0, id);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).expect("request");
        let (mut parts, ()) = request.into_parts();

        let rejection = Actor::from_request_parts(&mut parts, &())
            .await
            .expect_err("rejection");
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header_is_unauthorized() {
        let request = Request::builder()
            .header("X-Actor-Id", "not-a-uuid")
            .body(())
            .expect("request");
        let (mut parts, ()) = request.into_parts();

        let rejection = Actor::from_request_parts(&mut parts, &())
            .await
            .expect_err("rejection");
        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }
}
