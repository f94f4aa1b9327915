use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;

use crate::domain::identity::models::Principal;
use crate::domain::identity::models::Role;
use crate::identity::errors::AuthError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiResponseBody;
use crate::inbound::http::router::AppState;

/// Resolves the access token cookie into a [`Principal`] and stores it in
/// the request extensions. Short-circuits on any failure.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookies = state.transport.read(&CookieJar::from_headers(req.headers()));

    let principal = state
        .auth_service
        .authenticate(cookies.access_token.as_deref())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, uri = %req.uri(), "Request rejected by auth gate");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Checks the attached principal's role against `allowed`.
///
/// Must run after [`require_auth`].
pub async fn authorize(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or(AuthError::Unauthenticated)?;

    principal.ensure_role(allowed).inspect_err(|_| {
        tracing::warn!(
            identity_id = %principal.id,
            role = %principal.role,
            uri = %req.uri(),
            "Role not allowed"
        );
    })?;

    Ok(next.run(req).await)
}

/// Replaces internal error details with a generic body in production.
pub async fn mask_internal_errors(State(state): State<AppState>, response: Response) -> Response {
    if state.production && response.status() == StatusCode::INTERNAL_SERVER_ERROR {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponseBody::<()>::error(
                "Something went wrong",
                "SERVER_ERROR",
                None,
            )),
        )
            .into_response();
    }

    response
}
