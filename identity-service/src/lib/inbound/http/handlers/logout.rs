use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Clears both session cookies. Succeeds with or without a live session.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, ApiSuccess<()>) {
    (
        state.transport.clear(jar),
        ApiSuccess::without_data(StatusCode::OK, "Logged Out Successfully"),
    )
}
