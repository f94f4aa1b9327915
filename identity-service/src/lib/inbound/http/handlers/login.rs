use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<UserData>), ApiError> {
    let session = state
        .auth_service
        .login(&body.email, &body.password)
        .await?;

    Ok((
        state.transport.attach(jar, &session.tokens),
        ApiSuccess::new(
            StatusCode::OK,
            "Logged in Successfully",
            (&session.identity).into(),
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
