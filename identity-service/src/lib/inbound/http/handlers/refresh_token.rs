use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<()>), ApiError> {
    let cookies = state.transport.read(&jar);

    let tokens = state
        .auth_service
        .refresh(cookies.refresh_token.as_deref())
        .await?;

    Ok((
        state.transport.attach(jar, &tokens),
        ApiSuccess::without_data(StatusCode::OK, "Tokens Refreshed Successfully"),
    ))
}
