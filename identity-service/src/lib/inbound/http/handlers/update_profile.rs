use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::identity::models::Principal;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating the caller's profile (raw JSON).
///
/// Unknown fields such as `email`, `role` or `password` are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfileCommand {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            phone: req.phone,
            date_of_birth: req.date_of_birth,
            address: req.address,
        }
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .auth_service
        .update_profile(&principal, req.into())
        .await
        .map_err(ApiError::from)
        .map(|ref identity| {
            ApiSuccess::new(StatusCode::OK, "Profile updated successfully", identity.into())
        })
}
