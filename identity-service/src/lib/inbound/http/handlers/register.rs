use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::PersonalDetails;
use crate::domain::identity::models::RegisterCommand;
use crate::identity::errors::EmailError;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<(CookieJar, ApiSuccess<IdentityData>), ApiError> {
    let session = state.auth_service.register(body.try_into_command()?).await?;

    Ok((
        state.transport.attach(jar, &session.tokens),
        ApiSuccess::new(
            StatusCode::CREATED,
            "Signed Up Successfully",
            (&session.identity).into(),
        ),
    ))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    email: String,
    password: String,
    full_name: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<NaiveDate>,
    address: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let email = EmailAddress::new(self.email)?;
        let details = PersonalDetails {
            full_name: self.full_name,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            address: self.address,
        };
        Ok(RegisterCommand::new(email, self.password, details))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest {
            code: "VALIDATION_ERROR",
            message: err.to_string(),
        }
    }
}
