use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;

use crate::identity::errors::AuthError;
use crate::identity::models::Identity;

pub mod admin;
pub mod get_profile;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod update_profile;

const SUCCESS_CODE: &str = "SUCCESS";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::success(message, Some(data))),
        )
    }
}

impl ApiSuccess<()> {
    pub fn without_data(status: StatusCode, message: &str) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::success(message, None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest { code: &'static str, message: String },
    Unauthorized { code: &'static str, message: String },
    Locked {
        message: String,
        locked_until: Option<DateTime<Utc>>,
    },
    Forbidden(String),
    NotFound(String),
    Conflict { code: &'static str, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } | ApiError::Locked { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "INTERNAL_ERROR",
            ApiError::BadRequest { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Conflict { code, .. } => *code,
            ApiError::Locked { .. } => "ACCOUNT_LOCKED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            ApiError::Locked {
                message,
                locked_until,
            } => ApiResponseBody::error(&message, code, Some(LockedData { locked_until })),
            ApiError::InternalServerError(message) => {
                tracing::error!(error = %message, "Request failed with internal error");
                ApiResponseBody::error(&message, code, None)
            }
            ApiError::BadRequest { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message) => ApiResponseBody::error(&message, code, None),
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::WeakPassword(_) => ApiError::BadRequest {
                code: "WEAK_PASSWORD",
                message,
            },
            AuthError::InvalidEmail(_)
            | AuthError::InvalidRole(_)
            | AuthError::InvalidIdentityId(_) => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message,
            },
            AuthError::DuplicateEmail(_) => ApiError::Conflict {
                code: "DUPLICATE_EMAIL",
                message,
            },
            AuthError::AdminAlreadyExists => ApiError::Conflict {
                code: "DUPLICATE_ENTRY",
                message,
            },
            AuthError::InvalidCredentials => ApiError::Unauthorized {
                code: "INVALID_CREDENTIALS",
                message,
            },
            AuthError::AccountLocked { locked_until } => ApiError::Locked {
                message,
                locked_until,
            },
            AuthError::MissingToken => ApiError::Unauthorized {
                code: "MISSING_TOKEN",
                message,
            },
            AuthError::TokenExpired => ApiError::Unauthorized {
                code: "TOKEN_EXPIRED",
                message,
            },
            AuthError::TokenInvalid => ApiError::Unauthorized {
                code: "TOKEN_INVALID",
                message,
            },
            AuthError::Unauthenticated => ApiError::Unauthorized {
                code: "UNAUTHENTICATED",
                message,
            },
            AuthError::IdentityNotFound(_) => ApiError::NotFound(message),
            AuthError::ForbiddenRole { .. } => ApiError::Forbidden(message),
            AuthError::DatabaseError(_) | AuthError::Unknown(_) => {
                ApiError::InternalServerError(message)
            }
        }
    }
}

/// JSON envelope shared by every response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    code: String,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn success(message: &str, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data,
            code: SUCCESS_CODE.to_string(),
        }
    }

    pub fn error(message: &str, code: &str, data: Option<T>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data,
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedData {
    pub locked_until: Option<DateTime<Utc>>,
}

/// Outward representation of an identity. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityData {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub address: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub is_locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
    pub failed_login_attempts: u32,
    pub doctor_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for IdentityData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.as_str().to_string(),
            full_name: identity.details.full_name.clone(),
            phone: identity.details.phone.clone(),
            date_of_birth: identity.details.date_of_birth,
            age: identity.age_on(Utc::now().date_naive()),
            address: identity.details.address.clone(),
            role: identity.role.as_str().to_string(),
            is_active: identity.is_active,
            is_locked: identity.lockout.is_locked,
            locked_until: identity.lockout.locked_until,
            failed_login_attempts: identity.lockout.failed_login_attempts,
            doctor_id: identity.doctor_id.map(|id| id.to_string()),
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

/// Payload for responses that wrap a single identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub user: IdentityData,
}

impl From<&Identity> for UserData {
    fn from(identity: &Identity) -> Self {
        Self {
            user: identity.into(),
        }
    }
}
