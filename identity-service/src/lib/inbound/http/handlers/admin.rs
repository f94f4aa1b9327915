use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::identity::models::Principal;

/// Role-gated probe; reachable only through the admin guard.
pub async fn admin_ping(Extension(principal): Extension<Principal>) -> ApiSuccess<PrincipalData> {
    ApiSuccess::new(StatusCode::OK, "Admin access granted", (&principal).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalData {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl From<&Principal> for PrincipalData {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            email: principal.email.clone(),
            role: principal.role.as_str().to_string(),
        }
    }
}
