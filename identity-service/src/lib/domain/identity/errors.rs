use auth::JwtError;
use auth::PasswordPolicyError;
use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::identity::models::Role;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Top-level error for authentication and session operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid identity ID: {0}")]
    InvalidIdentityId(#[from] IdentityIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("{0}")]
    WeakPassword(#[from] PasswordPolicyError),

    // Credential errors
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is locked")]
    AccountLocked { locked_until: Option<DateTime<Utc>> },

    #[error("An admin account already exists")]
    AdminAlreadyExists,

    // Session errors
    #[error("Authentication token required")]
    MissingToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is invalid")]
    TokenInvalid,

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Role {role} is not allowed to access this resource")]
    ForbiddenRole { role: Role },

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken(_) | JwtError::WrongTokenKind { .. } => AuthError::TokenInvalid,
            JwtError::EncodingFailed(msg) => AuthError::Unknown(msg),
        }
    }
}
