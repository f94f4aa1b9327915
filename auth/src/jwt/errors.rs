use thiserror::Error;

use super::claims::TokenKind;

/// Error type for JWT operations.
///
/// `TokenExpired` and `InvalidToken` are kept apart so callers can prompt a
/// refresh for the former and force a new login for the latter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Expected {expected} token, got {found} token")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },
}
