use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Which half of a session pair a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl TokenSubject {
    pub fn new(id: impl ToString, email: impl ToString, role: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }
}

/// Signed payload of an access or refresh token.
///
/// Standard RFC 7519 fields (`sub`, `iat`, `exp`, `iss`) plus the email and
/// role of the subject and the token kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identity identifier
    pub sub: String,

    pub email: String,

    pub role: String,

    /// Token kind, checked on verification
    pub typ: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl SessionClaims {
    /// Build claims for `subject` valid for `ttl` starting at `issued_at`.
    pub fn new(
        subject: &TokenSubject,
        typ: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: subject.id.clone(),
            email: subject.email.clone(),
            role: subject.role.clone(),
            typ,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: None,
        }
    }

    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Subject projection without timing metadata.
    pub fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.sub.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject::new("user123", "alice@example.com", "patient")
    }

    #[test]
    fn test_new_claims() {
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = SessionClaims::new(
            &subject(),
            TokenKind::Access,
            issued_at,
            Duration::minutes(15),
        );

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "patient");
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(claims.iss.is_none());
    }

    #[test]
    fn test_subject_round_trip() {
        let claims = SessionClaims::new(
            &subject(),
            TokenKind::Refresh,
            Utc::now(),
            Duration::days(7),
        );
        assert_eq!(claims.subject(), subject());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let value = serde_json::to_value(TokenKind::Refresh).unwrap();
        assert_eq!(value, serde_json::json!("refresh"));
    }
}
