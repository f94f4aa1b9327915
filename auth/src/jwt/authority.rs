use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::SessionClaims;
use super::claims::TokenKind;
use super::claims::TokenSubject;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Signing material and lifetimes for session tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: Option<String>,
}

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Mints and verifies short-lived access tokens and long-lived refresh tokens.
///
/// Each kind is signed with its own secret and stamped with its kind, so a
/// leaked access token is never accepted where a refresh token is expected.
pub struct TokenAuthority {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: Option<String>,
}

impl TokenAuthority {
    pub fn new(config: &TokenConfig) -> Self {
        let mut access = JwtHandler::new(config.access_secret.as_bytes());
        let mut refresh = JwtHandler::new(config.refresh_secret.as_bytes());
        if let Some(issuer) = &config.issuer {
            access = access.with_issuer(issuer);
            refresh = refresh.with_issuer(issuer);
        }

        Self {
            access,
            refresh,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            issuer: config.issuer.clone(),
        }
    }

    pub fn issue_access(&self, subject: &TokenSubject) -> Result<String, JwtError> {
        self.issue_access_at(subject, Utc::now())
    }

    pub fn issue_refresh(&self, subject: &TokenSubject) -> Result<String, JwtError> {
        self.issue_refresh_at(subject, Utc::now())
    }

    /// Mint an access token as if issued at `issued_at`.
    pub fn issue_access_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = self.claims(subject, TokenKind::Access, issued_at, self.access_ttl);
        self.access.encode(&claims)
    }

    /// Mint a refresh token as if issued at `issued_at`.
    pub fn issue_refresh_at(
        &self,
        subject: &TokenSubject,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = self.claims(subject, TokenKind::Refresh, issued_at, self.refresh_ttl);
        self.refresh.encode(&claims)
    }

    /// Mint a new access and refresh token for the same subject.
    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, JwtError> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_access_at(subject, now)?,
            refresh_token: self.issue_refresh_at(subject, now)?,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }

    /// # Errors
    /// * `TokenExpired` - Access token lifetime has passed
    /// * `InvalidToken` - Bad signature or malformed token
    /// * `WrongTokenKind` - Token is not an access token
    pub fn verify_access(&self, token: &str) -> Result<SessionClaims, JwtError> {
        Self::expect_kind(self.access.decode(token)?, TokenKind::Access)
    }

    /// # Errors
    /// * `TokenExpired` - Refresh token lifetime has passed
    /// * `InvalidToken` - Bad signature or malformed token
    /// * `WrongTokenKind` - Token is not a refresh token
    pub fn verify_refresh(&self, token: &str) -> Result<SessionClaims, JwtError> {
        Self::expect_kind(self.refresh.decode(token)?, TokenKind::Refresh)
    }

    fn claims(
        &self,
        subject: &TokenSubject,
        typ: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> SessionClaims {
        let claims = SessionClaims::new(subject, typ, issued_at, ttl);
        match &self.issuer {
            Some(issuer) => claims.with_issuer(issuer),
            None => claims,
        }
    }

    fn expect_kind(claims: SessionClaims, expected: TokenKind) -> Result<SessionClaims, JwtError> {
        if claims.typ == expected {
            Ok(claims)
        } else {
            Err(JwtError::WrongTokenKind {
                expected,
                found: claims.typ,
            })
        }
    }
}
