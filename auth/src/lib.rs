//! Authentication utilities library
//!
//! Reusable credential and session-token infrastructure:
//! - Password strength policy
//! - Password hashing (Argon2id)
//! - Access/refresh JWT issuance and verification
//! - Authentication coordination
//!
//! The library knows nothing about storage or HTTP. Services define their
//! own identity records and adapt these building blocks.
//!
//! # Examples
//!
//! ## Password Policy and Hashing
//! ```
//! use auth::{PasswordHasher, PasswordPolicy};
//!
//! let policy = PasswordPolicy::new();
//! assert!(policy.validate("weak").is_err());
//! policy.validate("Abcdef1").unwrap();
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcdef1").unwrap();
//! assert!(hasher.verify("Abcdef1", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{TokenAuthority, TokenConfig, TokenSubject};
//! use chrono::Duration;
//!
//! let authority = TokenAuthority::new(&TokenConfig {
//!     access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!     refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!     access_ttl: Duration::minutes(15),
//!     refresh_ttl: Duration::days(7),
//!     issuer: None,
//! });
//!
//! let subject = TokenSubject::new("user123", "alice@example.com", "patient");
//! let pair = authority.issue_pair(&subject).unwrap();
//!
//! let claims = authority.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.subject(), subject);
//! assert!(authority.verify_refresh(&pair.access_token).is_err());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordPolicy, TokenConfig, TokenSubject};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(
//!     PasswordPolicy::new(),
//!     &TokenConfig {
//!         access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!         refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!         access_ttl: Duration::minutes(15),
//!         refresh_ttl: Duration::days(7),
//!         issuer: None,
//!     },
//! );
//!
//! // Register: enforce policy and hash
//! let hash = auth.hash_password("Password123").unwrap();
//!
//! // Login: enforce policy, verify and mint tokens
//! auth.verify_password("Password123", &hash).unwrap();
//! let pair = auth
//!     .issue_tokens(&TokenSubject::new("user123", "alice@example.com", "patient"))
//!     .unwrap();
//!
//! // Validate token
//! let claims = auth.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SessionClaims;
pub use jwt::TokenAuthority;
pub use jwt::TokenConfig;
pub use jwt::TokenKind;
pub use jwt::TokenPair;
pub use jwt::TokenSubject;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PasswordPolicyError;
