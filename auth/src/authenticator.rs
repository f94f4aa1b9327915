use crate::jwt::JwtError;
use crate::jwt::SessionClaims;
use crate::jwt::TokenAuthority;
use crate::jwt::TokenConfig;
use crate::jwt::TokenPair;
use crate::jwt::TokenSubject;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordPolicy;
use crate::password::PasswordPolicyError;

/// Authentication coordinator combining password policy, password hashing
/// and session token handling.
pub struct Authenticator {
    password_policy: PasswordPolicy,
    password_hasher: PasswordHasher,
    token_authority: TokenAuthority,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_policy` - Strength rules applied before hashing and verifying
    /// * `token_config` - Signing secrets and lifetimes for session tokens
    pub fn new(password_policy: PasswordPolicy, token_config: &TokenConfig) -> Self {
        Self {
            password_policy,
            password_hasher: PasswordHasher::new(),
            token_authority: TokenAuthority::new(token_config),
        }
    }

    pub fn token_authority(&self) -> &TokenAuthority {
        &self.token_authority
    }

    /// Enforce the password policy, then hash the password for storage.
    ///
    /// # Errors
    /// * `WeakPassword` - Password does not satisfy the policy
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, AuthenticationError> {
        self.password_policy.validate(password)?;
        Ok(self.password_hasher.hash(password)?)
    }

    /// Enforce the password policy, then compare against the stored hash.
    ///
    /// A password that fails the policy is rejected with `WeakPassword`
    /// without ever reaching the hash comparison.
    ///
    /// # Errors
    /// * `WeakPassword` - Password does not satisfy the policy
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        self.password_policy.validate(password)?;

        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Mint a fresh access/refresh pair for the subject.
    pub fn issue_tokens(&self, subject: &TokenSubject) -> Result<TokenPair, JwtError> {
        self.token_authority.issue_pair(subject)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.token_authority.verify_access(token)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<SessionClaims, JwtError> {
        self.token_authority.verify_refresh(token)
    }
}
