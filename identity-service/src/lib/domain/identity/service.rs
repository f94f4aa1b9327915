use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenPair;
use auth::TokenSubject;
use chrono::Utc;

use crate::domain::identity::lockout::LockoutPolicy;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::Profile;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::models::Session;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::identity::errors::AuthError;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::DoctorDirectory;
use crate::identity::ports::IdentityRepository;

/// Domain service implementation for authentication and sessions.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<IR, DD>
where
    IR: IdentityRepository,
    DD: DoctorDirectory,
{
    repository: Arc<IR>,
    doctors: Arc<DD>,
    authenticator: Arc<Authenticator>,
    lockout: LockoutPolicy,
}

impl<IR, DD> AuthService<IR, DD>
where
    IR: IdentityRepository,
    DD: DoctorDirectory,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `doctors` - Doctor profile lookup implementation
    /// * `authenticator` - Password policy, hashing and token handling
    /// * `lockout` - Failed-login threshold and lock duration
    pub fn new(
        repository: Arc<IR>,
        doctors: Arc<DD>,
        authenticator: Arc<Authenticator>,
        lockout: LockoutPolicy,
    ) -> Self {
        Self {
            repository,
            doctors,
            authenticator,
            lockout,
        }
    }

    async fn create_identity(
        &self,
        command: RegisterCommand,
        role: Role,
    ) -> Result<Identity, AuthError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateEmail(command.email.to_string()));
        }

        let password = command.password;
        let password_hash = self
            .off_runtime(move |authenticator| authenticator.hash_password(&password))
            .await?
            .map_err(|e| match e {
                AuthenticationError::WeakPassword(reason) => AuthError::WeakPassword(reason),
                other => AuthError::Unknown(format!("Password hashing failed: {}", other)),
            })?;

        let identity = Identity::new(
            command.email,
            password_hash,
            command.details,
            role,
            Utc::now(),
        );

        self.repository.create(identity).await
    }

    /// Argon2 work is CPU-bound; run it on the blocking pool.
    async fn off_runtime<T, F>(&self, work: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| AuthError::Unknown(format!("Password task failed: {}", e)))
    }

    fn issue_tokens(&self, subject: &TokenSubject) -> Result<TokenPair, AuthError> {
        Ok(self.authenticator.issue_tokens(subject)?)
    }

    async fn load(&self, id: &IdentityId) -> Result<Identity, AuthError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AuthError::IdentityNotFound(id.to_string()))
    }
}

#[async_trait]
impl<IR, DD> AuthServicePort for AuthService<IR, DD>
where
    IR: IdentityRepository,
    DD: DoctorDirectory,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError> {
        let identity = self.create_identity(command, Role::Patient).await?;
        let tokens = self.issue_tokens(&identity.token_subject())?;

        tracing::info!(identity_id = %identity.id, role = %identity.role, "Identity registered");

        Ok(Session { identity, tokens })
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = EmailAddress::new(email.to_string()).map_err(|_| AuthError::InvalidCredentials)?;

        let mut identity = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let now = Utc::now();

        if self.lockout.expire_if_due(&identity.lockout, now) != identity.lockout {
            identity = self.repository.reset_login_failures(&identity.id, now).await?;
            tracing::info!(identity_id = %identity.id, "Account lock expired");
        }

        if self.lockout.is_locked(&identity.lockout, now) {
            tracing::warn!(identity_id = %identity.id, "Login refused for locked account");
            return Err(AuthError::AccountLocked {
                locked_until: identity.lockout.locked_until,
            });
        }

        let candidate = password.to_string();
        let password_hash = identity.password_hash.clone();
        let verification = self
            .off_runtime(move |authenticator| {
                authenticator.verify_password(&candidate, &password_hash)
            })
            .await?;

        match verification {
            Ok(()) => {}
            Err(AuthenticationError::WeakPassword(reason)) => {
                return Err(AuthError::WeakPassword(reason));
            }
            Err(AuthenticationError::InvalidCredentials) => {
                let updated = self
                    .repository
                    .record_login_failure(&identity.id, &self.lockout, now)
                    .await?;

                if self.lockout.is_locked(&updated.lockout, now) {
                    tracing::warn!(
                        identity_id = %updated.id,
                        failed_login_attempts = updated.lockout.failed_login_attempts,
                        "Account locked after repeated failed logins"
                    );
                    return Err(AuthError::AccountLocked {
                        locked_until: updated.lockout.locked_until,
                    });
                }

                tracing::warn!(
                    identity_id = %updated.id,
                    failed_login_attempts = updated.lockout.failed_login_attempts,
                    "Failed login"
                );
                return Err(AuthError::InvalidCredentials);
            }
            Err(AuthenticationError::PasswordError(e)) => {
                return Err(AuthError::Unknown(format!(
                    "Password verification failed: {}",
                    e
                )));
            }
        }

        let identity = self.repository.reset_login_failures(&identity.id, now).await?;
        let tokens = self.issue_tokens(&identity.token_subject())?;

        tracing::info!(identity_id = %identity.id, "Login succeeded");

        Ok(Session { identity, tokens })
    }

    async fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, AuthError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;

        let claims = self
            .authenticator
            .validate_refresh_token(token)
            .inspect_err(|e| tracing::debug!(error = %e, "Refresh token rejected"))?;

        self.issue_tokens(&claims.subject())
    }

    async fn authenticate(&self, access_token: Option<&str>) -> Result<Principal, AuthError> {
        let token = access_token.ok_or(AuthError::MissingToken)?;

        let claims = self
            .authenticator
            .validate_access_token(token)
            .inspect_err(|e| tracing::debug!(error = %e, "Access token rejected"))?;

        let id = IdentityId::from_string(&claims.sub).map_err(|_| AuthError::TokenInvalid)?;
        let identity = self.load(&id).await?;

        if self.lockout.is_locked(&identity.lockout, Utc::now()) {
            return Err(AuthError::AccountLocked {
                locked_until: identity.lockout.locked_until,
            });
        }

        Ok(Principal::from(&identity))
    }

    async fn get_profile(&self, principal: &Principal) -> Result<Profile, AuthError> {
        let identity = self.load(&principal.id).await?;

        let doctor = match identity.role {
            Role::Doctor => self.doctors.find_by_identity(&identity.id).await?,
            Role::Patient | Role::Admin => None,
        };

        Ok(Profile { identity, doctor })
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        command: UpdateProfileCommand,
    ) -> Result<Identity, AuthError> {
        let mut identity = self.load(&principal.id).await?;

        command.apply(&mut identity.details);
        identity.updated_at = Utc::now();

        self.repository.save(identity).await
    }

    async fn provision_admin(&self, command: RegisterCommand) -> Result<Identity, AuthError> {
        if self.repository.exists_with_role(Role::Admin).await? {
            return Err(AuthError::AdminAlreadyExists);
        }

        let identity = self.create_identity(command, Role::Admin).await?;

        tracing::info!(identity_id = %identity.id, "Admin identity created");

        Ok(identity)
    }
}
