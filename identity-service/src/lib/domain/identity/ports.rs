use async_trait::async_trait;
use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::lockout::LockoutPolicy;
use crate::domain::identity::models::DoctorProfile;
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

/// Port for authentication and session operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new patient identity and open a session.
    ///
    /// # Arguments
    /// * `command` - Validated email, plaintext password and profile fields
    ///
    /// # Returns
    /// Created identity and a fresh token pair
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `WeakPassword` - Password fails the strength policy
    /// * `DatabaseError` - Storage operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Session, AuthError>;

    /// Check credentials, maintain the lockout counters and open a session.
    ///
    /// # Arguments
    /// * `email` - Raw email as submitted
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// Authenticated identity and a fresh token pair
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `AccountLocked` - Account is locked, or this failure locked it
    /// * `WeakPassword` - Password fails the strength policy (counter untouched)
    /// * `DatabaseError` - Storage operation failed
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Rotate a session: verify the refresh token and mint a new pair.
    ///
    /// # Arguments
    /// * `refresh_token` - Refresh token read from the transport, if any
    ///
    /// # Errors
    /// * `MissingToken` - No refresh token was presented
    /// * `TokenExpired` - Refresh token lifetime has passed
    /// * `TokenInvalid` - Refresh token is forged or malformed
    async fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, AuthError>;

    /// Resolve an access token into the principal of a live, unlocked identity.
    ///
    /// # Arguments
    /// * `access_token` - Access token read from the transport, if any
    ///
    /// # Errors
    /// * `MissingToken` - No access token was presented
    /// * `TokenExpired` - Access token lifetime has passed
    /// * `TokenInvalid` - Access token is forged or malformed
    /// * `IdentityNotFound` - Identity was deleted after the token was issued
    /// * `AccountLocked` - Identity is currently locked
    async fn authenticate(&self, access_token: Option<&str>) -> Result<Principal, AuthError>;

    /// Load the principal's identity, composed with its doctor profile for doctors.
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity no longer exists
    /// * `DatabaseError` - Storage operation failed
    async fn get_profile(&self, principal: &Principal) -> Result<Profile, AuthError>;

    /// Change profile fields of the principal's identity.
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity no longer exists
    /// * `DatabaseError` - Storage operation failed
    async fn update_profile(
        &self,
        principal: &Principal,
        command: UpdateProfileCommand,
    ) -> Result<Identity, AuthError>;

    /// Create the first admin identity.
    ///
    /// # Errors
    /// * `AdminAlreadyExists` - Some admin identity already exists
    /// * `DuplicateEmail` - Email is already registered
    /// * `WeakPassword` - Password fails the strength policy
    async fn provision_admin(&self, command: RegisterCommand) -> Result<Identity, AuthError>;
}

/// Persistence operations for the identity aggregate.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Persist a new identity.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Retrieve identity by identifier.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError>;

    /// Retrieve identity by normalized email.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;

    /// Overwrite a stored identity (last write wins).
    ///
    /// # Returns
    /// Identity as stored after the write
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity does not exist
    /// * `DuplicateEmail` - New email is already registered
    async fn save(&self, identity: Identity) -> Result<Identity, AuthError>;

    /// Whether at least one identity holds `role`.
    async fn exists_with_role(&self, role: Role) -> Result<bool, AuthError>;

    /// Count one failed login in a single atomic storage operation.
    ///
    /// Increments the counter and, when it reaches the policy threshold,
    /// sets the lock fields in the same write, so concurrent failures are
    /// never under-counted.
    ///
    /// # Returns
    /// Identity as stored after the increment
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity does not exist
    async fn record_login_failure(
        &self,
        id: &IdentityId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError>;

    /// Zero the counter and clear any lock.
    ///
    /// # Returns
    /// Identity as stored after the reset
    ///
    /// # Errors
    /// * `IdentityNotFound` - Identity does not exist
    async fn reset_login_failures(
        &self,
        id: &IdentityId,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError>;
}

/// Read access to doctor records owned by the doctor management collaborator.
#[async_trait]
pub trait DoctorDirectory: Send + Sync + 'static {
    /// Retrieve the doctor profile linked to an identity.
    ///
    /// # Returns
    /// Optional doctor profile (None if the identity has none)
    async fn find_by_identity(&self, id: &IdentityId) -> Result<Option<DoctorProfile>, AuthError>;
}
