use std::fmt;
use std::str::FromStr;

use auth::TokenPair;
use auth::TokenSubject;
use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::identity::errors::AuthError;
use crate::identity::errors::EmailError;
use crate::identity::errors::IdentityIdError;
use crate::identity::errors::RoleError;

/// Identity aggregate entity.
///
/// The authenticated account record: credentials, role, profile details and
/// the embedded lockout state. `password_hash` is set at creation and never
/// leaves the domain layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub details: PersonalDetails,
    pub role: Role,
    pub is_active: bool,
    pub lockout: LockoutState,
    pub doctor_id: Option<DoctorId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Build a brand-new identity with zeroed lockout counters.
    pub fn new(
        email: EmailAddress,
        password_hash: String,
        details: PersonalDetails,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IdentityId::new(),
            email,
            password_hash,
            details,
            role,
            is_active: true,
            lockout: LockoutState::default(),
            doctor_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole years on `today`, if a birth date is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let born = self.details.date_of_birth?;
        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }

    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject::new(self.id, self.email.as_str(), self.role.as_str())
    }
}

/// Optional profile fields borrowed by the rest of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetails {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Failed-login bookkeeping embedded in the identity record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockoutState {
    pub failed_login_attempts: u32,
    pub is_locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Doctor profile identifier, owned by the doctor records collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoctorId(pub Uuid);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Trimmed and lowercased on construction, so equality is case-insensitive.
/// Validates format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new normalized, validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated projection of an identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: IdentityId,
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Check the principal's role against an allow-list.
    ///
    /// # Errors
    /// * `ForbiddenRole` - Role is not in `allowed`
    pub fn ensure_role(&self, allowed: &[Role]) -> Result<(), AuthError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::ForbiddenRole { role: self.role })
        }
    }
}

impl From<&Identity> for Principal {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            email: identity.email.as_str().to_string(),
            role: identity.role,
        }
    }
}

/// Role-specific profile for doctors, read from the doctor records collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub id: DoctorId,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: u32,
    pub medical_school: Option<String>,
    pub avg_rating: f64,
}

/// Identity composed with its role-specific profile, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub identity: Identity,
    pub doctor: Option<DoctorProfile>,
}

/// Outcome of a successful register or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub tokens: TokenPair,
}

/// Command to register a new patient identity
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
    pub details: PersonalDetails,
}

impl RegisterCommand {
    /// # Arguments
    /// * `email` - Validated email address
    /// * `password` - Plain text password (policy-checked and hashed by service)
    /// * `details` - Optional profile fields
    pub fn new(email: EmailAddress, password: String, details: PersonalDetails) -> Self {
        Self {
            email,
            password,
            details,
        }
    }
}

/// Command to update profile fields of the authenticated identity.
///
/// Only provided fields are changed. Email, role, password and lockout
/// state are not reachable from here.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

impl UpdateProfileCommand {
    pub fn apply(self, details: &mut PersonalDetails) {
        if let Some(full_name) = self.full_name {
            details.full_name = Some(full_name);
        }
        if let Some(phone) = self.phone {
            details.phone = Some(phone);
        }
        if let Some(date_of_birth) = self.date_of_birth {
            details.date_of_birth = Some(date_of_birth);
        }
        if let Some(address) = self.address {
            details.address = Some(address);
        }
    }
}
