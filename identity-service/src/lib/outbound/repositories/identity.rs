use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::lockout::LockoutPolicy;
use crate::domain::identity::models::DoctorId;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LockoutState;
use crate::domain::identity::models::PersonalDetails;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::AuthError;

const IDENTITY_COLUMNS: &str = r#"
    id, email, password_hash, full_name, phone, date_of_birth, address, role,
    is_active, failed_login_attempts, is_locked, locked_until, doctor_id,
    created_at, updated_at
"#;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: Option<String>,
    phone: Option<String>,
    date_of_birth: Option<NaiveDate>,
    address: Option<String>,
    role: String,
    is_active: bool,
    failed_login_attempts: i32,
    is_locked: bool,
    locked_until: Option<DateTime<Utc>>,
    doctor_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(r: IdentityRow) -> Result<Self, Self::Error> {
        Ok(Identity {
            id: IdentityId(r.id),
            email: EmailAddress::new(r.email)?,
            password_hash: r.password_hash,
            details: PersonalDetails {
                full_name: r.full_name,
                phone: r.phone,
                date_of_birth: r.date_of_birth,
                address: r.address,
            },
            role: r.role.parse::<Role>()?,
            is_active: r.is_active,
            lockout: LockoutState {
                failed_login_attempts: u32::try_from(r.failed_login_attempts).unwrap_or(0),
                is_locked: r.is_locked,
                locked_until: r.locked_until,
            },
            doctor_id: r.doctor_id.map(DoctorId),
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> AuthError {
    AuthError::DatabaseError(e.to_string())
}

fn write_error(e: sqlx::Error, email: &EmailAddress) -> AuthError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("identities_email_key") {
            return AuthError::DuplicateEmail(email.to_string());
        }
    }
    database_error(e)
}

fn attempts(state: &LockoutState) -> i32 {
    i32::try_from(state.failed_login_attempts).unwrap_or(i32::MAX)
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO identities (
                id, email, password_hash, full_name, phone, date_of_birth, address, role,
                is_active, failed_login_attempts, is_locked, locked_until, doctor_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.password_hash)
        .bind(&identity.details.full_name)
        .bind(&identity.details.phone)
        .bind(identity.details.date_of_birth)
        .bind(&identity.details.address)
        .bind(identity.role.as_str())
        .bind(identity.is_active)
        .bind(attempts(&identity.lockout))
        .bind(identity.lockout.is_locked)
        .bind(identity.lockout.locked_until)
        .bind(identity.doctor_id.map(|id| id.0))
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.email))?;

        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {} FROM identities WHERE id = $1",
            IDENTITY_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {} FROM identities WHERE email = $1",
            IDENTITY_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET email = $2, full_name = $3, phone = $4, date_of_birth = $5, address = $6,
                role = $7, is_active = $8, failed_login_attempts = $9, is_locked = $10,
                locked_until = $11, doctor_id = $12, updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.email.as_str())
        .bind(&identity.details.full_name)
        .bind(&identity.details.phone)
        .bind(identity.details.date_of_birth)
        .bind(&identity.details.address)
        .bind(identity.role.as_str())
        .bind(identity.is_active)
        .bind(attempts(&identity.lockout))
        .bind(identity.lockout.is_locked)
        .bind(identity.lockout.locked_until)
        .bind(identity.doctor_id.map(|id| id.0))
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &identity.email))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::IdentityNotFound(identity.id.to_string()));
        }

        Ok(identity)
    }

    async fn exists_with_role(&self, role: Role) -> Result<bool, AuthError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM identities WHERE role = $1)")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn record_login_failure(
        &self,
        id: &IdentityId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        // Increment and conditional lock in one statement; concurrent failures serialize on the row
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            UPDATE identities
            SET failed_login_attempts = failed_login_attempts + 1,
                is_locked = CASE WHEN failed_login_attempts + 1 >= $2 THEN TRUE ELSE is_locked END,
                locked_until = CASE WHEN failed_login_attempts + 1 >= $2 THEN $3 ELSE locked_until END,
                updated_at = $4
            WHERE id = $1
            RETURNING {}
            "#,
            IDENTITY_COLUMNS
        ))
        .bind(id.0)
        .bind(i32::try_from(policy.threshold()).unwrap_or(i32::MAX))
        .bind(now + policy.duration())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Identity::try_from)
            .transpose()?
            .ok_or(AuthError::IdentityNotFound(id.to_string()))
    }

    async fn reset_login_failures(
        &self,
        id: &IdentityId,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            UPDATE identities
            SET failed_login_attempts = 0, is_locked = FALSE, locked_until = NULL, updated_at = $2
            WHERE id = $1
            RETURNING {}
            "#,
            IDENTITY_COLUMNS
        ))
        .bind(id.0)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Identity::try_from)
            .transpose()?
            .ok_or(AuthError::IdentityNotFound(id.to_string()))
    }
}
