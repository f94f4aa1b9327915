use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::models::DoctorId;
use crate::domain::identity::models::DoctorProfile;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::DoctorDirectory;
use crate::identity::errors::AuthError;

/// Read-only view over the doctor records owned by the doctor management side.
pub struct PostgresDoctorDirectory {
    pool: PgPool,
}

impl PostgresDoctorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DoctorRow {
    id: Uuid,
    specialty: Option<String>,
    bio: Option<String>,
    years_of_experience: i32,
    medical_school: Option<String>,
    avg_rating: f64,
}

impl From<DoctorRow> for DoctorProfile {
    fn from(r: DoctorRow) -> Self {
        Self {
            id: DoctorId(r.id),
            specialty: r.specialty,
            bio: r.bio,
            years_of_experience: u32::try_from(r.years_of_experience).unwrap_or(0),
            medical_school: r.medical_school,
            avg_rating: r.avg_rating,
        }
    }
}

#[async_trait]
impl DoctorDirectory for PostgresDoctorDirectory {
    async fn find_by_identity(&self, id: &IdentityId) -> Result<Option<DoctorProfile>, AuthError> {
        let row = sqlx::query_as::<_, DoctorRow>(
            r#"
            SELECT d.id, s.name AS specialty, d.bio, d.years_of_experience,
                   d.medical_school, d.avg_rating
            FROM doctors d
            LEFT JOIN specialties s ON s.id = d.specialty_id
            WHERE d.identity_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.map(DoctorProfile::from))
    }
}
