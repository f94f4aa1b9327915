use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::DoctorProfile;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::Profile;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .auth_service
        .get_profile(&principal)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, "Get Profile Data", profile.into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileData {
    #[serde(flatten)]
    pub identity: IdentityData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorData>,
}

impl From<&Profile> for ProfileData {
    fn from(profile: &Profile) -> Self {
        Self {
            identity: (&profile.identity).into(),
            doctor: profile.doctor.as_ref().map(DoctorData::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorData {
    pub id: String,
    pub specialty: Option<String>,
    pub bio: Option<String>,
    pub years_of_experience: u32,
    pub medical_school: Option<String>,
    pub avg_rating: f64,
}

impl From<&DoctorProfile> for DoctorData {
    fn from(doctor: &DoctorProfile) -> Self {
        Self {
            id: doctor.id.to_string(),
            specialty: doctor.specialty.clone(),
            bio: doctor.bio.clone(),
            years_of_experience: doctor.years_of_experience,
            medical_school: doctor.medical_school.clone(),
            avg_rating: doctor.avg_rating,
        }
    }
}
