use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::identity::lockout::LockoutPolicy;
use crate::domain::identity::models::DoctorProfile;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::LockoutState;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::DoctorDirectory;
use crate::domain::identity::ports::IdentityRepository;
use crate::identity::errors::AuthError;

/// In-process identity store for tests and local runs.
///
/// Every mutation happens under a single write lock, so the lockout counter
/// update is atomic in the same way as the SQL adapter.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<IdentityId, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update_lockout(
        &self,
        id: &IdentityId,
        now: DateTime<Utc>,
        transition: impl FnOnce(&LockoutState) -> LockoutState,
    ) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;
        let identity = identities
            .get_mut(id)
            .ok_or(AuthError::IdentityNotFound(id.to_string()))?;

        identity.lockout = transition(&identity.lockout);
        identity.updated_at = now;

        Ok(identity.clone())
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;

        if identities.values().any(|i| i.email == identity.email) {
            return Err(AuthError::DuplicateEmail(identity.email.to_string()));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, AuthError> {
        Ok(self.identities.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|i| &i.email == email)
            .cloned())
    }

    async fn save(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().await;

        if !identities.contains_key(&identity.id) {
            return Err(AuthError::IdentityNotFound(identity.id.to_string()));
        }
        if identities
            .values()
            .any(|i| i.id != identity.id && i.email == identity.email)
        {
            return Err(AuthError::DuplicateEmail(identity.email.to_string()));
        }

        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    async fn exists_with_role(&self, role: Role) -> Result<bool, AuthError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .any(|i| i.role == role))
    }

    async fn record_login_failure(
        &self,
        id: &IdentityId,
        policy: &LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        self.update_lockout(id, now, |state| policy.record_failure(state, now))
            .await
    }

    async fn reset_login_failures(
        &self,
        id: &IdentityId,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        self.update_lockout(id, now, |_| LockoutState::default())
            .await
    }
}

/// In-process doctor profiles keyed by the owning identity.
#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    doctors: RwLock<HashMap<IdentityId, DoctorProfile>>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, identity_id: IdentityId, doctor: DoctorProfile) {
        self.doctors.write().await.insert(identity_id, doctor);
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn find_by_identity(&self, id: &IdentityId) -> Result<Option<DoctorProfile>, AuthError> {
        Ok(self.doctors.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::*;
    use crate::domain::identity::models::PersonalDetails;

    fn identity(email: &str) -> Identity {
        Identity::new(
            EmailAddress::new(email.to_string()).unwrap(),
            "$argon2id$test_hash".to_string(),
            PersonalDetails::default(),
            Role::Patient,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_case_variant_email() {
        let repository = InMemoryIdentityRepository::new();

        repository.create(identity("a@x.com")).await.unwrap();
        let result = repository.create(identity("A@X.COM")).await;

        assert!(matches!(result, Err(AuthError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_find_by_email_and_id() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.create(identity("a@x.com")).await.unwrap();

        let email = EmailAddress::new("A@x.com".to_string()).unwrap();
        assert_eq!(
            repository.find_by_email(&email).await.unwrap().map(|i| i.id),
            Some(created.id)
        );
        assert!(repository
            .find_by_id(&IdentityId::new())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_save_unknown_identity() {
        let repository = InMemoryIdentityRepository::new();

        let result = repository.save(identity("a@x.com")).await;

        assert!(matches!(result, Err(AuthError::IdentityNotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_failures_are_all_counted() {
        let repository = Arc::new(InMemoryIdentityRepository::new());
        let created = repository.create(identity("a@x.com")).await.unwrap();
        let policy = LockoutPolicy::new(100, Duration::minutes(30));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repository = Arc::clone(&repository);
                let id = created.id;
                tokio::spawn(async move {
                    repository
                        .record_login_failure(&id, &policy, Utc::now())
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.lockout.failed_login_attempts, 20);
        assert!(!stored.lockout.is_locked);
    }

    #[tokio::test]
    async fn test_failure_at_threshold_locks_and_reset_clears() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository.create(identity("a@x.com")).await.unwrap();
        let policy = LockoutPolicy::default();
        let now = Utc::now();

        for _ in 0..4 {
            repository
                .record_login_failure(&created.id, &policy, now)
                .await
                .unwrap();
        }
        let locked = repository
            .record_login_failure(&created.id, &policy, now)
            .await
            .unwrap();
        assert!(locked.lockout.is_locked);
        assert_eq!(locked.lockout.locked_until, Some(now + Duration::minutes(30)));

        let reset = repository
            .reset_login_failures(&created.id, now)
            .await
            .unwrap();
        assert_eq!(reset.lockout, LockoutState::default());
    }

    #[tokio::test]
    async fn test_exists_with_role() {
        let repository = InMemoryIdentityRepository::new();
        assert!(!repository.exists_with_role(Role::Admin).await.unwrap());

        let mut admin = identity("admin@x.com");
        admin.role = Role::Admin;
        repository.create(admin).await.unwrap();

        assert!(repository.exists_with_role(Role::Admin).await.unwrap());
        assert!(!repository.exists_with_role(Role::Doctor).await.unwrap());
    }
}
