use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    error::RepositoryError,
    models::{
        credential::{Credential, Email, HashedPassword},
        hash_record::{Cost, HashRecord},
    },
    repositories::credential_repository::CredentialRepository,
};

/// One entry of the credentials seed file
#[derive(Debug, Deserialize)]
struct CredentialSeed {
    #[serde(default)]
    id: Option<Uuid>,
    email: String,
    password_hash: String,
}

/// Read-only credential store held in memory.
///
/// Stored hashes are kept exactly as given; a corrupt one only shows up when
/// somebody tries to log in with it.
#[derive(Clone, Default)]
pub struct InMemoryCredentialRepository {
    credentials: Arc<HashMap<Email, Credential>>,
}

impl InMemoryCredentialRepository {
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let credentials = credentials
            .into_iter()
            .map(|credential| (credential.email().clone(), credential))
            .collect();
        Self {
            credentials: Arc::new(credentials),
        }
    }

    /// Parse a JSON array of `{ "id"?, "email", "password_hash" }` objects
    pub fn from_json_str(json: &str) -> Result<Self, RepositoryError> {
        let seeds: Vec<CredentialSeed> = serde_json::from_str(json)
            .map_err(|e| RepositoryError::Storage(format!("invalid credentials JSON: {e}")))?;

        let mut credentials = HashMap::with_capacity(seeds.len());
        for seed in seeds {
            let email = Email::new(&seed.email).map_err(|_| {
                RepositoryError::Storage(format!("invalid email in credentials: {:?}", seed.email))
            })?;
            let credential = Credential::new(
                seed.id.unwrap_or_else(Uuid::new_v4),
                email.clone(),
                HashedPassword::new(seed.password_hash),
            );
            if credentials.insert(email.clone(), credential).is_some() {
                return Err(RepositoryError::Storage(format!(
                    "duplicate credential for {email}"
                )));
            }
        }

        Ok(Self {
            credentials: Arc::new(credentials),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RepositoryError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::Storage(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Highest cost among the stored hashes that parse; `None` when none do
    pub fn max_cost(&self) -> Option<Cost> {
        self.credentials
            .values()
            .filter_map(|credential| credential.password_hash().as_str().parse::<HashRecord>().ok())
            .map(|record| record.cost())
            .max()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Credential>, RepositoryError> {
        Ok(self.credentials.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SEED: &str = r#"[
        {
            "id": "00000000-0000-0000-0000-000000000001",
            "email": "Doctor@Clinic.org",
            "password_hash": "$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu"
        },
        {
            "email": "nurse@clinic.org",
            "password_hash": "not-a-bcrypt-hash"
        }
    ]"#;

    #[tokio::test]
    async fn finds_seeded_credential_case_insensitively() {
        let repository = InMemoryCredentialRepository::from_json_str(SEED).unwrap();
        let email = Email::new("doctor@CLINIC.org").unwrap();

        let credential = repository.find_by_email(&email).await.unwrap().unwrap();

        assert_eq!(
            credential.id().to_string(),
            "00000000-0000-0000-0000-000000000001"
        );
        assert_eq!(credential.email().as_str(), "doctor@clinic.org");
    }

    #[tokio::test]
    async fn keeps_malformed_hashes_opaque() {
        let repository = InMemoryCredentialRepository::from_json_str(SEED).unwrap();
        let email = Email::new("nurse@clinic.org").unwrap();

        let credential = repository.find_by_email(&email).await.unwrap().unwrap();

        assert_eq!(credential.password_hash().as_str(), "not-a-bcrypt-hash");
    }

    #[tokio::test]
    async fn unknown_email_is_none() {
        let repository = InMemoryCredentialRepository::from_json_str(SEED).unwrap();
        let email = Email::new("someone@else.org").unwrap();

        assert!(repository.find_by_email(&email).await.unwrap().is_none());
    }

    #[test]
    fn rejects_invalid_seed_files() {
        assert!(InMemoryCredentialRepository::from_json_str("{").is_err());
        assert!(
            InMemoryCredentialRepository::from_json_str(
                r#"[{"email": "nope", "password_hash": "x"}]"#
            )
            .is_err()
        );
        assert!(
            InMemoryCredentialRepository::from_json_str(
                r#"[{"email": "a@b.c", "password_hash": "x"},
                    {"email": "A@B.C", "password_hash": "y"}]"#
            )
            .is_err()
        );
    }

    #[test]
    fn missing_file_is_a_storage_error() {
        let result =
            InMemoryCredentialRepository::from_json_file(Path::new("/nonexistent/credentials.json"));

        assert!(matches!(result, Err(RepositoryError::Storage(_))));
    }

    #[test]
    fn new_indexes_by_email() {
        let email = Email::new("a@b.c").unwrap();
        let repository = InMemoryCredentialRepository::new([Credential::new(
            Uuid::new_v4(),
            email,
            HashedPassword::new("x".to_string()),
        )]);

        assert_eq!(repository.len(), 1);
        assert!(!repository.is_empty());
    }

    #[test]
    fn max_cost_skips_malformed_hashes() {
        let repository = InMemoryCredentialRepository::from_json_str(SEED).unwrap();

        assert_eq!(repository.max_cost(), Some(Cost::new(12).unwrap()));
    }

    #[test]
    fn max_cost_picks_the_highest() {
        let repository = InMemoryCredentialRepository::from_json_str(
            r#"[{"email": "a@b.c", "password_hash": "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW"},
                {"email": "d@e.f", "password_hash": "$2b$12$7hoRZfJrRKD2nIm2vHLs7OBETy.LWenXXMLKf99W8M4PUwO6KB7fu"},
                {"email": "g@h.i", "password_hash": "$2y$04$....................................................."}]"#,
        )
        .unwrap();

        assert_eq!(repository.max_cost(), Some(Cost::new(12).unwrap()));
        assert_eq!(InMemoryCredentialRepository::default().max_cost(), None);
    }
}
