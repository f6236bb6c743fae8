use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::credential::{Credential, Email},
};

#[async_trait]
pub trait CredentialRepository {
    /// Look up the credential registered for `email`, if any
    async fn find_by_email(&self, email: &Email) -> Result<Option<Credential>, RepositoryError>;
}
