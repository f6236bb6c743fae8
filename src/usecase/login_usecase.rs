use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{
    error::DomainError,
    models::{
        credential::{Email, HashedPassword},
        hash_record::Cost,
    },
    repositories::credential_repository::CredentialRepository,
    services::{password_service::PasswordHasher, token_service::TokenGenerator},
};

/// Plaintext hashed once at startup; checked against when no credential exists
const DUMMY_PASSWORD: &[u8] = b"dummy-password-for-unknown-accounts";

#[derive(Debug)]
pub struct LoginResult {
    pub token: String,
    pub credential_id: Uuid,
}

pub struct LoginUsecase<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> {
    credential_repository: C,
    password_hasher: P,
    token_generator: T,
    dummy_hash: HashedPassword,
}

impl<C: CredentialRepository, P: PasswordHasher, T: TokenGenerator> LoginUsecase<C, P, T> {
    /// `stored_max_cost` is the highest cost among the stored hashes. The
    /// dummy hash is built at no less than that, so a miss never verifies
    /// faster than a hit.
    pub fn new(
        credential_repository: C,
        password_hasher: P,
        token_generator: T,
        stored_max_cost: Option<Cost>,
    ) -> Result<Self, DomainError> {
        let dummy_cost = stored_max_cost.map_or(password_hasher.cost(), |stored| {
            stored.max(password_hasher.cost())
        });
        let dummy_hash = password_hasher.hash_with_cost(DUMMY_PASSWORD, dummy_cost)?;
        Ok(Self {
            credential_repository,
            password_hasher,
            token_generator,
            dummy_hash,
        })
    }

    /// Authenticate `email` with `password`.
    ///
    /// An unknown email and a wrong password both end in
    /// [`DomainError::AuthenticationFailed`], and both pay for one hash
    /// verification. A corrupt stored hash is [`DomainError::MalformedHash`].
    pub async fn login(&self, email: &Email, password: String) -> Result<LoginResult, DomainError>
    where
        C: Send + Sync,
        P: Send + Sync + 'static,
        T: Send + Sync,
    {
        let password = Zeroizing::new(password);

        let Some(credential) = self.credential_repository.find_by_email(email).await? else {
            let _ = self
                .check_password(password, self.dummy_hash.clone())
                .await;
            tracing::info!("login rejected: unknown account");
            return Err(DomainError::AuthenticationFailed);
        };

        match self
            .check_password(password, credential.password_hash().clone())
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(credential_id = %credential.id(), "login rejected: wrong password");
                return Err(DomainError::AuthenticationFailed);
            }
            Err(e) => {
                tracing::error!(
                    credential_id = %credential.id(),
                    error = %e,
                    "stored password hash could not be verified"
                );
                return Err(e);
            }
        }

        let token = self.token_generator.generate(&credential)?;
        tracing::info!(credential_id = %credential.id(), "login succeeded");

        Ok(LoginResult {
            token,
            credential_id: credential.id(),
        })
    }

    // bcrypt is CPU bound, keep it off the async workers
    async fn check_password(
        &self,
        password: Zeroizing<String>,
        hash: HashedPassword,
    ) -> Result<bool, DomainError>
    where
        P: Send + Sync + 'static,
    {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(password.as_bytes(), &hash))
            .await
            .map_err(|e| DomainError::HashingFailed(e.to_string()))?
    }
}
