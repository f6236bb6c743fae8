use crate::domain::{error::DomainError, models::credential::Credential};

pub type Token = String;

pub trait TokenGenerator: Send + Sync {
    fn generate(&self, credential: &Credential) -> Result<Token, DomainError>;
}
