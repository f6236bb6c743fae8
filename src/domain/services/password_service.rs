use crate::domain::{
    error::DomainError,
    models::{credential::HashedPassword, hash_record::Cost},
};

/// Service for hashing and verifying passwords
pub trait PasswordHasher: Clone {
    /// Cost new hashes are created with
    fn cost(&self) -> Cost;

    /// Hash a plain text password at an explicit cost
    fn hash_with_cost(
        &self,
        plain_password: &[u8],
        cost: Cost,
    ) -> Result<HashedPassword, DomainError>;

    /// Hash a plain text password into its storable form
    fn hash(&self, plain_password: &[u8]) -> Result<HashedPassword, DomainError> {
        self.hash_with_cost(plain_password, self.cost())
    }

    /// Verify a plain text password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; `Err` is reserved for stored hashes that
    /// cannot be parsed.
    fn verify(
        &self,
        plain_password: &[u8],
        hashed_password: &HashedPassword,
    ) -> Result<bool, DomainError>;
}
