use rand_core::{OsRng, TryRngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::{
    error::{DomainError, MalformedHashError},
    models::{
        credential::HashedPassword,
        hash_record::{Cost, DIGEST_LEN, HashRecord, HashVersion, SALT_LEN},
    },
    services::password_service::PasswordHasher,
};

/// Blowfish accepts at most 72 key bytes, NUL terminator included
const MAX_KEY_LEN: usize = 72;

/// Check `candidate` against a stored bcrypt hash.
///
/// Returns `Ok(false)` for a wrong candidate; only a stored value that does
/// not parse as a bcrypt record is an error.
pub fn verify(candidate: &[u8], stored_hash: &str) -> Result<bool, MalformedHashError> {
    let record: HashRecord = stored_hash.parse()?;
    let derived = derive_digest(candidate, record.cost(), record.salt());

    Ok(digests_match(&derived[..DIGEST_LEN], record.digest()))
}

/// Run the bcrypt key schedule over `candidate` the way every bcrypt
/// implementation prepares it: NUL-terminated, then cut to 72 bytes.
fn derive_digest(candidate: &[u8], cost: Cost, salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; 24]> {
    let mut key = Zeroizing::new(Vec::with_capacity(candidate.len() + 1));
    key.extend_from_slice(candidate);
    key.push(0);
    key.truncate(MAX_KEY_LEN);

    Zeroizing::new(bcrypt::bcrypt(cost.get(), *salt, &key))
}

/// Byte comparison whose running time does not depend on where the inputs differ
pub(crate) fn digests_match(derived: &[u8], stored: &[u8]) -> bool {
    derived.ct_eq(stored).into()
}

#[derive(Clone)]
pub struct BcryptPasswordHasher {
    cost: Cost,
}

impl BcryptPasswordHasher {
    pub fn new(cost: Cost) -> Self {
        Self { cost }
    }

}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(Cost::default())
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn cost(&self) -> Cost {
        self.cost
    }

    fn hash_with_cost(
        &self,
        plain_password: &[u8],
        cost: Cost,
    ) -> Result<HashedPassword, DomainError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| DomainError::HashingFailed(e.to_string()))?;

        let derived = derive_digest(plain_password, cost, &salt);
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&derived[..DIGEST_LEN]);

        let record = HashRecord::new(HashVersion::TwoB, cost, salt, digest);
        Ok(HashedPassword::new(record.to_string()))
    }

    fn verify(
        &self,
        plain_password: &[u8],
        hashed_password: &HashedPassword,
    ) -> Result<bool, DomainError> {
        Ok(verify(plain_password, hashed_password.as_str())?)
    }
}
