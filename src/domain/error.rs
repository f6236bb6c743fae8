use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(#[from] MalformedHashError),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Invalid email address")]
    InvalidEmail,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Structural problems found while parsing a stored bcrypt hash.
///
/// Messages never echo salt or digest material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedHashError {
    #[error("hash is empty")]
    Empty,

    #[error("hash must start with '$'")]
    MissingPrefix,

    #[error("expected 3 '$'-separated fields, found {0}")]
    FieldCount(usize),

    #[error("unknown version marker {0:?}")]
    UnknownVersion(String),

    #[error("cost must be two decimal digits")]
    NonNumericCost,

    #[error("cost {0} is outside 4..=31")]
    CostOutOfRange(u32),

    #[error("salt and digest must be {expected} characters, found {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("{0} is not valid bcrypt base64")]
    InvalidEncoding(&'static str),
}
