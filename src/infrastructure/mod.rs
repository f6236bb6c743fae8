pub mod bcrypt_password_hasher;
pub mod in_memory_credential_repository;
pub mod jwt_token_generator;
