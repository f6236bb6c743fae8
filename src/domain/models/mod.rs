pub mod credential;
pub mod hash_record;
