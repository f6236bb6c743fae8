//! Authentication service built around bcrypt credential verification.
//!
//! The interesting part lives in
//! [`infrastructure::bcrypt_password_hasher::verify`]: it parses a stored
//! `$2a$`/`$2b$`/`$2y$` hash, re-derives the digest with the `bcrypt` crate
//! and compares in constant time. Everything else is the login flow around it.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod telemetry;
pub mod usecase;
