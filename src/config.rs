//! Server settings read from the environment (and `.env`, when present).
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `AUTH_HOST` | `0.0.0.0` | bind address |
//! | `AUTH_PORT` | `8080` | port |
//! | `JWT_SECRET` | required | HS256 signing secret |
//! | `JWT_EXPIRATION_HOURS` | `24` | token lifetime |
//! | `BCRYPT_COST` | `10` | cost for hashes this service creates |
//! | `CREDENTIALS_FILE` | unset | JSON seed for the credential store |
//! | `LOG_FORMAT` | `pretty` | `pretty` or `json` |

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::{domain::models::hash_record::Cost, telemetry::LogFormat};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: Cost,
    pub credentials_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

// keep the signing secret out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("credentials_file", &self.credentials_file)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", Cost::DEFAULT.get())?;
        let bcrypt_cost = Cost::new(bcrypt_cost).map_err(|_| ConfigError::Invalid {
            name: "BCRYPT_COST",
            value: bcrypt_cost.to_string(),
        })?;

        let jwt_expiration_hours = parse_or(&lookup, "JWT_EXPIRATION_HOURS", 24)?;
        if jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_HOURS",
                value: jwt_expiration_hours.to_string(),
            });
        }

        Ok(Self {
            host: lookup("AUTH_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "AUTH_PORT", 8080)?,
            jwt_secret,
            jwt_expiration_hours,
            bcrypt_cost,
            credentials_file: lookup("CREDENTIALS_FILE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::default())?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<V: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: V,
) -> Result<V, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
