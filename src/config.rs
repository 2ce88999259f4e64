use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),
    #[error("environment variable {0} is not a valid number")]
    Invalid(&'static str),
}

/// Process-wide configuration, loaded once before the server starts.
///
/// The signing secret and the password pepper are deliberately separate
/// values: one guards token integrity, the other password hashes, and
/// compromising one must not compromise the other.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub signing_secret: String,
    pub pepper: String,
    pub token_ttl_secs: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            signing_secret: required("JWT_SECRET")?,
            pepper: required("PASSWORD_PEPPER")?,
            token_ttl_secs: optional_number("TOKEN_TTL_SECONDS", 86400)?,
            port: optional_number("PORT", 8000)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value)
}

fn optional_number<T: std::str::FromStr>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}
