use std::{env, fmt::Display, str::FromStr};

use chrono::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} must be set")]
    Missing(&'static str),

    #[error("Invalid {key} value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub session_max_age: Duration,
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

    /// Reads `DATABASE_URL` (required), `HOST`, `PORT`, `DB_MAX_CONNECTIONS` and
    /// `SESSION_MAX_AGE_SECS`.
    pub fn load() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let session_max_age_secs: i64 =
            try_load("SESSION_MAX_AGE_SECS", Self::DEFAULT_SESSION_MAX_AGE_SECS)?;

        if session_max_age_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "SESSION_MAX_AGE_SECS",
                value: session_max_age_secs.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            host: try_load("HOST", Self::DEFAULT_HOST.to_string())?,
            port: try_load("PORT", Self::DEFAULT_PORT)?,
            database_url,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", Self::DEFAULT_DB_MAX_CONNECTIONS)?,
            session_max_age: Duration::seconds(session_max_age_secs),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
