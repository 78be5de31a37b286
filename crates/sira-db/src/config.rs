//! Environment-driven datastore configuration.
//!
//! Configuration problems are fatal and reported before any file is
//! touched, naming every missing variable at once.

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing required configuration: {}. Required: DB_HOST, DB_NAME, and either \
         DB_USER + DB_PASSWORD or DB_INTEGRATED_AUTH=true",
        vars.join(", ")
    )]
    MissingVars { vars: Vec<String> },

    #[error("unsupported DB_DRIVER '{0}': only 'postgres' is available")]
    UnsupportedDriver(String),

    #[error("invalid DB_PORT '{0}': expected a port number")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbAuth {
    /// Username/password pair.
    Credentials { user: String, password: String },
    /// Ambient authentication (peer/trust); no credentials sent.
    Integrated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub auth: DbAuth,
}

impl DbConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let host = require(&lookup, "DB_HOST", &mut missing);
        let database = require(&lookup, "DB_NAME", &mut missing);
        let integrated = lookup("DB_INTEGRATED_AUTH")
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let auth = if integrated {
            Some(DbAuth::Integrated)
        } else {
            let user = require(&lookup, "DB_USER", &mut missing);
            let password = require(&lookup, "DB_PASSWORD", &mut missing);
            match (user, password) {
                (Some(user), Some(password)) => Some(DbAuth::Credentials { user, password }),
                _ => None,
            }
        };

        let (Some(host), Some(database), Some(auth)) = (host, database, auth) else {
            return Err(ConfigError::MissingVars { vars: missing });
        };

        let driver = lookup("DB_DRIVER").unwrap_or_else(|| "postgres".to_string());
        if !driver.trim().eq_ignore_ascii_case("postgres") {
            return Err(ConfigError::UnsupportedDriver(driver));
        }

        let port = match lookup("DB_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 5432,
        };

        Ok(Self {
            host,
            port,
            database,
            auth,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database);
        match &self.auth {
            DbAuth::Credentials { user, password } => options.username(user).password(password),
            DbAuth::Integrated => options,
        }
    }

    /// Logs the loaded configuration, credentials elided.
    pub fn log_summary(&self) {
        info!(host = %self.host, database = %self.database, "datastore configuration loaded");
        match &self.auth {
            DbAuth::Credentials { user, .. } => {
                info!(user = %user, "using credential authentication");
            }
            DbAuth::Integrated => {
                info!("using integrated authentication");
            }
        }
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    missing: &mut Vec<String>,
) -> Option<String> {
    let value = non_blank(lookup(key));
    if value.is_none() {
        missing.push(key.to_string());
    }
    value
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from<'a>(map: &'a BTreeMap<&'a str, &'a str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| map.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn missing_vars_are_all_named_at_once() {
        let vars = BTreeMap::new();
        let error = DbConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        match error {
            ConfigError::MissingVars { vars } => {
                assert_eq!(vars, vec!["DB_HOST", "DB_NAME", "DB_USER", "DB_PASSWORD"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integrated_auth_waives_credentials() {
        let vars = BTreeMap::from([
            ("DB_HOST", "localhost"),
            ("DB_NAME", "regulatorio"),
            ("DB_INTEGRATED_AUTH", "true"),
        ]);
        let config = DbConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.auth, DbAuth::Integrated);
        assert_eq!(config.port, 5432);
    }

    #[test]
    fn credentials_are_required_without_integrated_auth() {
        let vars = BTreeMap::from([
            ("DB_HOST", "localhost"),
            ("DB_NAME", "regulatorio"),
            ("DB_USER", "etl"),
        ]);
        let error = DbConfig::from_lookup(lookup_from(&vars)).unwrap_err();
        match error {
            ConfigError::MissingVars { vars } => assert_eq!(vars, vec!["DB_PASSWORD"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_postgres_driver_is_accepted() {
        let vars = BTreeMap::from([
            ("DB_HOST", "localhost"),
            ("DB_NAME", "regulatorio"),
            ("DB_INTEGRATED_AUTH", "true"),
            ("DB_DRIVER", "mssql"),
        ]);
        assert!(matches!(
            DbConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::UnsupportedDriver(_))
        ));
    }

    #[test]
    fn port_parses_or_errors() {
        let vars = BTreeMap::from([
            ("DB_HOST", "localhost"),
            ("DB_NAME", "regulatorio"),
            ("DB_INTEGRATED_AUTH", "true"),
            ("DB_PORT", "6432"),
        ]);
        assert_eq!(DbConfig::from_lookup(lookup_from(&vars)).unwrap().port, 6432);

        let vars = BTreeMap::from([
            ("DB_HOST", "localhost"),
            ("DB_NAME", "regulatorio"),
            ("DB_INTEGRATED_AUTH", "true"),
            ("DB_PORT", "none"),
        ]);
        assert!(matches!(
            DbConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::InvalidPort(_))
        ));
    }
}
