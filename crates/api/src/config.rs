use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgConnectOptions;
use trainreg_core::cache::CacheWindows;

const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// A required variable is missing or a value cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    /// The URL itself is not echoed back since it may carry a password.
    #[error("DATABASE_URL is not a valid connection URL: {0}")]
    InvalidDatabaseUrl(String),
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database password have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database: DatabaseConfig,
    /// Staleness windows for the per-session read cache.
    pub cache: CacheWindows,
    /// Sessions untouched for this long are discarded (default: 30 minutes).
    pub session_idle_timeout: Duration,
}

/// Connection settings for the relational store.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: Option<String>,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                           |
    /// |--------------------------|-----------------------------------|
    /// | `HOST`                   | `0.0.0.0`                         |
    /// | `PORT`                   | `3000`                            |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                              |
    /// | `DATABASE_URL`           | unset (overrides `DB_*` when set) |
    /// | `DB_HOST`                | `localhost`                       |
    /// | `DB_PORT`                | `5432`                            |
    /// | `DB_NAME`                | `training`                        |
    /// | `DB_USER`                | `postgres`                        |
    /// | `DB_PASSWORD`            | required without `DATABASE_URL`   |
    /// | `DB_MAX_CONNECTIONS`     | `10`                              |
    /// | `CACHE_ASSIGNMENTS_SECS` | `10`                              |
    /// | `CACHE_SYSTEMS_SECS`     | `60`                              |
    /// | `CACHE_UNTRAINED_SECS`   | `5`                               |
    /// | `SESSION_IDLE_SECS`      | `1800`                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "PORT", 3000, "u16")?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    expected: "header value",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let request_timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30, "u64")?;

        let url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        let password = lookup("DB_PASSWORD");
        if url.is_none() && password.is_none() {
            return Err(ConfigError::Missing { var: "DB_PASSWORD" });
        }

        let database = DatabaseConfig {
            url,
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(&lookup, "DB_PORT", 5432, "u16")?,
            name: lookup("DB_NAME").unwrap_or_else(|| "training".into()),
            user: lookup("DB_USER").unwrap_or_else(|| "postgres".into()),
            password,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10, "u32")?,
        };

        let defaults = CacheWindows::default();
        let cache = CacheWindows {
            assignments: parse_secs_or(
                &lookup,
                "CACHE_ASSIGNMENTS_SECS",
                defaults.assignments,
            )?,
            systems: parse_secs_or(&lookup, "CACHE_SYSTEMS_SECS", defaults.systems)?,
            untrained: parse_secs_or(&lookup, "CACHE_UNTRAINED_SECS", defaults.untrained)?,
        };

        let session_idle_timeout = parse_secs_or(
            &lookup,
            "SESSION_IDLE_SECS",
            Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        )?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database,
            cache,
            session_idle_timeout,
        })
    }
}

impl DatabaseConfig {
    /// Build connection options from the URL or the individual parts.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn parse_or<F, T>(
    lookup: &F,
    var: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        }),
    }
}

fn parse_secs_or<F>(
    lookup: &F,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, var, default.as_secs(), "number of seconds").map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_only_password_is_set() {
        let config = load(&[("DB_PASSWORD", "secret")]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.cors_origins,
            vec![HeaderValue::from_static("http://localhost:5173")]
        );
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "training");
        assert_eq!(config.database.user, "postgres");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.cache, CacheWindows::default());
        assert_eq!(config.session_idle_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn password_is_required_without_url() {
        assert_matches!(load(&[]), Err(ConfigError::Missing { var: "DB_PASSWORD" }));
    }

    #[test]
    fn url_replaces_password_requirement() {
        let config = load(&[("DATABASE_URL", "postgres://app:pw@db.internal:6543/hr")]).unwrap();
        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("hr"));
        assert_eq!(options.get_username(), "app");
    }

    #[test]
    fn parts_build_connection_options() {
        let config = load(&[
            ("DB_HOST", "10.0.0.5"),
            ("DB_PORT", "5433"),
            ("DB_NAME", "lms"),
            ("DB_USER", "trainer"),
            ("DB_PASSWORD", "secret"),
        ])
        .unwrap();
        let options = config.database.connect_options().unwrap();

        assert_eq!(options.get_host(), "10.0.0.5");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_database(), Some("lms"));
        assert_eq!(options.get_username(), "trainer");
    }

    #[test]
    fn invalid_number_names_the_variable() {
        let err = load(&[("DB_PASSWORD", "secret"), ("PORT", "eighty")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "PORT", .. });
        assert_eq!(err.to_string(), "PORT must be a valid u16, got 'eighty'");
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = load(&[
            ("DB_PASSWORD", "secret"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,,"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.cors_origins[1], "http://b.test");
    }

    #[test]
    fn cache_windows_are_configurable() {
        let config = load(&[
            ("DB_PASSWORD", "secret"),
            ("CACHE_ASSIGNMENTS_SECS", "0"),
            ("CACHE_UNTRAINED_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.cache.assignments, Duration::ZERO);
        assert_eq!(config.cache.systems, Duration::from_secs(60));
        assert_eq!(config.cache.untrained, Duration::from_secs(30));
    }

    #[test]
    fn session_idle_timeout_is_configurable() {
        let config = load(&[("DB_PASSWORD", "secret"), ("SESSION_IDLE_SECS", "90")]).unwrap();
        assert_eq!(config.session_idle_timeout, Duration::from_secs(90));

        let err = load(&[("DB_PASSWORD", "secret"), ("SESSION_IDLE_SECS", "soon")]).unwrap_err();
        assert_matches!(err, ConfigError::Invalid { var: "SESSION_IDLE_SECS", .. });
    }

    #[test]
    fn debug_output_hides_password() {
        let config = load(&[("DB_PASSWORD", "hunter2")]).unwrap();
        let debug = format!("{:?}", config.database);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
