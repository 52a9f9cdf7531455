use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was present but could not be parsed
    #[error("Invalid value for {key}: {value:?}")]
    Invalid {
        /// Name of the offending variable
        key: &'static str,
        /// Raw value found in the environment
        value: String,
    },
}

/// Connection parameters for the PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host name
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login role
    pub user: String,
    /// Password for the login role
    pub password: String,
    /// Database name
    pub name: String,
    /// Maximum number of pooled connections
    pub pool_size: u32,
    /// How long a caller waits for a free connection before giving up
    pub acquire_timeout: Duration,
    /// Full connection URL; takes precedence over the discrete fields when set
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "camping".to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            url: None,
        }
    }
}

impl DatabaseConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let pool_size = parse_var(&lookup, "db_pool_size", defaults.pool_size)?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "db_pool_size",
                value: pool_size.to_string(),
            });
        }

        Ok(Self {
            host: lookup("db_host").unwrap_or(defaults.host),
            port: parse_var(&lookup, "db_port", defaults.port)?,
            user: lookup("db_user").unwrap_or(defaults.user),
            password: lookup("db_pass").unwrap_or(defaults.password),
            name: lookup("db_name").unwrap_or(defaults.name),
            pool_size,
            acquire_timeout: Duration::from_secs(parse_var(
                &lookup,
                "db_acquire_timeout_secs",
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
            url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
        })
    }

    /// Builds driver connection options from this configuration.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return url.parse();
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

/// Parses an optional variable, returning `default` when it is absent.
pub fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
