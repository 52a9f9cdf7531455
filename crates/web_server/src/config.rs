use database::{ConfigError, parse_var};

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// The single origin allowed by CORS
    pub cors_origin: String,
    /// Directory uploaded images are written to
    pub upload_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: "http://localhost:8080".to_string(),
            upload_dir: "uploads".to_string(),
        }
    }
}

impl ServerConfig {
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

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            upload_dir: lookup("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert_eq!(config.upload_dir, "uploads");
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("8081".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_invalid_port() {
        let result = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("eighty".to_string()),
            _ => None,
        });
        assert!(result.is_err());
    }
}
