use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_VAR: &str = "GATEWAY_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to load .env file: {0}")]
    Env(#[from] dotenvy::Error),

    #[error("{0} is not configured")]
    Missing(&'static str),

    #[error("either ODOO_API_KEY or ODOO_USERNAME+ODOO_PASSWORD must be configured")]
    MissingCredentials,

    #[error("Invalid port: {0}")]
    InvalidPort(String),
}

/// Gateway configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub odoo: OdooConfig,
    pub server: ServerConfig,
}

/// Connection settings for the Odoo instance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OdooConfig {
    pub url: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Preferred over the password when both are set
    pub api_key: String,
    pub client_id: String,
    pub client_name: String,
    pub timeout_secs: u64,
}

impl Default for OdooConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            database: String::new(),
            username: String::new(),
            password: String::new(),
            api_key: String::new(),
            client_id: "default".to_string(),
            client_name: "Default Client".to_string(),
            timeout_secs: 30,
        }
    }
}

impl OdooConfig {
    /// Check that the section is complete enough to talk to Odoo
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::Missing("ODOO_URL"));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Missing("ODOO_DATABASE"));
        }
        if self.api_key.is_empty() && (self.username.is_empty() || self.password.is_empty()) {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// IP literal or hostname, resolved when binding
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            request_timeout_secs: 15,
        }
    }
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Config {
    /// Load `.env`, the TOML file named by `GATEWAY_CONFIG` (if any) and
    /// environment overrides, in that order.
    pub fn load_default() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = if Path::new(&path).exists() {
            tracing::info!("Reading configuration from {}", path);
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from variables returned by `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let odoo = &mut self.odoo;
        for (key, field) in [
            ("ODOO_URL", &mut odoo.url),
            ("ODOO_DATABASE", &mut odoo.database),
            ("ODOO_USERNAME", &mut odoo.username),
            ("ODOO_PASSWORD", &mut odoo.password),
            ("ODOO_API_KEY", &mut odoo.api_key),
            ("ODOO_CLIENT_ID", &mut odoo.client_id),
            ("ODOO_CLIENT_NAME", &mut odoo.client_name),
        ] {
            if let Some(value) = get(key) {
                *field = value;
            }
        }

        if let Some(host) = get("HOST") {
            self.server.host = host.trim().to_string();
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.odoo.client_id, "default");
        assert_eq!(config.odoo.client_name, "Default Client");
        assert!(config.odoo.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                ("ODOO_URL", "https://erp.example.com"),
                ("ODOO_DATABASE", "prod"),
                ("ODOO_API_KEY", "secret"),
                ("ODOO_USERNAME", ""),
                ("PORT", "9000"),
            ]))
            .unwrap();

        assert_eq!(config.odoo.url, "https://erp.example.com");
        assert_eq!(config.odoo.database, "prod");
        assert_eq!(config.odoo.api_key, "secret");
        assert_eq!(config.odoo.username, "");
        assert_eq!(config.server.port, 9000);
        assert!(config.odoo.validate().is_ok());
    }

    #[test]
    fn test_hostname_accepted() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[("HOST", "localhost"), ("PORT", "8082")]))
            .unwrap();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.bind_addr(), "localhost:8082");

        config.server.host = "::1".to_string();
        assert_eq!(config.server.bind_addr(), "[::1]:8082");
    }

    #[test]
    fn test_invalid_port() {
        let mut config = Config::default();
        let err = config.apply_env(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_validate_requires_credentials() {
        let mut odoo = OdooConfig {
            url: "https://erp.example.com".into(),
            database: "prod".into(),
            username: "admin".into(),
            ..Default::default()
        };
        assert!(matches!(odoo.validate(), Err(ConfigError::MissingCredentials)));

        odoo.password = "admin".into();
        assert!(odoo.validate().is_ok());

        odoo.database.clear();
        assert!(matches!(odoo.validate(), Err(ConfigError::Missing("ODOO_DATABASE"))));
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [odoo]
            url = "https://erp.example.com"
            database = "prod"
            api_key = "k"
            client_name = "Acme"

            [server]
            host = "127.0.0.1"
            port = 8090
            "#,
        )
        .unwrap();

        assert_eq!(config.odoo.client_name, "Acme");
        assert_eq!(config.odoo.client_id, "default");
        assert_eq!(config.odoo.timeout_secs, 30);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8090");
        assert_eq!(config.server.request_timeout_secs, 15);
    }
}
