//! Configuration module
//!
//! `AppConfig` is read from a TOML file (default
//! `~/.config/modinfo-service/config.toml`). A missing file means defaults;
//! a handful of environment variables override the file afterwards.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Accepted session lifetimes, in hours (up to one year)
pub const JWT_EXPIRATION_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("modinfo-service")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub access: AccessConfig,
    pub logging: LoggingConfig,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL; activation links are built on it.
    pub public_base_url: String,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

impl From<&DatabaseSection> for DatabaseConfig {
    fn from(section: &DatabaseSection) -> Self {
        Self {
            url: section.url.clone(),
            max_connections: section.max_connections,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
            jwt_issuer: jwt.issuer,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl SecurityConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            expiration_hours: self.jwt_expiration_hours,
            issuer: self.jwt_issuer.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Write activation links to the log. Development only.
    #[default]
    Log,
    /// POST to a transactional mail HTTP API
    Http,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub provider: MailProvider,
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::Log,
            api_url: String::new(),
            api_key: String::new(),
            from: "noreply@example.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Mount the unauthenticated `/moduleinfo` routes
    pub public_module_info: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            public_module_info: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Administrator created at startup when no account with `email` exists
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent,
    /// then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&raw)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.security.jwt_expiration_hours;
        if !JWT_EXPIRATION_HOURS_RANGE.contains(&hours) {
            return Err(ConfigError::Invalid(format!(
                "security.jwt_expiration_hours must be between {} and {}, got {}",
                JWT_EXPIRATION_HOURS_RANGE.start(),
                JWT_EXPIRATION_HOURS_RANGE.end(),
                hours
            )));
        }
        Ok(())
    }

    /// Apply `DATABASE_URL`, `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and
    /// `PUBLIC_BASE_URL` as returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(hours) = lookup("JWT_EXPIRATION_HOURS") {
            match hours.parse::<i64>() {
                Ok(hours) if JWT_EXPIRATION_HOURS_RANGE.contains(&hours) => {
                    self.security.jwt_expiration_hours = hours
                }
                _ => warn!(value = %hours, "Ignoring invalid JWT_EXPIRATION_HOURS"),
            }
        }
        if let Some(base) = lookup("PUBLIC_BASE_URL") {
            self.server.public_base_url = base;
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.security.jwt_secret == JwtConfig::default().secret
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.jwt_expiration_hours, 24);
        assert!(config.access.public_module_info);
        assert_eq!(config.mail.provider, MailProvider::Log);
        assert!(config.admin.is_none());
        assert!(config.uses_default_secret());
    }

    #[test]
    fn parses_sections() {
        let raw = r#"
            [server]
            port = 9090
            public_base_url = "https://api.example.com"

            [security]
            jwt_secret = "s3cret"
            bcrypt_cost = 4

            [mail]
            provider = "http"
            api_url = "https://mail.example.com/emails"

            [access]
            public_module_info = false

            [admin]
            email = "root@example.com"
            name = "Root"
            password = "changeme"
        "#;

        let config = AppConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.security.jwt_config().secret, "s3cret");
        assert_eq!(config.security.bcrypt_cost, 4);
        assert_eq!(config.mail.provider, MailProvider::Http);
        assert!(!config.access.public_module_info);
        assert_eq!(config.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn rejects_unknown_mail_provider() {
        let raw = "[mail]\nprovider = \"carrier-pigeon\"\n";
        assert!(matches!(
            AppConfig::from_toml_str(raw),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn environment_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "from-env"),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("PUBLIC_BASE_URL", "https://modules.example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.security.jwt_secret, "from-env");
        assert_eq!(config.security.jwt_expiration_hours, 2);
        assert_eq!(config.server.public_base_url, "https://modules.example.com");
    }

    #[test]
    fn invalid_expiration_override_is_ignored() {
        for value in ["soon", "0", "9223372036854775807"] {
            let mut config = AppConfig::default();
            config.apply_overrides(|key| (key == "JWT_EXPIRATION_HOURS").then(|| value.to_string()));
            assert_eq!(config.security.jwt_expiration_hours, 24, "{}", value);
        }
    }

    #[test]
    fn out_of_range_expiration_in_file_is_rejected() {
        for hours in ["0", "-5", "8761", "9223372036854775807"] {
            let raw = format!("[security]\njwt_expiration_hours = {}\n", hours);
            assert!(
                matches!(AppConfig::from_toml_str(&raw), Err(ConfigError::Invalid(_))),
                "{}",
                hours
            );
        }

        let config = AppConfig::from_toml_str("[security]\njwt_expiration_hours = 8760\n").unwrap();
        assert_eq!(config.security.jwt_expiration_hours, 8760);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join("modinfo-service-does-not-exist.toml");
        assert!(AppConfig::load(&path).is_ok());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = "top-secret".into();
        config.mail.api_key = "mail-key".into();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret"));
        assert!(!rendered.contains("mail-key"));
    }
}
