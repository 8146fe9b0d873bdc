use std::env;
use std::fmt;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Absent URL selects the in-memory account store.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_expires_in_minutes")]
    pub expires_in_minutes: i64,
}

fn default_expires_in_minutes() -> i64 {
    auth::config::DEFAULT_TOKEN_LIFETIME_MINUTES
}

impl JwtConfig {
    /// Build the immutable token configuration.
    ///
    /// # Errors
    /// * `MissingSigningKey` - Secret is absent or empty
    /// * `InvalidLifetime` - Lifetime is not positive or exceeds one year
    pub fn to_auth_config(&self) -> Result<auth::AuthConfig, auth::ConfigError> {
        let secret = self.secret.as_deref().unwrap_or_default();

        auth::AuthConfig::new(secret, self.issuer.as_str(), self.audience.as_str())?
            .with_token_lifetime(self.expires_in_minutes)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expires_in_minutes", &self.expires_in_minutes)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config(secret: Option<&str>, expires_in_minutes: i64) -> JwtConfig {
        JwtConfig {
            secret: secret.map(str::to_string),
            issuer: "account-service".to_string(),
            audience: "account-clients".to_string(),
            expires_in_minutes,
        }
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = jwt_config(None, 60).to_auth_config();
        assert_eq!(result.unwrap_err(), auth::ConfigError::MissingSigningKey);

        let result = jwt_config(Some(""), 60).to_auth_config();
        assert_eq!(result.unwrap_err(), auth::ConfigError::MissingSigningKey);
    }

    #[test]
    fn test_non_positive_lifetime_is_fatal() {
        let result = jwt_config(Some("secret"), 0).to_auth_config();
        assert_eq!(result.unwrap_err(), auth::ConfigError::InvalidLifetime(0));
    }

    #[test]
    fn test_oversized_lifetime_is_fatal() {
        let result = jwt_config(Some("secret"), 1_000_000_000_000).to_auth_config();
        assert_eq!(
            result.unwrap_err(),
            auth::ConfigError::InvalidLifetime(1_000_000_000_000)
        );
    }

    #[test]
    fn test_auth_config_carries_settings() {
        let config = jwt_config(Some("secret"), 15).to_auth_config().unwrap();

        assert_eq!(config.signing_key(), b"secret");
        assert_eq!(config.issuer(), "account-service");
        assert_eq!(config.audience(), "account-clients");
        assert_eq!(config.token_lifetime_minutes(), 15);
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = jwt_config(Some("super-secret-value"), 60);
        assert!(!format!("{:?}", config).contains("super-secret-value"));
    }

    #[test]
    fn test_defaults_from_toml() {
        let configuration = ConfigBuilder::builder()
            .add_source(config::File::from_str(
                "[server]\nhttp_port = 9000\n[jwt]\nissuer = \"a\"\naudience = \"b\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: Config = configuration.try_deserialize().unwrap();
        assert_eq!(config.server.http_port, 9000);
        assert!(config.database.url.is_none());
        assert!(config.jwt.secret.is_none());
        assert_eq!(config.jwt.expires_in_minutes, 60);
    }
}
