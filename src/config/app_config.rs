use std::path::PathBuf;

use chrono::Duration;
use serde::Deserialize;

/// Environment variable consulted when `auth.secret` is not set
pub const SECRET_ENV_VAR: &str = "JWT_SECRET";

/// Longest accepted token lifetime, ten years
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub site: SiteConfig,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub metrics: MetricsConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// The site the API belongs to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL, also the token issuer
    pub url: String,
    /// Offset of the site timezone from UTC, for local date fields
    pub utc_offset_minutes: i32,
    /// Default number of decimals for money amounts
    pub price_decimals: u32,
}

/// Route namespace, `/{rest_prefix}/{namespace}/v{version}`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub rest_prefix: String,
    pub namespace: String,
    pub version: u32,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub secret: Option<String>,
    pub token_ttl_secs: i64,
    pub leeway_secs: i64,
    pub require_ssl: bool,
    /// Treat `X-Forwarded-Proto: https` as proof of SSL
    pub trust_forwarded_proto: bool,
    pub validate_issuer: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

/// Optional JSON files loaded at startup
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    pub users_path: Option<PathBuf>,
    pub orders_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            utc_offset_minutes: 0,
            price_decimals: 2,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rest_prefix: "wp-json".to_string(),
            namespace: "uni-app".to_string(),
            version: 1,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: 7 * 24 * 60 * 60,
            leeway_secs: 0,
            require_ssl: true,
            trust_forwarded_proto: true,
            validate_issuer: false,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[hidden]"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("require_ssl", &self.require_ssl)
            .field("trust_forwarded_proto", &self.trust_forwarded_proto)
            .field("validate_issuer", &self.validate_issuer)
            .finish()
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl ApiConfig {
    /// Path prefix every route of this API lives under, e.g. `/wp-json/uni-app/v1`
    pub fn base_path(&self) -> String {
        format!("{}/v{}", self.namespace_path(), self.version)
    }

    /// Prefix that puts a request inside this API's namespace, e.g. `/wp-json/uni-app/`
    pub fn namespace_prefix(&self) -> String {
        format!("{}/", self.namespace_path())
    }

    fn namespace_path(&self) -> String {
        format!(
            "/{}/{}",
            self.rest_prefix.trim_matches('/'),
            self.namespace.trim_matches('/')
        )
    }
}

impl AuthConfig {
    /// Configured secret, falling back to `JWT_SECRET`; empty values count as unset
    pub fn resolved_secret(&self) -> Option<String> {
        let usable = |s: &String| !s.trim().is_empty();

        self.secret
            .clone()
            .filter(usable)
            .or_else(|| std::env::var(SECRET_ENV_VAR).ok().filter(usable))
    }

    /// Token lifetime, held inside `1..=MAX_TOKEN_TTL_SECS` seconds
    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.token_ttl_secs.clamp(1, MAX_TOKEN_TTL_SECS))
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(config::ConfigError::Message(format!(
                "auth.token_ttl_secs must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS, self.token_ttl_secs
            )));
        }

        Ok(())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that deserialize but cannot be used
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.auth.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.base_path(), "/wp-json/uni-app/v1");
        assert_eq!(config.api.namespace_prefix(), "/wp-json/uni-app/");
        assert_eq!(config.auth.token_ttl_secs, 604_800);
        assert_eq!(config.auth.leeway_secs, 0);
        assert!(config.auth.require_ssl);
        assert!(!config.auth.validate_issuer);
        assert_eq!(config.site.price_decimals, 2);
        assert_eq!(config.metrics.path, "/metrics");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [api]
            namespace = "/shop-app/"
            version = 2

            [auth]
            secret = "s3cret"
            require_ssl = false

            [logging]
            format = "json"
            "#,
        );

        assert_eq!(config.api.base_path(), "/wp-json/shop-app/v2");
        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
        assert!(!config.auth.require_ssl);
        assert!(config.auth.trust_forwarded_proto);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_configured_secret_wins() {
        let auth = AuthConfig {
            secret: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(auth.resolved_secret().as_deref(), Some("from-file"));

        let blank = AuthConfig {
            secret: Some("   ".to_string()),
            ..Default::default()
        };
        // A blank configured value is ignored regardless of the environment
        assert_ne!(blank.resolved_secret().as_deref(), Some("   "));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let config = from_toml("[auth]\ntoken_ttl_secs = 3600");
        assert!(config.validate().is_ok());
        assert_eq!(config.auth.token_ttl(), Duration::hours(1));

        for bad in ["0", "-60", "9223372036854775807"] {
            let config = from_toml(&format!("[auth]\ntoken_ttl_secs = {}", bad));
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("auth.token_ttl_secs"), "{}", bad);
        }
    }

    #[test]
    fn test_token_ttl_never_panics() {
        let auth = AuthConfig {
            token_ttl_secs: i64::MAX,
            ..Default::default()
        };
        assert_eq!(auth.token_ttl(), Duration::seconds(MAX_TOKEN_TTL_SECS));

        let auth = AuthConfig {
            token_ttl_secs: -5,
            ..Default::default()
        };
        assert_eq!(auth.token_ttl(), Duration::seconds(1));
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = AuthConfig {
            secret: Some("do-not-print".to_string()),
            ..Default::default()
        };

        assert!(!format!("{:?}", auth).contains("do-not-print"));
    }
}
