use std::fmt;

use config::ConfigError;

use crate::error::KeyError;
use crate::maker::{new_maker, Maker, TokenBackend};

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationSettings,
    pub token: TokenSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Token issuing settings
#[derive(serde::Deserialize, Clone)]
pub struct TokenSettings {
    pub backend: TokenBackend,
    pub symmetric_key: String,
    pub access_token_duration: i64,  // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_duration: i64, // seconds (e.g., 86400 for 1 day)
}

impl TokenSettings {
    pub fn access_token_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_duration)
    }

    pub fn refresh_token_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_duration)
    }

    /// Construct the configured maker. Call once at startup.
    pub fn build_maker(&self) -> Result<Box<dyn Maker>, KeyError> {
        new_maker(self.backend, &self.symmetric_key)
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("backend", &self.backend)
            .field("symmetric_key", &"[REDACTED]")
            .field("access_token_duration", &self.access_token_duration)
            .field("refresh_token_duration", &self.refresh_token_duration)
            .finish()
    }
}

/// Load settings from `configuration.{yaml,toml,json}` and `APP_*` environment
/// variables, e.g. `APP_TOKEN__SYMMETRIC_KEY`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.log_level", "info")?
        .set_default("token.backend", "paseto")?
        .set_default("token.access_token_duration", 900)?
        .set_default("token.refresh_token_duration", 86400)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from_yaml(yaml: &str) -> Result<Settings, ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Settings>()
    }

    #[test]
    fn test_settings_deserialize_and_build_maker() {
        let settings = settings_from_yaml(
            r#"
token:
  backend: jwt
  symmetric_key: "12345678901234567890123456789012"
  access_token_duration: 900
  refresh_token_duration: 86400
"#,
        )
        .expect("Failed to parse settings");

        assert_eq!(settings.token.backend, TokenBackend::Jwt);
        assert_eq!(settings.application.log_level, "info");
        assert_eq!(settings.token.access_token_duration(), chrono::Duration::minutes(15));
        assert_eq!(settings.token.refresh_token_duration(), chrono::Duration::days(1));
        assert!(settings.token.build_maker().is_ok());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = settings_from_yaml(
            r#"
token:
  backend: none
  symmetric_key: "12345678901234567890123456789012"
  access_token_duration: 900
  refresh_token_duration: 86400
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_bad_key_fails_startup() {
        let settings = settings_from_yaml(
            r#"
token:
  backend: paseto
  symmetric_key: "short"
  access_token_duration: 900
  refresh_token_duration: 86400
"#,
        )
        .expect("Failed to parse settings");

        assert!(settings.token.build_maker().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = TokenSettings {
            backend: TokenBackend::Paseto,
            symmetric_key: "super-secret-value".to_string(),
            access_token_duration: 60,
            refresh_token_duration: 120,
        };

        assert!(!format!("{:?}", settings).contains("super-secret-value"));
    }
}
