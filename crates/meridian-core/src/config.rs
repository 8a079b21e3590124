use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::tz::resolve::resolve;

/// Session signing keys must be at least this long (enforced by the
/// session store).
pub const MIN_SESSION_SECRET_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub timezone: TimezoneConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneConfig {
    /// IANA identifier used when a request carries no timezone preference.
    pub default: String,
    /// Cookie holding the visitor's timezone identifier.
    pub cookie_name: String,
    /// Session key holding the visitor's timezone identifier.
    pub session_key: String,
}

impl TimezoneConfig {
    /// ## Summary
    /// Resolves the configured default timezone identifier.
    ///
    /// Call this once at startup; a failure here is a configuration error
    /// and must be fatal, so that reads through
    /// [`crate::tz::context::ActiveZones`] can never fail.
    ///
    /// ## Errors
    /// Returns `UnknownTimezone` if the identifier is not in the zone
    /// database.
    pub fn resolve_default(&self) -> CoreResult<chrono_tz::Tz> {
        resolve(&self.default)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Signing key for session cookies.
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8642)?
            .set_default("timezone.default", "UTC")?
            .set_default("timezone.cookie_name", "timezone")?
            .set_default("timezone.session_key", "timezone")?
            .set_default(
                "session.secret",
                "insecure-development-session-secret-change-me-0123456789abcdef0123456789",
            )?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Validates settings that must hold before the server starts: the
    /// default timezone identifier resolves and the session secret is long
    /// enough to sign cookies.
    ///
    /// ## Errors
    /// Returns `UnknownTimezone` or `InvalidConfiguration` describing the
    /// offending value.
    pub fn validate(&self) -> CoreResult<()> {
        self.timezone.resolve_default()?;

        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(CoreError::InvalidConfiguration(format!(
                "session.secret must be at least {MIN_SESSION_SECRET_LEN} bytes, got {}",
                self.session.secret.len()
            )));
        }

        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> Settings {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8642,
            },
            timezone: TimezoneConfig {
                default: "UTC".to_string(),
                cookie_name: "timezone".to_string(),
                session_key: "timezone".to_string(),
            },
            session: SessionConfig {
                secret: "x".repeat(MIN_SESSION_SECRET_LEN),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let settings = base_settings();
        settings.validate().expect("default settings should validate");
    }

    #[test]
    fn test_validate_rejects_unknown_default_timezone() {
        let mut settings = base_settings();
        settings.timezone.default = "Mars/Olympus_Mons".to_string();

        let err = settings.validate().expect_err("should reject unknown zone");
        assert!(matches!(err, CoreError::UnknownTimezone(_)));
    }

    #[test]
    fn test_validate_rejects_short_session_secret() {
        let mut settings = base_settings();
        settings.session.secret = "short".to_string();

        let err = settings.validate().expect_err("should reject short secret");
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_bind_addr_formats_host_and_port() {
        let settings = base_settings();
        assert_eq!(settings.server.bind_addr(), "127.0.0.1:8642");
    }
}
