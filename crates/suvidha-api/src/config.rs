//! Service configuration, read once from the environment at startup.
//!
//! Every variable has a default so the service boots with no environment
//! at all (in-memory store, development JWT secret). Values that are set
//! but unparseable are a startup error, not a silent fallback.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Development signing secret used when `JWT_SECRET` is unset.
const DEV_JWT_SECRET: &str = "suvidha-dev-secret-change-in-production";

/// Longest accepted access-token lifetime: ten years, in minutes.
pub const MAX_JWT_EXPIRE_MINUTES: i64 = 10 * 366 * 24 * 60;

/// HS256 signing secret. Zeroed on drop; `Debug` never prints it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Wrap raw secret bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// The secret bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret([REDACTED])")
    }
}

/// Application configuration.
///
/// Custom `Debug` redacts the JWT secret and the database URL (which may
/// embed a password).
#[derive(Clone)]
pub struct AppConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Service name reported by `GET /`.
    pub app_name: String,
    /// Access-token signing secret.
    pub jwt_secret: JwtSecret,
    /// Access-token lifetime in minutes.
    pub jwt_expire_minutes: i64,
    /// Force the in-memory store even when a database is configured.
    pub mock_mode: bool,
    /// Hosted Postgres connection string.
    pub database_url: Option<String>,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Location label on the weather bulletin.
    pub city_location: String,
    /// Per-client request budget per minute.
    pub rate_limit_per_minute: u64,
    /// Whether `GET /metrics` is mounted.
    pub metrics_enabled: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("app_name", &self.app_name)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expire_minutes", &self.jwt_expire_minutes)
            .field("mock_mode", &self.mock_mode)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cors_origins", &self.cors_origins)
            .field("city_location", &self.city_location)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            app_name: "SUVIDHA Backend".to_string(),
            jwt_secret: JwtSecret::new(DEV_JWT_SECRET),
            jwt_expire_minutes: 60 * 24 * 7,
            mock_mode: true,
            database_url: None,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            city_location: "Guwahati, Assam".to_string(),
            rate_limit_per_minute: 1000,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    /// Version reported by `GET /`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Load configuration from process environment variables.
    ///
    /// Variables:
    /// - `HOST` (default: `0.0.0.0`)
    /// - `PORT` (default: `8000`)
    /// - `APP_NAME` (default: `SUVIDHA Backend`)
    /// - `JWT_SECRET` (default: a development secret, with a warning)
    /// - `JWT_EXPIRE_MINUTES` (default: `10080`)
    /// - `MOCK_MODE` (default: `true`)
    /// - `DATABASE_URL` (default: unset)
    /// - `CORS_ORIGINS` comma-separated (default: localhost:3000 pair)
    /// - `CITY_LOCATION` (default: `Guwahati, Assam`)
    /// - `RATE_LIMIT_PER_MINUTE` (default: `1000`)
    /// - `METRICS_ENABLED` (default: `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => JwtSecret::new(secret),
            None => {
                tracing::warn!("JWT_SECRET not set; using the development secret");
                defaults.jwt_secret.clone()
            }
        };

        let jwt_expire_minutes = parse_or(
            "JWT_EXPIRE_MINUTES",
            var("JWT_EXPIRE_MINUTES"),
            defaults.jwt_expire_minutes,
        )?;
        if !(1..=MAX_JWT_EXPIRE_MINUTES).contains(&jwt_expire_minutes) {
            return Err(ConfigError::Invalid {
                var: "JWT_EXPIRE_MINUTES",
                value: jwt_expire_minutes.to_string(),
                reason: format!("must be between 1 and {MAX_JWT_EXPIRE_MINUTES}"),
            });
        }

        let cors_origins = match var("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.cors_origins.clone(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| defaults.host.clone()),
            port: parse_or("PORT", var("PORT"), defaults.port)?,
            app_name: var("APP_NAME").unwrap_or_else(|| defaults.app_name.clone()),
            jwt_secret,
            jwt_expire_minutes,
            mock_mode: parse_bool_or("MOCK_MODE", var("MOCK_MODE"), defaults.mock_mode)?,
            database_url: var("DATABASE_URL"),
            cors_origins,
            city_location: var("CITY_LOCATION").unwrap_or_else(|| defaults.city_location.clone()),
            rate_limit_per_minute: parse_or(
                "RATE_LIMIT_PER_MINUTE",
                var("RATE_LIMIT_PER_MINUTE"),
                defaults.rate_limit_per_minute,
            )?,
            metrics_enabled: parse_bool_or(
                "METRICS_ENABLED",
                var("METRICS_ENABLED"),
                defaults.metrics_enabled,
            )?,
        })
    }

    /// Whether startup should connect to Postgres.
    pub fn uses_database(&self) -> bool {
        !self.mock_mode && self.database_url.is_some()
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

fn parse_bool_or(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.jwt_expire_minutes, 10080);
        assert!(cfg.mock_mode);
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.cors_origins.len(), 2);
        assert_eq!(cfg.city_location, "Guwahati, Assam");
        assert!(!cfg.uses_database());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "9100"),
            ("MOCK_MODE", "false"),
            ("DATABASE_URL", "postgres://u:p@db/suvidha"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("JWT_SECRET", "s3cret"),
            ("METRICS_ENABLED", "off"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9100);
        assert!(cfg.uses_database());
        assert_eq!(cfg.cors_origins, ["https://a.example", "https://b.example"]);
        assert_eq!(cfg.jwt_secret.expose(), b"s3cret");
        assert!(!cfg.metrics_enabled);
    }

    #[test]
    fn mock_mode_wins_over_database_url() {
        let cfg = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/x")])).unwrap();
        assert!(cfg.mock_mode);
        assert!(!cfg.uses_database());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn invalid_bool_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("MOCK_MODE", "maybe")])).is_err());
    }

    #[test]
    fn non_positive_expiry_is_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[("JWT_EXPIRE_MINUTES", "0")])).is_err());
    }

    #[test]
    fn expiry_above_ten_years_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_EXPIRE_MINUTES", "1000000000000")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRE_MINUTES"));

        let max = MAX_JWT_EXPIRE_MINUTES.to_string();
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_EXPIRE_MINUTES", max.as_str())])).unwrap();
        assert_eq!(cfg.jwt_expire_minutes, MAX_JWT_EXPIRE_MINUTES);
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "top-secret-value"),
            ("DATABASE_URL", "postgres://user:hunter2@db/x"),
        ]))
        .unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("top-secret-value"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
