use std::{env, str::FromStr, time::Duration};

/// Fallback signing secret for local runs. Rejected in production.
const LOCAL_JWT_SECRET: &str = "super-secure-test-secret-value-local";

/// ConfigError
///
/// Startup configuration failures. `main` logs these and exits.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Env
///
/// Defines the runtime context. `Production` turns missing secrets into
/// startup errors and switches logging to JSON.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// MailConfig
///
/// SMTP settings for the owner notification. Present only when `SMTP_HOST` is set.
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    // Where new-message notifications go.
    pub notify_to: String,
}

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded
/// and pulled into handlers and the Access Gate via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Env,
    pub host: String,
    pub port: u16,
    // None means "run against the in-memory store" (local only).
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    // CORS allow-list. Empty allows any origin.
    pub client_origins: Vec<String>,
    pub mail: Option<MailConfig>,
    pub notify_timeout: Duration,
}

impl Default for AppConfig {
    /// default
    ///
    /// Safe values for test state setup; no environment access.
    fn default() -> Self {
        Self {
            env: Env::Local,
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_url: None,
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            jwt_expires_in: Duration::from_secs(24 * 60 * 60),
            client_origins: Vec::new(),
            mail: None,
            notify_timeout: Duration::from_secs(10),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match var(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: name,
            value,
        }),
        None => Ok(default),
    }
}

/// Like `parse_var`, but zero is rejected.
fn positive_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match parse_var(name, default)? {
        0 => Err(ConfigError::Invalid {
            var: name,
            value: "0".to_string(),
        }),
        value => Ok(value),
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the process environment (after `dotenv`).
    /// Production requires `DATABASE_URL` and `JWT_SECRET`; local runs fall back
    /// to the in-memory store and a development secret.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match var("APP_ENV").as_deref() {
            Some("production") => Env::Production,
            _ => Env::Local,
        };

        let database_url = var("DATABASE_URL");
        let jwt_secret = var("JWT_SECRET");
        if env == Env::Production {
            if database_url.is_none() {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
            if jwt_secret.is_none() {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
        }

        let hours: u64 = positive_var("JWT_EXPIRES_IN_HOURS", 24)?;
        let jwt_expires_in = hours
            .checked_mul(60 * 60)
            .filter(|secs| i64::try_from(*secs).is_ok())
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid {
                var: "JWT_EXPIRES_IN_HOURS",
                value: hours.to_string(),
            })?;

        let client_origins: Vec<String> = var("CLIENT_URL")
            .map(|list| {
                list.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            env,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var("PORT", 5000)?,
            database_url,
            jwt_secret: jwt_secret.unwrap_or_else(|| LOCAL_JWT_SECRET.to_string()),
            jwt_expires_in,
            client_origins,
            mail: MailConfig::load()?,
            notify_timeout: Duration::from_secs(positive_var("NOTIFY_TIMEOUT_SECS", 10)?),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MailConfig {
    /// Returns `None` when `SMTP_HOST` is unset; notifications are then disabled.
    fn load() -> Result<Option<Self>, ConfigError> {
        let Some(host) = var("SMTP_HOST") else {
            return Ok(None);
        };

        let username = var("SMTP_USER");
        let from = var("SMTP_FROM")
            .or_else(|| username.clone())
            .ok_or(ConfigError::Missing("SMTP_FROM"))?;
        let notify_to = var("NOTIFY_EMAIL")
            .or_else(|| username.clone())
            .ok_or(ConfigError::Missing("NOTIFY_EMAIL"))?;

        Ok(Some(Self {
            host,
            port: parse_var("SMTP_PORT", 587)?,
            username,
            password: var("SMTP_PASSWORD"),
            from,
            notify_to,
        }))
    }
}
