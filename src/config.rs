/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, CORS 許可、Token 設定など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::token_issuer::DEFAULT_TTL_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Longest accepted token lifetime (one day).
pub const MAX_TTL_SECONDS: u64 = 24 * 60 * 60;

const DEFAULT_BODY_LIMIT_BYTES: u64 = 1024 * 1024;
const MAX_BODY_LIMIT_BYTES: u64 = 64 * 1024 * 1024;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 10 * 60;

/// Transport limits applied in front of the auth pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    pub body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES as usize,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }
}

/// Bootstrap account seeded into the user store at startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub http_limits: HttpLimits,

    pub access_token_ttl_seconds: u64,
    // base64url HS256 secret. None -> a new key is generated on every start.
    pub jwt_secret: Option<String>,

    pub seed_admin: Option<SeedAdmin>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("http_limits", &self.http_limits)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field(
                "seed_admin",
                &self.seed_admin.as_ref().map(|s| s.username.as_str()),
            )
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let access_token_ttl_seconds = env_bounded(
            "ACCESS_TOKEN_TTL_SECONDS",
            DEFAULT_TTL_SECONDS,
            MAX_TTL_SECONDS,
        )?;

        let body_limit_bytes = env_bounded(
            "REQUEST_BODY_LIMIT_BYTES",
            DEFAULT_BODY_LIMIT_BYTES,
            MAX_BODY_LIMIT_BYTES,
        )?;
        let timeout_seconds = env_bounded(
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
            MAX_REQUEST_TIMEOUT_SECONDS,
        )?;
        let http_limits = HttpLimits {
            body_limit_bytes: usize::try_from(body_limit_bytes)
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            request_timeout: Duration::from_secs(timeout_seconds),
        };

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let seed_admin = match (
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) => Some(SeedAdmin { username, password }),
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
            (None, None) => None,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            http_limits,
            access_token_ttl_seconds,
            jwt_secret,
            seed_admin,
        })
    }
}

fn env_bounded(key: &'static str, default: u64, max: u64) -> Result<u64, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_bounded(&raw, key, max),
        Err(_) => Ok(default),
    }
}

/// Positive integer no larger than `max`.
fn parse_bounded(raw: &str, key: &'static str, max: u64) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| (1..=max).contains(v))
        .ok_or(ConfigError::Invalid(key))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_parsing() {
        assert_eq!(AppEnv::parse("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse(" PROD "), AppEnv::Production);
        assert_eq!(AppEnv::parse("staging"), AppEnv::Development);
        assert_eq!(AppEnv::parse(""), AppEnv::Development);
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://localhost:4200 ,,https://app.example.com,"),
            vec!["http://localhost:4200", "https://app.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn ttl_must_be_positive_and_at_most_one_day() {
        let key = "ACCESS_TOKEN_TTL_SECONDS";
        assert_eq!(parse_bounded(" 3600 ", key, MAX_TTL_SECONDS).unwrap(), 3600);
        assert_eq!(parse_bounded("86400", key, MAX_TTL_SECONDS).unwrap(), 86_400);

        for raw in ["0", "86401", "18446744073709551615", "-1", "1h", ""] {
            assert!(
                matches!(
                    parse_bounded(raw, key, MAX_TTL_SECONDS),
                    Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
                ),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn default_http_limits() {
        let limits = HttpLimits::default();
        assert_eq!(limits.body_limit_bytes, 1024 * 1024);
        assert_eq!(limits.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = Config {
            addr: "0.0.0.0:8080".parse().unwrap(),
            app_env: AppEnv::Development,
            cors_allowed_origins: vec![],
            http_limits: HttpLimits::default(),
            access_token_ttl_seconds: 3600,
            jwt_secret: Some("super-secret-value".into()),
            seed_admin: Some(SeedAdmin {
                username: "admin".into(),
                password: "hunter22".into(),
            }),
        };

        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("<redacted>"));
    }
}
