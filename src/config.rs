use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Process-wide settings, read once at startup and shared immutably through `AppState`.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub environment: String,
    pub api_prefix: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub secret_key: String,
    pub access_token_ttl: Duration,
    /// Parsed for compatibility with existing deployments. No endpoint issues refresh tokens.
    pub refresh_token_ttl: Duration,
    pub allowed_origins: Vec<String>,
    pub resume_upload_dir: PathBuf,
    pub resume_parser_url: Option<String>,
    pub resume_parser_api_key: Option<String>,
    pub resume_parser_timeout: Duration,
    /// Seconds between quota replenishments for each client IP.
    pub rate_limit_per_second: u64,
    /// 0 disables rate limiting.
    pub rate_limit_burst: u32,
    pub max_upload_bytes: usize,
    pub run_migrations: bool,
    pub rust_log: String,
}

pub const DEFAULT_SECRET_KEY: &str = "change-me";

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "Recruit Flow API".to_string(),
            environment: "development".to_string(),
            api_prefix: "/api/v1".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            database_url: "sqlite://recruitflow.db?mode=rwc".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(60 * 24 * 7 * 60),
            allowed_origins: vec!["http://localhost:5173".to_string()],
            resume_upload_dir: PathBuf::from("./uploads/resumes"),
            resume_parser_url: None,
            resume_parser_api_key: None,
            resume_parser_timeout: Duration::from_secs(15),
            rate_limit_per_second: 1,
            rate_limit_burst: 0,
            max_upload_bytes: 10 * 1024 * 1024,
            run_migrations: true,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // .env is optional

        let defaults = Config::default();

        Ok(Config {
            project_name: env_or("PROJECT_NAME", defaults.project_name),
            environment: env_or("ENVIRONMENT", defaults.environment),
            api_prefix: normalize_prefix(&env_or("API_PREFIX", defaults.api_prefix)),
            host: env_or("BACKEND_HOST", defaults.host),
            port: parse_env("BACKEND_PORT", defaults.port)?,
            database_url: env_or("DATABASE_URL", defaults.database_url),
            secret_key: env_or("SECRET_KEY", defaults.secret_key),
            access_token_ttl: minutes_env("ACCESS_TOKEN_EXPIRE_MINUTES", 15)?,
            refresh_token_ttl: minutes_env("REFRESH_TOKEN_EXPIRE_MINUTES", 60 * 24 * 7)?,
            allowed_origins: match std::env::var("ALLOWED_ORIGINS") {
                Ok(raw) => parse_origins(&raw),
                Err(_) => defaults.allowed_origins,
            },
            resume_upload_dir: std::env::var("RESUME_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.resume_upload_dir),
            resume_parser_url: non_empty_env("RESUME_PARSER_URL"),
            resume_parser_api_key: non_empty_env("RESUME_PARSER_API_KEY"),
            resume_parser_timeout: Duration::from_secs(parse_env("RESUME_PARSER_TIMEOUT_SECS", 15)?),
            rate_limit_per_second: parse_env("RATE_LIMIT_PER_SECOND", defaults.rate_limit_per_second)?,
            rate_limit_burst: parse_env("RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            run_migrations: parse_env("RUN_MIGRATIONS", defaults.run_migrations)?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        })
    }

    /// Directory whose children are exposed under `/uploads`.
    pub fn uploads_root(&self) -> PathBuf {
        match self.resume_upload_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

fn minutes_env(key: &str, default: u64) -> Result<Duration> {
    minutes_to_duration(key, parse_env(key, default)?)
}

fn minutes_to_duration(key: &str, minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .filter(|ttl| chrono::Duration::from_std(*ttl).is_ok())
        .with_context(|| format!("Environment variable '{key}' is too large: {minutes}"))
}

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Accepts either a JSON array (`["a","b"]`) or a comma separated list.
pub fn parse_origins(raw: &str) -> Vec<String> {
    if let Ok(parsed) = serde_json::from_str::<Vec<String>>(raw) {
        return parsed
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|o| o.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
