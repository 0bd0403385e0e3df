use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_TOKEN_TTL: &str = "7d";
const MIN_JWT_SECRET_BYTES: usize = 32;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Requests allowed per client per window. Zero disables rate limiting.
    pub rate_limit_max: u64,
    pub rate_limit_window: Duration,
    pub cors_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let jwt_secret = require_env("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            bail!("JWT_SECRET must be at least {MIN_JWT_SECRET_BYTES} bytes long");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            jwt_secret,
            token_ttl: parse_token_ttl(
                &std::env::var("JWT_EXPIRE").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string()),
            )?,
            rate_limit_max: std::env::var("RATE_LIMIT_MAX")
                .unwrap_or_else(|_| "100".to_string())
                .parse::<u64>()
                .context("RATE_LIMIT_MAX must be a non-negative integer")?,
            rate_limit_window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .unwrap_or_else(|_| "900".to_string())
                    .parse::<u64>()
                    .context("RATE_LIMIT_WINDOW_SECS must be a number of seconds")?,
            ),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses a token lifetime such as `3600s`, `12h` or `7d`. A bare number is seconds.
fn parse_token_ttl(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let ttl = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw)
            .with_context(|| format!("JWT_EXPIRE '{raw}' is not a valid duration"))?,
    };
    if ttl.is_zero() {
        bail!("JWT_EXPIRE must be greater than zero");
    }
    Ok(ttl)
}
