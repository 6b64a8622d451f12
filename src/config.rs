use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use http::HeaderValue;
use zeroize::Zeroizing;

/// Signing secret used when `AUTH_SECRET` is not configured.
///
/// Only suitable for local development; real deployments must set `AUTH_SECRET`.
pub const DEV_AUTH_SECRET: &str = "bookshelf-dev-secret-change-this-before-production";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000,http://[::1]:3000";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// The secret the session token codec signs with.
#[derive(Clone)]
pub struct AuthSecret {
    bytes: Zeroizing<Vec<u8>>,
    is_fallback: bool,
}

impl AuthSecret {
    /// Wraps a configured secret.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Zeroizing::new(secret.into()),
            is_fallback: false,
        }
    }

    /// The hardcoded development secret.
    pub fn development_fallback() -> Self {
        Self {
            bytes: Zeroizing::new(DEV_AUTH_SECRET.as_bytes().to_vec()),
            is_fallback: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether no secret was configured and the development fallback is in use.
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }
}

/// Rate limit applied to the register and login routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthRateLimit {
    /// Seconds between replenished requests.
    pub per_second: u64,
    /// Requests allowed in a burst.
    pub burst_size: u32,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// The address the server listens on.
    pub bind_addr: SocketAddr,
    /// The session token signing secret.
    pub auth_secret: AuthSecret,
    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<HeaderValue>,
    /// Directory holding the static pages.
    pub public_dir: PathBuf,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
    /// Limit for register/login, `None` when disabled.
    pub auth_rate_limit: Option<AuthRateLimit>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary variable lookup.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of a variable, or `None` when unset.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let auth_secret = match var("AUTH_SECRET") {
            Some(secret) => AuthSecret::new(secret),
            None => AuthSecret::development_fallback(),
        };

        let secure_cookies = var("APP_ENV").as_deref() == Some("production");

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        let max_body_bytes = match var("MAX_BODY_BYTES") {
            Some(v) => v.parse().context("Invalid MAX_BODY_BYTES")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let per_second: u64 = var("AUTH_RATE_LIMIT_PER_SECOND")
            .unwrap_or_else(|| "2".to_string())
            .parse()
            .context("Invalid AUTH_RATE_LIMIT_PER_SECOND")?;
        let burst_size: u32 = var("AUTH_RATE_LIMIT_BURST")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("Invalid AUTH_RATE_LIMIT_BURST")?;
        let auth_rate_limit = (burst_size > 0 && per_second > 0).then_some(AuthRateLimit {
            per_second,
            burst_size,
        });

        Ok(Self {
            database_url: var("DATABASE_URL"),
            bind_addr,
            auth_secret,
            secure_cookies,
            cors_origins,
            public_dir: var("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()).into(),
            max_body_bytes,
            auth_rate_limit,
        })
    }
}
