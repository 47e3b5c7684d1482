//! Configuration for the waitlist service.

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

/// Service configuration, loaded from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Record store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Welcome email configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Administrative endpoints configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Cross-origin configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. The bare `DATABASE_URL` variable is
    /// honored as well; absence is fatal at startup.
    pub url: Option<String>,

    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key. When unset, welcome emails are skipped.
    pub resend_api_key: Option<String>,

    /// Sender address
    #[serde(default = "default_email_from")]
    pub from: String,

    /// Maximum welcome emails per calendar day
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Shared secret for the CSV export. When unset, the export endpoint
    /// is disabled entirely.
    pub export_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins. When unset, any origin is
    /// allowed.
    pub allowed_origins: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from: default_email_from(),
            daily_cap: default_daily_cap(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { export_key: None }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

fn default_email_from() -> String {
    "Waitlist <onboarding@resend.dev>".into()
}

fn default_daily_cap() -> u32 {
    100
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// Nested fields map through a double underscore, e.g.
    /// `EMAIL__DAILY_CAP=50` or `ADMIN__EXPORT_KEY=...`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        let mut config: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        if config.database.url.is_none() {
            config.database.url = std::env::var("DATABASE_URL").ok();
        }

        Ok(config)
    }

    /// Connection string for the record store.
    pub fn database_url(&self) -> Result<&str> {
        match self.database.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => bail!("DATABASE_URL is not set. Add it to your environment."),
        }
    }
}

impl ServerConfig {
    /// Resolve the configured bind address. A malformed address is a
    /// startup error, same as a missing `DATABASE_URL`.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr> {
        let ip: std::net::IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid SERVER__LISTEN_ADDR: {:?}", self.listen_addr))?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}

impl CorsConfig {
    /// Build the CORS layer: permissive unless an origin list is configured.
    pub fn layer(&self) -> CorsLayer {
        match self.allowed_origins.as_deref() {
            Some(origins) if !origins.trim().is_empty() => {
                let origins: Vec<HeaderValue> = origins
                    .split(',')
                    .filter_map(|origin| origin.trim().parse().ok())
                    .collect();
                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
            _ => CorsLayer::permissive(),
        }
    }
}
