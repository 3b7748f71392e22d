//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Outbound email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Business settings.
    #[serde(default)]
    pub app: BusinessConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

/// SMTP configuration for receipt delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether outbound email is enabled. Jobs fail fast when disabled.
    #[serde(default = "default_email_enabled")]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Capacity of the in-process delivery queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_email_enabled() -> bool {
    true
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "facturacion@omnigest.com".to_string()
}

fn default_from_name() -> String {
    "OMNIGEST Facturación Electrónica".to_string()
}

fn default_queue_capacity() -> usize {
    256
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: default_email_enabled(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

/// Business settings that are not tied to infrastructure.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    /// IANA timezone used to group documents by calendar day.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Number of rows shown by the "recent" listings.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u64,
    /// Page size of paginated listings when the caller sends none.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_timezone() -> String {
    "America/El_Salvador".to_string()
}

fn default_recent_limit() -> u64 {
    10
}

fn default_page_size() -> u32 {
    20
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            recent_limit: default_recent_limit(),
            default_page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("OMNIGEST").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
