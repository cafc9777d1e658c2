//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
    /// Public URL of the web front end, used in emailed links
    pub url: String,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Session and verification settings
#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub session_expiry_secs: i64,
    pub require_email_verification: bool,
    pub otp_expiry_secs: i64,
    pub otp_max_attempts: i32,
    pub password_reset_expiry_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_expiry_secs", &self.session_expiry_secs)
            .field("require_email_verification", &self.require_email_verification)
            .field("otp_expiry_secs", &self.otp_expiry_secs)
            .field("otp_max_attempts", &self.otp_max_attempts)
            .field("password_reset_expiry_secs", &self.password_reset_expiry_secs)
            .finish_non_exhaustive()
    }
}

/// Transactional email settings
#[derive(Clone)]
pub struct EmailConfig {
    /// When `None`, emails are logged instead of sent
    pub resend_api_key: Option<String>,
    pub from: String,
    /// Development-only allow-listed recipient
    pub dev_recipient: Option<String>,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("resend_api_key", &self.resend_api_key.as_ref().map(|_| "[redacted]"))
            .field("from", &self.from)
            .field("dev_recipient", &self.dev_recipient)
            .finish()
    }
}

/// Avatar storage settings
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub public_base_url: String,
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "forum-server".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_session_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_otp_expiry() -> i64 {
    86_400 // 24 hours
}

fn default_otp_max_attempts() -> i32 {
    3
}

fn default_password_reset_expiry() -> i64 {
    600 // 10 minutes
}

fn default_email_from() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    ///
    /// # Errors
    /// Returns an error if required variables are missing or unparsable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let port: u16 = vars.required("API_PORT")?;

        Ok(Self {
            app: AppSettings {
                name: vars.string_or("APP_NAME", default_app_name),
                env: vars.parse_or("APP_ENV", Environment::default)?,
                url: vars.string_or("APP_URL", default_app_url),
            },
            api: ServerConfig {
                host: vars.string_or("API_HOST", default_host),
                port,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parse_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                run_migrations: vars.parse_or("DATABASE_RUN_MIGRATIONS", || true)?,
            },
            auth: AuthConfig {
                secret: vars.required("AUTH_SECRET")?,
                session_expiry_secs: vars.parse_or("SESSION_EXPIRY_SECONDS", default_session_expiry)?,
                require_email_verification: vars.parse_or("REQUIRE_EMAIL_VERIFICATION", || true)?,
                otp_expiry_secs: vars.parse_or("EMAIL_OTP_EXPIRY_SECONDS", default_otp_expiry)?,
                otp_max_attempts: vars.parse_or("EMAIL_OTP_MAX_ATTEMPTS", default_otp_max_attempts)?,
                password_reset_expiry_secs: vars
                    .parse_or("PASSWORD_RESET_EXPIRY_SECONDS", default_password_reset_expiry)?,
            },
            email: EmailConfig {
                resend_api_key: vars.optional("RESEND_API_KEY"),
                from: vars.string_or("EMAIL_FROM", default_email_from),
                dev_recipient: vars.optional("RESEND_DEV_EMAIL"),
            },
            storage: StorageConfig {
                upload_dir: vars.string_or("UPLOAD_DIR", default_upload_dir),
                public_base_url: vars
                    .string_or("PUBLIC_BASE_URL", || format!("http://localhost:{port}")),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parse_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parse_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .optional("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Typed access to a variable source; blank values count as unset
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn string_or(&self, key: &str, default: impl FnOnce() -> String) -> String {
        self.optional(key).unwrap_or_else(default)
    }

    fn required<T: FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.optional(key).ok_or(ConfigError::MissingVar(key))?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw))
    }

    fn parse_or<T: FromStr>(
        &self,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
