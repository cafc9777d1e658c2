//! # forum-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_otp, generate_token, hash_password, secrets_match, sha256_hex, verify_password,
    JwtService, SessionClaims, SessionToken,
};
pub use config::{
    AppConfig, AppSettings, AuthConfig, ConfigError, CorsConfig, DatabaseConfig, EmailConfig,
    Environment, RateLimitConfig, ServerConfig, StorageConfig,
};
pub use error::{domain_status, AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, TracingConfig, TracingError};
