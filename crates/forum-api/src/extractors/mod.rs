//! Axum extractors for request handling
//!
//! Custom extractors for session authentication, client metadata, id paths
//! and validated JSON bodies.

mod auth;
mod client;
mod path;
mod validated;

pub use auth::AuthUser;
pub use client::ClientInfo;
pub use path::IdPath;
pub use validated::ValidatedJson;
