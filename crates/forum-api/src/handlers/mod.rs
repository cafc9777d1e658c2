//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod conversations;
pub mod health;
pub mod messages;
pub mod users;
