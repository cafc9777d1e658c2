//! # forum-service
//!
//! Application layer: one use case per business operation, the request and
//! response DTOs the HTTP layer speaks, and the outbound collaborators
//! (email delivery, avatar storage) the use cases call.

pub mod dto;
pub mod mail;
pub mod storage;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use mail::{EmailMessage, EmailSender, LogEmailSender, ResendEmailSender};
pub use storage::{AvatarStorage, LocalAvatarStorage};
pub use use_cases::{
    AuthSettings, Repositories, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult,
};
