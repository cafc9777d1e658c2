//! Repository traits (ports) - define the interface for data access
//!
//! Each use case gets its own narrow trait listing only the operations it
//! needs. A storage adapter usually implements many of them on one type.

mod auth;
mod conversation;
mod message;
mod user;

pub use auth::{SessionRepository, VerificationRepository};
pub use conversation::{
    CreateConversationRepository, DeleteConversationRepository, GetConversationByIdRepository,
    ListConversationsRepository, UpdateConversationRepository,
};
pub use message::{CreateMessageRepository, DeleteMessageRepository, UpdateMessageRepository};
pub use user::{
    EmailVerificationRepository, GetMyProfileRepository, GetUserContributionsRepository,
    RegisterUserRepository, SignInRepository, UpdatePasswordRepository,
    UpdateUserAvatarRepository, UpdateUserProfileRepository,
};

use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;
