//! # forum-core
//!
//! Domain layer containing entities, read models, and the narrow repository traits
//! each use case depends on.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod read_models;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Conversation, Message, Session, User, UserRecord, Verification, VerificationPurpose,
};
pub use error::DomainError;
pub use read_models::{
    AuthorProfile, AuthorSummary, ContributionUser, ConversationContribution,
    ConversationListItem, ConversationThread, LastMessage, MessageContribution, ThreadMessage,
    UserContributions, UserProfile,
};
pub use traits::RepoResult;
pub use value_objects::{Patch, ProfileChanges};
