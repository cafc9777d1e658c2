//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in forum-core.
//! One type per table, each implementing every narrow trait that reads or writes it.

mod conversation;
mod error;
mod message;
mod session;
mod user;
mod verification;

pub use conversation::PgConversationRepository;
pub use message::PgMessageRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
pub use verification::PgVerificationRepository;
