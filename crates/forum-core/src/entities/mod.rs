//! Domain entities

mod conversation;
mod message;
mod session;
mod user;
mod verification;

pub use conversation::{Conversation, TITLE_MAX_LEN};
pub use message::{Message, CONTENT_MAX_LEN};
pub use session::Session;
pub use user::{
    is_password_hash, validate_email, validate_name, validate_password, User, UserRecord,
    EMAIL_MAX_LEN, NAME_MAX_LEN, PASSWORD_MIN_LEN,
};
pub use verification::{Verification, VerificationPurpose};
