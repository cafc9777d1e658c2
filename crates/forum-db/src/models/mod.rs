//! Database models - SQLx-compatible structs for PostgreSQL tables and query rows

mod conversation;
mod message;
mod session;
mod user;
mod verification;

pub use conversation::{
    ConversationContributionRow, ConversationListRow, ConversationModel, ThreadHeaderRow,
};
pub use message::{MessageContributionRow, MessageModel, ThreadMessageRow};
pub use session::SessionModel;
pub use user::{ContributionUserRow, UserModel, UserProfileRow};
pub use verification::VerificationModel;
