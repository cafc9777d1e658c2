//! Use cases
//!
//! One struct per business operation. Each borrows the [`ServiceContext`],
//! takes a command (or a couple of ids), loads state through its narrow
//! repository, checks the rules, and persists.

pub mod auth;
pub mod context;
pub mod conversation;
pub mod error;
pub mod message;
pub mod password;
pub mod profile;
pub mod verification;

pub use auth::{
    AuthIdentity, GetSession, RegisterUser, RegisterUserCommand, ResolveSession, SignIn,
    SignInCommand, SignOut,
};
pub use context::{AuthSettings, Repositories, ServiceContext, ServiceContextBuilder};
pub use conversation::{
    CreateConversation, CreateConversationCommand, DeleteConversation, GetConversationById,
    ListConversations, UpdateConversation, UpdateConversationCommand,
};
pub use error::{ServiceError, ServiceResult};
pub use message::{
    CreateMessage, CreateMessageCommand, DeleteMessage, UpdateMessage, UpdateMessageCommand,
};
pub use password::{
    RequestPasswordReset, ResetPassword, ResetPasswordCommand, UpdatePassword,
    UpdatePasswordCommand,
};
pub use profile::{
    avatar_extension, GetMyProfile, GetUserContributions, UpdateUserAvatar,
    UpdateUserAvatarCommand, UpdateUserProfile, AVATAR_MAX_BYTES,
};
pub use verification::{SendVerificationOtp, VerifyEmail, VerifyEmailCommand};
