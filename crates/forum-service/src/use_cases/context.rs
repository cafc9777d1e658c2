//! Use case context - dependency container for use cases
//!
//! Holds the repositories, token service, and outbound collaborators every
//! use case reads from. Nothing here is global: the binary builds one context
//! and hands it to the HTTP layer.

use std::sync::Arc;

use chrono::Duration;
use forum_common::{AppConfig, JwtService};
use forum_core::traits::{
    CreateConversationRepository, CreateMessageRepository, DeleteConversationRepository,
    DeleteMessageRepository, EmailVerificationRepository, GetConversationByIdRepository,
    GetMyProfileRepository, GetUserContributionsRepository, ListConversationsRepository,
    RegisterUserRepository, SessionRepository, SignInRepository, UpdateConversationRepository,
    UpdateMessageRepository, UpdatePasswordRepository, UpdateUserAvatarRepository,
    UpdateUserProfileRepository, VerificationRepository,
};

use crate::mail::EmailSender;
use crate::storage::AvatarStorage;

use super::error::{ServiceError, ServiceResult};

/// One handle per narrow repository trait
#[derive(Clone)]
pub struct Repositories {
    pub register_user: Arc<dyn RegisterUserRepository>,
    pub sign_in: Arc<dyn SignInRepository>,
    pub my_profile: Arc<dyn GetMyProfileRepository>,
    pub update_profile: Arc<dyn UpdateUserProfileRepository>,
    pub update_avatar: Arc<dyn UpdateUserAvatarRepository>,
    pub update_password: Arc<dyn UpdatePasswordRepository>,
    pub contributions: Arc<dyn GetUserContributionsRepository>,
    pub email_verification: Arc<dyn EmailVerificationRepository>,

    pub create_conversation: Arc<dyn CreateConversationRepository>,
    pub update_conversation: Arc<dyn UpdateConversationRepository>,
    pub delete_conversation: Arc<dyn DeleteConversationRepository>,
    pub list_conversations: Arc<dyn ListConversationsRepository>,
    pub get_conversation: Arc<dyn GetConversationByIdRepository>,

    pub create_message: Arc<dyn CreateMessageRepository>,
    pub update_message: Arc<dyn UpdateMessageRepository>,
    pub delete_message: Arc<dyn DeleteMessageRepository>,

    pub sessions: Arc<dyn SessionRepository>,
    pub verifications: Arc<dyn VerificationRepository>,
}

impl Repositories {
    /// Fan five concrete stores out into the per-use-case handles
    pub fn from_stores<U, C, M, S, V>(
        users: Arc<U>,
        conversations: Arc<C>,
        messages: Arc<M>,
        sessions: Arc<S>,
        verifications: Arc<V>,
    ) -> Self
    where
        U: RegisterUserRepository
            + SignInRepository
            + GetMyProfileRepository
            + UpdateUserProfileRepository
            + UpdateUserAvatarRepository
            + UpdatePasswordRepository
            + GetUserContributionsRepository
            + EmailVerificationRepository
            + 'static,
        C: CreateConversationRepository
            + UpdateConversationRepository
            + DeleteConversationRepository
            + ListConversationsRepository
            + GetConversationByIdRepository
            + 'static,
        M: CreateMessageRepository
            + UpdateMessageRepository
            + DeleteMessageRepository
            + 'static,
        S: SessionRepository + 'static,
        V: VerificationRepository + 'static,
    {
        Self {
            register_user: users.clone(),
            sign_in: users.clone(),
            my_profile: users.clone(),
            update_profile: users.clone(),
            update_avatar: users.clone(),
            update_password: users.clone(),
            contributions: users.clone(),
            email_verification: users,

            create_conversation: conversations.clone(),
            update_conversation: conversations.clone(),
            delete_conversation: conversations.clone(),
            list_conversations: conversations.clone(),
            get_conversation: conversations,

            create_message: messages.clone(),
            update_message: messages.clone(),
            delete_message: messages,

            sessions,
            verifications,
        }
    }
}

/// Account-flow settings the use cases need
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub require_email_verification: bool,
    pub otp_expiry: Duration,
    pub otp_max_attempts: i32,
    pub password_reset_expiry: Duration,
    /// Front-end base URL used in emailed links
    pub app_url: String,
}

impl AuthSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            require_email_verification: config.auth.require_email_verification,
            otp_expiry: Duration::seconds(config.auth.otp_expiry_secs),
            otp_max_attempts: config.auth.otp_max_attempts,
            password_reset_expiry: Duration::seconds(config.auth.password_reset_expiry_secs),
            app_url: config.app.url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            require_email_verification: true,
            otp_expiry: Duration::hours(24),
            otp_max_attempts: 3,
            password_reset_expiry: Duration::seconds(600),
            app_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Use case context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    repositories: Repositories,
    jwt_service: Arc<JwtService>,
    email_sender: Arc<dyn EmailSender>,
    avatar_storage: Arc<dyn AvatarStorage>,
    auth_settings: AuthSettings,
}

impl ServiceContext {
    /// Create a new context with all dependencies
    pub fn new(
        repositories: Repositories,
        jwt_service: Arc<JwtService>,
        email_sender: Arc<dyn EmailSender>,
        avatar_storage: Arc<dyn AvatarStorage>,
        auth_settings: AuthSettings,
    ) -> Self {
        Self {
            repositories,
            jwt_service,
            email_sender,
            avatar_storage,
            auth_settings,
        }
    }

    // === Repositories ===

    pub fn repos(&self) -> &Repositories {
        &self.repositories
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn email_sender(&self) -> &dyn EmailSender {
        self.email_sender.as_ref()
    }

    pub fn avatar_storage(&self) -> &dyn AvatarStorage {
        self.avatar_storage.as_ref()
    }

    pub fn auth_settings(&self) -> &AuthSettings {
        &self.auth_settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &self.jwt_service)
            .field("auth_settings", &self.auth_settings)
            .finish_non_exhaustive()
    }
}

/// Builder for creating a ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    repositories: Option<Repositories>,
    jwt_service: Option<Arc<JwtService>>,
    email_sender: Option<Arc<dyn EmailSender>>,
    avatar_storage: Option<Arc<dyn AvatarStorage>>,
    auth_settings: Option<AuthSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(mut self, repositories: Repositories) -> Self {
        self.repositories = Some(repositories);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn email_sender(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email_sender = Some(sender);
        self
    }

    pub fn avatar_storage(mut self, storage: Arc<dyn AvatarStorage>) -> Self {
        self.avatar_storage = Some(storage);
        self
    }

    /// Optional; defaults to [`AuthSettings::default`]
    pub fn auth_settings(mut self, settings: AuthSettings) -> Self {
        self.auth_settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.repositories
                .ok_or_else(|| ServiceError::internal("repositories are required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::internal("jwt_service is required"))?,
            self.email_sender
                .ok_or_else(|| ServiceError::internal("email_sender is required"))?,
            self.avatar_storage
                .ok_or_else(|| ServiceError::internal("avatar_storage is required"))?,
            self.auth_settings.unwrap_or_default(),
        ))
    }
}
