//! In-memory fakes for use case tests
//!
//! `InMemoryStore` implements every repository trait over mutex-guarded maps
//! and mirrors the soft-delete filtering of the PostgreSQL adapters.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use forum_common::{hash_password, JwtService};
use forum_core::entities::{Conversation, Message, Session, User, Verification, VerificationPurpose};
use forum_core::read_models::{
    AuthorProfile, AuthorSummary, ContributionUser, ConversationContribution,
    ConversationListItem, ConversationThread, LastMessage, MessageContribution, ThreadMessage,
    UserProfile,
};
use forum_core::traits::{
    CreateConversationRepository, CreateMessageRepository, DeleteConversationRepository,
    DeleteMessageRepository, EmailVerificationRepository, GetConversationByIdRepository,
    GetMyProfileRepository, GetUserContributionsRepository, ListConversationsRepository,
    RegisterUserRepository, RepoResult, SessionRepository, SignInRepository,
    UpdateConversationRepository, UpdateMessageRepository, UpdatePasswordRepository,
    UpdateUserAvatarRepository, UpdateUserProfileRepository, VerificationRepository,
};
use forum_core::value_objects::ProfileChanges;
use forum_core::DomainError;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::mail::{EmailMessage, EmailSender};
use crate::storage::AvatarStorage;
use crate::use_cases::{AuthSettings, Repositories, ServiceContext, ServiceContextBuilder};

pub const STRONG_PASSWORD: &str = "Secure1!";

// ============================================================================
// Harness
// ============================================================================

pub struct TestHarness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub avatars: Arc<RecordingAvatarStorage>,
}

pub fn test_context() -> TestHarness {
    test_context_with(|_| {})
}

pub fn test_context_with(configure: impl FnOnce(&mut AuthSettings)) -> TestHarness {
    let mut settings = AuthSettings::default();
    configure(&mut settings);

    let store = Arc::new(InMemoryStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let avatars = Arc::new(RecordingAvatarStorage::default());

    let ctx = ServiceContextBuilder::new()
        .repositories(Repositories::from_stores(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        ))
        .jwt_service(Arc::new(JwtService::new("test-secret-key-for-unit-tests", 3600)))
        .email_sender(mailer.clone())
        .avatar_storage(avatars.clone())
        .auth_settings(settings)
        .build()
        .unwrap();

    TestHarness {
        ctx,
        store,
        mailer,
        avatars,
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    conversations: HashMap<Uuid, Conversation>,
    messages: HashMap<Uuid, Message>,
    sessions: HashMap<Uuid, Session>,
    verifications: HashMap<Uuid, Verification>,
}

impl State {
    fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    fn active_conversation(&self, id: Uuid) -> Option<&Conversation> {
        self.conversations.get(&id).filter(|c| !c.is_deleted())
    }

    fn active_message(&self, id: Uuid) -> Option<&Message> {
        self.messages.get(&id).filter(|m| !m.is_deleted())
    }

    fn live_messages(&self, conversation_id: Uuid) -> Vec<&Message> {
        let mut messages: Vec<&Message> = self
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id && !m.is_deleted())
            .collect();
        messages.sort_by_key(|m| (m.created_at, m.id));
        messages
    }

    fn author_profile(&self, user_id: Uuid) -> Option<AuthorProfile> {
        self.users.get(&user_id).map(|u| AuthorProfile {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            avatar: u.avatar.clone(),
        })
    }
}

fn profile_of(user: &User) -> UserProfile {
    UserProfile {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        bio: user.bio.clone(),
        avatar: user.avatar.clone(),
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Insert an account with [`STRONG_PASSWORD`]
    pub async fn insert_user(&self, email: &str, verified: bool) -> User {
        let user = User::register(Uuid::new_v4(), email, STRONG_PASSWORD, None).unwrap();
        let hash = hash_password(STRONG_PASSWORD).unwrap();
        let mut user = user.with_password_hash(hash).unwrap();
        if verified {
            user.verify_email();
        }

        self.state.lock().await.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_verified_user(&self, email: &str) -> User {
        self.insert_user(email, true).await
    }

    pub async fn insert_session(&self, session: Session) {
        self.state.lock().await.sessions.insert(session.id, session);
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.state.lock().await.users.get(&id).cloned()
    }

    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    pub async fn message(&self, id: Uuid) -> Option<Message> {
        self.state.lock().await.messages.get(&id).cloned()
    }

    pub async fn active_session_count(&self, user_id: Uuid) -> usize {
        self.state
            .lock()
            .await
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .count()
    }

    /// Newest verification of a kind, consumed or not
    pub async fn latest_verification(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> Option<Verification> {
        self.state
            .lock()
            .await
            .verifications
            .values()
            .filter(|v| v.user_id == user_id && v.purpose == purpose)
            .max_by_key(|v| v.created_at)
            .cloned()
    }
}

// ============================================================================
// User traits
// ============================================================================

#[async_trait]
impl RegisterUserRepository for InMemoryStore {
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.state.lock().await.user_by_email(email).is_some())
    }

    async fn save(&self, user: &User) -> RepoResult<()> {
        if !user.has_hashed_password() {
            return Err(DomainError::Internal(
                "Refusing to store an unhashed password".to_string(),
            ));
        }

        let mut state = self.state.lock().await;
        if state.user_by_email(&user.email).is_some() {
            return Err(DomainError::DuplicateEmail);
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl SignInRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.user_by_email(email).cloned())
    }
}

#[async_trait]
impl GetMyProfileRepository for InMemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> RepoResult<Option<UserProfile>> {
        Ok(self.state.lock().await.users.get(&user_id).map(profile_of))
    }
}

#[async_trait]
impl UpdateUserProfileRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> RepoResult<UserProfile> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DomainError::UserNotFound(user_id))?;

        user.name = changes.name.clone().apply(user.name.take());
        user.bio = changes.bio.clone().apply(user.bio.take());
        user.updated_at = Utc::now();

        Ok(profile_of(user))
    }
}

#[async_trait]
impl UpdateUserAvatarRepository for InMemoryStore {
    async fn user_exists(&self, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.state.lock().await.users.contains_key(&user_id))
    }

    async fn update_avatar(&self, user_id: Uuid, avatar_url: &str) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DomainError::UserNotFound(user_id))?;
        user.set_avatar(Some(avatar_url.to_string()));
        Ok(())
    }
}

#[async_trait]
impl UpdatePasswordRepository for InMemoryStore {
    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(DomainError::UserNotFound(user_id))?;
        state
            .users
            .insert(user_id, user.with_password_hash(password_hash.to_string())?);
        Ok(())
    }
}

#[async_trait]
impl GetUserContributionsRepository for InMemoryStore {
    async fn find_contributor(&self, user_id: Uuid) -> RepoResult<Option<ContributionUser>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .get(&user_id)
            .map(|u| ContributionUser {
                id: u.id,
                name: u.name.clone(),
                avatar: u.avatar.clone(),
                bio: u.bio.clone(),
                created_at: u.created_at,
            }))
    }

    async fn conversations_by_author(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Vec<ConversationContribution>> {
        let state = self.state.lock().await;
        let mut items: Vec<ConversationContribution> = state
            .conversations
            .values()
            .filter(|c| c.author_id == user_id && !c.is_deleted())
            .map(|c| ConversationContribution {
                id: c.id,
                title: c.title.clone(),
                created_at: c.created_at,
                updated_at: c.updated_at,
                message_count: state.live_messages(c.id).len() as i64,
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn messages_by_author(&self, user_id: Uuid) -> RepoResult<Vec<MessageContribution>> {
        let state = self.state.lock().await;
        let mut items: Vec<MessageContribution> = state
            .messages
            .values()
            .filter(|m| m.author_id == user_id && !m.is_deleted())
            .filter_map(|m| {
                let conversation = state.active_conversation(m.conversation_id)?;
                Some(MessageContribution {
                    id: m.id,
                    content: m.content.clone(),
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                    conversation_id: conversation.id,
                    conversation_title: conversation.title.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}

#[async_trait]
impl EmailVerificationRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.state.lock().await.user_by_email(email).cloned())
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DomainError::UserNotFound(user_id))?;
        user.verify_email();
        Ok(())
    }
}

// ============================================================================
// Conversation traits
// ============================================================================

#[async_trait]
impl CreateConversationRepository for InMemoryStore {
    async fn create_with_first_message(
        &self,
        conversation: &Conversation,
        first_message: &Message,
    ) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        state.conversations.insert(conversation.id, conversation.clone());
        state.messages.insert(first_message.id, first_message.clone());
        Ok(())
    }
}

#[async_trait]
impl UpdateConversationRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        Ok(self.state.lock().await.active_conversation(id).cloned())
    }

    async fn update(&self, conversation: &Conversation) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.active_conversation(conversation.id).is_none() {
            return Err(DomainError::ConversationNotFound(conversation.id));
        }
        state.conversations.insert(conversation.id, conversation.clone());
        Ok(())
    }
}

#[async_trait]
impl DeleteConversationRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Conversation>> {
        Ok(self.state.lock().await.active_conversation(id).cloned())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        match state.conversations.get_mut(&id) {
            Some(conversation) if !conversation.is_deleted() => {
                conversation.delete();
                Ok(())
            }
            _ => Err(DomainError::ConversationNotFound(id)),
        }
    }
}

#[async_trait]
impl ListConversationsRepository for InMemoryStore {
    async fn list_active(&self) -> RepoResult<Vec<ConversationListItem>> {
        let state = self.state.lock().await;
        let mut items: Vec<ConversationListItem> = state
            .conversations
            .values()
            .filter(|c| !c.is_deleted())
            .filter_map(|c| {
                let author = state.users.get(&c.author_id)?;
                let messages = state.live_messages(c.id);
                let last_message = messages.last().map(|m| LastMessage {
                    id: m.id,
                    content: m.content.clone(),
                    created_at: m.created_at,
                    author_name: state.users.get(&m.author_id).and_then(|u| u.name.clone()),
                });

                Some(ConversationListItem {
                    id: c.id,
                    title: c.title.clone(),
                    author: AuthorSummary {
                        id: author.id,
                        name: author.name.clone(),
                        email: author.email.clone(),
                    },
                    message_count: messages.len() as i64,
                    last_message,
                    created_at: c.created_at,
                    updated_at: c.updated_at,
                })
            })
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items)
    }
}

#[async_trait]
impl GetConversationByIdRepository for InMemoryStore {
    async fn find_thread(&self, id: Uuid) -> RepoResult<Option<ConversationThread>> {
        let state = self.state.lock().await;
        let Some(conversation) = state.active_conversation(id) else {
            return Ok(None);
        };
        let Some(author) = state.author_profile(conversation.author_id) else {
            return Ok(None);
        };

        let messages = state
            .live_messages(id)
            .into_iter()
            .filter_map(|m| {
                Some(ThreadMessage {
                    id: m.id,
                    content: m.content.clone(),
                    author_id: m.author_id,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                    author: state.author_profile(m.author_id)?,
                })
            })
            .collect();

        Ok(Some(ConversationThread {
            id: conversation.id,
            title: conversation.title.clone(),
            author_id: conversation.author_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            author,
            messages,
        }))
    }
}

// ============================================================================
// Message traits
// ============================================================================

#[async_trait]
impl CreateMessageRepository for InMemoryStore {
    async fn conversation_exists(&self, conversation_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .await
            .active_conversation(conversation_id)
            .is_some())
    }

    async fn save(&self, message: &Message) -> RepoResult<()> {
        self.state
            .lock()
            .await
            .messages
            .insert(message.id, message.clone());
        Ok(())
    }
}

#[async_trait]
impl UpdateMessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.state.lock().await.active_message(id).cloned())
    }

    async fn update(&self, message: &Message) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        if state.active_message(message.id).is_none() {
            return Err(DomainError::MessageNotFound(message.id));
        }
        state.messages.insert(message.id, message.clone());
        Ok(())
    }
}

#[async_trait]
impl DeleteMessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self.state.lock().await.active_message(id).cloned())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        match state.messages.get_mut(&id) {
            Some(message) if !message.is_deleted() => {
                message.delete();
                Ok(())
            }
            _ => Err(DomainError::MessageNotFound(id)),
        }
    }
}

// ============================================================================
// Session & verification traits
// ============================================================================

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(&self, session: &Session) -> RepoResult<()> {
        self.state
            .lock()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Session>> {
        Ok(self.state.lock().await.sessions.get(&id).cloned())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut revoked = 0;
        for session in state.sessions.values_mut() {
            if session.user_id == user_id && session.revoked_at.is_none() {
                session.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn revoke_all_except(&self, user_id: Uuid, keep: Uuid) -> RepoResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut revoked = 0;
        for session in state.sessions.values_mut() {
            if session.user_id == user_id && session.id != keep && session.revoked_at.is_none() {
                session.revoked_at = Some(now);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}

#[async_trait]
impl VerificationRepository for InMemoryStore {
    async fn create(&self, verification: &Verification) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        for earlier in state.verifications.values_mut() {
            if earlier.user_id == verification.user_id
                && earlier.purpose == verification.purpose
                && earlier.consumed_at.is_none()
            {
                earlier.consumed_at = Some(now);
            }
        }
        state
            .verifications
            .insert(verification.id, verification.clone());
        Ok(())
    }

    async fn find_latest_active(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
    ) -> RepoResult<Option<Verification>> {
        Ok(self
            .state
            .lock()
            .await
            .verifications
            .values()
            .filter(|v| v.user_id == user_id && v.purpose == purpose && !v.is_consumed())
            .max_by_key(|v| v.created_at)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Verification>> {
        Ok(self.state.lock().await.verifications.get(&id).cloned())
    }

    async fn increment_attempts(&self, id: Uuid) -> RepoResult<i32> {
        let mut state = self.state.lock().await;
        let verification = state
            .verifications
            .get_mut(&id)
            .ok_or(DomainError::InvalidToken)?;
        verification.attempts += 1;
        Ok(verification.attempts)
    }

    async fn consume(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        match state.verifications.get_mut(&id) {
            Some(verification) if !verification.is_consumed() => {
                verification.consumed_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DomainError::InvalidToken),
        }
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail_next: Mutex<bool>,
}

impl RecordingMailer {
    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    /// Make the next send fail like a provider outage
    pub async fn fail_next(&self) {
        *self.fail_next.lock().await = true;
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        let mut fail = self.fail_next.lock().await;
        if *fail {
            *fail = false;
            return Err(DomainError::Email("provider unavailable".to_string()));
        }
        self.sent.lock().await.push(message);
        Ok(())
    }
}

/// Records file names and hands back a fake URL
#[derive(Default)]
pub struct RecordingAvatarStorage {
    uploads: Mutex<Vec<String>>,
}

impl RecordingAvatarStorage {
    pub async fn uploads(&self) -> Vec<String> {
        self.uploads.lock().await.clone()
    }
}

#[async_trait]
impl AvatarStorage for RecordingAvatarStorage {
    async fn upload(
        &self,
        _bytes: &[u8],
        file_name: &str,
        _content_type: &str,
    ) -> Result<String, DomainError> {
        self.uploads.lock().await.push(file_name.to_string());
        Ok(format!("http://test.local/avatars/{file_name}"))
    }
}
