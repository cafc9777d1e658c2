//! Account and session use cases
//!
//! Registration, sign-in, sign-out, and resolving a bearer token back to a
//! live session.

use forum_common::{hash_password, verify_password};
use forum_core::entities::{Session, User};
use forum_core::DomainError;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{SessionInfo, SessionResponse, SignInResponse, SignOutResponse, SignUpResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::verification::issue_email_otp;

/// The caller behind a valid, unrevoked session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub struct RegisterUser<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegisterUser<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account and send its first verification code
    ///
    /// A failed email does not undo the account; the user can ask for a new code.
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn execute(&self, command: RegisterUserCommand) -> ServiceResult<SignUpResponse> {
        let repo = &self.ctx.repos().register_user;

        if repo.email_exists(&command.email).await? {
            return Err(DomainError::DuplicateEmail.into());
        }

        let user = User::register(Uuid::new_v4(), command.email, command.password, command.name)?;
        let password_hash = hash_password(user.password())?;
        let user = user.with_password_hash(password_hash)?;

        repo.save(&user).await?;

        info!(user_id = %user.id, "User registered");

        if let Err(e) = issue_email_otp(self.ctx, user.id, &user.email).await {
            warn!(user_id = %user.id, error = %e, "Could not issue the verification code");
        }

        Ok(SignUpResponse {
            user_id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}

// ============================================================================
// Sign in
// ============================================================================

#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

pub struct SignIn<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SignIn<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check credentials and open a session
    ///
    /// Unknown email and wrong password fail with the same error.
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn execute(&self, command: SignInCommand) -> ServiceResult<SignInResponse> {
        if command.email.trim().is_empty() {
            return Err(DomainError::validation("email", "Email is required").into());
        }
        if command.password.is_empty() {
            return Err(DomainError::validation("password", "Password is required").into());
        }

        let Some(user) = self.ctx.repos().sign_in.find_by_email(&command.email).await? else {
            warn!("Sign-in rejected");
            return Err(DomainError::InvalidCredentials.into());
        };

        if !verify_password(&command.password, user.password())? {
            warn!(user_id = %user.id, "Sign-in rejected");
            return Err(DomainError::InvalidCredentials.into());
        }

        if self.ctx.auth_settings().require_email_verification && !user.email_verified {
            return Err(DomainError::EmailNotVerified.into());
        }

        let jwt = self.ctx.jwt_service();
        let session = Session::new(Uuid::new_v4(), user.id, jwt.session_lifetime())
            .with_client(command.user_agent, command.ip_address);
        self.ctx.repos().sessions.create(&session).await?;

        let token = jwt.issue_session_token(&session, &user.email)?;

        info!(user_id = %user.id, session_id = %session.id, "User signed in");

        Ok(SignInResponse {
            user_id: user.id,
            email: user.email,
            name: user.name,
            token: token.token,
            expires_at: token.expires_at,
        })
    }
}

// ============================================================================
// Sign out
// ============================================================================

pub struct SignOut<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SignOut<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Revoke every active session of the user
    ///
    /// Always reports success, even when nothing was left to revoke.
    #[instrument(skip(self))]
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<SignOutResponse> {
        if user_id.is_nil() {
            return Err(DomainError::validation("user_id", "User id is required").into());
        }

        let revoked = self.ctx.repos().sessions.revoke_all_for_user(user_id).await?;

        info!(user_id = %user_id, revoked, "User signed out");

        Ok(SignOutResponse {
            success: true,
            revoked_sessions: revoked,
        })
    }
}

// ============================================================================
// Session
// ============================================================================

pub struct ResolveSession<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ResolveSession<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Turn a bearer token into the identity of a live session
    #[instrument(skip(self, token))]
    pub async fn execute(&self, token: &str) -> ServiceResult<AuthIdentity> {
        let claims = self.ctx.jwt_service().validate_session_token(token)?;
        let user_id = claims.user_id()?;
        let session_id = claims.session_id()?;

        let session = self
            .ctx
            .repos()
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(DomainError::SessionInvalid)?;

        if session.user_id != user_id || !session.is_active() {
            return Err(DomainError::SessionInvalid.into());
        }

        Ok(AuthIdentity {
            user_id,
            session_id,
            email: claims.email,
        })
    }
}

pub struct GetSession<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GetSession<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn execute(&self, identity: &AuthIdentity) -> ServiceResult<SessionResponse> {
        let user = self
            .ctx
            .repos()
            .my_profile
            .find_profile(identity.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(identity.user_id))?;

        let session = self
            .ctx
            .repos()
            .sessions
            .find_by_id(identity.session_id)
            .await?
            .ok_or(DomainError::SessionNotFound)?;

        Ok(SessionResponse {
            user,
            session: SessionInfo {
                id: session.id,
                created_at: session.created_at,
                expires_at: session.expires_at,
            },
        })
    }
}
