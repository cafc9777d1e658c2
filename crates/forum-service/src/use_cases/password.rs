//! Password reset and password change

use forum_common::{generate_token, hash_password, secrets_match, sha256_hex, verify_password};
use forum_core::entities::{validate_password, Verification, VerificationPurpose};
use forum_core::DomainError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dto::{SuccessResponse, UpdatePasswordResponse};
use crate::mail::templates;

use super::context::ServiceContext;
use super::error::ServiceResult;

// ============================================================================
// Forgot password
// ============================================================================

pub struct RequestPasswordReset<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RequestPasswordReset<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Email a reset link if the address belongs to an account
    ///
    /// The response is the same whether or not it does.
    #[instrument(skip(self))]
    pub async fn execute(&self, email: &str) -> ServiceResult<SuccessResponse> {
        let Some(user) = self.ctx.repos().sign_in.find_by_email(email).await? else {
            debug!("No account for this address, nothing sent");
            return Ok(SuccessResponse::ok());
        };

        let settings = self.ctx.auth_settings();
        let secret = generate_token();
        let verification = Verification::new(
            Uuid::new_v4(),
            user.id,
            VerificationPurpose::PasswordReset,
            sha256_hex(&secret),
            settings.password_reset_expiry,
        );
        self.ctx.repos().verifications.create(&verification).await?;

        let token = format!("{}.{secret}", verification.id);
        let reset_url = format!("{}/reset-password?token={token}", settings.app_url);

        let sent = self
            .ctx
            .email_sender()
            .send(templates::password_reset_email(
                &user.email,
                user.name.as_deref(),
                &reset_url,
                settings.password_reset_expiry.num_minutes(),
            ))
            .await;

        match sent {
            Ok(()) => info!(user_id = %user.id, "Password reset requested"),
            Err(e) => warn!(
                user_id = %user.id,
                error = %e,
                "Could not send the password reset email"
            ),
        }
        Ok(SuccessResponse::ok())
    }
}

// ============================================================================
// Reset password
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    /// `{verification_id}.{secret}` as emailed
    pub token: String,
    pub new_password: String,
}

pub struct ResetPassword<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ResetPassword<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Replace the password and sign the user out everywhere
    #[instrument(skip(self, command))]
    pub async fn execute(&self, command: ResetPasswordCommand) -> ServiceResult<SuccessResponse> {
        let repos = self.ctx.repos();

        let (id, secret) = command
            .token
            .split_once('.')
            .ok_or(DomainError::InvalidToken)?;
        let id = Uuid::parse_str(id).map_err(|_| DomainError::InvalidToken)?;

        let verification = repos
            .verifications
            .find_by_id(id)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        if verification.purpose != VerificationPurpose::PasswordReset
            || verification.is_consumed()
            || verification.is_expired()
            || !secrets_match(secret, &verification.secret_hash)
        {
            warn!(verification_id = %id, "Password reset token rejected");
            return Err(DomainError::InvalidToken.into());
        }

        validate_password(&command.new_password)?;
        let password_hash = hash_password(&command.new_password)?;

        repos.verifications.consume(verification.id).await?;
        repos
            .update_password
            .update_password(verification.user_id, &password_hash)
            .await?;
        let revoked = repos
            .sessions
            .revoke_all_for_user(verification.user_id)
            .await?;

        info!(user_id = %verification.user_id, revoked, "Password reset");
        Ok(SuccessResponse::ok())
    }
}

// ============================================================================
// Change password
// ============================================================================

#[derive(Debug, Clone)]
pub struct UpdatePasswordCommand {
    pub user_id: Uuid,
    /// The session making the request; kept when others are revoked
    pub session_id: Uuid,
    pub current_password: String,
    pub new_password: String,
    pub revoke_other_sessions: bool,
}

pub struct UpdatePassword<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UpdatePassword<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, command), fields(user_id = %command.user_id))]
    pub async fn execute(
        &self,
        command: UpdatePasswordCommand,
    ) -> ServiceResult<UpdatePasswordResponse> {
        let repos = self.ctx.repos();

        let user = repos
            .update_password
            .find_by_id(command.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(command.user_id))?;

        if !verify_password(&command.current_password, user.password())? {
            warn!(user_id = %user.id, "Password change rejected: current password mismatch");
            return Err(DomainError::InvalidCredentials.into());
        }

        validate_password(&command.new_password)?;
        if verify_password(&command.new_password, user.password())? {
            return Err(DomainError::validation(
                "new_password",
                "New password must be different from the current one",
            )
            .into());
        }

        let password_hash = hash_password(&command.new_password)?;
        repos
            .update_password
            .update_password(user.id, &password_hash)
            .await?;

        let revoked = if command.revoke_other_sessions {
            repos
                .sessions
                .revoke_all_except(user.id, command.session_id)
                .await?
        } else {
            0
        };

        info!(user_id = %user.id, revoked, "Password changed");
        Ok(UpdatePasswordResponse {
            success: true,
            revoked_sessions: revoked,
        })
    }
}
