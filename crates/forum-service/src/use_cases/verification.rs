//! Email ownership checks with one-time codes

use forum_common::{generate_otp, secrets_match, sha256_hex};
use forum_core::entities::{Verification, VerificationPurpose};
use forum_core::DomainError;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::dto::SuccessResponse;
use crate::mail::templates;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Store a fresh code for the user and email it
///
/// Any code issued earlier for the same user stops working. A failed
/// delivery is logged, not returned.
pub(crate) async fn issue_email_otp(
    ctx: &ServiceContext,
    user_id: Uuid,
    email: &str,
) -> ServiceResult<()> {
    let settings = ctx.auth_settings();
    let otp = generate_otp();

    let verification = Verification::new(
        Uuid::new_v4(),
        user_id,
        VerificationPurpose::EmailVerification,
        sha256_hex(&otp),
        settings.otp_expiry,
    );
    ctx.repos().verifications.create(&verification).await?;

    // Delivery failures stay out of the response so it cannot reveal the account
    if let Err(e) = ctx
        .email_sender()
        .send(templates::verification_email(
            email,
            &otp,
            settings.otp_expiry.num_hours(),
        ))
        .await
    {
        warn!(user_id = %user_id, error = %e, "Could not send the verification code");
        return Ok(());
    }

    debug!(user_id = %user_id, "Verification code issued");
    Ok(())
}

// ============================================================================
// Send code
// ============================================================================

pub struct SendVerificationOtp<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SendVerificationOtp<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Re-send a code to an unverified account
    ///
    /// Unknown and already-verified addresses succeed without sending anything.
    #[instrument(skip(self))]
    pub async fn execute(&self, email: &str) -> ServiceResult<SuccessResponse> {
        let user = self
            .ctx
            .repos()
            .email_verification
            .find_by_email(email)
            .await?;

        match user {
            Some(user) if !user.email_verified => {
                issue_email_otp(self.ctx, user.id, &user.email).await?;
            }
            _ => debug!("No unverified account for this address, nothing sent"),
        }

        Ok(SuccessResponse::ok())
    }
}

// ============================================================================
// Verify code
// ============================================================================

#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
    pub email: String,
    pub otp: String,
}

pub struct VerifyEmail<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VerifyEmail<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check the latest code and mark the address verified
    ///
    /// A wrong code burns one attempt. Every failure is `InvalidToken`.
    #[instrument(skip(self, command), fields(email = %command.email))]
    pub async fn execute(&self, command: VerifyEmailCommand) -> ServiceResult<SuccessResponse> {
        let repos = self.ctx.repos();
        let max_attempts = self.ctx.auth_settings().otp_max_attempts;

        let user = repos
            .email_verification
            .find_by_email(&command.email)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        let verification = repos
            .verifications
            .find_latest_active(user.id, VerificationPurpose::EmailVerification)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        if !verification.is_usable(max_attempts) {
            return Err(DomainError::InvalidToken.into());
        }

        if !secrets_match(command.otp.trim(), &verification.secret_hash) {
            let attempts = repos.verifications.increment_attempts(verification.id).await?;
            warn!(user_id = %user.id, attempts, "Wrong verification code");
            return Err(DomainError::InvalidToken.into());
        }

        repos.verifications.consume(verification.id).await?;
        repos.email_verification.mark_email_verified(user.id).await?;

        info!(user_id = %user.id, "Email verified");
        Ok(SuccessResponse::ok())
    }
}
