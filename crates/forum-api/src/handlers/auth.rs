//! Authentication handlers
//!
//! Sign-up, sign-in, sign-out, session lookup, email OTP and password reset.

use axum::{extract::State, Json};
use forum_service::dto::{
    EmailRequest, ResetPasswordRequest, SessionResponse, SignInRequest, SignInResponse,
    SignOutResponse, SignUpRequest, SignUpResponse, SuccessResponse, VerifyEmailRequest,
};
use forum_service::use_cases::{
    GetSession, RegisterUser, RequestPasswordReset, ResetPassword, SendVerificationOtp, SignIn,
    SignOut, VerifyEmail,
};

use crate::extractors::{AuthUser, ClientInfo, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /auth/signup
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignUpRequest>,
) -> ApiResult<Created<Json<SignUpResponse>>> {
    let response = RegisterUser::new(state.service_context())
        .execute(request.into())
        .await?;
    Ok(Created(Json(response)))
}

/// POST /auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let command = request.into_command(client.user_agent, client.ip_address);
    let response = SignIn::new(state.service_context()).execute(command).await?;
    Ok(Json(response))
}

/// POST /auth/signout
///
/// Revokes every active session of the caller.
pub async fn sign_out(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SignOutResponse>> {
    let response = SignOut::new(state.service_context())
        .execute(auth.user_id)
        .await?;
    Ok(Json(response))
}

/// GET /auth/session
pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SessionResponse>> {
    let response = GetSession::new(state.service_context())
        .execute(&auth.identity())
        .await?;
    Ok(Json(response))
}

/// POST /auth/email-otp/send
pub async fn send_email_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EmailRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = SendVerificationOtp::new(state.service_context())
        .execute(&request.email)
        .await?;
    Ok(Json(response))
}

/// POST /auth/email-otp/verify
pub async fn verify_email_otp(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<VerifyEmailRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = VerifyEmail::new(state.service_context())
        .execute(request.into())
        .await?;
    Ok(Json(response))
}

/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<EmailRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = RequestPasswordReset::new(state.service_context())
        .execute(&request.email)
        .await?;
    Ok(Json(response))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = ResetPassword::new(state.service_context())
        .execute(request.into())
        .await?;
    Ok(Json(response))
}
