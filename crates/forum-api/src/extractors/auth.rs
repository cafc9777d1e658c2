//! Authentication extractor
//!
//! Resolves the bearer token from the Authorization header to a live session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use forum_service::use_cases::{AuthIdentity, ResolveSession};
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller behind a valid, unrevoked, unexpired session
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub email: String,
}

impl AuthUser {
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            user_id: self.user_id,
            session_id: self.session_id,
            email: self.email.clone(),
        }
    }
}

impl From<AuthIdentity> for AuthUser {
    fn from(identity: AuthIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            session_id: identity.session_id,
            email: identity.email,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let identity = ResolveSession::new(app_state.service_context())
            .execute(bearer.token())
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Rejected bearer token");
                e
            })?;

        Ok(identity.into())
    }
}
