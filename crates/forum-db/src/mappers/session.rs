//! Session model <-> entity mapper

use forum_core::entities::Session;

use crate::models::SessionModel;

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: model.id,
            user_id: model.user_id,
            expires_at: model.expires_at,
            created_at: model.created_at,
            revoked_at: model.revoked_at,
            user_agent: model.user_agent,
            ip_address: model.ip_address,
        }
    }
}
