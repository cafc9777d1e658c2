//! Session entity - one signed-in device

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Session entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl Session {
    /// Open a new session lasting `lifetime`
    pub fn new(id: Uuid, user_id: Uuid, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            expires_at: now + lifetime,
            created_at: now,
            revoked_at: None,
            user_agent: None,
            ip_address: None,
        }
    }

    /// Attach client details
    pub fn with_client(mut self, user_agent: Option<String>, ip_address: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }

    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Usable for authentication
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }
}
