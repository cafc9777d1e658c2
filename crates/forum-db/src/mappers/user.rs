//! User model <-> entity / read model mapper

use forum_core::entities::{User, UserRecord};
use forum_core::error::DomainError;
use forum_core::read_models::{ContributionUser, UserProfile};

use crate::models::{ContributionUserRow, UserModel, UserProfileRow};

/// Stored rows go through the same rules as new registrations
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        User::restore(UserRecord {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            name: model.name,
            bio: model.bio,
            avatar: model.avatar,
            email_verified: model.email_verified,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<UserProfileRow> for UserProfile {
    fn from(row: UserProfileRow) -> Self {
        UserProfile {
            id: row.id,
            email: row.email,
            name: row.name,
            bio: row.bio,
            avatar: row.avatar,
        }
    }
}

impl From<ContributionUserRow> for ContributionUser {
    fn from(row: ContributionUserRow) -> Self {
        ContributionUser {
            id: row.id,
            name: row.name,
            avatar: row.avatar,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}
