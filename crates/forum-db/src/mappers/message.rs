//! Message model <-> entity / read model mapper

use forum_core::entities::Message;
use forum_core::read_models::{AuthorProfile, MessageContribution, ThreadMessage};

use crate::models::{MessageContributionRow, MessageModel, ThreadMessageRow};

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: model.id,
            conversation_id: model.conversation_id,
            author_id: model.author_id,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

impl From<ThreadMessageRow> for ThreadMessage {
    fn from(row: ThreadMessageRow) -> Self {
        ThreadMessage {
            id: row.id,
            content: row.content,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: AuthorProfile {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
                avatar: row.author_avatar,
            },
        }
    }
}

impl From<MessageContributionRow> for MessageContribution {
    fn from(row: MessageContributionRow) -> Self {
        MessageContribution {
            id: row.id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
            conversation_id: row.conversation_id,
            conversation_title: row.conversation_title,
        }
    }
}
