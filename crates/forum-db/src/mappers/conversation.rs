//! Conversation model <-> entity / read model mapper

use forum_core::entities::Conversation;
use forum_core::read_models::{
    AuthorProfile, AuthorSummary, ConversationContribution, ConversationListItem,
    ConversationThread, LastMessage,
};

use crate::models::{
    ConversationContributionRow, ConversationListRow, ConversationModel, ThreadHeaderRow,
    ThreadMessageRow,
};

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// The last message exists only if all of its columns came back from the lateral join
impl From<ConversationListRow> for ConversationListItem {
    fn from(row: ConversationListRow) -> Self {
        let last_message = match (
            row.last_message_id,
            row.last_message_content,
            row.last_message_created_at,
        ) {
            (Some(id), Some(content), Some(created_at)) => Some(LastMessage {
                id,
                content,
                created_at,
                author_name: row.last_message_author_name,
            }),
            _ => None,
        };

        ConversationListItem {
            id: row.id,
            title: row.title,
            author: AuthorSummary {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
            message_count: row.message_count,
            last_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ConversationContributionRow> for ConversationContribution {
    fn from(row: ConversationContributionRow) -> Self {
        ConversationContribution {
            id: row.id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
            message_count: row.message_count,
        }
    }
}

/// Combine a thread heading with its messages, already ordered oldest first
pub fn thread_from_rows(
    header: ThreadHeaderRow,
    messages: Vec<ThreadMessageRow>,
) -> ConversationThread {
    ConversationThread {
        id: header.id,
        title: header.title,
        author_id: header.author_id,
        created_at: header.created_at,
        updated_at: header.updated_at,
        author: AuthorProfile {
            id: header.author_id,
            name: header.author_name,
            email: header.author_email,
            avatar: header.author_avatar,
        },
        messages: messages.into_iter().map(Into::into).collect(),
    }
}
