use chrono::{DateTime, Utc};
use database_model::comment;
use serde::Serialize;

use super::Account;
use crate::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: Id,
    pub ticket_id: Id,
    pub author_id: Id,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<comment::Model> for Comment {
    fn from(model: comment::Model) -> Self {
        let comment::Model { id, ticket_id, author_id, text, created_at } = model;
        Self { id, ticket_id, author_id, text, created_at }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub ticket_id: Id,
    pub author_id: Id,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A comment with its author, as listed under a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: Account,
}
