use async_trait::async_trait;

use crate::model::entity::{Comment, CommentRecord, NewComment};
use crate::Id;

#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Oldest first.
    async fn list_for_ticket(&self, ticket_id: Id) -> anyhow::Result<Vec<CommentRecord>>;
    async fn insert(&self, comment: &NewComment) -> anyhow::Result<Comment>;
}
