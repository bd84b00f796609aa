use database_model::prelude::*;
use domain_helpdesk::{
    model::entity::{Comment, CommentRecord, NewComment},
    repository::CommentRepo,
    Id,
};
use sea_orm::{prelude::*, QueryOrder, Set};

use super::ticket::accounts_by_id;
use crate::infrastructure::database::SeaOrmDbRepository;

#[async_trait::async_trait]
impl CommentRepo for SeaOrmDbRepository {
    async fn list_for_ticket(&self, ticket_id: Id) -> anyhow::Result<Vec<CommentRecord>> {
        let conn = self.db.get_connection();
        let comments = CommentEntity::find()
            .filter(CommentColumn::TicketId.eq(ticket_id))
            .order_by_asc(CommentColumn::CreatedAt)
            .order_by_asc(CommentColumn::Id)
            .all(conn)
            .await?;
        let authors = accounts_by_id(conn, comments.iter().map(|c| c.author_id)).await?;
        comments
            .into_iter()
            .map(|model| {
                let comment = Comment::from(model);
                let author = authors.get(&comment.author_id).cloned().ok_or_else(|| {
                    anyhow::anyhow!("Author {} of comment {} is missing.", comment.author_id, comment.id)
                })?;
                Ok(CommentRecord { comment, author })
            })
            .collect()
    }

    async fn insert(&self, comment: &NewComment) -> anyhow::Result<Comment> {
        Ok(CommentActiveModel {
            ticket_id: Set(comment.ticket_id),
            author_id: Set(comment.author_id),
            text: Set(comment.text.clone()),
            created_at: Set(comment.created_at),
            ..Default::default()
        }
        .insert(self.db.get_connection())
        .await?
        .into())
    }
}
