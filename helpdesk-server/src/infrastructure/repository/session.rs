use database_model::prelude::*;
use domain_helpdesk::{model::entity::Session, repository::SessionRepo};
use sea_orm::{prelude::*, sea_query::Expr, Set};

use crate::infrastructure::database::SeaOrmDbRepository;

#[async_trait::async_trait]
impl SessionRepo for SeaOrmDbRepository {
    async fn insert(&self, session: &Session) -> anyhow::Result<()> {
        SessionActiveModel {
            token: Set(session.token.clone()),
            account_id: Set(session.account_id),
            created_at: Set(session.created_at),
            flash: Set(session.flash.clone()),
        }
        .insert(self.db.get_connection())
        .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> anyhow::Result<Option<Session>> {
        Ok(SessionEntity::find_by_id(token.to_owned())
            .one(self.db.get_connection())
            .await?
            .map(Session::from))
    }

    async fn set_flash(&self, token: &str, flash: Option<String>) -> anyhow::Result<()> {
        SessionEntity::update_many()
            .col_expr(SessionColumn::Flash, Expr::value(flash))
            .filter(SessionColumn::Token.eq(token))
            .exec(self.db.get_connection())
            .await?;
        Ok(())
    }

    async fn delete(&self, token: &str) -> anyhow::Result<()> {
        SessionEntity::delete_by_id(token.to_owned()).exec(self.db.get_connection()).await?;
        Ok(())
    }
}
