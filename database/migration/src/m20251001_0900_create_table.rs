use database_model::prelude::*;
use sea_orm_migration::{
    prelude::*,
    sea_orm::{DbBackend, EntityTrait, Schema},
};

pub struct Migration;

fn get_seaorm_create_stmt<E: EntityTrait>(backend: DbBackend, e: E) -> TableCreateStatement {
    let schema = Schema::new(backend);
    schema.create_table_from_entity(e).if_not_exists().to_owned()
}

fn get_seaorm_drop_stmt<E: EntityTrait>(e: E) -> TableDropStatement {
    Table::drop().table(e).if_exists().to_owned()
}

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20251001_0900_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        // Referenced tables first.
        let stmts = vec![
            get_seaorm_create_stmt(backend, AccountEntity),
            get_seaorm_create_stmt(backend, ProfileEntity),
            get_seaorm_create_stmt(backend, TicketEntity),
            get_seaorm_create_stmt(backend, CommentEntity),
            get_seaorm_create_stmt(backend, SessionEntity),
        ];
        for stmt in stmts {
            manager.create_table(stmt).await?;
        }
        manager
            .create_index(
                Index::create()
                    .name("IDX_Ticket_CreatedAt")
                    .table(TicketEntity)
                    .col(TicketColumn::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("IDX_Comment_TicketId")
                    .table(CommentEntity)
                    .col(CommentColumn::TicketId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let stmts = vec![
            get_seaorm_drop_stmt(SessionEntity),
            get_seaorm_drop_stmt(CommentEntity),
            get_seaorm_drop_stmt(TicketEntity),
            get_seaorm_drop_stmt(ProfileEntity),
            get_seaorm_drop_stmt(AccountEntity),
        ];
        for stmt in stmts {
            manager.drop_table(stmt).await?;
        }
        Ok(())
    }
}
