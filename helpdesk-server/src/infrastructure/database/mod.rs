use std::sync::Arc;

use database_migration::{Migrator, MigratorTrait};
use domain_helpdesk::exception::HelpdeskException;
use sea_orm::{ConnectOptions, DatabaseConnection, DbErr, SqlErr};
use typed_builder::TypedBuilder;

#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Self::connect_with(ConnectOptions::new(url.to_owned())).await
    }

    pub async fn connect_with(options: ConnectOptions) -> anyhow::Result<Self> {
        let connection = sea_orm::Database::connect(options).await?;
        Ok(Database { connection })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        Migrator::up(&self.connection, None).await?;
        Ok(())
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

/// Implements every repository trait of the domain over one connection pool.
#[derive(TypedBuilder, Clone)]
pub struct SeaOrmDbRepository {
    pub db: Arc<Database>,
}

/// Lifts unique violations into the domain's integrity exception so services
/// can react to them; every other error passes through.
pub fn translate(e: DbErr) -> anyhow::Error {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            anyhow::Error::new(HelpdeskException::Integrity { detail })
        }
        _ => e.into(),
    }
}
