use async_trait::async_trait;

use crate::model::entity::Session;

#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn insert(&self, session: &Session) -> anyhow::Result<()>;
    async fn get(&self, token: &str) -> anyhow::Result<Option<Session>>;
    async fn set_flash(&self, token: &str, flash: Option<String>) -> anyhow::Result<()>;
    async fn delete(&self, token: &str) -> anyhow::Result<()>;
}
