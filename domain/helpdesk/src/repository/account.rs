use async_trait::async_trait;

use crate::model::entity::{Account, AccountChanges, AccountCredentials, NewAccount};
use crate::Id;

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn get_by_id(&self, id: Id) -> anyhow::Result<Option<Account>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>>;
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<AccountCredentials>>;
    /// Ordered by username. `search` matches username, names and email, case-insensitively.
    async fn list(&self, search: Option<String>) -> anyhow::Result<Vec<Account>>;
    /// Staff and superusers, ordered by first name.
    async fn list_assignable(&self) -> anyhow::Result<Vec<Account>>;
    /// Writes the account and its profile in one transaction.
    async fn insert(&self, account: &NewAccount) -> anyhow::Result<Account>;
    /// Updates the account and its existing profile, creating the profile only when missing.
    async fn update(&self, id: Id, changes: &AccountChanges) -> anyhow::Result<Account>;
    /// Removes the account with its tickets, comments, profile and sessions, and
    /// unassigns the tickets it was handling.
    async fn delete_cascade(&self, id: Id) -> anyhow::Result<()>;
}
