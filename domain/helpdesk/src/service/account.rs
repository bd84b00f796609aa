use async_trait::async_trait;

use crate::command::{CreateAccountCommand, EditAccountCommand};
use crate::exception::HelpdeskResult;
use crate::model::entity::Account;
use crate::model::vo::{AccountListing, ActingIdentity};
use crate::Id;

/// Staff-only account administration.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn list_accounts(
        &self,
        actor: &ActingIdentity,
        search: Option<String>,
    ) -> HelpdeskResult<AccountListing>;
    async fn get_account(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<Account>;
    async fn create_account(
        &self,
        actor: &ActingIdentity,
        command: CreateAccountCommand,
    ) -> HelpdeskResult<Account>;
    async fn edit_account(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: EditAccountCommand,
    ) -> HelpdeskResult<Account>;
    /// Loads a deletable account; the acting account and superusers are refused.
    async fn account_for_deletion(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<Account>;
    /// Returns the removed account's username.
    async fn delete_account(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<String>;
    /// Creates the configured superuser unless the username is taken.
    async fn bootstrap_superuser(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> HelpdeskResult<Option<Account>>;
}
