use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_helpdesk::{
    command::{CreateAccountCommand, EditAccountCommand},
    exception::{HelpdeskException, HelpdeskResult},
    model::{
        entity::{store_precision, Account, NewAccount, Profile},
        vo::{AccountListing, ActingIdentity},
    },
    repository::AccountRepo,
    service::AccountService,
    Id,
};
use typed_builder::TypedBuilder;

use crate::password::hash_password;
use crate::require_staff;

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const DELETE_SELF_NOTICE: &str = "You cannot delete your own account.";
pub const DELETE_SUPERUSER_NOTICE: &str = "You cannot delete a superuser.";

#[derive(TypedBuilder)]
pub struct AccountServiceImpl {
    account_repo: Arc<dyn AccountRepo>,
}

/// A unique violation on insert or update means the username lost a race.
fn username_conflict(e: anyhow::Error) -> HelpdeskException {
    match HelpdeskException::from(e) {
        e if e.is_integrity() => HelpdeskException::validation("username", USERNAME_TAKEN),
        e => e,
    }
}

impl AccountServiceImpl {
    async fn account(&self, id: Id) -> HelpdeskResult<Account> {
        self.account_repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| HelpdeskException::not_found("Account", id))
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<Id>) -> HelpdeskResult<()> {
        match self.account_repo.find_by_username(username).await? {
            Some(existing) if Some(existing.id) != owner => {
                Err(HelpdeskException::validation("username", USERNAME_TAKEN))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn list_accounts(
        &self,
        actor: &ActingIdentity,
        search: Option<String>,
    ) -> HelpdeskResult<AccountListing> {
        require_staff(actor)?;
        let search = search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let accounts = self.account_repo.list(search.clone()).await?;
        Ok(AccountListing::new(accounts, search.unwrap_or_default()))
    }

    async fn get_account(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<Account> {
        require_staff(actor)?;
        self.account(id).await
    }

    async fn create_account(
        &self,
        actor: &ActingIdentity,
        command: CreateAccountCommand,
    ) -> HelpdeskResult<Account> {
        require_staff(actor)?;
        let draft = command.validate()?;
        self.ensure_username_free(&draft.username, None).await?;
        let account = self
            .account_repo
            .insert(&NewAccount {
                username: draft.username,
                first_name: draft.first_name,
                last_name: draft.last_name,
                email: draft.email,
                password_hash: hash_password(&draft.password),
                is_active: true,
                is_staff: draft.is_staff,
                is_superuser: false,
                date_joined: store_precision(Utc::now()),
                profile: draft.profile,
            })
            .await
            .map_err(username_conflict)?;
        tracing::info!("{} created account {}.", actor.username, account.username);
        Ok(account)
    }

    async fn edit_account(
        &self,
        actor: &ActingIdentity,
        id: Id,
        command: EditAccountCommand,
    ) -> HelpdeskResult<Account> {
        require_staff(actor)?;
        self.account(id).await?;
        let changes = command.validate()?;
        self.ensure_username_free(&changes.username, Some(id)).await?;
        let account = self.account_repo.update(id, &changes).await.map_err(username_conflict)?;
        tracing::info!("{} edited account {}.", actor.username, account.username);
        Ok(account)
    }

    async fn account_for_deletion(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<Account> {
        require_staff(actor)?;
        let account = self.account(id).await?;
        if account.id == actor.id {
            return Err(HelpdeskException::permission_denied(DELETE_SELF_NOTICE));
        }
        if account.is_superuser {
            return Err(HelpdeskException::permission_denied(DELETE_SUPERUSER_NOTICE));
        }
        Ok(account)
    }

    async fn delete_account(&self, actor: &ActingIdentity, id: Id) -> HelpdeskResult<String> {
        let account = self.account_for_deletion(actor, id).await?;
        self.account_repo.delete_cascade(account.id).await?;
        tracing::info!("{} deleted account {}.", actor.username, account.username);
        Ok(account.username)
    }

    async fn bootstrap_superuser(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> HelpdeskResult<Option<Account>> {
        if self.account_repo.find_by_username(username).await?.is_some() {
            return Ok(None);
        }
        let account = self
            .account_repo
            .insert(&NewAccount {
                username: username.to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                email: email.to_owned(),
                password_hash: hash_password(password),
                is_active: true,
                is_staff: true,
                is_superuser: true,
                date_joined: store_precision(Utc::now()),
                profile: Profile::default(),
            })
            .await?;
        tracing::info!("Created superuser {}.", account.username);
        Ok(Some(account))
    }
}
