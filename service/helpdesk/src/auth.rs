use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use domain_helpdesk::{
    command::LoginCommand,
    exception::{HelpdeskException, HelpdeskResult},
    model::{
        entity::{store_precision, Account, Session},
        vo::Notice,
    },
    repository::{AccountRepo, SessionRepo},
    service::AuthService,
};
use rand::RngCore;
use typed_builder::TypedBuilder;

use crate::password::verify_password;

pub const LOGIN_FAILED: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
/// Form-wide error key.
pub const NON_FIELD: &str = "__all__";

const TOKEN_BYTES: usize = 32;

#[derive(TypedBuilder)]
pub struct AuthServiceImpl {
    account_repo: Arc<dyn AccountRepo>,
    session_repo: Arc<dyn SessionRepo>,
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, command: LoginCommand) -> HelpdeskResult<Session> {
        let username = command.username.trim();
        let credentials = match self.account_repo.find_credentials(username).await? {
            Some(c) if c.account.is_active && verify_password(&command.password, &c.password_hash) => c,
            _ => {
                tracing::warn!("Failed login for `{username}`.");
                return Err(HelpdeskException::validation(NON_FIELD, LOGIN_FAILED));
            }
        };
        let session = Session {
            token: new_token(),
            account_id: credentials.account.id,
            created_at: store_precision(Utc::now()),
            flash: None,
        };
        self.session_repo.insert(&session).await?;
        tracing::info!("{} logged in.", credentials.account.username);
        Ok(session)
    }

    async fn authenticate(&self, token: &str) -> HelpdeskResult<Option<Account>> {
        let Some(session) = self.session_repo.get(token).await? else {
            return Ok(None);
        };
        let account = self.account_repo.get_by_id(session.account_id).await?;
        Ok(account.filter(|a| a.is_active))
    }

    async fn logout(&self, token: &str) -> HelpdeskResult<()> {
        self.session_repo.delete(token).await?;
        Ok(())
    }

    async fn push_notice(&self, token: &str, notice: Notice) -> HelpdeskResult<()> {
        let flash = serde_json::to_string(&notice).map_err(anyhow::Error::from)?;
        self.session_repo.set_flash(token, Some(flash)).await?;
        Ok(())
    }

    async fn take_notice(&self, token: &str) -> HelpdeskResult<Option<Notice>> {
        let Some(flash) = self.session_repo.get(token).await?.and_then(|s| s.flash) else {
            return Ok(None);
        };
        self.session_repo.set_flash(token, None).await?;
        match serde_json::from_str(&flash) {
            Ok(notice) => Ok(Some(notice)),
            Err(e) => {
                tracing::warn!("Dropping unreadable flash notice: {e}");
                Ok(None)
            }
        }
    }
}
