use async_trait::async_trait;

use crate::command::LoginCommand;
use crate::exception::HelpdeskResult;
use crate::model::entity::{Account, Session};
use crate::model::vo::Notice;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies the credentials of an active account and opens a session.
    async fn login(&self, command: LoginCommand) -> HelpdeskResult<Session>;
    /// Account behind a session token, if the session and account are still valid.
    async fn authenticate(&self, token: &str) -> HelpdeskResult<Option<Account>>;
    async fn logout(&self, token: &str) -> HelpdeskResult<()>;
    async fn push_notice(&self, token: &str, notice: Notice) -> HelpdeskResult<()>;
    /// Returns and clears the pending notice.
    async fn take_notice(&self, token: &str) -> HelpdeskResult<Option<Notice>>;
}
